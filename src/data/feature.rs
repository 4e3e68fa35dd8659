use crate::error::TreeError;
use std::fmt::{self, Display};
use std::str::FromStr;

/// How a column is turned into an orderable vector before it is split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Naturally ordered numeric values, split on the raw value.
    Real,
    /// Unordered integer category codes, ranked per node before splitting.
    Categorical,
}

impl FeatureKind {
    /// Parses a whole per-column declaration, failing on the first unknown tag.
    pub fn parse_all(tags: &[&str]) -> Result<Vec<Self>, TreeError> {
        tags.iter().map(|tag| tag.parse()).collect()
    }
}

impl FromStr for FeatureKind {
    type Err = TreeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "real" => Ok(Self::Real),
            "categorical" => Ok(Self::Categorical),
            other => Err(TreeError::UnknownFeatureKind(other.to_string())),
        }
    }
}

impl Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Real => "real",
            Self::Categorical => "categorical",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!("real".parse::<FeatureKind>(), Ok(FeatureKind::Real));
        assert_eq!(
            "categorical".parse::<FeatureKind>(),
            Ok(FeatureKind::Categorical)
        );
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(
            "Real".parse::<FeatureKind>(),
            Err(TreeError::UnknownFeatureKind("Real".into()))
        );
        assert!(" real".parse::<FeatureKind>().is_err());
    }

    #[test]
    fn test_parse_all_fails_on_unknown() {
        let result = FeatureKind::parse_all(&["real", "ordinal", "categorical"]);
        assert_eq!(result, Err(TreeError::UnknownFeatureKind("ordinal".into())));
    }

    #[test]
    fn test_display_round_trips_tag() {
        for kind in [FeatureKind::Real, FeatureKind::Categorical] {
            assert_eq!(kind.to_string().parse::<FeatureKind>(), Ok(kind));
        }
    }
}
