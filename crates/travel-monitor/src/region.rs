//! Geographic scope for the city listing step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optional geographic constraint on which cities the lister considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    #[default]
    Global,
    Europe,
    Asia,
    NorthAmerica,
    SouthAmerica,
    Africa,
    Oceania,
    MiddleEast,
}

/// Error returned when a region name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region '{0}' (expected one of: {names})", names = Region::names().join(", "))]
pub struct UnknownRegion(pub String);

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Global,
        Region::Europe,
        Region::Asia,
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Africa,
        Region::Oceania,
        Region::MiddleEast,
    ];

    /// Canonical identifier, as accepted on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Europe => "Europe",
            Self::Asia => "Asia",
            Self::NorthAmerica => "NorthAmerica",
            Self::SouthAmerica => "SouthAmerica",
            Self::Africa => "Africa",
            Self::Oceania => "Oceania",
            Self::MiddleEast => "MiddleEast",
        }
    }

    /// Phrase used inside model prompts ("in the world", "in Europe", ...).
    pub fn prompt_scope(&self) -> &'static str {
        match self {
            Self::Global => "in the world",
            Self::Europe => "in Europe",
            Self::Asia => "in Asia",
            Self::NorthAmerica => "in North America",
            Self::SouthAmerica => "in South America",
            Self::Africa => "in Africa",
            Self::Oceania => "in Oceania",
            Self::MiddleEast => "in the Middle East",
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Region::as_str).collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownRegion;

    /// Case-insensitive; `-`, `_` and spaces are ignored, so `north-america`,
    /// `North America` and `NorthAmerica` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "global" | "world" | "" => Ok(Self::Global),
            "europe" => Ok(Self::Europe),
            "asia" => Ok(Self::Asia),
            "northamerica" => Ok(Self::NorthAmerica),
            "southamerica" => Ok(Self::SouthAmerica),
            "africa" => Ok(Self::Africa),
            "oceania" => Ok(Self::Oceania),
            "middleeast" => Ok(Self::MiddleEast),
            _ => Err(UnknownRegion(s.to_string())),
        }
    }
}

impl TryFrom<String> for Region {
    type Error = UnknownRegion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("north-america".parse::<Region>().unwrap(), Region::NorthAmerica);
        assert_eq!("South America".parse::<Region>().unwrap(), Region::SouthAmerica);
        assert_eq!("MIDDLE_EAST".parse::<Region>().unwrap(), Region::MiddleEast);
        assert_eq!("world".parse::<Region>().unwrap(), Region::Global);
    }

    #[test]
    fn rejects_unknown_region() {
        let err = "atlantis".parse::<Region>().unwrap_err();
        assert_eq!(err, UnknownRegion("atlantis".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown region 'atlantis' (expected one of: Global, Europe, Asia, \
             NorthAmerica, SouthAmerica, Africa, Oceania, MiddleEast)"
        );
    }

    #[test]
    fn prompt_scope_reads_naturally() {
        assert_eq!(Region::Global.prompt_scope(), "in the world");
        assert_eq!(Region::NorthAmerica.prompt_scope(), "in North America");
    }

    #[test]
    fn serde_uses_canonical_name() {
        let yaml = serde_yaml::to_string(&Region::Europe).unwrap();
        assert_eq!(yaml.trim(), "Europe");
        let parsed: Region = serde_yaml::from_str("north-america").unwrap();
        assert_eq!(parsed, Region::NorthAmerica);
    }
}
