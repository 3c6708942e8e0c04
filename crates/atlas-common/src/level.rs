//! Administrative division levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level of an administrative division, from the whole country down to
/// arrondissements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DivisionLevel {
    Country,
    Region,
    Departement,
    Arrondissement,
}

impl DivisionLevel {
    /// The level displayed when a user drills into a zone of this level.
    ///
    /// Arrondissements are terminal and countries are never clicked, so both
    /// have no child level.
    pub fn child(self) -> Option<DivisionLevel> {
        match self {
            DivisionLevel::Region => Some(DivisionLevel::Departement),
            DivisionLevel::Departement => Some(DivisionLevel::Arrondissement),
            DivisionLevel::Country | DivisionLevel::Arrondissement => None,
        }
    }

    /// Level shown when the dashboard opens.
    pub fn root() -> DivisionLevel {
        DivisionLevel::Region
    }

    /// Wire representation used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            DivisionLevel::Country => "COUNTRY",
            DivisionLevel::Region => "REGION",
            DivisionLevel::Departement => "DEPARTEMENT",
            DivisionLevel::Arrondissement => "ARRONDISSEMENT",
        }
    }

    /// French label for display.
    pub fn label(&self) -> &'static str {
        match self {
            DivisionLevel::Country => "PAYS",
            DivisionLevel::Region => "RÉGION",
            DivisionLevel::Departement => "DÉPARTEMENT",
            DivisionLevel::Arrondissement => "ARRONDISSEMENT",
        }
    }
}

impl fmt::Display for DivisionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown division level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for DivisionLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COUNTRY" | "PAYS" => Ok(DivisionLevel::Country),
            "REGION" | "RÉGION" => Ok(DivisionLevel::Region),
            "DEPARTEMENT" | "DÉPARTEMENT" => Ok(DivisionLevel::Departement),
            "ARRONDISSEMENT" => Ok(DivisionLevel::Arrondissement),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_table() {
        assert_eq!(DivisionLevel::Region.child(), Some(DivisionLevel::Departement));
        assert_eq!(
            DivisionLevel::Departement.child(),
            Some(DivisionLevel::Arrondissement)
        );
        assert_eq!(DivisionLevel::Arrondissement.child(), None);
        assert_eq!(DivisionLevel::Country.child(), None);
    }

    #[test]
    fn test_serde_uses_upper_case() {
        let json = serde_json::to_string(&DivisionLevel::Departement).unwrap();
        assert_eq!(json, "\"DEPARTEMENT\"");
        let level: DivisionLevel = serde_json::from_str("\"ARRONDISSEMENT\"").unwrap();
        assert_eq!(level, DivisionLevel::Arrondissement);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("region".parse::<DivisionLevel>(), Ok(DivisionLevel::Region));
        assert!("canton".parse::<DivisionLevel>().is_err());
    }
}
