//! Network variant tag

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating profile a node runs under; the registry's lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkVariant {
    Main,
    Testnet,
    Regtest,
}

impl NetworkVariant {
    /// All variants in canonical order
    pub const ALL: [NetworkVariant; 3] = [
        NetworkVariant::Main,
        NetworkVariant::Testnet,
        NetworkVariant::Regtest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkVariant::Main => "main",
            NetworkVariant::Testnet => "testnet",
            NetworkVariant::Regtest => "regtest",
        }
    }
}

impl fmt::Display for NetworkVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkVariant {
    type Err = RegistryError;

    /// Exact, case-sensitive match on the variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetworkVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        for variant in NetworkVariant::ALL {
            assert_eq!(variant.as_str().parse::<NetworkVariant>().unwrap(), variant);
            assert_eq!(variant.to_string(), variant.as_str());
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "Main".parse::<NetworkVariant>(),
            Err(RegistryError::UnknownVariant("Main".to_string()))
        );
        assert!("mainnet".parse::<NetworkVariant>().is_err());
        assert!(" main".parse::<NetworkVariant>().is_err());
        assert!("".parse::<NetworkVariant>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&NetworkVariant::Testnet).unwrap(), "\"testnet\"");
        let parsed: NetworkVariant = serde_json::from_str("\"regtest\"").unwrap();
        assert_eq!(parsed, NetworkVariant::Regtest);
    }
}
