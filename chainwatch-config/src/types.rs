//! Shared closed enums used across the configuration document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported blockchain networks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Bsc,
    Avalanche,
    Arbitrum,
    Optimism,
    Base,
    Fantom,
    Gnosis,
    Celo,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Bsc => "bsc",
            Chain::Avalanche => "avalanche",
            Chain::Arbitrum => "arbitrum",
            Chain::Optimism => "optimism",
            Chain::Base => "base",
            Chain::Fantom => "fantom",
            Chain::Gnosis => "gnosis",
            Chain::Celo => "celo",
        };
        f.write_str(name)
    }
}

/// Asset classes a watchlist entry can track.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetType {
    Wallet,
    Protocol,
    Token,
    Contract,
    Pool,
    #[serde(rename = "NFT")]
    Nft,
}

/// Alert severity ladder. Ordering allows threshold comparison.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert_eq!(Severity::default(), Severity::Low);
    }

    #[test]
    fn chain_wire_form_is_lowercase() {
        let chain: Chain = serde_yaml::from_str("arbitrum").unwrap();
        assert_eq!(chain, Chain::Arbitrum);
        assert_eq!(serde_yaml::to_string(&chain).unwrap().trim(), "arbitrum");
    }

    #[test]
    fn asset_type_nft_keeps_uppercase_wire_form() {
        let asset: AssetType = serde_yaml::from_str("NFT").unwrap();
        assert_eq!(asset, AssetType::Nft);
        assert!(serde_yaml::from_str::<AssetType>("nft").is_err());
    }

    #[test]
    fn unknown_chain_is_rejected() {
        assert!(serde_yaml::from_str::<Chain>("solana").is_err());
    }
}
