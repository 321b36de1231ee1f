//! Fully-defaulted configuration after merging and flattening.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::agent::CustomAgent;
use crate::channel::NotificationChannel;
use crate::global::GlobalConfig;
use crate::watchlist::Watchlist;

/// Result of a successful load: defaults applied and the `resources` block
/// flattened into top-level collections keyed by resource identifier.
///
/// A `ParsedConfig` is never mutated after load; the process treats it as
/// immutable for its lifetime. BTreeMap keeps iteration deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedConfig {
    /// Global settings; `None` only for the pre-load baseline.
    #[serde(default)]
    pub global: Option<GlobalConfig>,

    #[serde(default)]
    pub notification_channels: BTreeMap<String, NotificationChannel>,

    #[serde(default)]
    pub watchlists: BTreeMap<String, Watchlist>,

    #[serde(default)]
    pub custom_agents: BTreeMap<String, CustomAgent>,
}

impl ParsedConfig {
    /// Zero-value baseline usable before any file is loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn resource_counts(&self) -> ResourceCounts {
        ResourceCounts {
            notification_channels: self.notification_channels.len(),
            watchlists: self.watchlists.len(),
            custom_agents: self.custom_agents.len(),
        }
    }

    pub fn total_resources(&self) -> usize {
        self.resource_counts().total()
    }
}

/// Per-collection resource counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceCounts {
    pub notification_channels: usize,
    pub watchlists: usize,
    pub custom_agents: usize,
}

impl ResourceCounts {
    pub fn total(&self) -> usize {
        self.notification_channels + self.watchlists + self.custom_agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_baseline() {
        let parsed = ParsedConfig::empty();
        assert!(parsed.global.is_none());
        assert!(parsed.notification_channels.is_empty());
        assert!(parsed.watchlists.is_empty());
        assert!(parsed.custom_agents.is_empty());
        assert_eq!(parsed.total_resources(), 0);
    }

    #[test]
    fn counts_sum_collections() {
        let mut parsed = ParsedConfig::empty();
        let watchlist: Watchlist = serde_yaml::from_str(
            "name: W\nassets: [{chain: base, type: Token, address: \"0x1\"}]\n",
        )
        .unwrap();
        parsed.watchlists.insert("w".into(), watchlist);
        let counts = parsed.resource_counts();
        assert_eq!(counts.watchlists, 1);
        assert_eq!(counts.total(), 1);
        assert_eq!(parsed.total_resources(), 1);
    }
}
