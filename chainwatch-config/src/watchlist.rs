//! Watchlist configuration.
//!
//! A watchlist groups on-chain assets under a shared alerting policy and
//! monitoring cadence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::types::{AssetType, Chain, Severity};
use crate::validation;

/// A named set of on-chain assets sharing an alerting policy.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Watchlist {
    #[validate(custom(function = validation::validate_resource_name))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// At least one asset; an empty watchlist monitors nothing.
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub assets: Vec<Asset>,

    /// Externally managed policy reference; mutually exclusive with
    /// `alert_config`.
    #[serde(default)]
    pub alert_policy_id: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub alert_config: Option<AlertConfig>,

    #[validate(nested)]
    #[serde(default)]
    pub monitoring: MonitoringOptions,
}

impl Watchlist {
    /// True when both `alert_policy_id` and an inline `alert_config` are set.
    pub fn policy_conflict(&self) -> bool {
        self.alert_policy_id.is_some() && self.alert_config.is_some()
    }
}

/// A single tracked asset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Asset {
    pub chain: Chain,

    #[serde(rename = "type")]
    pub kind: AssetType,

    #[validate(length(min = 1))]
    pub address: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub symbol: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Inline alerting policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct AlertConfig {
    /// Alerts below this severity are dropped.
    #[serde(default)]
    pub severity_threshold: Severity,

    /// Channel names resolved against `resources.notification_channels`.
    #[serde(default)]
    pub notification_channels: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub rules: Vec<AlertRule>,
}

/// A trigger rule scoped to a subset of asset types.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AlertRule {
    #[serde(default)]
    pub name: Option<String>,

    /// Empty means the rule applies to every asset type.
    #[serde(default)]
    pub asset_types: Vec<AssetType>,

    /// Trigger condition, evaluated by the monitoring engine.
    #[validate(length(min = 1))]
    pub expression: String,

    /// Per-rule severity override.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Monitoring cadence and maintenance options.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct MonitoringOptions {
    #[validate(range(min = 10, max = 86400))]
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u32,

    /// Windows during which alerting is suppressed.
    #[validate(nested)]
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindow>,

    /// Per-metric threshold overrides.
    #[serde(default)]
    pub threshold_overrides: BTreeMap<String, f64>,
}

fn default_interval_seconds() -> u32 {
    60
}

impl Default for MonitoringOptions {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            maintenance_windows: Vec::new(),
            threshold_overrides: BTreeMap::new(),
        }
    }
}

/// A recurring wall-clock window, interpreted in the global timezone.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct MaintenanceWindow {
    #[validate(custom(function = validation::validate_clock_time))]
    pub start: String,

    #[validate(custom(function = validation::validate_clock_time))]
    pub end: String,

    /// Empty means every day.
    #[validate(custom(function = validation::validate_days))]
    #[serde(default)]
    pub days: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_watchlist() -> Watchlist {
        serde_yaml::from_str(
            r#"
name: Treasury
assets:
  - chain: ethereum
    type: Wallet
    address: "0xab5801a7d398351b8be11c439e05c5b3259aec9b"
"#,
        )
        .unwrap()
    }

    #[test]
    fn minimal_watchlist_applies_defaults() {
        let wl = minimal_watchlist();
        assert_eq!(wl.monitoring.interval_seconds, 60);
        assert!(wl.alert_config.is_none());
        assert!(!wl.policy_conflict());
        wl.validate().expect("minimal watchlist is valid");
    }

    #[test]
    fn empty_assets_fail_validation() {
        let mut wl = minimal_watchlist();
        wl.assets.clear();
        assert!(wl.validate().is_err());
    }

    #[test]
    fn policy_conflict_detected() {
        let mut wl = minimal_watchlist();
        wl.alert_policy_id = Some("policy-7".into());
        wl.alert_config = Some(AlertConfig::default());
        assert!(wl.policy_conflict());
    }

    #[test]
    fn alert_config_defaults_to_low_threshold() {
        let alert: AlertConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(alert.severity_threshold, Severity::Low);
        assert!(alert.notification_channels.is_empty());
    }

    #[test]
    fn rule_with_empty_expression_fails() {
        let mut wl = minimal_watchlist();
        wl.alert_config = Some(AlertConfig {
            severity_threshold: Severity::Low,
            notification_channels: vec![],
            rules: vec![AlertRule {
                name: None,
                asset_types: vec![AssetType::Token],
                expression: String::new(),
                severity: None,
            }],
        });
        assert!(wl.validate().is_err());
    }

    #[test]
    fn maintenance_window_bounds_checked() {
        let mut wl = minimal_watchlist();
        wl.monitoring.maintenance_windows.push(MaintenanceWindow {
            start: "22:00".into(),
            end: "23:30".into(),
            days: vec!["saturday".into(), "sunday".into()],
        });
        wl.validate().expect("valid window");

        wl.monitoring.maintenance_windows[0].end = "24:30".into();
        assert!(wl.validate().is_err());
    }

    #[test]
    fn out_of_range_interval_fails() {
        let mut wl = minimal_watchlist();
        wl.monitoring.interval_seconds = 5;
        assert!(wl.validate().is_err());
    }
}
