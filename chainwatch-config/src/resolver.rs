//! Cross-reference resolution over a parsed configuration.
//!
//! Watchlists and custom agents reference notification channels by name;
//! the resolver checks every such reference against the channel collection.
//! Import cycles are discovered earlier, during loading, and folded into
//! the same report by the loader.

use crate::parsed::ParsedConfig;
use crate::report::{CrossReferenceValidation, MissingReference, ResourceKind};

/// Check every name reference between resource collections.
pub fn validate_references(config: &ParsedConfig) -> CrossReferenceValidation {
    let mut missing = Vec::new();

    for (id, watchlist) in &config.watchlists {
        if let Some(alert) = &watchlist.alert_config {
            collect_missing(
                config,
                ResourceKind::Watchlist,
                id,
                "alert_config.notification_channels",
                &alert.notification_channels,
                &mut missing,
            );
        }
    }

    for (id, agent) in &config.custom_agents {
        collect_missing(
            config,
            ResourceKind::CustomAgent,
            id,
            "notification_channels",
            &agent.notification_channels,
            &mut missing,
        );
    }

    CrossReferenceValidation {
        valid: missing.is_empty(),
        missing_references: missing,
        circular_references: Vec::new(),
    }
}

fn collect_missing(
    config: &ParsedConfig,
    source_type: ResourceKind,
    source_name: &str,
    field: &str,
    targets: &[String],
    missing: &mut Vec<MissingReference>,
) {
    for target in targets {
        if !config.notification_channels.contains_key(target) {
            missing.push(MissingReference {
                source_type,
                source_name: source_name.to_string(),
                field: field.to_string(),
                target: target.clone(),
            });
        }
    }
}

/// Warnings for references that resolve to disabled channels.
pub fn disabled_channel_warnings(config: &ParsedConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let disabled = |target: &String| {
        config
            .notification_channels
            .get(target)
            .is_some_and(|c| !c.enabled)
    };

    for (id, watchlist) in &config.watchlists {
        if let Some(alert) = &watchlist.alert_config {
            for target in alert.notification_channels.iter().filter(|t| disabled(t)) {
                warnings.push(format!(
                    "watchlist '{id}' references disabled notification channel '{target}'"
                ));
            }
        }
    }
    for (id, agent) in &config.custom_agents {
        for target in agent.notification_channels.iter().filter(|t| disabled(t)) {
            warnings.push(format!(
                "custom agent '{id}' references disabled notification channel '{target}'"
            ));
        }
    }
    warnings
}
