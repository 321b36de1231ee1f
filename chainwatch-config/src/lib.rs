//! # Chainwatch Configuration System
//!
//! Typed configuration for the Chainwatch monitoring/alerting platform,
//! loaded once per process and treated as immutable afterwards.
//!
//! ## Features
//! - **Unified Document**: global settings, notification channels,
//!   watchlists and custom agents in one schema
//! - **Multi-File Loading**: `config.imports` with deterministic
//!   later-wins merge precedence and import-cycle detection
//! - **Validation**: schema constraints plus cross-reference resolution
//!   between resources, aggregated instead of fail-fast
//! - **Environment Awareness**: `CHAINWATCH_*` variables override any field

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod agent;
mod channel;
mod error;
mod global;
mod loader;
mod meta;
mod parsed;
mod report;
mod resolver;
mod types;
mod validation;
mod watchlist;

pub use agent::{
    AgentKind, AgentSchedule, AlertTemplate, ApiIntegration, AutomatedResponse, CustomAgent,
    DatabaseIntegration, ExternalIntegrations, QueueIntegration, ResponseAction, TestScenario,
};
pub use channel::{
    ChannelKind, ChannelTesting, DiscordConfig, EmailConfig, MsTeamsConfig, NotificationChannel,
    PagerDutyConfig, SlackConfig, SmtpConfig, TelegramConfig, WebhookConfig,
};
pub use error::ConfigError;
pub use global::{DefaultsConfig, GlobalConfig, ProjectConfig, RetryPolicy};
pub use loader::{load_tree, load_tree_lenient, ConfigLoadResult, LoadMetadata, ENV_PREFIX};
pub use meta::ConfigMeta;
pub use parsed::{ParsedConfig, ResourceCounts};
pub use report::{
    CircularReference, ConfigValidationError, CrossReferenceValidation, ErrorCode,
    MissingReference, ResourceKind,
};
pub use resolver::{disabled_channel_warnings, validate_references};
pub use types::{AssetType, Chain, Severity};
pub use watchlist::{
    AlertConfig, AlertRule, Asset, MaintenanceWindow, MonitoringOptions, Watchlist,
};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChainwatchConfig {
    /// Document metadata (version, imports, strictness).
    #[serde(default)]
    pub config: ConfigMeta,

    /// Project-wide settings and defaults.
    #[serde(default)]
    pub global: GlobalConfig,

    /// The three resource collections.
    #[serde(default)]
    pub resources: Resources,
}

/// Resource collections keyed by resource identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Resources {
    #[serde(default)]
    pub notification_channels: BTreeMap<String, NotificationChannel>,

    #[serde(default)]
    pub watchlists: BTreeMap<String, Watchlist>,

    #[serde(default)]
    pub custom_agents: BTreeMap<String, CustomAgent>,
}

impl ChainwatchConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/chainwatch.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides
    ///    (`CHAINWATCH_ENV`, defaulting to `production`).
    /// 4. `CHAINWATCH_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ChainwatchConfig::default()));

        if Path::new("config/chainwatch.yaml").exists() {
            figment = figment.merge(Yaml::file("config/chainwatch.yaml"));
        } else {
            tracing::debug!("config/chainwatch.yaml not found, using default configuration");
        }

        let env = std::env::var("CHAINWATCH_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.ensure_valid()?;
                Ok(config)
            })
    }

    /// Load a single document from a specific path, without import
    /// resolution. Use [`load_tree`] for multi-file configurations.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        let figment = Figment::from(Serialized::defaults(ChainwatchConfig::default()));
        loader::merge_file(figment, path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.ensure_valid()?;
                Ok(config)
            })
    }

    /// Validate the whole document, returning every failure.
    pub fn validate_all(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = self.config.validate() {
            errors.extend(report::schema_violations("config", &e));
        }
        if let Err(e) = self.global.validate() {
            errors.extend(report::schema_violations("global", &e));
        }

        for (id, channel) in &self.resources.notification_channels {
            if let Err(e) = channel.validate() {
                errors.extend(
                    report::schema_violations(&format!("notification_channels.{id}"), &e)
                        .into_iter()
                        .map(|err| err.for_resource(ResourceKind::NotificationChannel, id)),
                );
            }
        }
        for (id, watchlist) in &self.resources.watchlists {
            if let Err(e) = watchlist.validate() {
                errors.extend(
                    report::schema_violations(&format!("watchlists.{id}"), &e)
                        .into_iter()
                        .map(|err| err.for_resource(ResourceKind::Watchlist, id)),
                );
            }
            if watchlist.policy_conflict() {
                errors.push(
                    ConfigValidationError::new(
                        ErrorCode::ConflictingFields,
                        "alert_policy_id and alert_config cannot both be set",
                    )
                    .for_resource(ResourceKind::Watchlist, id)
                    .with_suggestion("keep the inline alert_config or the policy reference, not both"),
                );
            }
        }
        for (id, agent) in &self.resources.custom_agents {
            if let Err(e) = agent.validate() {
                errors.extend(
                    report::schema_violations(&format!("custom_agents.{id}"), &e)
                        .into_iter()
                        .map(|err| err.for_resource(ResourceKind::CustomAgent, id)),
                );
            }
        }
        errors
    }

    /// Fail with an aggregated [`ConfigError::Invalid`] when anything is off.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let errors = self.validate_all();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Flatten the `resources` block into the defaulted output form.
    pub fn into_parsed(self) -> ParsedConfig {
        ParsedConfig {
            global: Some(self.global),
            notification_channels: self.resources.notification_channels,
            watchlists: self.resources.watchlists,
            custom_agents: self.resources.custom_agents,
        }
    }
}
