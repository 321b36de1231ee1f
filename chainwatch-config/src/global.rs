//! Project-wide settings and defaults from the top-level `global` key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::types::Severity;
use crate::validation;

/// Global configuration shared by every resource.
#[derive(Default, Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct GlobalConfig {
    /// Project identity.
    #[validate(nested)]
    #[serde(default)]
    pub project: ProjectConfig,

    /// Fallback values applied when a resource does not set its own.
    #[validate(nested)]
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Environment variables that must be present at load time.
    #[serde(default)]
    pub required_env_vars: Vec<String>,

    /// Named integration endpoints (URL per name).
    #[validate(custom(function = validation::validate_endpoint_map))]
    #[serde(default)]
    pub integrations: BTreeMap<String, String>,
}

/// Project identity block.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProjectConfig {
    #[validate(length(min = 1))]
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Deployment environment label (production, staging, ...).
    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,
}

fn default_project_name() -> String {
    "chainwatch".into()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            environment: None,
            owner: None,
        }
    }
}

/// Fallback values for resources.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DefaultsConfig {
    /// Severity assigned when a resource does not set one.
    #[serde(default = "default_severity")]
    pub severity: Severity,

    /// Timezone used to interpret maintenance and skip windows.
    #[validate(custom(function = validation::validate_timezone))]
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Delivery retry policy applied where a resource has none.
    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_severity() -> Severity {
    Severity::Medium
}

fn default_timezone() -> String {
    "UTC".into()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            severity: default_severity(),
            timezone: default_timezone(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Retry/backoff policy shared by channels and agents.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RetryPolicy {
    #[validate(range(min = 0, max = 20))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: u32,

    /// Double the backoff after each failed attempt.
    #[serde(default = "default_true")]
    pub exponential: bool,
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_seconds() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_seconds: default_backoff_seconds(),
            exponential: true,
        }
    }
}
