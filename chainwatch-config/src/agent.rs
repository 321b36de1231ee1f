//! Custom agent configuration.
//!
//! An agent is a user-defined monitor bound to one chain, with its own
//! schedule, alerting, automated responses and external integrations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::global::RetryPolicy;
use crate::types::{Chain, Severity};
use crate::validation;
use crate::watchlist::MaintenanceWindow;

/// A user-defined monitoring agent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct CustomAgent {
    #[validate(custom(function = validation::validate_resource_name))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Monitor kind; fixes the semantics of `configuration`.
    #[serde(rename = "type")]
    pub kind: AgentKind,

    /// Chain the agent observes.
    pub chain: Chain,

    #[serde(default = "default_agent_severity")]
    pub severity: Severity,

    /// Inline agent body, deployed as-is by the runtime.
    #[serde(default)]
    pub code: Option<String>,

    /// Free-form agent parameters, passed through untouched.
    #[serde(default)]
    pub configuration: serde_json::Value,

    /// Channel names resolved against `resources.notification_channels`.
    #[serde(default)]
    pub notification_channels: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub schedule: AgentSchedule,

    #[validate(nested)]
    #[serde(default)]
    pub alert_template: Option<AlertTemplate>,

    #[validate(nested)]
    #[serde(default)]
    pub automated_responses: Vec<AutomatedResponse>,

    /// Replayable scenarios for dry-running the agent.
    #[validate(nested)]
    #[serde(default)]
    pub testing: Vec<TestScenario>,

    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryPolicy,

    #[validate(nested)]
    #[serde(default)]
    pub integrations: ExternalIntegrations,
}

fn default_agent_severity() -> Severity {
    Severity::Medium
}

/// The fifteen supported monitor kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Balance,
    Transaction,
    Event,
    Price,
    Gas,
    Liquidity,
    Governance,
    Bridge,
    Oracle,
    Mempool,
    Nft,
    Security,
    Yield,
    Validator,
    Custom,
}

/// Execution cadence and alert rate cap.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AgentSchedule {
    #[validate(range(min = 10, max = 86400))]
    #[serde(default = "default_agent_interval")]
    pub interval_seconds: u32,

    /// Windows during which runs are skipped.
    #[validate(nested)]
    #[serde(default)]
    pub skip_windows: Vec<MaintenanceWindow>,

    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_max_alerts_per_hour")]
    pub max_alerts_per_hour: u32,
}

fn default_agent_interval() -> u32 {
    300
}

fn default_max_alerts_per_hour() -> u32 {
    10
}

impl Default for AgentSchedule {
    fn default() -> Self {
        Self {
            interval_seconds: default_agent_interval(),
            skip_windows: Vec::new(),
            max_alerts_per_hour: default_max_alerts_per_hour(),
        }
    }
}

/// Alert message template; `{placeholders}` are filled by the runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AlertTemplate {
    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub body: String,
}

/// A condition -> action rule executed without operator involvement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AutomatedResponse {
    #[validate(length(min = 1))]
    pub condition: String,

    pub action: ResponseAction,

    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

/// Supported automated-response actions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseAction {
    PauseAgent,
    Notify,
    WebhookCall,
    Escalate,
}

/// A replayable test scenario.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct TestScenario {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default)]
    pub input: serde_json::Value,

    #[serde(default)]
    pub expect_alert: bool,
}

/// External systems the agent talks to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ExternalIntegrations {
    #[validate(nested)]
    #[serde(default)]
    pub apis: Vec<ApiIntegration>,

    #[validate(nested)]
    #[serde(default)]
    pub databases: Vec<DatabaseIntegration>,

    #[validate(nested)]
    #[serde(default)]
    pub message_queues: Vec<QueueIntegration>,
}

/// An HTTP API the agent queries.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ApiIntegration {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(url)]
    pub url: String,

    /// Env var holding the value for the Authorization header.
    #[serde(default)]
    pub auth_header_env: Option<String>,
}

/// A database the agent reads or writes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DatabaseIntegration {
    #[validate(length(min = 1))]
    pub name: String,

    /// Env var holding the connection string.
    #[validate(length(min = 1))]
    pub url_env: String,
}

/// A message queue the agent publishes to.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct QueueIntegration {
    #[validate(length(min = 1))]
    pub name: String,

    /// Env var holding the broker URL.
    #[validate(length(min = 1))]
    pub url_env: String,

    #[validate(length(min = 1))]
    pub topic: String,
}
