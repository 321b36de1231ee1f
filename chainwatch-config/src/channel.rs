//! Notification channel configuration.
//!
//! A channel entry is a discriminated union: the `type` field selects the
//! variant and the channel-specific payload lives under `configuration`.
//! Seven delivery backends are supported; all of them share the common
//! fields (name, enabled, tags) and an optional `testing` block.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{self, Validate, ValidationErrors};

use crate::global::RetryPolicy;
use crate::validation;

/// A single notification channel entry.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct NotificationChannel {
    /// Human-facing channel name.
    #[validate(custom(function = validation::validate_resource_name))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Disabled channels stay referencable but deliver nothing.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Force (or skip) delivery validation for this channel.
    #[serde(default)]
    pub validate: Option<bool>,

    /// Test-mode overrides, legal on every variant.
    #[validate(nested)]
    #[serde(default)]
    pub testing: Option<ChannelTesting>,

    /// `type` + `configuration` payload.
    #[validate(nested)]
    #[serde(flatten)]
    pub kind: ChannelKind,
}

fn default_true() -> bool {
    true
}

/// Test-mode block usable on any channel variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ChannelTesting {
    /// Route deliveries to the test endpoint instead of the real backend.
    #[serde(default)]
    pub test_mode: bool,

    #[validate(url)]
    #[serde(default)]
    pub test_endpoint: Option<String>,
}

/// Channel-specific payload, discriminated by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "configuration", rename_all = "lowercase")]
pub enum ChannelKind {
    Webhook(WebhookConfig),
    Slack(SlackConfig),
    Email(EmailConfig),
    Discord(DiscordConfig),
    Pagerduty(PagerDutyConfig),
    Msteams(MsTeamsConfig),
    Telegram(TelegramConfig),
}

impl ChannelKind {
    /// Wire name of the variant, as written in the `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            ChannelKind::Webhook(_) => "webhook",
            ChannelKind::Slack(_) => "slack",
            ChannelKind::Email(_) => "email",
            ChannelKind::Discord(_) => "discord",
            ChannelKind::Pagerduty(_) => "pagerduty",
            ChannelKind::Msteams(_) => "msteams",
            ChannelKind::Telegram(_) => "telegram",
        }
    }
}

impl Validate for ChannelKind {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            ChannelKind::Webhook(c) => c.validate(),
            ChannelKind::Slack(c) => c.validate(),
            ChannelKind::Email(c) => c.validate(),
            ChannelKind::Discord(c) => c.validate(),
            ChannelKind::Pagerduty(c) => c.validate(),
            ChannelKind::Msteams(c) => c.validate(),
            ChannelKind::Telegram(c) => c.validate(),
        }
    }
}

/// Generic HTTP webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    #[validate(url)]
    pub url: String,

    #[validate(custom(function = validation::validate_http_method))]
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_method() -> String {
    "POST".into()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Slack incoming-webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    #[validate(url)]
    pub webhook_url: String,

    /// Override the webhook's default channel.
    #[serde(default)]
    pub channel: Option<String>,

    #[serde(default = "default_sender_name")]
    pub username: String,

    #[serde(default = "default_slack_icon")]
    pub icon_emoji: String,
}

fn default_sender_name() -> String {
    "Chainwatch".into()
}

fn default_slack_icon() -> String {
    ":rotating_light:".into()
}

/// SMTP e-mail delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    #[validate(nested)]
    pub smtp: SmtpConfig,

    #[validate(email)]
    pub from: String,

    #[validate(length(min = 1))]
    #[validate(custom(function = validation::validate_email_list))]
    pub recipients: Vec<String>,

    #[serde(default = "default_subject_template")]
    pub subject_template: String,

    #[serde(default)]
    pub body_template: Option<String>,
}

fn default_subject_template() -> String {
    "[{severity}] {title}".into()
}

/// SMTP transport parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1, max = 65535))]
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: Option<String>,

    /// Name of the env var holding the SMTP password, never the secret itself.
    #[serde(default)]
    pub password_env: Option<String>,

    #[serde(default = "default_true")]
    pub starttls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

/// Discord webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    #[validate(url)]
    pub webhook_url: String,

    #[serde(default = "default_sender_name")]
    pub username: String,

    #[validate(url)]
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// PagerDuty Events v2 delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PagerDutyConfig {
    #[validate(length(equal = 32))]
    pub integration_key: String,

    /// Optional severity remapping (chainwatch severity -> PagerDuty severity).
    #[validate(custom(function = validation::validate_severity_map))]
    #[serde(default)]
    pub severity_map: BTreeMap<String, String>,
}

/// Microsoft Teams webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MsTeamsConfig {
    #[validate(url)]
    pub webhook_url: String,

    #[serde(default = "default_teams_title")]
    pub title_template: String,
}

fn default_teams_title() -> String {
    "{severity}: {title}".into()
}

/// Telegram bot delivery.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Name of the env var holding the bot token.
    #[validate(length(min = 1))]
    pub bot_token_env: String,

    #[validate(length(min = 1))]
    pub chat_id: String,

    #[serde(default)]
    pub disable_notification: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_minimal_document_applies_defaults() {
        let doc = r#"
name: Ops
type: slack
configuration:
  webhook_url: "https://hooks.slack.test/x"
"#;
        let channel: NotificationChannel = serde_yaml::from_str(doc).unwrap();
        assert!(channel.enabled);
        assert!(channel.tags.is_empty());
        match &channel.kind {
            ChannelKind::Slack(slack) => {
                assert_eq!(slack.username, "Chainwatch");
                assert_eq!(slack.icon_emoji, ":rotating_light:");
                assert_eq!(slack.channel, None);
            }
            other => panic!("expected slack, got {}", other.type_name()),
        }
        channel.validate().expect("minimal slack channel is valid");
    }

    #[test]
    fn type_discriminates_payload_shape() {
        // A slack payload under a webhook type must fail: `url` is missing.
        let doc = r#"
name: Wrong
type: webhook
configuration:
  webhook_url: "https://hooks.slack.test/x"
"#;
        assert!(serde_yaml::from_str::<NotificationChannel>(doc).is_err());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let doc = r#"
name: Pager
type: carrier-pigeon
configuration: {}
"#;
        assert!(serde_yaml::from_str::<NotificationChannel>(doc).is_err());
    }

    #[test]
    fn all_seven_types_deserialize() {
        let docs = [
            ("webhook", "url: \"https://example.com/hook\""),
            ("slack", "webhook_url: \"https://hooks.slack.test/x\""),
            (
                "email",
                "smtp: {host: mail.example.com}\nfrom: alerts@example.com\nrecipients: [ops@example.com]",
            ),
            ("discord", "webhook_url: \"https://discord.test/hook\""),
            (
                "pagerduty",
                "integration_key: \"0123456789abcdef0123456789abcdef\"",
            ),
            ("msteams", "webhook_url: \"https://teams.test/hook\""),
            ("telegram", "bot_token_env: TG_TOKEN\nchat_id: \"-100\""),
        ];
        for (type_name, payload) in docs {
            let indented = payload.replace('\n', "\n  ");
            let doc = format!("name: T\ntype: {type_name}\nconfiguration:\n  {indented}\n");
            let channel: NotificationChannel = serde_yaml::from_str(&doc)
                .unwrap_or_else(|e| panic!("{type_name} should parse: {e}"));
            assert_eq!(channel.kind.type_name(), type_name);
            channel
                .validate()
                .unwrap_or_else(|e| panic!("{type_name} should validate: {e}"));
        }
    }

    #[test]
    fn webhook_defaults() {
        let doc = r#"
name: Hook
type: webhook
configuration:
  url: "https://example.com/hook"
"#;
        let channel: NotificationChannel = serde_yaml::from_str(doc).unwrap();
        let ChannelKind::Webhook(hook) = &channel.kind else {
            panic!("expected webhook");
        };
        assert_eq!(hook.method, "POST");
        assert_eq!(hook.timeout_seconds, 30);
        assert_eq!(hook.retry.max_retries, 3);
    }

    #[test]
    fn invalid_webhook_method_fails_validation() {
        let doc = r#"
name: Hook
type: webhook
configuration:
  url: "https://example.com/hook"
  method: DELETE
"#;
        let channel: NotificationChannel = serde_yaml::from_str(doc).unwrap();
        assert!(channel.validate().is_err());
    }

    #[test]
    fn testing_block_intersects_any_variant() {
        let doc = r#"
name: Tel
type: telegram
testing:
  test_mode: true
  test_endpoint: "https://sink.example.com"
configuration:
  bot_token_env: TG_TOKEN
  chat_id: "42"
"#;
        let channel: NotificationChannel = serde_yaml::from_str(doc).unwrap();
        let testing = channel.testing.as_ref().expect("testing block parsed");
        assert!(testing.test_mode);
        channel.validate().expect("testing block is valid");
    }

    #[test]
    fn unknown_payload_field_is_rejected() {
        let doc = r#"
name: Hook
type: webhook
configuration:
  url: "https://example.com/hook"
  metod: POST
"#;
        assert!(serde_yaml::from_str::<NotificationChannel>(doc).is_err());
    }

    #[test]
    fn pagerduty_key_length_enforced() {
        let doc = r#"
name: Pager
type: pagerduty
configuration:
  integration_key: "short"
"#;
        let channel: NotificationChannel = serde_yaml::from_str(doc).unwrap();
        assert!(channel.validate().is_err());
    }
}
