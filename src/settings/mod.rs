//! Runtime configuration, read from the process environment.
//!
//! Keys are matched case-insensitively, so `ENV` and `env` are the same setting.


use std::path::PathBuf;

use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;

use crate::notifications::{ChannelKind, ChannelSource};

const PLACEHOLDER_MARKER: &str = "NONE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "env", default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Transaction table identifier. Missing or placeholder values trigger discovery.
    #[serde(rename = "api_financetracker_transactiontable_name", default)]
    pub table_name: Option<String>,
    #[serde(rename = "monthly_report_topic_arn", default)]
    pub monthly_report_topic: Option<String>,
    #[serde(rename = "budget_alert_topic_arn", default)]
    pub budget_alert_topic: Option<String>,
    /// Account used by the local identity service.
    #[serde(rename = "finance_account_id", default = "default_account_id")]
    pub account_id: String,
    /// Directory of CSV tables used by the local runner.
    #[serde(rename = "finance_data_dir", default = "default_data_dir")]
    pub data_dir: PathBuf
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(Environment::default())
    }

    /// Same as [`Settings::from_env`] but reads the given variables instead of the process environment.
    pub fn from_variables(variables: Map<String, String>) -> Result<Self, ConfigError> {
        Self::build(Environment::default().source(Some(variables)))
    }

    fn build(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn table_identifier(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// A configured topic identifier means the channel was provisioned externally, even
    /// when the value is a placeholder; otherwise the naming convention applies.
    pub fn channel_source(&self, kind: ChannelKind) -> ChannelSource {
        let configured = match kind {
            ChannelKind::MonthlyReports => &self.monthly_report_topic,
            ChannelKind::BudgetAlerts => &self.budget_alert_topic
        };

        match configured {
            Some(channel) => ChannelSource::Provisioned(channel.clone()),
            None => ChannelSource::Convention
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            region: default_region(),
            table_name: None,
            monthly_report_topic: None,
            budget_alert_topic: None,
            account_id: default_account_id(),
            data_dir: default_data_dir()
        }
    }
}

/// Blank values and values carrying the `NONE` marker stand for "not configured".
pub fn is_placeholder(value: &str) -> bool {
    value.trim().is_empty() || value.contains(PLACEHOLDER_MARKER)
}

fn default_environment() -> String {
    "main".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_account_id() -> String {
    "000000000000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
