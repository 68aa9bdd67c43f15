//! # CLI
//!
//! Command-line surface for running the suite in CI. Every connection flag
//! falls back to an `IDEACHECK_*` environment variable, and the exit status
//! reflects the outcome.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::environment::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, ENV_BASE_URL, ENV_LOGIN_EMAIL, ENV_LOGIN_PASSWORD,
    ENV_MISSING_IDEA_ID, ENV_STATIC_TOKEN, ENV_TIMEOUT_MS, HarnessConfig, non_blank,
};
use crate::error::HarnessError;
use crate::testing::steps::DEFAULT_MISSING_IDEA_ID;
use crate::testing::{RunReport, Step};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILED_STEPS: u8 = 1;
pub const EXIT_HARNESS_ERROR: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "ideacheck")]
#[command(about = "Run the ordered verification suite against an IdeaCenter API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base address of the API, e.g. http://host:84
    #[arg(long, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Pre-issued bearer token (skips the login call)
    #[arg(long, env = ENV_STATIC_TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// Login email used when no token is given
    #[arg(long, env = ENV_LOGIN_EMAIL)]
    pub email: Option<String>,

    /// Login password used when no token is given
    #[arg(long, env = ENV_LOGIN_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = ENV_TIMEOUT_MS, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Identifier the rejection checks use as an unknown idea
    #[arg(long, env = ENV_MISSING_IDEA_ID, default_value = DEFAULT_MISSING_IDEA_ID)]
    pub missing_idea_id: String,

    /// Output format for the report printed on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Append the double-delete regression check to the plan
    #[arg(long)]
    pub extended: bool,

    /// Print the ordered plan and exit
    #[arg(long)]
    pub list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    pub fn harness_config(&self) -> Result<HarnessConfig, HarnessError> {
        let config = HarnessConfig {
            base_url: self.base_url.trim().to_string(),
            static_token: non_blank(self.token.as_deref()),
            login_email: non_blank(self.email.as_deref()),
            login_password: self.password.clone().filter(|password| !password.is_empty()),
            timeout: Duration::from_millis(self.timeout_ms),
            missing_idea_id: self.missing_idea_id.trim().to_string(),
            extended: self.extended,
        };
        config.validate()?;
        Ok(config)
    }
}

pub fn render_plan(extended: bool) -> String {
    Step::plan(extended)
        .iter()
        .enumerate()
        .map(|(index, step)| format!("{}. {} - {}", index + 1, step.name(), step.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn exit_status(report: &RunReport) -> u8 {
    if report.success() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED_STEPS
    }
}
