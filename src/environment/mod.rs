//! # Harness configuration
//!
//! Connection settings for one suite run. Values arrive through the CLI,
//! where each flag falls back to its `IDEACHECK_*` environment variable and
//! then to the defaults below.

use std::fmt;
use std::time::Duration;

use crate::error::HarnessError;
use crate::testing::steps::DEFAULT_MISSING_IDEA_ID;

pub const ENV_BASE_URL: &str = "IDEACHECK_BASE_URL";
pub const ENV_STATIC_TOKEN: &str = "IDEACHECK_STATIC_TOKEN";
pub const ENV_LOGIN_EMAIL: &str = "IDEACHECK_LOGIN_EMAIL";
pub const ENV_LOGIN_PASSWORD: &str = "IDEACHECK_LOGIN_PASSWORD";
pub const ENV_TIMEOUT_MS: &str = "IDEACHECK_TIMEOUT_MS";
pub const ENV_MISSING_IDEA_ID: &str = "IDEACHECK_MISSING_IDEA_ID";

pub const DEFAULT_BASE_URL: &str = "http://localhost:84";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Fully resolved settings for one suite run.
#[derive(Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub base_url: String,
    pub static_token: Option<String>,
    pub login_email: Option<String>,
    pub login_password: Option<String>,
    pub timeout: Duration,
    /// Identifier the rejection steps expect the server not to know.
    pub missing_idea_id: String,
    /// Also run checks beyond the seven core steps.
    pub extended: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            static_token: None,
            login_email: None,
            login_password: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            missing_idea_id: DEFAULT_MISSING_IDEA_ID.to_string(),
            extended: false,
        }
    }
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("base_url", &self.base_url)
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("login_email", &self.login_email)
            .field("login_password", &self.login_password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("missing_idea_id", &self.missing_idea_id)
            .field("extended", &self.extended)
            .finish()
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), HarnessError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(HarnessError::Config("base URL cannot be empty".to_string()));
        }
        reqwest::Url::parse(base_url)
            .map_err(|e| HarnessError::Config(format!("invalid base URL `{base_url}`: {e}")))?;
        if self.timeout.is_zero() {
            return Err(HarnessError::Config("timeout must be greater than zero".to_string()));
        }
        if self.missing_idea_id.trim().is_empty() {
            return Err(HarnessError::Config("missing idea id cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Blank strings count as unset.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
