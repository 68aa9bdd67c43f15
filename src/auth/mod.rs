//! # Session bootstrap
//!
//! Turns configured credentials into an authenticated [`Session`]. A
//! pre-issued bearer token is used as-is; otherwise the login endpoint is
//! called once and its `accessToken` becomes the session credential.

use tracing::{debug, info};

use crate::environment::HarnessConfig;
use crate::error::HarnessError;
use crate::http::client::Session;
use crate::http::request::ApiRequest;
use crate::ideas::{AUTHENTICATION_PATH, LoginRequest, LoginResponse};

/// How the suite obtains its bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    StaticToken(String),
    Login { email: String, password: String },
}

impl AuthMethod {
    /// A non-blank static token wins over login credentials.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, HarnessError> {
        if let Some(token) = config.static_token.as_deref().map(str::trim)
            && !token.is_empty()
        {
            return Ok(AuthMethod::StaticToken(token.to_string()));
        }

        match (config.login_email.as_deref(), config.login_password.as_deref()) {
            (Some(email), Some(password)) if !email.trim().is_empty() => Ok(AuthMethod::Login {
                email: email.trim().to_string(),
                password: password.to_string(),
            }),
            _ => Err(HarnessError::Config(
                "no credentials configured: set a static token or a login email and password".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::StaticToken(_) => f.write_str("StaticToken(<redacted>)"),
            AuthMethod::Login { email, .. } => f
                .debug_struct("Login")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Build the authenticated session for a run.
pub async fn bootstrap(config: &HarnessConfig) -> Result<Session, HarnessError> {
    let method = AuthMethod::from_config(config)?;
    let token = match method {
        AuthMethod::StaticToken(token) => {
            info!("using pre-issued bearer token");
            token
        }
        AuthMethod::Login { email, password } => {
            info!(%email, "requesting bearer token");
            fetch_token(config, &email, &password).await?
        }
    };

    Ok(Session::anonymous(&config.base_url, config.timeout)?.with_bearer(token))
}

/// Exchange login credentials for an access token.
pub async fn fetch_token(
    config: &HarnessConfig,
    email: &str,
    password: &str,
) -> Result<String, HarnessError> {
    let login_session = Session::anonymous(&config.base_url, config.timeout)?;
    let request = ApiRequest::post(AUTHENTICATION_PATH).json(&LoginRequest { email, password })?;
    let response = login_session.execute(&request).await?;

    if !response.is_status(200) {
        return Err(HarnessError::Authentication {
            status: response.status,
            body: response.body,
        });
    }

    let token = extract_token(&response.body)?;
    debug!(token_len = token.len(), "bearer token issued");
    Ok(token)
}

fn extract_token(body: &str) -> Result<String, HarnessError> {
    let parsed: LoginResponse = serde_json::from_str(body)
        .map_err(|e| HarnessError::CredentialExtraction(format!("response is not valid JSON: {e}")))?;

    parsed
        .access_token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| HarnessError::CredentialExtraction("`accessToken` is missing or blank".to_string()))
}
