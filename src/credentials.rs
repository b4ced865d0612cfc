//! Credential resolution strategies.
//!
//! Both remote clients authenticate with the same opaque [`Credentials`]
//! context, resolved once per pipeline run. Two interchangeable providers
//! exist, selected by the `[auth] strategy` configuration key:
//!
//! - **[`EnvironmentCredentials`]** — reads key material from the process
//!   environment (the execution environment's attached identity; nothing
//!   user-supplied in the config file).
//! - **[`ConfigFileCredentials`]** — parses a named `[profile.<name>]` table
//!   from the configuration file.
//!
//! Exactly one strategy is active at a time. There is no runtime fallback
//! from one to the other, so a credential error always names its real
//! source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::Config;
use crate::error::{DocpipeError, Result};

/// Opaque authentication context held for the duration of one pipeline run.
///
/// Immutable once constructed; passed by reference to every remote call.
#[derive(Debug, Clone)]
pub struct Credentials {
    key_id: String,
    secret_key: String,
    session_token: Option<String>,
}

impl Credentials {
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

/// A source of [`Credentials`].
///
/// Fails with [`DocpipeError::Authentication`] when no viable identity is
/// available.
pub trait CredentialProvider: Send + Sync {
    fn resolve(&self) -> Result<Credentials>;
}

// ============ Environment Provider ============

/// Environment-derived identity.
///
/// Reads `DOCPIPE_ACCESS_KEY_ID`, `DOCPIPE_SECRET_ACCESS_KEY`, and
/// optionally `DOCPIPE_SESSION_TOKEN` from the process environment. Use this
/// strategy when running inside a compute environment that injects identity
/// through environment variables.
pub struct EnvironmentCredentials {
    var_prefix: String,
}

impl EnvironmentCredentials {
    pub fn new() -> Self {
        Self {
            var_prefix: "DOCPIPE".to_string(),
        }
    }

    /// Use a different variable prefix (`<prefix>_ACCESS_KEY_ID`, ...).
    pub fn with_var_prefix(prefix: impl Into<String>) -> Self {
        Self {
            var_prefix: prefix.into(),
        }
    }

    fn var(&self, suffix: &str) -> Result<String> {
        let name = format!("{}_{}", self.var_prefix, suffix);
        std::env::var(&name)
            .map_err(|_| DocpipeError::Authentication(format!("{} environment variable not set", name)))
    }
}

impl Default for EnvironmentCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvironmentCredentials {
    fn resolve(&self) -> Result<Credentials> {
        let key_id = self.var("ACCESS_KEY_ID")?;
        let secret_key = self.var("SECRET_ACCESS_KEY")?;

        let mut credentials = Credentials::new(key_id, secret_key);
        if let Ok(token) = std::env::var(format!("{}_SESSION_TOKEN", self.var_prefix)) {
            credentials = credentials.with_session_token(token);
        }
        Ok(credentials)
    }
}

// ============ Config-File Provider ============

/// Config-file identity, for local development.
///
/// Parses the named `[profile.<name>]` table from the configuration file at
/// resolve time and extracts its key material. A missing file, malformed
/// TOML, unknown profile, or profile without keys all surface as
/// [`DocpipeError::Authentication`].
pub struct ConfigFileCredentials {
    path: PathBuf,
    profile: String,
}

/// Subset of the config file the provider cares about. Unrelated tables and
/// keys are ignored.
#[derive(Deserialize)]
struct CredentialFile {
    #[serde(default)]
    profile: HashMap<String, CredentialProfile>,
}

#[derive(Deserialize)]
struct CredentialProfile {
    #[serde(default)]
    access_key_id: Option<String>,
    #[serde(default)]
    secret_access_key: Option<String>,
}

impl ConfigFileCredentials {
    pub fn new(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            profile: profile.into(),
        }
    }
}

impl CredentialProvider for ConfigFileCredentials {
    fn resolve(&self) -> Result<Credentials> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DocpipeError::Authentication(format!(
                "cannot read credential config {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let file: CredentialFile = toml::from_str(&content).map_err(|e| {
            DocpipeError::Authentication(format!(
                "malformed credential config {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let profile = file.profile.get(&self.profile).ok_or_else(|| {
            DocpipeError::Authentication(format!(
                "profile '{}' not found in {}",
                self.profile,
                self.path.display()
            ))
        })?;

        match (&profile.access_key_id, &profile.secret_access_key) {
            (Some(key_id), Some(secret_key)) => Ok(Credentials::new(key_id, secret_key)),
            _ => Err(DocpipeError::Authentication(format!(
                "profile '{}' has no access_key_id/secret_access_key",
                self.profile
            ))),
        }
    }
}

/// Create the provider selected by `[auth] strategy`.
pub fn create_provider(config: &Config, config_path: &Path) -> Result<Box<dyn CredentialProvider>> {
    match config.auth.strategy.as_str() {
        "environment" => Ok(Box::new(EnvironmentCredentials::new())),
        "config-file" => Ok(Box::new(ConfigFileCredentials::new(
            config_path,
            &config.auth.profile,
        ))),
        other => Err(DocpipeError::Authentication(format!(
            "unknown auth strategy '{}'",
            other
        ))),
    }
}
