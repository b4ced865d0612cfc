use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Top-level configuration, loaded from a TOML file.
///
/// ```toml
/// [auth]
/// strategy = "config-file"        # "environment" | "config-file"
/// profile = "default"
///
/// [profile.default]
/// compartment = "ocid1.compartment.x"
/// region = "us-phoenix-1"
/// access_key_id = "AKEXAMPLE"     # config-file strategy only
/// secret_access_key = "..."
///
/// [service]
/// document_endpoint = "https://document.{region}.example-cloud.com"
/// storage_endpoint = "https://storage.{region}.example-cloud.com"
///
/// [output]
/// container = "outputs"
/// prefix = "results"
///
/// [http]
/// timeout_secs = 30
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub profile: HashMap<String, Profile>,
    pub service: ServiceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Credential strategy selection.
///
/// The strategy is an explicit configuration decision, never runtime
/// auto-detection; an ambiguous fallback would mask credential errors.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// `"environment"` or `"config-file"`.
    pub strategy: String,
    /// Name of the `[profile.<name>]` table to use.
    #[serde(default = "default_profile_name")]
    pub profile: String,
}

fn default_profile_name() -> String {
    "default".to_string()
}

/// A named profile: target compartment and region, plus key material when
/// the config-file credential strategy is active.
#[derive(Debug, Deserialize, Clone)]
pub struct Profile {
    pub compartment: String,
    pub region: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

/// Remote service endpoints. A `{region}` placeholder is substituted with
/// the active profile's region.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub document_endpoint: String,
    pub storage_endpoint: String,
}

impl ServiceConfig {
    pub fn document_endpoint_for(&self, region: &str) -> String {
        resolve_endpoint(&self.document_endpoint, region)
    }

    pub fn storage_endpoint_for(&self, region: &str) -> String {
        resolve_endpoint(&self.storage_endpoint, region)
    }
}

fn resolve_endpoint(template: &str, region: &str) -> String {
    template
        .replace("{region}", region)
        .trim_end_matches('/')
        .to_string()
}

/// Default output location for extraction results.
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            prefix: default_prefix(),
        }
    }
}

fn default_container() -> String {
    "outputs".to_string()
}
fn default_prefix() -> String {
    "results".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-call timeout applied to every remote request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    match config.auth.strategy.as_str() {
        "environment" | "config-file" => {}
        other => anyhow::bail!(
            "Unknown auth.strategy: '{}'. Must be environment or config-file.",
            other
        ),
    }

    // Key material is checked by the config-file credential provider, not
    // here, so a missing key surfaces as an authentication failure.
    if !config.profile.contains_key(&config.auth.profile) {
        anyhow::bail!(
            "auth.profile references '[profile.{}]', which is not defined",
            config.auth.profile
        );
    }

    if config.service.document_endpoint.trim().is_empty() {
        anyhow::bail!("service.document_endpoint must be set");
    }
    if config.service.storage_endpoint.trim().is_empty() {
        anyhow::bail!("service.storage_endpoint must be set");
    }

    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be > 0");
    }

    Ok(config)
}
