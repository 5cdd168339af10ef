//! Process configuration.
//!
//! Loaded once at startup and shared read-only with every component; no
//! runtime mutation. The signing secret can be pulled out of the file via
//! `$ENV{NAME}` or `$FILE{path}` placeholders so it never has to live in
//! the config itself.

use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;

fn default_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_db_uri() -> String {
    "sqlite:///var/civiclog/civiclog.db".into()
}

/// Expand `$ENV{NAME}` and `$FILE{path}` placeholders in raw config text.
fn expand_placeholders(text: &str) -> Result<String, ConfigError> {
    let env_re =
        Regex::new(r"\$ENV\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let file_re =
        Regex::new(r"\$FILE\{([^}]+)\}").map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let mut out = String::new();
    let mut last = 0;
    for caps in env_re.captures_iter(text) {
        let m = caps.get(0).unwrap();
        out.push_str(&text[last..m.start()]);
        let var = std::env::var(&caps[1])
            .map_err(|_| ConfigError::MissingEnv(caps[1].to_string()))?;
        out.push_str(&var);
        last = m.end();
    }
    out.push_str(&text[last..]);
    let text = out;
    let mut out = String::new();
    let mut last = 0;
    for caps in file_re.captures_iter(&text) {
        let m = caps.get(0).unwrap();
        out.push_str(&text[last..m.start()]);
        let contents = std::fs::read_to_string(caps[1].trim())?;
        out.push_str(contents.trim_end());
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Server configuration shared by every component.
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// Address the embedding facade binds; the core only records it.
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Storage backend connection URI (`sqlite:` or `postgres:`).
    #[serde(default = "default_db_uri")]
    pub db_uri: String,
    /// HMAC secret for session token signing.
    pub secret: String,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a referenced
    /// environment variable is unset, or the secret is empty.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text, expanding placeholders first.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let text = expand_placeholders(text)?;
        let cfg: Config = toml::from_str(&text)?;
        if cfg.secret.is_empty() {
            return Err(ConfigError::Invalid("secret must not be empty".into()));
        }
        Ok(cfg)
    }
}
