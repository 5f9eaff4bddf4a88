use secrecy::{ExposeSecret, Secret, SecretVec};
use serde::{Serialize, Serializer};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_BASE_URL: &str = "ALIX_BASE_URL";
pub const ENV_PARTNER_CODE: &str = "ALIX_PARTNER_CODE";
pub const ENV_SECRET_KEY: &str = "ALIX_SECRET_KEY";
pub const ENV_PRIVATE_KEY_PATH: &str = "ALIX_PRIVATE_KEY_PATH";
pub const ENV_PUBLIC_KEY_PATH: &str = "ALIX_PUBLIC_KEY_PATH";
pub const ENV_DEBUG: &str = "ALIX_DEBUG";
pub const ENV_TIMEOUT_SECONDS: &str = "ALIX_TIMEOUT_SECONDS";
pub const ENV_MAX_RETRIES: &str = "ALIX_MAX_RETRIES";

/// Partner API sandbox
pub const SANDBOX_BASE_URL: &str = "https://sandbox.alixpay.com";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub struct KycConfig {
    pub base_url: String,
    pub partner_code: String,
    pub secret_key: Secret<String>,
    pub private_key: SecretVec<u8>,
    pub public_key: Option<Vec<u8>>,
    pub debug: bool,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl std::fmt::Debug for KycConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KycConfig")
            .field("base_url", &self.base_url)
            .field("partner_code", &self.partner_code)
            .field("secret_key", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .field("has_public_key", &self.public_key.is_some())
            .field("debug", &self.debug)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Clone for KycConfig {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            partner_code: self.partner_code.clone(),
            secret_key: Secret::new(self.secret_key.expose_secret().clone()),
            private_key: SecretVec::new(self.private_key.expose_secret().clone()),
            public_key: self.public_key.clone(),
            debug: self.debug,
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
        }
    }
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for KycConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("KycConfig", 7)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("partner_code", &self.partner_code)?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("private_key", "[REDACTED]")?;
        state.serialize_field("debug", &self.debug)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("max_retries", &self.max_retries)?;
        state.end()
    }
}

impl KycConfig {
    /// Create a new configuration from credentials already in memory
    ///
    /// `private_key` is the PEM text of an RSA private key, either PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`) or PKCS#8 (`BEGIN PRIVATE KEY`).
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        partner_code: impl Into<String>,
        secret_key: impl Into<String>,
        private_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            partner_code: partner_code.into(),
            secret_key: Secret::new(secret_key.into()),
            private_key: SecretVec::new(private_key.into()),
            public_key: None,
            debug: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Required:
    /// - `ALIX_BASE_URL`
    /// - `ALIX_PARTNER_CODE`
    /// - `ALIX_SECRET_KEY`
    /// - `ALIX_PRIVATE_KEY_PATH` (PEM file)
    ///
    /// Optional:
    /// - `ALIX_PUBLIC_KEY_PATH` (PEM file)
    /// - `ALIX_DEBUG` (defaults to false)
    /// - `ALIX_TIMEOUT_SECONDS` (defaults to 30)
    /// - `ALIX_MAX_RETRIES` (defaults to 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = non_empty_var(ENV_BASE_URL);
        let partner_code = non_empty_var(ENV_PARTNER_CODE);
        let secret_key = non_empty_var(ENV_SECRET_KEY);
        let private_key_path = non_empty_var(ENV_PRIVATE_KEY_PATH);

        let missing: Vec<String> = [
            (ENV_BASE_URL, base_url.is_none()),
            (ENV_PARTNER_CODE, partner_code.is_none()),
            (ENV_SECRET_KEY, secret_key.is_none()),
            (ENV_PRIVATE_KEY_PATH, private_key_path.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| (*name).to_string())
        .collect();

        let (Some(base_url), Some(partner_code), Some(secret_key), Some(private_key_path)) =
            (base_url, partner_code, secret_key, private_key_path)
        else {
            return Err(ConfigError::MissingEnvironmentVariables(missing));
        };

        let private_key = read_key_file(Path::new(&private_key_path))?;

        let public_key = match non_empty_var(ENV_PUBLIC_KEY_PATH) {
            Some(path) => Some(read_key_file(Path::new(&path))?),
            None => None,
        };

        let debug = parse_var(ENV_DEBUG)?.unwrap_or(false);
        let timeout_seconds = parse_var(ENV_TIMEOUT_SECONDS)?.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let max_retries = parse_var(ENV_MAX_RETRIES)?.unwrap_or(DEFAULT_MAX_RETRIES);

        Ok(Self {
            base_url,
            partner_code,
            secret_key: Secret::new(secret_key),
            private_key: SecretVec::new(private_key),
            public_key,
            debug,
            timeout_seconds,
            max_retries,
        })
    }

    /// Create configuration from a specific .env file path
    ///
    /// Variables already present in the process environment take precedence.
    /// A missing file is not an error; the process environment is used as is.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(env_file_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let env_file_path = env_file_path.as_ref();
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path.display(),
                    e
                )));
            }
        }

        Self::from_env()
    }

    /// Set a custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Attach the partner's public key PEM
    #[must_use]
    pub fn public_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Log request and response bodies at debug level
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Check that every required field is populated
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("base_url".to_string());
        }
        if self.partner_code.trim().is_empty() {
            missing.push("partner_code".to_string());
        }
        if self.secret_key.expose_secret().is_empty() {
            missing.push("secret_key".to_string());
        }
        if self.private_key.expose_secret().is_empty() {
            missing.push("private_key".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingFields(missing))
        }
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get private key PEM bytes (use carefully - exposes secret)
    pub fn private_key(&self) -> &[u8] {
        self.private_key.expose_secret()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    non_empty_var(name)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!("{} has invalid value '{}'", name, raw))
            })
        })
        .transpose()
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::KeyFile {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnvironmentVariables(Vec<String>),

    #[error("Missing required configuration fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Failed to load key from {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
