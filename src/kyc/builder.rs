use crate::core::config::{ConfigError, KycConfig};
use crate::core::errors::KycError;
use crate::core::kernel::{
    HttpTransport, RequestAssembler, ReqwestTransport, RestClient, RestClientConfig, RetryConfig,
    RsaSigner, RsaVerifier, Signer,
};
use crate::kyc::client::KycClient;
use crate::kyc::payload::PayloadVersion;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, Secret, SecretVec};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`KycClient`]
pub struct KycClientBuilder {
    base_url: String,
    partner_code: String,
    secret_key: Secret<String>,
    private_key: SecretVec<u8>,
    public_key: Option<Vec<u8>>,
    signer: Option<Arc<dyn Signer>>,
    rest_config: RestClientConfig,
    user_agent: Option<String>,
    headers: Vec<(String, String)>,
    payload_version: PayloadVersion,
}

impl KycClientBuilder {
    /// Start a builder from the partner credentials
    ///
    /// `private_key` is PEM text, PKCS#1 or PKCS#8.
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
            signer: None,
            rest_config: RestClientConfig::default(),
            user_agent: None,
            headers: Vec::new(),
            payload_version: PayloadVersion::default(),
        }
    }

    /// Start a builder from a loaded configuration
    pub fn from_config(config: &KycConfig) -> Self {
        let mut builder = Self::new(
            config.base_url.clone(),
            config.partner_code.clone(),
            config.secret_key().to_string(),
            config.private_key().to_vec(),
        )
        .with_debug(config.debug)
        .with_timeout(config.timeout_seconds)
        .with_max_retries(config.max_retries);

        if let Some(public_key) = &config.public_key {
            builder = builder.with_public_key(public_key.clone());
        }

        builder
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-attempt request timeout in seconds
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.rest_config = self.rest_config.with_timeout(timeout_seconds);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.rest_config = self.rest_config.with_max_retries(max_retries);
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.rest_config = self.rest_config.with_retry(retry);
        self
    }

    /// Log request and response bodies at debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.rest_config = self.rest_config.with_debug(debug);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Extra header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_public_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Sign with a custom signer instead of the configured private key
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_payload_version(mut self, version: PayloadVersion) -> Self {
        self.payload_version = version;
        self
    }

    /// Build the client over a pooled reqwest transport
    pub fn build(self) -> Result<KycClient<ReqwestTransport>, KycError> {
        let transport =
            ReqwestTransport::new(Duration::from_secs(self.rest_config.timeout_seconds))?;
        self.build_with_transport(transport)
    }

    /// Build the client over a caller-supplied transport
    pub fn build_with_transport<T: HttpTransport>(
        self,
        transport: T,
    ) -> Result<KycClient<T>, KycError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingFields(vec!["base_url".to_string()]).into());
        }
        if self.partner_code.trim().is_empty() {
            return Err(ConfigError::MissingFields(vec!["partner_code".to_string()]).into());
        }

        let signer: Arc<dyn Signer> = match self.signer {
            Some(signer) => signer,
            None => Arc::new(RsaSigner::from_pem(self.private_key.expose_secret())?),
        };

        let verifier = self
            .public_key
            .as_deref()
            .map(RsaVerifier::from_public_key_pem)
            .transpose()?;

        let mut assembler = RequestAssembler::new(base_url, self.partner_code.clone())
            .with_headers(parse_headers(&self.headers)?);
        if let Some(user_agent) = &self.user_agent {
            let value = HeaderValue::from_str(user_agent).map_err(|_| {
                ConfigError::InvalidConfiguration(format!("invalid user agent '{}'", user_agent))
            })?;
            assembler = assembler.with_user_agent(value);
        }

        Ok(KycClient {
            secret_key: self.secret_key,
            signer,
            verifier,
            assembler,
            rest: RestClient::new(transport, self.rest_config),
            payload_version: self.payload_version,
        })
    }
}

fn parse_headers(headers: &[(String, String)]) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            ConfigError::InvalidConfiguration(format!("invalid header name '{}'", name))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ConfigError::InvalidConfiguration(format!("invalid value for header '{}'", name))
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Create a KYC client from a loaded configuration
pub fn build_client(config: &KycConfig) -> Result<KycClient<ReqwestTransport>, KycError> {
    config.validate()?;
    KycClientBuilder::from_config(config).build()
}
