use crate::core::errors::KycError;
use crate::core::types::Operation;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_USER_AGENT: &str = "aliniex-rust-sdk";

pub const PARTNER_CODE_FIELD: &str = "partnerCode";
pub const SIGNATURE_FIELD: &str = "signature";

/// Request parameters that flatten into a JSON object
///
/// Implemented explicitly by each request type the client sends.
pub trait RequestParams: Serialize {
    fn to_params(&self) -> Result<Map<String, Value>, KycError> {
        let value = serde_json::to_value(self)
            .map_err(|e| KycError::InvalidParams(format!("failed to serialize params: {}", e)))?;

        match value {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(KycError::InvalidParams(format!(
                "expected key-value params, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl RequestParams for Map<String, Value> {}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A fully signed request, ready for a single dispatch
#[derive(Debug)]
pub struct OutboundRequest {
    pub operation: Operation,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Merges caller params with the partner code and signature
#[derive(Debug, Clone)]
pub struct RequestAssembler {
    base_url: String,
    partner_code: String,
    user_agent: HeaderValue,
    extra_headers: HeaderMap,
}

impl RequestAssembler {
    pub fn new(base_url: &str, partner_code: impl Into<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            partner_code: partner_code.into(),
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
            extra_headers: HeaderMap::new(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: HeaderValue) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Headers sent with every request, unless a protocol header overrides them
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    pub fn partner_code(&self) -> &str {
        &self.partner_code
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the outbound request for `operation`
    ///
    /// `partnerCode` and `signature` always win over caller fields of the same
    /// name.
    pub fn assemble<P: RequestParams + ?Sized>(
        &self,
        operation: Operation,
        params: &P,
        signature: String,
    ) -> Result<OutboundRequest, KycError> {
        let mut body = params.to_params()?;
        body.insert(
            PARTNER_CODE_FIELD.to_string(),
            Value::String(self.partner_code.clone()),
        );
        body.insert(SIGNATURE_FIELD.to_string(), Value::String(signature));

        let body = serde_json::to_vec(&body).map_err(KycError::Encode)?;

        let mut headers = self.extra_headers.clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, self.user_agent.clone());

        Ok(OutboundRequest {
            operation,
            method: Method::POST,
            url: format!("{}{}", self.base_url, operation.path()),
            headers,
            body,
        })
    }
}
