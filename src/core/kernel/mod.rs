/// Kernel - signed-request transport layer for the partner API
///
/// This module holds everything between a typed request and a typed
/// response that does not depend on a particular KYC operation.
///
/// # Architecture
///
/// ## Authentication
/// - `Signer`: Pluggable signing interface
/// - `RsaSigner`: RSA PKCS#1 v1.5 over SHA-256, base64 output
/// - `RsaVerifier`: Checks signatures against the partner public key
///
/// ## Assembly
/// - `RequestParams`: Request types that flatten into a JSON object
/// - `RequestAssembler`: Injects `partnerCode` and `signature`, sets headers
///
/// ## Transport Layer
/// - `HttpTransport`: One HTTP round trip, pluggable for tests
/// - `ReqwestTransport`: Pooled reqwest implementation
/// - `RestClient`: Retry, cancellation, deadline and status classification
///
/// ## Decoding
/// - `decode_envelope`: Raw bytes into `ResponseEnvelope<T>`
///
/// # Example
/// ```rust,no_run
/// use aliniex::core::kernel::*;
/// use aliniex::core::types::{Operation, ResponseEnvelope};
/// use serde_json::{Map, Value};
///
/// # async fn example(pem: &[u8]) -> Result<(), aliniex::KycError> {
/// let signer = RsaSigner::from_pem(pem)?;
/// let assembler = RequestAssembler::new("https://sandbox.alixpay.com", "P1");
/// let rest = RestClient::with_reqwest(RestClientConfig::default())?;
///
/// let mut params = Map::new();
/// params.insert("userEmail".to_string(), Value::from("a@b.com"));
///
/// let signature = signer.sign(b"P1|a@b.com|S1")?;
/// let request = assembler.assemble(Operation::GetKycInformation, &params, signature)?;
/// let bytes = rest.execute(&RequestContext::new(), request).await?;
/// let envelope: ResponseEnvelope<Value> =
///     decode_envelope(Operation::GetKycInformation, &bytes)?;
/// # let _ = envelope;
/// # Ok(())
/// # }
/// ```
pub mod assembler;
pub mod codec;
pub mod rest;
pub mod retry;
pub mod signer;

// Re-export key types for convenience
pub use assembler::{OutboundRequest, RequestAssembler, RequestParams, DEFAULT_USER_AGENT};
pub use codec::decode_envelope;
pub use rest::{
    HttpTransport, RawResponse, RequestContext, ReqwestTransport, RestClient, RestClientConfig,
    TransportError,
};
pub use retry::RetryConfig;
pub use signer::{sign_payload, RsaSigner, RsaVerifier, Signer};
