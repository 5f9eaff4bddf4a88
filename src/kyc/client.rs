use crate::core::errors::KycError;
use crate::core::kernel::{
    decode_envelope, HttpTransport, RequestAssembler, RequestContext, RequestParams,
    ReqwestTransport, RestClient, RsaVerifier, Signer,
};
use crate::core::types::{Operation, ResponseEnvelope};
use crate::kyc::payload::{PayloadVersion, SigningPayload};
use crate::kyc::types::{KycInformation, KycInformationRequest, SubmitKycRequest, SubmitKycResponse};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{instrument, warn};
use zeroize::Zeroizing;

/// Client for the partner KYC API
///
/// Holds only immutable configuration, so a single instance can serve
/// concurrent calls; clones share the underlying connection pool.
pub struct KycClient<T: HttpTransport = ReqwestTransport> {
    pub(crate) secret_key: Secret<String>,
    pub(crate) signer: Arc<dyn Signer>,
    pub(crate) verifier: Option<RsaVerifier>,
    pub(crate) assembler: RequestAssembler,
    pub(crate) rest: RestClient<T>,
    pub(crate) payload_version: PayloadVersion,
}

impl<T: HttpTransport + Clone> Clone for KycClient<T> {
    fn clone(&self) -> Self {
        Self {
            secret_key: Secret::new(self.secret_key.expose_secret().clone()),
            signer: Arc::clone(&self.signer),
            verifier: self.verifier.clone(),
            assembler: self.assembler.clone(),
            rest: self.rest.clone(),
            payload_version: self.payload_version,
        }
    }
}

impl<T: HttpTransport> std::fmt::Debug for KycClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KycClient")
            .field("base_url", &self.assembler.base_url())
            .field("partner_code", &self.assembler.partner_code())
            .field("rest", &self.rest)
            .field("payload_version", &self.payload_version)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> KycClient<T> {
    pub fn partner_code(&self) -> &str {
        self.assembler.partner_code()
    }

    pub fn base_url(&self) -> &str {
        self.assembler.base_url()
    }

    /// Verifier for the configured partner public key, if one was supplied
    pub fn verifier(&self) -> Option<&RsaVerifier> {
        self.verifier.as_ref()
    }

    /// Submit identity data for verification
    ///
    /// A decode error here means the request was delivered and accepted at
    /// the HTTP level; the outcome of the submission on the partner side is
    /// unknown and must not be assumed to have failed.
    pub async fn submit_kyc(
        &self,
        request: &SubmitKycRequest,
    ) -> Result<ResponseEnvelope<SubmitKycResponse>, KycError> {
        self.submit_kyc_with(&RequestContext::new(), request).await
    }

    #[instrument(skip_all, fields(operation = %Operation::SubmitKyc))]
    pub async fn submit_kyc_with(
        &self,
        ctx: &RequestContext,
        request: &SubmitKycRequest,
    ) -> Result<ResponseEnvelope<SubmitKycResponse>, KycError> {
        let payload = SigningPayload::SubmitKyc {
            partner_code: self.assembler.partner_code(),
            user_email: &request.user_email,
            nationality: &request.nationality,
            secret_key: self.secret_key.expose_secret(),
        };

        self.call(ctx, payload, request).await
    }

    /// Fetch the KYC record and status previously submitted for a user
    pub async fn get_kyc_information(
        &self,
        request: &KycInformationRequest,
    ) -> Result<ResponseEnvelope<KycInformation>, KycError> {
        self.get_kyc_information_with(&RequestContext::new(), request)
            .await
    }

    #[instrument(skip_all, fields(operation = %Operation::GetKycInformation))]
    pub async fn get_kyc_information_with(
        &self,
        ctx: &RequestContext,
        request: &KycInformationRequest,
    ) -> Result<ResponseEnvelope<KycInformation>, KycError> {
        let payload = SigningPayload::KycInformation {
            partner_code: self.assembler.partner_code(),
            user_email: &request.user_email,
            secret_key: self.secret_key.expose_secret(),
        };

        self.call(ctx, payload, request).await
    }

    async fn call<P, R>(
        &self,
        ctx: &RequestContext,
        payload: SigningPayload<'_>,
        params: &P,
    ) -> Result<ResponseEnvelope<R>, KycError>
    where
        P: RequestParams + Sync,
        R: DeserializeOwned,
    {
        let operation = payload.operation();
        // Canonical bytes carry the secret key
        let canonical = Zeroizing::new(payload.to_bytes(self.payload_version));
        let signature = self.signer.sign(&canonical)?;
        let request = self.assembler.assemble(operation, params, signature)?;
        let body = self.rest.execute(ctx, request).await?;

        decode_envelope(operation, &body).map_err(|err| {
            warn!(%operation, error = %err, "response could not be decoded after delivery");
            err
        })
    }
}
