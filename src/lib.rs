pub mod core;
pub mod kyc;

pub use self::core::{
    config::{ConfigError, KycConfig},
    errors::KycError,
    kernel::{RequestContext, RetryConfig},
    types::{Operation, ResponseEnvelope},
};
pub use kyc::{
    build_client, Gender, IdType, KycClient, KycClientBuilder, KycInformation,
    KycInformationRequest, SubmitKycRequest, SubmitKycResponse,
};
