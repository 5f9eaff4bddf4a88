pub mod builder;
pub mod client;
pub mod payload;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_client, KycClientBuilder};
pub use client::KycClient;
pub use payload::{PayloadVersion, SigningPayload};
pub use types::{
    Gender, IdType, KycInformation, KycInformationRequest, SubmitKycRequest, SubmitKycResponse,
};
