use crate::core::kernel::RequestParams;
use crate::core::types::null_to_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Identity document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdType {
    IdCard,
    Passport,
}

/// Identity and document data submitted for verification
///
/// Dates are `YYYY-MM-DD`; images are base64 data URIs
/// (`data:image/jpeg;base64,...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitKycRequest {
    pub user_email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub nationality: String,
    #[serde(rename = "type")]
    pub document_type: IdType,
    pub national_id: String,
    pub issue_date: String,
    pub expiry_date: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub front_id_image: String,
    pub back_id_image: String,
    pub hold_id_image: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone_country_code: Option<String>,
}

impl RequestParams for SubmitKycRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitKycResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub national_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub kyc_status: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycInformationRequest {
    pub user_email: String,
}

impl KycInformationRequest {
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
        }
    }
}

impl RequestParams for KycInformationRequest {}

/// KYC record held by the partner for a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KycInformation {
    #[serde(deserialize_with = "null_to_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_to_default")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "null_to_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_to_default")]
    pub nationality: String,
    #[serde(deserialize_with = "null_to_default")]
    pub id_type: String,
    #[serde(deserialize_with = "null_to_default")]
    pub national_id: String,
    #[serde(deserialize_with = "null_to_default")]
    pub issue_date: String,
    #[serde(deserialize_with = "null_to_default")]
    pub expiry_date: String,
    #[serde(deserialize_with = "null_to_default")]
    pub address: String,
    #[serde(deserialize_with = "null_to_default")]
    pub front_id_image: String,
    #[serde(deserialize_with = "null_to_default")]
    pub back_id_image: String,
    #[serde(deserialize_with = "null_to_default")]
    pub hold_id_image: String,
    #[serde(deserialize_with = "null_to_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_to_default")]
    pub phone_country_code: String,
    #[serde(deserialize_with = "null_to_default")]
    pub kyc_status: String,
    pub reject_reason: Option<String>,
}

impl KycInformation {
    /// Non-empty rejection reason, if the partner supplied one
    pub fn reject_reason(&self) -> Option<&str> {
        self.reject_reason
            .as_deref()
            .filter(|reason| !reason.trim().is_empty())
    }
}
