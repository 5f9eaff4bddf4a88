use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deserialize an explicit `null` as the type's default
///
/// `#[serde(default)]` alone only covers a missing key; the partner API also
/// sends `null` for empty strings and codes.
pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Remote capability invoked by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SubmitKyc,
    GetKycInformation,
}

impl Operation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SubmitKyc => "submit-kyc",
            Self::GetKycInformation => "get-kyc-information",
        }
    }

    /// Endpoint path, relative to the configured base URL
    pub const fn path(self) -> &'static str {
        match self {
            Self::SubmitKyc => "/api/v2/user/submit-kyc",
            Self::GetKycInformation => "/user/get-kyc-information",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Response envelope shared by every partner API endpoint
///
/// `success == false` is a domain-level rejection and still decodes; callers
/// must check `success` (or use [`ResponseEnvelope::into_result`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub message: String,
    #[serde(rename = "errorCode", default, deserialize_with = "null_to_default")]
    pub error_code: i32,
    pub data: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    pub const fn is_success(&self) -> bool {
        self.success
    }

    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Turn the envelope returned by `operation` into its payload, mapping a
    /// rejected call to
    /// [`KycError::DomainRejection`](crate::core::errors::KycError::DomainRejection)
    pub fn into_result(self, operation: Operation) -> Result<T, crate::core::errors::KycError> {
        use crate::core::errors::KycError;

        if !self.success {
            return Err(KycError::DomainRejection {
                operation,
                code: self.error_code,
                message: self.message,
            });
        }

        self.data.ok_or_else(|| KycError::Decode {
            operation,
            message: "successful response carried no data".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::KycError;

    #[test]
    fn test_operation_paths() {
        assert_eq!(Operation::SubmitKyc.path(), "/api/v2/user/submit-kyc");
        assert_eq!(
            Operation::GetKycInformation.path(),
            "/user/get-kyc-information"
        );
        assert_eq!(Operation::SubmitKyc.to_string(), "submit-kyc");
    }

    #[test]
    fn test_into_result_maps_rejection() {
        let envelope: ResponseEnvelope<String> = ResponseEnvelope {
            success: false,
            message: "duplicate".to_string(),
            error_code: 409,
            data: None,
        };

        match envelope.into_result(Operation::SubmitKyc) {
            Err(KycError::DomainRejection {
                operation,
                code,
                message,
            }) => {
                assert_eq!(operation, Operation::SubmitKyc);
                assert_eq!(code, 409);
                assert_eq!(message, "duplicate");
            }
            other => panic!("expected domain rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_into_result_returns_data() {
        let envelope = ResponseEnvelope {
            success: true,
            message: String::new(),
            error_code: 0,
            data: Some(7_u32),
        };

        assert_eq!(envelope.into_result(Operation::SubmitKyc).unwrap(), 7);
    }

    #[test]
    fn test_success_without_data_names_operation() {
        let envelope: ResponseEnvelope<u32> = ResponseEnvelope {
            success: true,
            message: String::new(),
            error_code: 0,
            data: None,
        };

        assert!(matches!(
            envelope.into_result(Operation::GetKycInformation),
            Err(KycError::Decode {
                operation: Operation::GetKycInformation,
                ..
            })
        ));
    }

    #[test]
    fn test_null_message_and_code_decode_as_defaults() {
        let envelope: ResponseEnvelope<u32> = serde_json::from_str(
            r#"{"success":false,"message":null,"errorCode":null,"data":null}"#,
        )
        .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.error_code, 0);
        assert!(envelope.data.is_none());
    }
}
