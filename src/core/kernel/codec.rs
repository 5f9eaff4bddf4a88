use crate::core::errors::KycError;
use crate::core::types::{Operation, ResponseEnvelope};
use serde::de::DeserializeOwned;

/// Decode the raw response of `operation` into a typed envelope
///
/// A well-formed body with `success: false` decodes normally; a body with
/// `success: true` and no `data` is a protocol violation and fails.
pub fn decode_envelope<T: DeserializeOwned>(
    operation: Operation,
    bytes: &[u8],
) -> Result<ResponseEnvelope<T>, KycError> {
    let envelope: ResponseEnvelope<T> =
        serde_json::from_slice(bytes).map_err(|e| KycError::Decode {
            operation,
            message: format!("malformed response envelope: {}", e),
        })?;

    if envelope.success && envelope.data.is_none() {
        return Err(KycError::Decode {
            operation,
            message: "response reported success without data".to_string(),
        });
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        #[serde(rename = "kycStatus")]
        kyc_status: String,
    }

    #[test]
    fn test_decode_success() {
        let envelope: ResponseEnvelope<Payload> = decode_envelope(
            Operation::SubmitKyc,
            br#"{"success":true,"message":"ok","errorCode":0,"data":{"kycStatus":"APPROVED"}}"#,
        )
        .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.message, "ok");
        assert_eq!(envelope.data.unwrap().kyc_status, "APPROVED");
    }

    #[test]
    fn test_decode_domain_rejection_is_not_an_error() {
        let envelope: ResponseEnvelope<Payload> = decode_envelope(
            Operation::SubmitKyc,
            br#"{"success":false,"message":"duplicate","errorCode":409}"#,
        )
        .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.error_code, 409);
        assert_eq!(envelope.message, "duplicate");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_decode_null_data_on_rejection() {
        let envelope: ResponseEnvelope<Payload> = decode_envelope(
            Operation::GetKycInformation,
            br#"{"success":false,"message":"bad signature","errorCode":401,"data":null}"#,
        )
        .unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_success_without_data_fails() {
        let result =
            decode_envelope::<Payload>(Operation::SubmitKyc, br#"{"success":true,"data":null}"#);
        assert!(matches!(
            result,
            Err(KycError::Decode {
                operation: Operation::SubmitKyc,
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_body_fails() {
        let bodies: [&[u8]; 3] = [b"<html>bad gateway</html>", b"{}", br#"{"success":"yes"}"#];
        for body in bodies {
            assert!(matches!(
                decode_envelope::<Payload>(Operation::GetKycInformation, body),
                Err(KycError::Decode { .. })
            ));
        }
    }

    #[test]
    fn test_null_envelope_fields_are_not_malformed() {
        let envelope: ResponseEnvelope<Payload> = decode_envelope(
            Operation::SubmitKyc,
            br#"{"success":true,"message":null,"errorCode":null,"data":{"kycStatus":"PENDING"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.message, "");
        assert_eq!(envelope.error_code, 0);

        let rejection: ResponseEnvelope<Payload> = decode_envelope(
            Operation::SubmitKyc,
            br#"{"success":false,"message":"duplicate","errorCode":null,"data":null}"#,
        )
        .unwrap();
        assert!(!rejection.success);
        assert_eq!(rejection.message, "duplicate");
    }
}
