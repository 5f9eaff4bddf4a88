//! Canonical signing payloads.
//!
//! The partner verifies each request by rebuilding this exact string on its
//! side. Any change to field order or delimiter makes every signature fail
//! with an authentication error code, so changes must go through a new
//! [`PayloadVersion`].

use crate::core::types::Operation;

pub const DELIMITER: char = '|';

/// Signing payload contract version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadVersion {
    /// `partnerCode|userEmail|nationality|secretKey` for submission,
    /// `partnerCode|userEmail|secretKey` for lookup
    #[default]
    V1,
}

impl PayloadVersion {
    pub const fn delimiter(self) -> char {
        match self {
            Self::V1 => DELIMITER,
        }
    }
}

/// Fields signed for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningPayload<'a> {
    SubmitKyc {
        partner_code: &'a str,
        user_email: &'a str,
        nationality: &'a str,
        secret_key: &'a str,
    },
    KycInformation {
        partner_code: &'a str,
        user_email: &'a str,
        secret_key: &'a str,
    },
}

impl<'a> SigningPayload<'a> {
    pub const fn operation(&self) -> Operation {
        match self {
            Self::SubmitKyc { .. } => Operation::SubmitKyc,
            Self::KycInformation { .. } => Operation::GetKycInformation,
        }
    }

    fn fields(&self) -> Vec<&'a str> {
        match *self {
            Self::SubmitKyc {
                partner_code,
                user_email,
                nationality,
                secret_key,
            } => vec![partner_code, user_email, nationality, secret_key],
            Self::KycInformation {
                partner_code,
                user_email,
                secret_key,
            } => vec![partner_code, user_email, secret_key],
        }
    }

    /// Canonical string under `version`
    pub fn canonical(&self, version: PayloadVersion) -> String {
        let delimiter = version.delimiter().to_string();
        self.fields().join(&delimiter)
    }

    /// Bytes to sign under `version`
    pub fn to_bytes(&self, version: PayloadVersion) -> Vec<u8> {
        self.canonical(version).into_bytes()
    }
}
