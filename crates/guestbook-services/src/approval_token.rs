//! Signed approval tokens for moderation links.
//!
//! Token = `content_id "." issued_at_millis "." hex(HMAC-SHA256(secret, content_id "." issued_at_millis))`.
//!
//! Verification never says why a token was refused: malformed input, a bad
//! timestamp, a signature mismatch and expiry all map to
//! [`TokenVerification::Invalid`]. The reason is only logged at debug level.

use chrono::{DateTime, Utc};
use guestbook_core::ApprovalTokenConfig;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const DELIMITER: char = '.';

/// Outcome of verifying an approval token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerification {
    /// Signature matched and the token is within its lifetime.
    Valid(String),
    Invalid,
}

impl TokenVerification {
    pub fn content_id(&self) -> Option<&str> {
        match self {
            TokenVerification::Valid(id) => Some(id),
            TokenVerification::Invalid => None,
        }
    }
}

/// Errors raised while issuing a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApprovalTokenError {
    #[error("Content id must not be empty")]
    EmptyContentId,

    #[error("Content id must not contain '.'")]
    DelimiterInContentId,

    #[error("Signing key rejected: {0}")]
    InvalidKey(String),
}

/// Why a token was refused. Internal only.
#[derive(Debug, Clone, Copy)]
enum Rejection {
    Malformed,
    BadTimestamp,
    SignatureMismatch,
    Expired,
}

/// Issues and verifies approval tokens with a shared secret.
#[derive(Clone)]
pub struct ApprovalTokenCodec {
    secret: Vec<u8>,
    max_age: Duration,
}

impl std::fmt::Debug for ApprovalTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalTokenCodec")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl ApprovalTokenCodec {
    pub fn new(config: ApprovalTokenConfig) -> Self {
        Self {
            secret: config.secret.into_bytes(),
            max_age: config.max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issue a token for `content_id` stamped with the current time.
    pub fn issue(&self, content_id: &str) -> Result<String, ApprovalTokenError> {
        self.issue_at(content_id, Utc::now().timestamp_millis())
    }

    /// Issue a token stamped with `now_millis` (Unix epoch milliseconds).
    pub fn issue_at(&self, content_id: &str, now_millis: i64) -> Result<String, ApprovalTokenError> {
        if content_id.is_empty() {
            return Err(ApprovalTokenError::EmptyContentId);
        }
        if content_id.contains(DELIMITER) {
            return Err(ApprovalTokenError::DelimiterInContentId);
        }

        let payload = format!("{}{}{}", content_id, DELIMITER, now_millis);
        let signature = self.sign(&payload)?;
        Ok(format!("{}{}{}", payload, DELIMITER, signature))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> TokenVerification {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// Verify a token as of `now_millis`. Does not check that the content exists.
    pub fn verify_at(&self, token: &str, now_millis: i64) -> TokenVerification {
        match self.check(token, now_millis) {
            Ok(content_id) => TokenVerification::Valid(content_id.to_string()),
            Err(reason) => {
                tracing::debug!(reason = ?reason, "Approval token rejected");
                TokenVerification::Invalid
            }
        }
    }

    /// When a token issued at `issued_at_millis` stops being valid.
    pub fn expires_at(&self, issued_at_millis: i64) -> Option<DateTime<Utc>> {
        let issued = DateTime::<Utc>::from_timestamp_millis(issued_at_millis)?;
        let max_age = chrono::Duration::from_std(self.max_age).ok()?;
        issued.checked_add_signed(max_age)
    }

    fn check<'a>(&self, token: &'a str, now_millis: i64) -> Result<&'a str, Rejection> {
        let fields: Vec<&str> = token.split(DELIMITER).collect();
        let &[content_id, issued_at, signature] = fields.as_slice() else {
            return Err(Rejection::Malformed);
        };
        if content_id.is_empty() || issued_at.is_empty() {
            return Err(Rejection::Malformed);
        }

        let payload = format!("{}{}{}", content_id, DELIMITER, issued_at);
        let expected = self.sign(&payload).map_err(|_| Rejection::SignatureMismatch)?;
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(Rejection::SignatureMismatch);
        }

        let issued_at: i64 = issued_at.parse().map_err(|_| Rejection::BadTimestamp)?;
        let max_age_millis = i64::try_from(self.max_age.as_millis()).unwrap_or(i64::MAX);
        // Only age past max_age is refused; future-dated tokens pass.
        if now_millis.saturating_sub(issued_at) > max_age_millis {
            return Err(Rejection::Expired);
        }

        Ok(content_id)
    }

    fn sign(&self, payload: &str) -> Result<String, ApprovalTokenError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .map_err(|e| ApprovalTokenError::InvalidKey(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000_000;
    const SEVEN_DAYS_MS: i64 = 7 * 24 * 60 * 60 * 1000;

    fn codec() -> ApprovalTokenCodec {
        ApprovalTokenCodec::new(ApprovalTokenConfig::new(
            "test-secret",
            Duration::from_secs(7 * 24 * 3600),
        ))
    }

    #[test]
    fn test_issue_then_verify_returns_content_id() {
        let codec = codec();
        let id = "5f0c6f5e-9d1a-4a57-9a34-0d6f0f3b7a11";
        let token = codec.issue_at(id, T).unwrap();
        assert_eq!(
            codec.verify_at(&token, T),
            TokenVerification::Valid(id.to_string())
        );

        let token = codec.issue("abc").unwrap();
        assert_eq!(codec.verify(&token).content_id(), Some("abc"));
    }

    #[test]
    fn test_token_layout() {
        let token = codec().issue_at("abc", T).unwrap();
        let fields: Vec<&str> = token.split('.').collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], "abc");
        assert_eq!(fields[1], T.to_string());
        assert_eq!(fields[2].len(), 64);
        assert!(fields[2]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_wrong_field_count_is_invalid() {
        let codec = codec();
        let token = codec.issue_at("abc", T).unwrap();

        assert_eq!(
            codec.verify_at(&format!("{}.extra", token), T),
            TokenVerification::Invalid
        );
        let two_fields = token.rsplit_once('.').unwrap().0;
        assert_eq!(codec.verify_at(two_fields, T), TokenVerification::Invalid);
        assert_eq!(codec.verify_at("", T), TokenVerification::Invalid);
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let token = codec.issue_at("abc", T).unwrap();

        assert!(matches!(
            codec.verify_at(&token, T + SEVEN_DAYS_MS - 1),
            TokenVerification::Valid(_)
        ));
        assert!(matches!(
            codec.verify_at(&token, T + SEVEN_DAYS_MS),
            TokenVerification::Valid(_)
        ));
        assert_eq!(
            codec.verify_at(&token, T + SEVEN_DAYS_MS + 1),
            TokenVerification::Invalid
        );
    }

    #[test]
    fn test_future_dated_token_is_accepted() {
        let codec = codec();
        let token = codec.issue_at("abc", T + 60_000).unwrap();
        assert!(matches!(
            codec.verify_at(&token, T),
            TokenVerification::Valid(_)
        ));
    }

    #[test]
    fn test_any_signature_change_is_invalid() {
        let codec = codec();
        let token = codec.issue_at("abc", T).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                codec.verify_at(&tampered, T),
                TokenVerification::Invalid,
                "tampered position {}",
                i
            );
        }
    }

    #[test]
    fn test_uppercase_signature_is_invalid() {
        let codec = codec();
        let token = (0..64)
            .map(|n| codec.issue_at(&format!("content{}", n), T).unwrap())
            .find(|token| {
                let signature = token.rsplit_once('.').unwrap().1;
                signature.bytes().any(|b| (b'a'..=b'f').contains(&b))
            })
            .expect("a signature with hex letters");
        let (payload, signature) = token.rsplit_once('.').unwrap();
        let upper = format!("{}.{}", payload, signature.to_ascii_uppercase());

        assert_ne!(upper, token);
        assert!(matches!(
            codec.verify_at(&token, T),
            TokenVerification::Valid(_)
        ));
        assert_eq!(codec.verify_at(&upper, T), TokenVerification::Invalid);
    }

    #[test]
    fn test_payload_change_is_invalid() {
        let codec = codec();
        let token = codec.issue_at("abc", T).unwrap();

        let other_id = token.replacen("abc", "abd", 1);
        assert_eq!(codec.verify_at(&other_id, T), TokenVerification::Invalid);

        let other_time = token.replacen(&T.to_string(), &(T + 1).to_string(), 1);
        assert_eq!(codec.verify_at(&other_time, T), TokenVerification::Invalid);
    }

    #[test]
    fn test_other_secret_is_invalid() {
        let token = codec().issue_at("abc", T).unwrap();
        let other = ApprovalTokenCodec::new(ApprovalTokenConfig::new(
            "another-secret",
            Duration::from_secs(7 * 24 * 3600),
        ));
        assert_eq!(other.verify_at(&token, T), TokenVerification::Invalid);
    }

    #[test]
    fn test_signed_non_numeric_timestamp_is_invalid() {
        let codec = codec();
        let signature = codec.sign("abc.yesterday").unwrap();
        let token = format!("abc.yesterday.{}", signature);
        assert_eq!(codec.verify_at(&token, T), TokenVerification::Invalid);
    }

    #[test]
    fn test_issue_rejects_unusable_ids() {
        let codec = codec();
        assert_eq!(
            codec.issue_at("", T),
            Err(ApprovalTokenError::EmptyContentId)
        );
        assert_eq!(
            codec.issue_at("a.b", T),
            Err(ApprovalTokenError::DelimiterInContentId)
        );
    }

    #[test]
    fn test_expires_at() {
        let codec = codec();
        let expires = codec.expires_at(T).unwrap();
        assert_eq!(expires.timestamp_millis(), T + SEVEN_DAYS_MS);
    }
}
