use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64")]
    Base64,
    #[error("token payload is not a JSON object")]
    Json,
    #[error("token payload has no numeric exp claim")]
    MissingExpiry,
}

/// Reads the `exp` claim (seconds since epoch) from a JWT without verifying it.
pub fn decode_expiry(token: &str) -> Result<f64, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_sig), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    // Accept both alphabets; some issuers emit standard base64 with padding.
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|_| TokenError::Base64)?;

    let claims: serde_json::Value = serde_json::from_slice(&bytes).map_err(|_| TokenError::Json)?;
    if !claims.is_object() {
        return Err(TokenError::Json);
    }
    claims
        .get("exp")
        .and_then(serde_json::Value::as_f64)
        .ok_or(TokenError::MissingExpiry)
}

/// Fail-closed: anything that cannot be decoded counts as expired.
pub fn is_token_expired_at(token: Option<&str>, now_ms: u128) -> bool {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return true;
    };
    match decode_expiry(token) {
        Ok(exp) => exp * 1000.0 < now_ms as f64,
        Err(_) => true,
    }
}

pub fn is_token_expired(token: Option<&str>) -> bool {
    is_token_expired_at(token, now_unix_ms())
}

pub fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn reads_exp_claim() {
        let token = jwt_with_payload(r#"{"sub":"u1","exp":1700000000}"#);
        assert_eq!(decode_expiry(&token), Ok(1_700_000_000.0));
    }

    #[test]
    fn future_exp_is_not_expired() {
        let token = jwt_with_payload(r#"{"exp":2000}"#);
        assert!(!is_token_expired_at(Some(&token), 1_999_000));
        assert!(is_token_expired_at(Some(&token), 2_000_001));
    }

    #[test]
    fn decode_failures_count_as_expired() {
        assert!(is_token_expired_at(None, 0));
        assert!(is_token_expired_at(Some(""), 0));
        assert!(is_token_expired_at(Some("not-a-jwt"), 0));
        assert!(is_token_expired_at(Some("a.!!!.c"), 0));
        assert!(is_token_expired_at(Some(&jwt_with_payload("[1,2]")), 0));
        assert!(is_token_expired_at(Some(&jwt_with_payload(r#"{"sub":"x"}"#)), 0));
    }

    #[test]
    fn missing_exp_is_reported() {
        let token = jwt_with_payload(r#"{"exp":"soon"}"#);
        assert_eq!(decode_expiry(&token), Err(TokenError::MissingExpiry));
    }
}
