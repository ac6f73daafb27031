//! Request token check.
//!
//! A token is the configured prefix followed by the client's clock in UTC
//! epoch milliseconds, e.g. `secret1700000000000`.

use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no token")]
    Missing,

    #[error("wrong prefix")]
    WrongPrefix,

    #[error("cannot parse timestamp {0:?}")]
    BadTimestamp(String),

    #[error("time difference is {drift_ms}ms")]
    Expired { drift_ms: i128 },
}

pub fn validate_token(token: Option<&str>, prefix: &str, max_age: Duration) -> Result<(), TokenError> {
    validate_token_at(token, prefix, max_age, OffsetDateTime::now_utc())
}

pub fn validate_token_at(
    token: Option<&str>, prefix: &str, max_age: Duration, now: OffsetDateTime,
) -> Result<(), TokenError> {
    let token = token.ok_or(TokenError::Missing)?;
    let stamp = token.strip_prefix(prefix).ok_or(TokenError::WrongPrefix)?;
    let millis: i128 = stamp.parse().map_err(|_| TokenError::BadTimestamp(stamp.to_string()))?;

    let now_ms = now.unix_timestamp_nanos() / 1_000_000;
    let drift_ms = now_ms - millis;

    if drift_ms.abs() > max_age.as_millis() as i128 {
        return Err(TokenError::Expired { drift_ms });
    }
    Ok(())
}
