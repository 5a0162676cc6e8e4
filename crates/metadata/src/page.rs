//! Keyset pagination cursor.
//!
//! Listings are ordered newest-first on `(created_on, id)`. The cursor is
//! the sort key of the last row of the previous page, so a page boundary
//! never skips or repeats rows while new records are being inserted.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use docket_core::error::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Maximum accepted encoded cursor length.
const MAX_TOKEN_LEN: usize = 128;

/// Opaque position within a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// `created_on` of the last row already returned, unix nanoseconds UTC.
    pub created_nanos: i64,
    /// `id` of that row, tie-breaker within one timestamp.
    pub id: Uuid,
}

impl PageCursor {
    /// Build a cursor pointing past the given row.
    pub fn after(created_on: OffsetDateTime, id: Uuid) -> Result<Self, Error> {
        let created_nanos = i64::try_from(created_on.unix_timestamp_nanos())
            .map_err(|_| Error::InvalidCursor("timestamp out of range".to_string()))?;
        Ok(Self { created_nanos, id })
    }

    /// Encode as an opaque token for the HTTP boundary.
    pub fn to_token(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!("{}:{}", self.created_nanos, self.id))
    }

    /// Parse a token produced by [`to_token`](Self::to_token).
    pub fn from_token(token: &str) -> Result<Self, Error> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(Error::InvalidCursor("cursor too long".to_string()));
        }
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| Error::InvalidCursor("cursor is not base64".to_string()))?;
        let raw = String::from_utf8(raw)
            .map_err(|_| Error::InvalidCursor("cursor is not utf-8".to_string()))?;
        let (nanos, id) = raw
            .split_once(':')
            .ok_or_else(|| Error::InvalidCursor("cursor missing separator".to_string()))?;
        let created_nanos: i64 = nanos
            .parse()
            .map_err(|_| Error::InvalidCursor("cursor timestamp is not numeric".to_string()))?;
        let id = Uuid::parse_str(id)
            .map_err(|_| Error::InvalidCursor("cursor id is not a uuid".to_string()))?;
        Ok(Self { created_nanos, id })
    }
}
