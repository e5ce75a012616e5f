//! List queries and the opaque page token

use crate::{CoreError, FieldViolation, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Smallest page size a client may request
pub const MIN_PAGE_SIZE: u32 = 10;
/// Largest page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

const MALFORMED_TOKEN: &str =
    "Value error, page_token is malformed or was not issued by this service";

const MUTUALLY_EXCLUSIVE: &str =
    "Value error, page_token is mutually exclusive with page_size and directory";

/// A client-requested page size within `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageSize(u32);

impl PageSize {
    /// Create a page size, rejecting values outside the allowed range
    pub fn new(size: u32) -> Result<Self> {
        Self::check(i64::from(size), serde_json::json!(size)).map_err(CoreError::invalid)
    }

    /// The wrapped value
    pub fn get(self) -> u32 {
        self.0
    }

    fn check(size: i64, input: serde_json::Value) -> std::result::Result<Self, FieldViolation> {
        if size < i64::from(MIN_PAGE_SIZE) {
            return Err(FieldViolation::new(
                format!("Input should be greater than or equal to {MIN_PAGE_SIZE}"),
                input,
            ));
        }
        if size > i64::from(MAX_PAGE_SIZE) {
            return Err(FieldViolation::new(
                format!("Input should be less than or equal to {MAX_PAGE_SIZE}"),
                input,
            ));
        }
        // Range check above guarantees the value fits
        Ok(Self(size as u32))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl FromStr for PageSize {
    type Err = FieldViolation;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let parsed: i64 = raw.trim().parse().map_err(|_| {
            FieldViolation::new(
                "Input should be a valid integer, unable to parse string as an integer",
                raw,
            )
        })?;
        Self::check(parsed, serde_json::Value::String(raw.to_string()))
    }
}

/// Opaque continuation handle given to clients.
///
/// Carries the store's native continuation token together with the prefix of
/// the scan that produced it, so a resumed scan stays inside its directory.
/// Rendered as URL-safe base64 of a small JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageToken {
    #[serde(rename = "p")]
    prefix: String,
    #[serde(rename = "c")]
    cursor: String,
}

impl PageToken {
    /// Wrap a store continuation token issued for `prefix`
    pub fn new(prefix: impl Into<String>, cursor: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            cursor: cursor.into(),
        }
    }

    /// Directory prefix of the scan
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Store-native continuation token
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Violation reported for a token that cannot be resumed.
    ///
    /// Decoding only proves the token is well formed. A forged cursor is
    /// caught later, when the store refuses it.
    pub(crate) fn rejection(raw: &str) -> FieldViolation {
        FieldViolation::new(MALFORMED_TOKEN, raw)
    }

    /// Encode into the string handed to clients
    pub fn encode(&self) -> String {
        // Serializing two strings cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for PageToken {
    type Err = FieldViolation;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || Self::rejection(raw);
        let json = URL_SAFE_NO_PAD.decode(raw.trim()).map_err(|_| invalid())?;
        let token: PageToken = serde_json::from_slice(&json).map_err(|_| invalid())?;
        if token.cursor.is_empty() {
            return Err(invalid());
        }
        Ok(token)
    }
}

/// Raw query parameters of `GET /v1/files`, exactly as the client sent them
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// A list request: either a fresh prefix scan or the continuation of one.
///
/// `limit` is supplied on every call; the store does not remember the page
/// size of earlier pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListQuery {
    /// Start a scan of `directory` from its first key
    Fresh { directory: String, limit: u32 },
    /// Resume a scan from a previously issued token
    Continuation { page_token: PageToken, limit: u32 },
}

impl ListQuery {
    /// A fresh scan with a validated page size
    pub fn fresh(directory: impl Into<String>, page_size: PageSize) -> Self {
        Self::Fresh {
            directory: directory.into(),
            limit: page_size.get(),
        }
    }

    /// A continuation with a validated page size
    pub fn resume(page_token: PageToken, page_size: PageSize) -> Self {
        Self::Continuation {
            page_token,
            limit: page_size.get(),
        }
    }

    /// Number of records requested for this page
    pub fn limit(&self) -> u32 {
        match self {
            Self::Fresh { limit, .. } | Self::Continuation { limit, .. } => *limit,
        }
    }

    /// Build a query from raw HTTP parameters.
    ///
    /// Field checks run first; the cross-field check only runs when every
    /// field is individually valid. A token sent together with an explicit
    /// `page_size` or `directory` is rejected whatever their values. An empty
    /// token counts as absent. Continuations use the default page size.
    pub fn from_params(params: RawListParams) -> Result<Self> {
        let page_size = match params.page_size.as_deref() {
            Some(raw) => raw
                .parse::<PageSize>()
                .map_err(CoreError::invalid)?,
            None => PageSize::default(),
        };

        let page_token = params.page_token.as_deref().filter(|t| !t.is_empty());

        match page_token {
            Some(_) if params.page_size.is_some() || params.directory.is_some() => {
                let input = serde_json::to_value(&params).unwrap_or_default();
                Err(CoreError::invalid(FieldViolation::new(MUTUALLY_EXCLUSIVE, input)))
            }
            Some(raw) => {
                let token = raw.parse::<PageToken>().map_err(CoreError::invalid)?;
                Ok(Self::resume(token, page_size))
            }
            None => Ok(Self::fresh(params.directory.unwrap_or_default(), page_size)),
        }
    }
}
