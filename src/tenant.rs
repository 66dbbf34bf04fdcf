use derive_more::From;
use serde::{Deserialize, Serialize};

/// Opaque identifier for the scope (e.g. an account or company) a flag decision applies to.
///
/// The evaluator passes tenant identifiers through to handlers unchanged and never interprets
/// them. Conveniently implements `From` conversions for `String`, `&str`, and `i64`.
///
/// # Examples
/// ```
/// # use subscription_flags::TenantId;
/// let account: TenantId = 42.into();
/// let company: TenantId = "acme".into();
/// ```
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, From, Clone)]
#[serde(untagged)]
pub enum TenantId {
    /// A string identifier.
    String(String),
    /// A numeric identifier.
    Integer(i64),
}

impl TenantId {
    /// Returns the string identifier, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        if let TenantId::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Returns the numeric identifier, if this is one.
    pub fn as_integer(&self) -> Option<i64> {
        if let TenantId::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}
