//! Synthetic unique-index claims.
//!
//! The table store has no native cross-partition uniqueness constraint, so
//! global uniqueness is emulated with a claims table keyed by
//! (value, domain): a row exists exactly when the value is owned within that
//! domain. Claims are only ever written or released inside the same atomic
//! transaction as the entity row they guard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace a value must be unique within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniqueDomain {
    /// A user's login email address.
    Email,
}

impl UniqueDomain {
    /// Stable storage marker for this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueDomain::Email => "UserEmail",
        }
    }
}

impl fmt::Display for UniqueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row proving exclusive ownership of `value` within `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueClaim {
    pub value: String,
    pub domain: UniqueDomain,
}

impl UniqueClaim {
    /// Creates an email-domain claim.
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            domain: UniqueDomain::Email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_domain_marker_is_stable() {
        assert_eq!(UniqueDomain::Email.as_str(), "UserEmail");
        assert_eq!(UniqueDomain::Email.to_string(), "UserEmail");
    }

    #[test]
    fn test_email_claim_constructor() {
        let claim = UniqueClaim::email("john@example.com");
        assert_eq!(claim.value, "john@example.com");
        assert_eq!(claim.domain, UniqueDomain::Email);
    }
}
