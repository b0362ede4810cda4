//! Eligibility predicate for the thank-you notification
//!
//! A test taker qualifies when the score reaches the threshold, the attempt is
//! not a demo, and the contact address is syntactically valid. Records that
//! fail the check are never written to the ledger, so they are re-evaluated
//! on every pass until the watermark moves past them.

use once_cell::sync::Lazy;
use regex::Regex;
use thanksync_domain::constants::DEFAULT_ELIGIBILITY_THRESHOLD;
use thanksync_domain::TestTaker;

// Local part per RFC 5322 atext, dot-separated hostname labels of at most 63 chars.
static EMAIL_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

/// Syntactic email check. Says nothing about deliverability.
pub fn email_is_valid(email: &str) -> bool {
    EMAIL_PATTERN.as_ref().is_some_and(|pattern| pattern.is_match(email))
}

/// Eligibility rule with a configurable score threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    threshold: u8,
}

impl EligibilityPolicy {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Pure predicate, no side effects
    pub fn is_eligible(&self, test_taker: &TestTaker) -> bool {
        test_taker.percent >= i64::from(self.threshold)
            && !test_taker.is_demo
            && email_is_valid(&test_taker.email)
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ELIGIBILITY_THRESHOLD)
    }
}
