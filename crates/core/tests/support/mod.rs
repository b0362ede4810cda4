//! Shared test helpers for `thanksync-core` integration tests.
//!
//! In-memory implementations of every sync port, with switches for injecting
//! failures and counters for asserting on side effects.

#![allow(dead_code)]

pub mod fakes;

use thanksync_domain::TestTaker;

/// Eligible test taker with a predictable email derived from `id`.
pub fn taker(id: i64, finished_at: i64) -> TestTaker {
    TestTaker {
        id,
        name: format!("Taker {id}"),
        email: email_for(id),
        is_demo: false,
        percent: 90,
        finished_at,
    }
}

pub fn email_for(id: i64) -> String {
    format!("taker{id}@example.com")
}

/// `count` eligible test takers, newest first, ids starting at 1.
pub fn feed(count: i64) -> Vec<TestTaker> {
    (1..=count).map(|id| taker(id, 10_000 - id)).collect()
}
