//! Remote test-taker API adapters
//!
//! Two endpoints: a credentials exchange that yields a bearer token, and the
//! paginated listing of test takers (newest `finished_at` first). Both answer
//! JSON and may report failures through an `error` envelope inside a 2xx body.

pub mod auth;
pub mod client;
pub mod errors;
pub mod test_takers;

pub use auth::CredentialsAuthenticator;
pub use client::ApiClient;
pub use errors::ApiError;
pub use test_takers::ApiTestTakerSource;
