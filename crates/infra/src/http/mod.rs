//! HTTP transport shared by the remote API adapters

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
