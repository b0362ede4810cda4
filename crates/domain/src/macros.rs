//! Macro for implementing Display and FromStr for label enums
//!
//! Several domain enums are persisted or configured by a lowercase label
//! (ledger buckets, the watermark advance policy). This macro keeps the
//! string mapping in one place for both directions.
//!
//! # Example
//!
//! ```rust
//! use thanksync_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Bucket {
//!     Sent,
//!     Failed,
//! }
//!
//! impl_label_conversions!(Bucket {
//!     Sent => "sent",
//!     Failed => "failed",
//! });
//!
//! assert_eq!(Bucket::Sent.to_string(), "sent");
//! assert_eq!("FAILED".parse::<Bucket>().unwrap(), Bucket::Failed);
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - Display writes the label exactly as given
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
