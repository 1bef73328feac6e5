//! # spinfate_core
//!
//! Core domain logic for Spin of Fate.

pub mod client;
pub mod cookies;
#[cfg(feature = "native")]
pub mod db;
pub mod input;
pub mod limits;
pub mod notify;
#[cfg(feature = "native")]
pub mod requests;
pub mod segments;
pub mod session;
#[cfg(feature = "native")]
pub mod spins;
pub mod token;
pub mod wheel;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
