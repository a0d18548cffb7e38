//! Database access layer.

pub mod postgres;

pub use postgres::{Db, SystemStats};

/// OAuth provider identifiers used as lookup keys in `accounts`.
pub mod providers {
    pub const GOOGLE: &str = "google";
}
