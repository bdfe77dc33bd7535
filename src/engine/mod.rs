//! Engine module containing identity matching, classification, and fee settlement

pub mod core;
pub mod identity;
pub mod matcher;

pub use self::core::*;
pub use matcher::*;
