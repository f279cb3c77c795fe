//! Core data types for the daily rates notifier.

pub mod credentials;
pub mod error;
pub mod quote;
pub mod schedule;

pub use credentials::*;
pub use error::*;
pub use quote::*;
pub use schedule::*;
