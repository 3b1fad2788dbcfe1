//! Authentication module for credentials and the login session.
//!
//! This module provides:
//! - `Credentials`: username/password pair, redacted in debug output
//! - `Session`: the authenticated flag and the single-flight login gate
//!
//! Sessions live in memory only and never expire client-side.

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::{Session, SessionInfo, SESSION_COOKIE};
