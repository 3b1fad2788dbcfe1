//! REST client module for the iRacing membersite.
//!
//! This module provides the `Client` for fetching stats data. The
//! membersite uses cookie sessions: a form login sets `irsso_membersv2`,
//! which the client's cookie store replays on every later request.

pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::Client;
pub use error::{ApiError, AuthFailure, ConfigError};
pub use request::ApiRequest;
pub use response::{ApiResponse, RawResponse};
