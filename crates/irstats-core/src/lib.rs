//! Client for the iRacing membersite stats API.
//!
//! The client logs in lazily with a form POST on first use, keeps the
//! `irsso_membersv2` session cookie in its cookie store and routes GET and
//! form-encoded POST requests through one dispatch path that can decode
//! JSON responses.
//!
//! ```no_run
//! use irstats_core::{Client, ClientOption};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("alice", "secret", [ClientOption::UserAgent("my-app".into())])?;
//! let member: serde_json::Value = client
//!     .get_json("/membersite/member/GetMember")
//!     .await?
//!     .into_data();
//! println!("{member}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;

pub use api::{ApiError, ApiRequest, ApiResponse, AuthFailure, Client, ConfigError, RawResponse};
pub use auth::{Credentials, SessionInfo, SESSION_COOKIE};
pub use config::{options_from_env, ClientConfig, ClientOption};
