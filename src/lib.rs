//! Community incident-reporting backend core.
//!
//! Residents register accounts, authenticate, file geotagged incident
//! reports, and comment on them. This crate owns the parts with real
//! invariants: credential management, stateless session tokens, and the
//! soft-delete lifecycle shared by accounts, reports, and comments.
//! Inactive rows stay on disk forever but vanish from every default read.
//!
//! Transport concerns (routing, upload handling, response envelopes) belong
//! to the embedding server, which drives everything through
//! [`service::Service`] and maps [`error::ErrorKind`] onto its status codes.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, ErrorKind};
pub use service::Service;
