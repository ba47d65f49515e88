//! HTTP clients for the two services the dashboard talks to: the salon
//! analysis backend and the OAuth identity provider.

pub mod client;
pub mod error;
pub mod identity;

pub use client::AnalyzerClient;
pub use error::{ApiError, IdentityError};
pub use identity::{IdentityClient, PkcePair, Session};
