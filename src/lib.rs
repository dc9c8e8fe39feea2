pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fs;
pub mod humanize;
pub mod model;
pub mod observability;
pub mod transport;

pub use auth::{Authenticator, Credentials};
pub use client::SwanClient;
pub use error::{Result, StatusKind, SwanError};
