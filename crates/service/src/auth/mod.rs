//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login with lockout, and the JWT that carries the role claim.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::{AuthConfig, AuthService};
