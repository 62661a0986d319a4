//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Admin sign-in, token issuance/verification and admin account creation.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
