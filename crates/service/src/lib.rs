//! Business operations for the franchise marketplace on top of `models`.
//! - Taxonomy, listings, search, gallery, contact queries, team slides, admin auth.
//! - Image bytes go through [`storage::ObjectStore`]; writes are announced on [`events::ChangeFeed`].
//! - Errors surface as [`errors::ServiceError`] (auth keeps its own [`auth::errors::AuthError`]).

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod events;
pub mod storage;
pub mod filters;
pub mod taxonomy;
pub mod franchise;
pub mod gallery_service;
pub mod contact_service;
pub mod team_action_service;
pub mod dashboard_service;
#[cfg(test)]
pub mod test_support;
