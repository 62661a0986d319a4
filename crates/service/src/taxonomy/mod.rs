//! Lookup tables: industries → sectors → services/products, states → cities.
//!
//! Lists are ordered by name. Deleting a parent that still has children is
//! refused with [`ServiceError::Conflict`](crate::errors::ServiceError::Conflict).

pub mod industries;
pub mod sectors;
pub mod services;
pub mod states;
pub mod cities;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `{id, name}` reference to a parent row embedded in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// Partial update for child rows; only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildPatch {
    pub name: Option<String>,
    pub parent_id: Option<Uuid>,
}
