//! Franchise listings: the form payload, the catalog queries and the admin
//! create/update/delete flows that also manage the listing's images.

pub mod domain;
pub mod search;
pub mod service;

pub use domain::{FranchiseInput, FranchiseView};
pub use search::{SearchParams, SortOrder, TabResult};
