pub mod errors;
pub mod db;
pub mod validation;
pub mod admin;
pub mod industry;
pub mod sector;
pub mod service_product;
pub mod state;
pub mod city;
pub mod franchise_listing;
pub mod gallery;
pub mod contact_query;
pub mod team_action_image;

#[cfg(test)]
mod tests;
