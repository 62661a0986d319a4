use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, gallery, industry};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
pub const DEFAULT_AREA_UNIT: &str = "sqft";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "franchise_listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub about_brand: Option<String>,
    pub logo_url: Option<String>,
    pub industry_id: Option<Uuid>,
    pub min_investment: Option<f64>,
    pub max_investment: Option<f64>,
    pub franchise_fee: Option<f64>,
    pub royalty_percentage: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub area_unit: String,
    pub establishment_year: Option<i32>,
    pub franchise_commenced_year: Option<i32>,
    pub franchise_outlets: Option<i32>,
    pub anticipated_roi: Option<f64>,
    pub payback_period: Option<i32>,
    pub preferred_locations: Vec<String>,
    pub expansion_states: Vec<Uuid>,
    pub exclusive_territory: bool,
    pub franchise_term_years: Option<i32>,
    pub term_renewable: bool,
    pub training_provided: bool,
    pub training_location: Option<String>,
    pub field_assistance: bool,
    pub expert_guidance: bool,
    pub operating_manuals: bool,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub contact_address: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Industry, Gallery }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Industry => Entity::belongs_to(industry::Entity).from(Column::IndustryId).to(industry::Column::Id).into(),
            Relation::Gallery => Entity::has_many(gallery::Entity).into(),
        }
    }
}

impl Related<industry::Entity> for Entity {
    fn to() -> RelationDef { Relation::Industry.def() }
}

impl Related<gallery::Entity> for Entity {
    fn to() -> RelationDef { Relation::Gallery.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn status_for(is_active: bool) -> &'static str {
    if is_active { STATUS_ACTIVE } else { STATUS_INACTIVE }
}

/// Money and area figures are non-negative; when both bounds are given, min <= max.
pub fn validate_range(field: &str, min: Option<f64>, max: Option<f64>) -> Result<(), ModelError> {
    for v in [min, max].into_iter().flatten() {
        if !v.is_finite() || v < 0.0 {
            return Err(ModelError::Validation(format!("{field} must be a non-negative number")));
        }
    }
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(ModelError::Validation(format!("min {field} must not exceed max {field}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rules() {
        assert!(validate_range("investment", Some(1.0), Some(2.0)).is_ok());
        assert!(validate_range("investment", None, Some(2.0)).is_ok());
        assert!(validate_range("investment", Some(3.0), Some(2.0)).is_err());
        assert!(validate_range("area", Some(-1.0), None).is_err());
        assert!(validate_range("area", Some(f64::NAN), None).is_err());
    }

    #[test]
    fn status_follows_flag() {
        assert_eq!(status_for(true), "active");
        assert_eq!(status_for(false), "inactive");
    }
}
