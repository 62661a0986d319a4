use std::collections::HashSet;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::franchise_listing::{self, validate_range, DEFAULT_AREA_UNIT};
use models::validation::{self, non_blank};
use crate::errors::ServiceError;
use crate::taxonomy::NamedRef;

/// Listing form payload as the admin form submits it.
///
/// Optional text arrives as empty strings and numbers may be absent; call
/// [`FranchiseInput::normalize`] before writing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FranchiseInput {
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
    pub area_unit: Option<String>,
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
    /// Gallery URLs to keep on update; `None` leaves the gallery untouched.
    pub existing_gallery_images: Option<Vec<String>>,
}

impl FranchiseInput {
    pub fn normalize(self) -> Result<Self, ServiceError> {
        let brand_name = self.brand_name.trim().to_string();
        if brand_name.is_empty() {
            return Err(ServiceError::Validation("brand_name is required".into()));
        }
        if self.industry_id.is_none() {
            return Err(ServiceError::Validation("industry_id is required".into()));
        }
        let contact_phone = non_blank(self.contact_phone)
            .ok_or_else(|| ServiceError::Validation("contact_phone is required".into()))?;
        validation::validate_phone(&contact_phone)?;
        let contact_email = non_blank(self.contact_email)
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ServiceError::Validation("contact_email is required".into()))?;
        validation::validate_email(&contact_email)?;

        validate_range("investment", self.min_investment, self.max_investment)?;
        validate_range("area", self.min_area, self.max_area)?;
        validate_range("franchise_fee", self.franchise_fee, None)?;
        validate_range("royalty_percentage", self.royalty_percentage, None)?;

        let mut seen = HashSet::new();
        let expansion_states = self.expansion_states.into_iter().filter(|id| seen.insert(*id)).collect();
        let preferred_locations = self
            .preferred_locations
            .into_iter()
            .filter_map(|l| non_blank(Some(l)))
            .collect();
        // blob: URLs are browser-local previews
        let logo_url = non_blank(self.logo_url).filter(|u| !u.starts_with("blob:"));
        let training_location = if self.training_provided { non_blank(self.training_location) } else { None };

        Ok(Self {
            brand_name,
            tagline: non_blank(self.tagline),
            description: non_blank(self.description),
            about_brand: non_blank(self.about_brand),
            logo_url,
            area_unit: non_blank(self.area_unit).or_else(|| Some(DEFAULT_AREA_UNIT.to_string())),
            preferred_locations,
            expansion_states,
            training_location,
            contact_phone: Some(contact_phone),
            contact_email: Some(contact_email),
            contact_address: non_blank(self.contact_address),
            ..self
        })
    }

    /// Copy the editable fields onto an active model. Status, timestamps and
    /// the id stay with the caller. A missing logo leaves the stored one alone.
    pub fn apply_to(self, am: &mut franchise_listing::ActiveModel) {
        am.brand_name = Set(self.brand_name);
        am.tagline = Set(self.tagline);
        am.description = Set(self.description);
        am.about_brand = Set(self.about_brand);
        if let Some(logo_url) = self.logo_url {
            am.logo_url = Set(Some(logo_url));
        }
        am.industry_id = Set(self.industry_id);
        am.min_investment = Set(self.min_investment);
        am.max_investment = Set(self.max_investment);
        am.franchise_fee = Set(self.franchise_fee);
        am.royalty_percentage = Set(self.royalty_percentage);
        am.min_area = Set(self.min_area);
        am.max_area = Set(self.max_area);
        am.area_unit = Set(self.area_unit.unwrap_or_else(|| DEFAULT_AREA_UNIT.to_string()));
        am.establishment_year = Set(self.establishment_year);
        am.franchise_commenced_year = Set(self.franchise_commenced_year);
        am.franchise_outlets = Set(self.franchise_outlets);
        am.anticipated_roi = Set(self.anticipated_roi);
        am.payback_period = Set(self.payback_period);
        am.preferred_locations = Set(self.preferred_locations);
        am.expansion_states = Set(self.expansion_states);
        am.exclusive_territory = Set(self.exclusive_territory);
        am.franchise_term_years = Set(self.franchise_term_years);
        am.term_renewable = Set(self.term_renewable);
        am.training_provided = Set(self.training_provided);
        am.training_location = Set(self.training_location);
        am.field_assistance = Set(self.field_assistance);
        am.expert_guidance = Set(self.expert_guidance);
        am.operating_manuals = Set(self.operating_manuals);
        am.contact_phone = Set(self.contact_phone);
        am.contact_email = Set(self.contact_email);
        am.contact_address = Set(self.contact_address);
        am.updated_at = Set(Utc::now().into());
    }
}

/// A listing as the catalog and the admin table show it.
#[derive(Debug, Clone, Serialize)]
pub struct FranchiseView {
    #[serde(flatten)]
    pub listing: franchise_listing::Model,
    pub industry: Option<NamedRef>,
    pub gallery_images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::Unchanged;

    fn valid_input() -> FranchiseInput {
        FranchiseInput {
            brand_name: "  Chai Point ".into(),
            industry_id: Some(Uuid::new_v4()),
            contact_phone: Some("9876543210".into()),
            contact_email: Some("Hello@ChaiPoint.in".into()),
            ..Default::default()
        }
    }

    #[test]
    fn required_fields() {
        assert!(FranchiseInput { brand_name: " ".into(), ..valid_input() }.normalize().is_err());
        assert!(FranchiseInput { industry_id: None, ..valid_input() }.normalize().is_err());
        assert!(FranchiseInput { contact_phone: Some("".into()), ..valid_input() }.normalize().is_err());
        assert!(FranchiseInput { contact_email: Some("x".into()), ..valid_input() }.normalize().is_err());
    }

    #[test]
    fn blanks_dropped_and_defaults_filled() {
        let n = FranchiseInput {
            tagline: Some("   ".into()),
            preferred_locations: vec![" Pune ".into(), "".into(), "  ".into(), "Mumbai".into()],
            logo_url: Some("blob:http://localhost/abc".into()),
            training_location: Some("HQ".into()),
            training_provided: false,
            ..valid_input()
        }
        .normalize()
        .unwrap();
        assert_eq!(n.brand_name, "Chai Point");
        assert!(n.tagline.is_none());
        assert_eq!(n.preferred_locations, vec!["Pune", "Mumbai"]);
        assert!(n.logo_url.is_none());
        assert!(n.training_location.is_none());
        assert_eq!(n.area_unit.as_deref(), Some("sqft"));
        assert_eq!(n.contact_email.as_deref(), Some("hello@chaipoint.in"));
    }

    #[test]
    fn expansion_states_deduplicated_in_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let n = FranchiseInput { expansion_states: vec![a, b, a], ..valid_input() }.normalize().unwrap();
        assert_eq!(n.expansion_states, vec![a, b]);
    }

    #[test]
    fn ranges_checked() {
        let bad = FranchiseInput { min_investment: Some(500_000.0), max_investment: Some(100_000.0), ..valid_input() };
        assert!(matches!(bad.normalize(), Err(ServiceError::Model(_))));
        let neg = FranchiseInput { franchise_fee: Some(-1.0), ..valid_input() };
        assert!(neg.normalize().is_err());
    }

    #[test]
    fn training_location_kept_when_training_provided() {
        let n = FranchiseInput { training_provided: true, training_location: Some(" Bengaluru ".into()), ..valid_input() }
            .normalize()
            .unwrap();
        assert_eq!(n.training_location.as_deref(), Some("Bengaluru"));
    }

    fn stored_listing() -> franchise_listing::ActiveModel {
        franchise_listing::ActiveModel {
            logo_url: Unchanged(Some("/media/b/x/logo.png".into())),
            ..Default::default()
        }
    }

    #[test]
    fn edit_without_logo_keeps_stored_logo() {
        let mut am = stored_listing();
        FranchiseInput { tagline: Some("Crisp".into()), ..valid_input() }.normalize().unwrap().apply_to(&mut am);
        assert_eq!(am.logo_url, Unchanged(Some("/media/b/x/logo.png".to_string())));
        assert_eq!(am.tagline, Set(Some("Crisp".to_string())));

        let mut am = stored_listing();
        FranchiseInput { logo_url: Some("blob:http://localhost/abc".into()), ..valid_input() }
            .normalize()
            .unwrap()
            .apply_to(&mut am);
        assert_eq!(am.logo_url, Unchanged(Some("/media/b/x/logo.png".to_string())));
    }

    #[test]
    fn new_logo_replaces_stored_one() {
        let mut am = stored_listing();
        FranchiseInput { logo_url: Some("/media/b/x/new.png".into()), ..valid_input() }
            .normalize()
            .unwrap()
            .apply_to(&mut am);
        assert_eq!(am.logo_url, Set(Some("/media/b/x/new.png".to_string())));
    }
}
