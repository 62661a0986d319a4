//! Catalog search: the faceted results page and the three hero-tab searches.
//!
//! Filter construction is kept free of I/O so the generated SQL can be
//! asserted directly; the async functions only resolve names and execute.

use sea_orm::sea_query::{Expr, NullOrdering, Order, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use common::pagination::{Page, Pagination};
use models::{city, franchise_listing, sector, service_product, state};
use models::franchise_listing::Column as Col;
use crate::errors::ServiceError;
use crate::filters::contains_ci;
use super::domain::FranchiseView;

pub const PAGE_SIZE: u32 = 12;
pub const INR_LAKH: f64 = 100_000.0;
/// Slider maxima; a filter at its maximum means "no upper bound".
pub const MAX_INVESTMENT_LAKHS: f64 = 100.0;
pub const MAX_AREA_SQFT: f64 = 2000.0;
pub const TAB_DEFAULT_LIMIT: u64 = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    InvAsc,
    InvDesc,
    Alpha,
}

impl SortOrder {
    /// Unknown values fall back to newest first.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("inv_asc") => SortOrder::InvAsc,
            Some("inv_desc") => SortOrder::InvDesc,
            Some("alpha") => SortOrder::Alpha,
            _ => SortOrder::Newest,
        }
    }

    pub fn apply(self, query: Select<franchise_listing::Entity>) -> Select<franchise_listing::Entity> {
        match self {
            SortOrder::Newest => query.order_by_desc(Col::CreatedAt),
            SortOrder::InvAsc => query
                .order_by_with_nulls(Col::MinInvestment, Order::Asc, NullOrdering::Last)
                .order_by_desc(Col::CreatedAt),
            SortOrder::InvDesc => query
                .order_by_with_nulls(Col::MaxInvestment, Order::Desc, NullOrdering::Last)
                .order_by_desc(Col::CreatedAt),
            SortOrder::Alpha => query.order_by_asc(Col::BrandName),
        }
    }
}

/// Query string of the search results page. Both the snake_case names and the
/// camelCase names the frontend puts in its URLs are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Comma separated industry ids.
    pub industries: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    #[serde(alias = "minInvL")]
    pub min_inv_l: Option<f64>,
    #[serde(alias = "maxInvL")]
    pub max_inv_l: Option<f64>,
    #[serde(alias = "minArea")]
    pub min_area: Option<f64>,
    #[serde(alias = "maxArea")]
    pub max_area: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// Where a listing must be willing to open.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFilter {
    City { name: String },
    State { id: Uuid, name: String },
}

/// Resolved filters, investment in rupees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub q: Option<String>,
    pub industry_ids: Vec<Uuid>,
    pub min_investment: Option<f64>,
    pub max_investment: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub location: Option<LocationFilter>,
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::Validation(format!("invalid {field} id '{raw}'")))
}

fn opt_id(field: &str, raw: Option<&str>) -> Result<Option<Uuid>, ServiceError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_id(field, s).map(Some),
        None => Ok(None),
    }
}

fn lower_bound(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

fn upper_bound(v: Option<f64>, unbounded_at: f64) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0 && *x < unbounded_at)
}

impl SearchParams {
    pub fn industry_ids(&self) -> Result<Vec<Uuid>, ServiceError> {
        let mut ids: Vec<Uuid> = Vec::new();
        for part in self.industries.as_deref().unwrap_or("").split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = parse_id("industry", part)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    pub fn state_id(&self) -> Result<Option<Uuid>, ServiceError> { opt_id("state", self.state.as_deref()) }

    pub fn city_id(&self) -> Result<Option<Uuid>, ServiceError> { opt_id("city", self.city.as_deref()) }

    pub fn pagination(&self) -> Pagination {
        Pagination { page: self.page.unwrap_or(1).max(1), per_page: PAGE_SIZE }
    }

    /// Everything except the location, which needs a name lookup.
    pub fn to_filter(&self) -> Result<SearchFilter, ServiceError> {
        Ok(SearchFilter {
            q: models::validation::non_blank(self.q.clone()),
            industry_ids: self.industry_ids()?,
            min_investment: lower_bound(self.min_inv_l).map(|l| l * INR_LAKH),
            max_investment: upper_bound(self.max_inv_l, MAX_INVESTMENT_LAKHS).map(|l| l * INR_LAKH),
            min_area: lower_bound(self.min_area),
            max_area: upper_bound(self.max_area, MAX_AREA_SQFT),
            location: None,
        })
    }
}

/// `'value' = ANY("column")` for array membership.
fn array_contains_text(column: &str, value: &str) -> SimpleExpr {
    Expr::cust_with_values(format!("? = ANY(\"{column}\")"), [value.to_string()])
}

fn array_contains_uuid(column: &str, value: Uuid) -> SimpleExpr {
    Expr::cust_with_values(format!("? = ANY(\"{column}\")"), [value])
}

fn location_condition(loc: &LocationFilter) -> Condition {
    match loc {
        LocationFilter::City { name } => Condition::all().add(array_contains_text("preferred_locations", name)),
        LocationFilter::State { id, name } => Condition::any()
            .add(array_contains_text("preferred_locations", name))
            .add(array_contains_uuid("expansion_states", *id)),
    }
}

/// Active listings matching every set filter.
pub fn search_condition(f: &SearchFilter) -> Condition {
    let mut cond = Condition::all().add(Col::IsActive.eq(true));
    if let Some(q) = f.q.as_deref() {
        cond = cond.add(
            Condition::any()
                .add(contains_ci(Col::BrandName, q))
                .add(contains_ci(Col::Tagline, q))
                .add(contains_ci(Col::Description, q)),
        );
    }
    if !f.industry_ids.is_empty() {
        cond = cond.add(Col::IndustryId.is_in(f.industry_ids.clone()));
    }
    // 区间重叠: listing [min,max] 与预算 [lo,hi] 有交集
    if let Some(lo) = f.min_investment {
        cond = cond.add(Col::MaxInvestment.gte(lo));
    }
    if let Some(hi) = f.max_investment {
        cond = cond.add(Col::MinInvestment.lte(hi));
    }
    if let Some(lo) = f.min_area {
        cond = cond.add(Col::MinArea.gte(lo));
    }
    if let Some(hi) = f.max_area {
        cond = cond.add(Col::MaxArea.lte(hi));
    }
    if let Some(loc) = &f.location {
        cond = cond.add(location_condition(loc));
    }
    cond
}

/// City wins over state; an unknown id is a not-found error.
async fn resolve_location(
    db: &DatabaseConnection,
    state_id: Option<Uuid>,
    city_id: Option<Uuid>,
) -> Result<Option<LocationFilter>, ServiceError> {
    if let Some(id) = city_id {
        let c = city::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("city"))?;
        return Ok(Some(LocationFilter::City { name: c.name }));
    }
    if let Some(id) = state_id {
        let s = state::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("state"))?;
        return Ok(Some(LocationFilter::State { id: s.id, name: s.name }));
    }
    Ok(None)
}

/// Faceted search behind the results page, 12 per page.
#[instrument(skip(db))]
pub async fn search(db: &DatabaseConnection, params: &SearchParams) -> Result<Page<FranchiseView>, ServiceError> {
    let mut filter = params.to_filter()?;
    filter.location = resolve_location(db, params.state_id()?, params.city_id()?).await?;
    let opts = params.pagination();
    let cond = search_condition(&filter);

    let total = franchise_listing::Entity::find().filter(cond.clone()).count(db).await?;
    let query = SortOrder::parse(params.sort.as_deref()).apply(franchise_listing::Entity::find().filter(cond));
    let rows = query.offset(opts.offset()).limit(PAGE_SIZE as u64).all(db).await?;
    debug!(total, returned = rows.len(), "search");

    let data = super::service::enrich(db, rows).await?;
    Ok(Page::new(data, total, opts))
}

/// Paging for the hero tabs; `limit = 0` asks for the count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabPaging {
    pub limit: u64,
    pub offset: u64,
}

impl Default for TabPaging {
    fn default() -> Self { Self { limit: TAB_DEFAULT_LIMIT, offset: 0 } }
}

fn default_tab_limit() -> u64 { TAB_DEFAULT_LIMIT }

// limit/offset are repeated per query: query strings cannot carry numbers through #[serde(flatten)]
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryQuery {
    pub industry_id: Option<Uuid>,
    pub sector_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    #[serde(default = "default_tab_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationQuery {
    pub industry_id: Option<Uuid>,
    pub state_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    #[serde(default = "default_tab_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Bounds in rupees.
#[derive(Debug, Clone, Deserialize)]
pub struct InvestmentQuery {
    pub industry_id: Option<Uuid>,
    pub min_investment: Option<f64>,
    pub max_investment: Option<f64>,
    #[serde(default = "default_tab_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

macro_rules! tab_query_defaults {
    ($($ty:ident { $($field:ident),* }),*) => {$(
        impl $ty {
            pub fn paging(&self) -> TabPaging { TabPaging { limit: self.limit, offset: self.offset } }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self { $($field: None,)* limit: TAB_DEFAULT_LIMIT, offset: 0 }
            }
        }
    )*};
}

tab_query_defaults!(
    CategoryQuery { industry_id, sector_id, service_id },
    LocationQuery { industry_id, state_id, city_id },
    InvestmentQuery { industry_id, min_investment, max_investment }
);

#[derive(Debug, Clone, Serialize)]
pub struct TabResult {
    pub data: Vec<franchise_listing::Model>,
    pub count: u64,
}

fn base_tab_condition(industry_id: Option<Uuid>) -> Condition {
    let cond = Condition::all().add(Col::IsActive.eq(true));
    match industry_id {
        Some(id) => cond.add(Col::IndustryId.eq(id)),
        None => cond,
    }
}

/// Tab search by investment: listings entirely inside `[min, max]`.
pub fn investment_condition(q: &InvestmentQuery) -> Condition {
    let mut cond = base_tab_condition(q.industry_id);
    if let Some(min) = q.min_investment {
        cond = cond.add(Col::MinInvestment.gte(min));
    }
    if let Some(max) = q.max_investment {
        cond = cond.add(Col::MaxInvestment.lte(max));
    }
    cond
}

/// City name, else state name, must appear in the listing's preferred locations.
pub fn tab_location_condition(industry_id: Option<Uuid>, city_name: Option<&str>, state_name: Option<&str>) -> Condition {
    let cond = base_tab_condition(industry_id);
    match city_name.or(state_name) {
        Some(name) => cond.add(array_contains_text("preferred_locations", name)),
        None => cond,
    }
}

async fn run_tab(db: &DatabaseConnection, cond: Condition, paging: TabPaging) -> Result<TabResult, ServiceError> {
    let count = franchise_listing::Entity::find().filter(cond.clone()).count(db).await?;
    let data = if paging.limit == 0 {
        Vec::new()
    } else {
        franchise_listing::Entity::find()
            .filter(cond)
            .order_by_desc(Col::CreatedAt)
            .offset(paging.offset)
            .limit(paging.limit)
            .all(db)
            .await?
    };
    Ok(TabResult { data, count })
}

/// Industry directly, or derived from the sector, or from the service's sector.
async fn category_industry(db: &DatabaseConnection, q: &CategoryQuery) -> Result<Option<Uuid>, ServiceError> {
    if q.industry_id.is_some() {
        return Ok(q.industry_id);
    }
    let sector_id = match (q.sector_id, q.service_id) {
        (Some(id), _) => Some(id),
        (None, Some(service_id)) => Some(
            service_product::Entity::find_by_id(service_id)
                .one(db).await?
                .ok_or_else(|| ServiceError::not_found("service"))?
                .sector_id,
        ),
        (None, None) => None,
    };
    match sector_id {
        Some(id) => Ok(Some(
            sector::Entity::find_by_id(id)
                .one(db).await?
                .ok_or_else(|| ServiceError::not_found("sector"))?
                .industry_id,
        )),
        None => Ok(None),
    }
}

#[instrument(skip(db))]
pub async fn search_by_category(db: &DatabaseConnection, q: &CategoryQuery) -> Result<TabResult, ServiceError> {
    let industry_id = category_industry(db, q).await?;
    run_tab(db, base_tab_condition(industry_id), q.paging()).await
}

#[instrument(skip(db))]
pub async fn search_by_location(db: &DatabaseConnection, q: &LocationQuery) -> Result<TabResult, ServiceError> {
    let city_name = match q.city_id {
        Some(id) => Some(city::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("city"))?.name),
        None => None,
    };
    let state_name = match (city_name.is_none(), q.state_id) {
        (true, Some(id)) => Some(state::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("state"))?.name),
        _ => None,
    };
    let cond = tab_location_condition(q.industry_id, city_name.as_deref(), state_name.as_deref());
    run_tab(db, cond, q.paging()).await
}

#[instrument(skip(db))]
pub async fn search_by_investment(db: &DatabaseConnection, q: &InvestmentQuery) -> Result<TabResult, ServiceError> {
    run_tab(db, investment_condition(q), q.paging()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;

    fn sql(cond: Condition) -> String {
        franchise_listing::Entity::find().filter(cond).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn slider_extremes_mean_unbounded() {
        let p = SearchParams { min_inv_l: Some(0.0), max_inv_l: Some(100.0), min_area: Some(0.0), max_area: Some(2000.0), ..Default::default() };
        let f = p.to_filter().unwrap();
        assert_eq!(f, SearchFilter::default());
        assert_eq!(sql(search_condition(&f)), sql(Condition::all().add(Col::IsActive.eq(true))));
    }

    #[test]
    fn investment_converted_from_lakhs_and_overlaps() {
        let p = SearchParams { min_inv_l: Some(5.0), max_inv_l: Some(20.0), ..Default::default() };
        let s = sql(search_condition(&p.to_filter().unwrap()));
        assert!(s.contains(r#""max_investment" >= 500000"#), "{s}");
        assert!(s.contains(r#""min_investment" <= 2000000"#), "{s}");
    }

    #[test]
    fn all_selected_industries_apply() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let p = SearchParams { industries: Some(format!("{a}, {b},,{a}")), ..Default::default() };
        let f = p.to_filter().unwrap();
        assert_eq!(f.industry_ids, vec![a, b]);
        let s = sql(search_condition(&f));
        assert!(s.contains(r#""industry_id" IN ("#), "{s}");
        assert!(s.contains(&a.to_string()) && s.contains(&b.to_string()));
    }

    #[test]
    fn bad_industry_id_is_a_validation_error() {
        let p = SearchParams { industries: Some("nope".into()), ..Default::default() };
        assert!(matches!(p.to_filter(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn text_matches_three_columns_case_insensitively() {
        let f = SearchFilter { q: Some("Chai".into()), ..Default::default() };
        let s = sql(search_condition(&f));
        assert!(s.contains(r#"LOWER("brand_name") LIKE '%chai%'"#), "{s}");
        assert!(s.contains(r#"LOWER("tagline") LIKE '%chai%'"#), "{s}");
        assert!(s.contains(r#"LOWER("description") LIKE '%chai%'"#), "{s}");
        assert!(s.contains(" OR "));
    }

    #[test]
    fn state_location_matches_name_or_expansion_state() {
        let id = Uuid::new_v4();
        let f = SearchFilter { location: Some(LocationFilter::State { id, name: "Kerala".into() }), ..Default::default() };
        let s = sql(search_condition(&f));
        assert!(s.contains(r#"'Kerala' = ANY("preferred_locations")"#), "{s}");
        assert!(s.contains(r#"= ANY("expansion_states")"#), "{s}");
        assert!(s.contains(&id.to_string()), "{s}");
    }

    #[test]
    fn sort_orders() {
        let base = || franchise_listing::Entity::find();
        let s = SortOrder::InvDesc.apply(base()).build(DbBackend::Postgres).to_string();
        assert!(s.contains(r#""max_investment" DESC NULLS LAST"#), "{s}");
        let s = SortOrder::Alpha.apply(base()).build(DbBackend::Postgres).to_string();
        assert!(s.contains(r#"ORDER BY "franchise_listings"."brand_name" ASC"#), "{s}");
        assert_eq!(SortOrder::parse(Some("bogus")), SortOrder::Newest);
    }

    #[test]
    fn tab_investment_is_containment() {
        let q = InvestmentQuery { min_investment: Some(100_000.0), max_investment: Some(900_000.0), ..Default::default() };
        let s = sql(investment_condition(&q));
        assert!(s.contains(r#""min_investment" >= 100000"#), "{s}");
        assert!(s.contains(r#""max_investment" <= 900000"#), "{s}");
    }

    #[test]
    fn tab_location_prefers_city() {
        let s = sql(tab_location_condition(None, Some("Kochi"), Some("Kerala")));
        assert!(s.contains("'Kochi' = ANY"), "{s}");
        assert!(!s.contains("Kerala"), "{s}");
    }

    #[test]
    fn tab_query_defaults_from_query_string() {
        let q: LocationQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(q.paging(), TabPaging::default());
        assert_eq!(InvestmentQuery::default().paging().limit, 24);
    }

    #[tokio::test]
    async fn zero_limit_returns_count_only() -> Result<(), anyhow::Error> {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("num_items", Value::BigInt(Some(7)))])]])
            .into_connection();
        let q = InvestmentQuery { limit: 0, ..Default::default() };
        let out = search_by_investment(&db, &q).await?;
        assert_eq!(out.count, 7);
        assert!(out.data.is_empty());
        // only the count query ran
        assert_eq!(db.into_transaction_log().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn location_tab_unknown_city_is_not_found() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([Vec::<city::Model>::new()])
            .into_connection();
        let q = LocationQuery { city_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(matches!(search_by_location(&db, &q).await, Err(ServiceError::NotFound(_))));
        // no listing query after the failed lookup
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn location_tab_unknown_state_is_not_found() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([Vec::<state::Model>::new()])
            .into_connection();
        let q = LocationQuery { state_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(matches!(search_by_location(&db, &q).await, Err(ServiceError::NotFound(_))));
    }
}
