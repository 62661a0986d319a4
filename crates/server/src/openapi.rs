use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CreateAdminRequest { pub email: String, pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Search results page query; investment bounds are in lakhs.
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQueryDoc {
    /// Text matched against brand name, tagline and description
    pub q: Option<String>,
    /// Comma separated industry ids
    pub industries: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub min_inv_l: Option<f64>,
    /// 100 means no upper bound
    pub max_inv_l: Option<f64>,
    pub min_area: Option<f64>,
    /// 2000 means no upper bound
    pub max_area: Option<f64>,
    /// newest | inv_asc | inv_desc | alpha
    pub sort: Option<String>,
    pub page: Option<u32>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::app_info,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::session,
        crate::routes::auth::me,
        crate::routes::auth::create_admin,
        crate::routes::franchises::list,
        crate::routes::franchises::get,
        crate::routes::franchises::search_page,
        crate::routes::franchises::by_category,
        crate::routes::franchises::by_location,
        crate::routes::franchises::by_investment,
        crate::routes::taxonomy::public_industries,
        crate::routes::taxonomy::public_sectors_of,
        crate::routes::taxonomy::public_services_of,
        crate::routes::taxonomy::public_states,
        crate::routes::taxonomy::public_cities_of,
        crate::routes::taxonomy::create_industry,
        crate::routes::taxonomy::delete_industry,
        crate::routes::gallery::public_gallery,
        crate::routes::gallery::add,
        crate::routes::gallery::reorder,
        crate::routes::team_actions::list,
        crate::routes::contact::submit,
        crate::routes::contact::list,
        crate::routes::contact::update_status,
        crate::routes::admin_franchises::list,
        crate::routes::admin_franchises::create,
        crate::routes::admin_franchises::update,
        crate::routes::admin_franchises::delete,
        crate::routes::admin_franchises::set_status,
        crate::routes::dashboard::stats,
        crate::routes::events::stream,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            CreateAdminRequest,
            ContactRequest,
            crate::routes::auth::LoginOutput,
            crate::routes::taxonomy::NameInput,
            crate::routes::gallery::ReorderInput,
            crate::routes::contact::StatusUpdate,
            crate::routes::admin_franchises::StatusInput,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "franchises"),
        (name = "taxonomy"),
        (name = "gallery"),
        (name = "contact"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
