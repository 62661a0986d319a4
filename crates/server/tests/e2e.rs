use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::OnceCell;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, StaticDirs};
use server::startup;
use service::auth::domain::CreateAdminInput;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

struct TestApp {
    base_url: String,
    admin_email: String,
    admin_password: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // 只使用环境变量，避免读到本地 config.toml
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    };

    let root = std::env::temp_dir().join(format!("franchise-hub-e2e-{}", Uuid::new_v4()));
    let mut cfg = configs::AppConfig::default();
    cfg.database.url = url;
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.auth.token_ttl_hours = 1;
    cfg.storage.media_dir = root.join("media").to_string_lossy().into_owned();
    cfg.server.frontend_dir = root.join("frontend").to_string_lossy().into_owned();
    cfg.normalize_and_validate()?;
    cfg.database.auto_migrate = false;

    // 迁移只跑一次，避免并发测试同时建表
    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    MIGRATED
        .get_or_init(|| async move {
            match models::db::connect_with_config(&db_cfg).await {
                Ok(db) => {
                    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }
                }
                Err(e) => eprintln!("migrations skipped: {}", e),
            }
        })
        .await;

    let state = startup::build_state(&cfg).await?;

    let admin_email = format!("ops_{}@example.com", Uuid::new_v4().simple());
    let admin_password = "Passw0rd!".to_string();
    state
        .auth_service()
        .create_admin(CreateAdminInput { email: admin_email.clone(), name: "Ops".into(), password: admin_password.clone() })
        .await?;

    let dirs = StaticDirs { frontend: root.join("frontend"), media: root.join("media") };
    let app = routes::build_router(state, CorsLayer::very_permissive(), dirs);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, admin_email, admin_password })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

async fn logged_in(app: &TestApp) -> anyhow::Result<reqwest::Client> {
    let c = client();
    let res = c
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": app.admin_email, "password": app.admin_password}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(c)
}

#[tokio::test]
async fn e2e_login_session_and_logout() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };

    let bad = client()
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": app.admin_email, "password": "wrong-password"}))
        .send()
        .await?;
    assert_eq!(bad.status(), HttpStatusCode::UNAUTHORIZED);

    let c = logged_in(&app).await?;
    let status: Value = c.get(format!("{}/auth/session", app.base_url)).send().await?.json().await?;
    assert_eq!(status["is_authenticated"], true);
    assert_eq!(status["admin"]["email"], app.admin_email.as_str());

    let res = c.get(format!("{}/admin/dashboard/stats", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.post(format!("{}/auth/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.get(format!("{}/admin/dashboard/stats", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_listing_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = logged_in(&app).await?;
    let tag = Uuid::new_v4().simple().to_string();

    let industry: Value = c
        .post(format!("{}/admin/industries", app.base_url))
        .json(&json!({"name": format!("Food {tag}")}))
        .send()
        .await?
        .json()
        .await?;
    let industry_id = industry["id"].as_str().unwrap_or_default().to_string();

    let state_row: Value = c
        .post(format!("{}/admin/states", app.base_url))
        .json(&json!({"name": format!("State {tag}")}))
        .send()
        .await?
        .json()
        .await?;
    let state_id = state_row["id"].as_str().unwrap_or_default().to_string();

    let data = json!({
        "brand_name": format!("Chai Point {tag}"),
        "industry_id": industry_id,
        "min_investment": 500000.0,
        "max_investment": 1500000.0,
        "min_area": 200.0,
        "max_area": 400.0,
        "expansion_states": [state_id],
        "contact_phone": "+91 98765 43210",
        "contact_email": "brand@example.com"
    });
    let form = Form::new()
        .text("data", data.to_string())
        .part("logo", Part::bytes(b"logo-bytes".to_vec()).file_name("logo.png").mime_str("image/png")?)
        .part("gallery", Part::bytes(b"shop-1".to_vec()).file_name("shop1.jpg").mime_str("image/jpeg")?)
        .part("gallery", Part::bytes(b"shop-2".to_vec()).file_name("shop2.jpg").mime_str("image/jpeg")?);
    let res = c.post(format!("{}/admin/franchises", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created: Value = res.json().await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["is_active"], true);
    assert!(created["logo_url"].as_str().unwrap_or_default().contains(&id));

    // 公开详情带画廊
    let view: Value = client().get(format!("{}/api/franchises/{}", app.base_url, id)).send().await?.json().await?;
    assert_eq!(view["gallery_images"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(view["industry"]["id"], industry_id.as_str());

    let page: Value = client()
        .get(format!("{}/api/franchises/search", app.base_url))
        .query(&[("q", tag.as_str()), ("industries", industry_id.as_str()), ("maxInvL", "20")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 1);

    let by_location: Value = client()
        .get(format!("{}/api/franchises/search/location", app.base_url))
        .query(&[("state_id", state_id.as_str())])
        .send()
        .await?
        .json()
        .await?;
    assert!(by_location["count"].as_u64().unwrap_or_default() >= 1);

    let res = c
        .patch(format!("{}/admin/franchises/{}/status", app.base_url, id))
        .json(&json!({"is_active": false}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = client().get(format!("{}/api/franchises/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/admin/franchises/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/admin/industries/{}", app.base_url, industry_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/admin/states/{}", app.base_url, state_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn e2e_contact_roundtrip() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };

    let res = client()
        .post(format!("{}/api/contact", app.base_url))
        .json(&json!({"name": "Asha", "email": "Asha@Example.com", "phone": "98765 43210", "subject": "Franchise", "message": "Please call me"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["email"], "asha@example.com");
    assert_eq!(created["status"], "new");
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let c = logged_in(&app).await?;
    let res = c
        .patch(format!("{}/admin/contact-queries/{}", app.base_url, id))
        .json(&json!({"status": "replied", "admin_notes": "called back"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .patch(format!("{}/admin/contact-queries/{}", app.base_url, id))
        .json(&json!({"status": "archived"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let stats: Value = c.get(format!("{}/admin/contact-queries/stats", app.base_url)).send().await?.json().await?;
    assert!(stats["replied"].as_u64().unwrap_or_default() >= 1);

    let res = c.delete(format!("{}/admin/contact-queries/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    Ok(())
}
