use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub app: AppInfoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4), frontend_dir: default_frontend_dir() }
    }
}

fn default_frontend_dir() -> String { "frontend".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Apply pending migrations on startup.
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            auto_migrate: default_auto_migrate(),
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_auto_migrate() -> bool { true }

/// Admin authentication settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default)]
    pub cookie_secure: bool,
    /// Seeded once when the `admins` table is empty.
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_name: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            cookie_secure: false,
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
            bootstrap_admin_name: None,
        }
    }
}

fn default_token_ttl_hours() -> i64 { 12 }

/// Local object store backing logo and gallery uploads.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Prefix for public object URLs; objects are served under `/media`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            bucket: default_bucket(),
            public_base_url: default_public_base_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_media_dir() -> String { "data/media".into() }
fn default_bucket() -> String { "franchise-gallery-images".into() }
fn default_public_base_url() -> String { "/media".into() }
fn default_max_upload_bytes() -> usize { 5 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct AppInfoConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
    #[serde(default = "default_support_phone")]
    pub support_phone: String,
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self { name: default_app_name(), contact_email: default_contact_email(), support_phone: default_support_phone() }
    }
}

fn default_app_name() -> String { "Rodar Franchise World".into() }
fn default_contact_email() -> String { "info@rodarfranchiseworld.com".into() }
fn default_support_phone() -> String { "+91-9876543210".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file if present, otherwise defaults filled from the environment.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server（支持 SERVER_HOST / SERVER_PORT 覆盖）
        self.server.normalize_from_env();
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.frontend_dir.trim().is_empty() {
            self.frontend_dir = default_frontend_dir();
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        if self.max_connections == 0 { self.max_connections = default_max_connections(); }
        if self.min_connections == 0 { self.min_connections = default_min_connections().min(self.max_connections); }
        if self.connect_timeout_secs == 0 { self.connect_timeout_secs = default_connect_timeout(); }
        if self.acquire_timeout_secs == 0 { self.acquire_timeout_secs = default_acquire_timeout(); }
        if self.idle_timeout_secs == 0 { self.idle_timeout_secs = default_idle_timeout(); }
        if self.max_lifetime_secs == 0 { self.max_lifetime_secs = default_max_lifetime(); }
        if let Ok(v) = std::env::var("AUTO_MIGRATE") {
            self.auto_migrate = matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url 必须以 postgresql:// 或 postgres:// 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
        if self.bootstrap_admin_email.is_none() {
            self.bootstrap_admin_email = std::env::var("ADMIN_EMAIL").ok();
        }
        if self.bootstrap_admin_password.is_none() {
            self.bootstrap_admin_password = std::env::var("ADMIN_PASSWORD").ok();
        }
        if self.token_ttl_hours <= 0 {
            self.token_ttl_hours = default_token_ttl_hours();
        }
    }

    pub fn validate(&self) -> Result<()> {
        // release 构建必须显式配置密钥；debug 构建允许回退到开发密钥
        if self.jwt_secret.trim().is_empty() && !cfg!(debug_assertions) {
            return Err(anyhow!("auth.jwt_secret 为空；请在 config.toml 或环境变量 JWT_SECRET 中提供"));
        }
        if self.bootstrap_admin_email.is_some() != self.bootstrap_admin_password.is_some() {
            return Err(anyhow!("auth.bootstrap_admin_email 与 bootstrap_admin_password 必须同时提供"));
        }
        Ok(())
    }

    /// Secret used for signing; falls back to a development value when unset.
    pub fn effective_secret(&self) -> String {
        if self.jwt_secret.trim().is_empty() {
            "dev-secret-change-me".to_string()
        } else {
            self.jwt_secret.clone()
        }
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(dir) = std::env::var("MEDIA_DIR") {
            if !dir.trim().is_empty() { self.media_dir = dir; }
        }
        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            if !url.trim().is_empty() { self.public_base_url = url; }
        }
        while self.public_base_url.len() > 1 && self.public_base_url.ends_with('/') {
            self.public_base_url.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.media_dir.trim().is_empty() {
            return Err(anyhow!("storage.media_dir 不能为空"));
        }
        if self.bucket.trim().is_empty() || self.bucket.contains('/') || self.bucket.contains("..") {
            return Err(anyhow!("storage.bucket 非法: {}", self.bucket));
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("storage.max_upload_bytes 必须 > 0"));
        }
        Ok(())
    }
}
