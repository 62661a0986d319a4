use crate::db::{connect_with_config, DatabaseConfig};
use sea_orm::{DatabaseBackend, Statement, ConnectionTrait};
use std::time::{Duration, Instant};
use anyhow::Result;

use super::setup_test_db;

/// Test basic database connection
#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    let start = Instant::now();
    let Some(db) = setup_test_db().await else { return Ok(()) };
    println!("Database connection established in {:?}", start.elapsed());

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let result = db.query_one(stmt).await?;
    let row = result.expect("one row");
    let test_value: i32 = row.try_get("", "test")?;
    assert_eq!(test_value, 1);
    Ok(())
}

/// Test connection with custom configuration
#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if setup_test_db().await.is_none() { return Ok(()); }

    let mut config = DatabaseConfig::from_env();
    config.max_connections = 5;
    config.min_connections = 1;
    config.connect_timeout = Duration::from_secs(10);

    let db = match connect_with_config(&config).await {
        Ok(db) => db,
        Err(e) => { eprintln!("skip: env url not reachable: {}", e); return Ok(()); }
    };
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT current_database()".to_string());
    let result = db.query_one(stmt).await?;
    assert!(result.is_some());
    Ok(())
}

#[test]
fn config_conversion_keeps_pool_bounds() {
    let src = configs::DatabaseConfig {
        url: "postgres://u:p@localhost/x".into(),
        max_connections: 7,
        min_connections: 3,
        connect_timeout_secs: 4,
        idle_timeout_secs: 5,
        max_lifetime_secs: 6,
        acquire_timeout_secs: 8,
        sqlx_logging: true,
        auto_migrate: false,
    };
    let cfg = DatabaseConfig::from(&src);
    assert_eq!(cfg.max_connections, 7);
    assert_eq!(cfg.min_connections, 3);
    assert_eq!(cfg.acquire_timeout, Duration::from_secs(8));
    assert!(cfg.sqlx_logging);
}
