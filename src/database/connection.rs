use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub type DbConn = DatabaseConnection;

pub async fn connect(config: &DatabaseConfig) -> AppResult<DbConn> {
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let conn = Database::connect(opts).await?;
    Ok(conn)
}

pub async fn run_migrations(conn: &DbConn) -> AppResult<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}
