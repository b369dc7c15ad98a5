use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

/// Connects to the database named by `DATABASE_URL`, loading `.env` first
pub async fn create_connection() -> Result<DatabaseConnection, DbErr> {
    let url = dotenvy::var("DATABASE_URL")
        .map_err(|e| DbErr::Custom(format!("DATABASE_URL is not set: {e}")))?;

    connect(&url).await
}

/// Connects to the given database URL
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url);
    options.sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(options).await?;
    info!("Connected to {:?} database", db.get_database_backend());

    Ok(db)
}
