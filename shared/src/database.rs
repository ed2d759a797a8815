use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};
use tracing::info;

pub async fn get_db_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Opening price history database at {}", database_url);
    let db = Database::connect(database_url).await?;
    Ok(db)
}
