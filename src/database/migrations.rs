use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    create_fishing_records_table(pool).await?;
    create_external_roster_table(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_fishing_records_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fishing_records (
            day TEXT NOT NULL,
            participant TEXT NOT NULL,
            status TEXT NOT NULL CHECK (status IN ('pending', 'done')),
            helper TEXT,
            PRIMARY KEY (day, participant)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_external_roster_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS external_roster (
            position INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
