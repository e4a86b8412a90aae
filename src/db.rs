//! Database module
//!
//! Connectivity check and schema bootstrap. The schema is created in place at
//! startup; there is no migration framework.

use sqlx::PgPool;

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Create the `account` and `transfer` tables if they do not exist.
///
/// `number` carries a UNIQUE constraint; account creation regenerates the
/// random number on collision instead of trusting a bounded draw.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            id BIGSERIAL PRIMARY KEY,
            first_name VARCHAR(50) NOT NULL,
            last_name VARCHAR(50) NOT NULL,
            number BIGINT NOT NULL UNIQUE,
            encrypted_password VARCHAR(255) NOT NULL,
            balance BIGINT NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transfer (
            id BIGSERIAL PRIMARY KEY,
            from_account BIGINT NOT NULL,
            to_account BIGINT NOT NULL,
            amount BIGINT NOT NULL,
            timestamp TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
