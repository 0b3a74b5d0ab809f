//! Shared test utilities for the rate ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{hotel, ledger, money::Money, room_type},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test hotel located in "Test City".
pub async fn create_test_hotel(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::hotel::Model> {
    hotel::create_hotel(db, name, "Test City").await
}

/// Creates a test room type with a base rate of 100.00.
pub async fn create_test_room_type(
    db: &DatabaseConnection,
    hotel_id: i64,
    name: &str,
) -> Result<entities::room_type::Model> {
    room_type::create_room_type(db, hotel_id, name, Money::from_cents(10_000)).await
}

/// Appends a test adjustment with reason `"Test adjustment"`.
pub async fn create_test_adjustment(
    db: &DatabaseConnection,
    room_type_id: i64,
    amount_cents: i64,
    effective_date: NaiveDate,
) -> Result<entities::rate_adjustment::Model> {
    ledger::append(
        db,
        room_type_id,
        Money::from_cents(amount_cents),
        effective_date,
        "Test adjustment",
    )
    .await
}

/// Sets up a complete test environment with a hotel and one room type.
/// Returns (db, room type) for common test scenarios.
pub async fn setup_with_room_type() -> Result<(DatabaseConnection, entities::room_type::Model)> {
    let db = setup_test_db().await?;
    let hotel = create_test_hotel(&db, "Test Hotel").await?;
    let room_type = create_test_room_type(&db, hotel.id, "Deluxe Room").await?;
    Ok((db, room_type))
}
