//! Catalog seeding from config.toml
//!
//! The TOML file lists hotels, their room types and any initial rate adjustments. Seeding
//! runs at startup and is idempotent: a hotel whose name already exists in the database is
//! left alone, together with everything configured under it. Each hotel is written in its
//! own transaction, so a bad entry anywhere under a hotel leaves none of it behind.

use crate::{
    core::{hotel, ledger, money::Money, room_type},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the seed file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Hotels to seed
    #[serde(default)]
    pub hotels: Vec<HotelConfig>,
}

/// Configuration for a single hotel
#[derive(Debug, Deserialize, Clone)]
pub struct HotelConfig {
    /// Hotel name, also the idempotency key
    pub name: String,
    /// Hotel location
    #[serde(default)]
    pub location: String,
    /// Room types offered by the hotel
    #[serde(default)]
    pub room_types: Vec<RoomTypeConfig>,
}

/// Configuration for a single room type
#[derive(Debug, Deserialize, Clone)]
pub struct RoomTypeConfig {
    /// Room type name
    pub name: String,
    /// Base nightly rate
    pub base_rate: Money,
    /// Initial ledger entries
    #[serde(default)]
    pub adjustments: Vec<AdjustmentConfig>,
}

/// Configuration for an initial rate adjustment
#[derive(Debug, Deserialize, Clone)]
pub struct AdjustmentConfig {
    /// Signed delta
    pub amount: Money,
    /// First date on which the delta counts (`YYYY-MM-DD`)
    pub effective_date: NaiveDate,
    /// Audit annotation
    pub reason: String,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Hotels inserted by this run
    pub hotels_created: usize,
    /// Hotels already present and skipped
    pub hotels_skipped: usize,
    /// Room types inserted by this run
    pub room_types_created: usize,
    /// Adjustments appended by this run
    pub adjustments_created: usize,
}

/// Loads the catalog configuration from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML for
/// [`CatalogConfig`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path = path.as_ref();
    debug!(?path, "Loading catalog configuration");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    parse_config(&contents)
}

/// Parses catalog configuration from TOML text
pub fn parse_config(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Inserts every configured hotel that does not exist yet.
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for hotel_config in &config.hotels {
        if hotel::get_hotel_by_name(db, hotel_config.name.trim())
            .await?
            .is_some()
        {
            debug!(hotel = %hotel_config.name, "Hotel already present, skipping");
            summary.hotels_skipped += 1;
            continue;
        }

        // Counted separately so a rolled-back hotel does not inflate the summary
        let mut room_types_created = 0;
        let mut adjustments_created = 0;

        let txn = db.begin().await?;
        let created =
            hotel::create_hotel(&txn, &hotel_config.name, &hotel_config.location).await?;

        for room_type_config in &hotel_config.room_types {
            let room_type = room_type::create_room_type(
                &txn,
                created.id,
                &room_type_config.name,
                room_type_config.base_rate,
            )
            .await?;
            room_types_created += 1;

            for adjustment in &room_type_config.adjustments {
                ledger::append(
                    &txn,
                    room_type.id,
                    adjustment.amount,
                    adjustment.effective_date,
                    &adjustment.reason,
                )
                .await?;
                adjustments_created += 1;
            }
        }
        txn.commit().await?;

        summary.hotels_created += 1;
        summary.room_types_created += room_types_created;
        summary.adjustments_created += adjustments_created;
    }

    info!(
        hotels_created = summary.hotels_created,
        hotels_skipped = summary.hotels_skipped,
        "Catalog seeding finished"
    );
    Ok(summary)
}
