//! Hotel business logic - Creating, listing, updating and removing hotels.
//!
//! Hotels are plain catalog records. Deleting one removes its room types and their
//! ledgers in the same database transaction.

use crate::{
    core::{
        ledger, resolver,
        room_type::{self, RoomTypeView},
        validation,
    },
    entities::{
        Hotel, RateAdjustment, RoomType, hotel, rate_adjustment,
        room_type as room_type_entity,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Status assigned to newly created hotels.
pub const DEFAULT_STATUS: &str = "active";

/// Hotel as shown to callers, with every room type resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelView {
    /// Hotel ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Location
    pub location: String,
    /// Operational status
    pub status: String,
    /// Room types with their effective rates
    pub room_types: Vec<RoomTypeView>,
}

/// Optional changes for [`update_hotel`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct HotelUpdate {
    /// New display name
    pub name: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New status
    pub status: Option<String>,
}

/// Creates a hotel with the default status.
#[instrument(skip(db))]
pub async fn create_hotel<C>(db: &C, name: &str, location: &str) -> Result<hotel::Model>
where
    C: ConnectionTrait,
{
    let name = validation::require_text("hotel name", name)?;

    let hotel = hotel::ActiveModel {
        name: Set(name),
        location: Set(location.trim().to_string()),
        status: Set(DEFAULT_STATUS.to_string()),
        ..Default::default()
    };

    let created = hotel.insert(db).await?;
    info!(hotel_id = created.id, "Hotel created");
    Ok(created)
}

/// Finds a hotel by ID.
pub async fn get_hotel_by_id(
    db: &DatabaseConnection,
    hotel_id: i64,
) -> Result<Option<hotel::Model>> {
    Hotel::find_by_id(hotel_id).one(db).await.map_err(Into::into)
}

/// Finds a hotel by its exact name.
pub async fn get_hotel_by_name<C>(db: &C, name: &str) -> Result<Option<hotel::Model>>
where
    C: ConnectionTrait,
{
    Hotel::find()
        .filter(hotel::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all hotels alphabetically.
pub async fn list_hotels(db: &DatabaseConnection) -> Result<Vec<hotel::Model>> {
    Hotel::find()
        .order_by_asc(hotel::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a hotel.
#[instrument(skip(db))]
pub async fn update_hotel(
    db: &DatabaseConnection,
    hotel_id: i64,
    update: HotelUpdate,
) -> Result<hotel::Model> {
    let name = update
        .name
        .as_deref()
        .map(|name| validation::require_text("hotel name", name))
        .transpose()?;
    let status = update
        .status
        .as_deref()
        .map(|status| validation::require_text("hotel status", status))
        .transpose()?;

    let existing = get_hotel_by_id(db, hotel_id)
        .await?
        .ok_or(Error::HotelNotFound { id: hotel_id })?;

    let mut active: hotel::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(location) = update.location {
        active.location = Set(location.trim().to_string());
    }
    if let Some(status) = status {
        active.status = Set(status);
    }

    let updated = active.update(db).await?;
    info!(hotel_id, "Hotel updated");
    Ok(updated)
}

/// Deletes a hotel, its room types, and their ledgers in one transaction.
#[instrument(skip(db))]
pub async fn delete_hotel(db: &DatabaseConnection, hotel_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let hotel = Hotel::find_by_id(hotel_id)
        .one(&txn)
        .await?
        .ok_or(Error::HotelNotFound { id: hotel_id })?;

    let room_type_ids: Vec<i64> = RoomType::find()
        .filter(room_type_entity::Column::HotelId.eq(hotel_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|room_type| room_type.id)
        .collect();

    RateAdjustment::delete_many()
        .filter(rate_adjustment::Column::RoomTypeId.is_in(room_type_ids.clone()))
        .exec(&txn)
        .await?;
    RoomType::delete_many()
        .filter(room_type_entity::Column::HotelId.eq(hotel_id))
        .exec(&txn)
        .await?;
    hotel.delete(&txn).await?;

    txn.commit().await?;
    info!(
        hotel_id,
        room_types_removed = room_type_ids.len(),
        "Hotel deleted"
    );
    Ok(())
}

/// Loads a hotel with each room type resolved at `reference_date` (today if `None`).
pub async fn hotel_view(
    db: &DatabaseConnection,
    hotel_id: i64,
    reference_date: Option<NaiveDate>,
) -> Result<HotelView> {
    let hotel = get_hotel_by_id(db, hotel_id)
        .await?
        .ok_or(Error::HotelNotFound { id: hotel_id })?;
    let reference_date = reference_date.unwrap_or_else(resolver::today);

    let mut room_types = Vec::new();
    for room_type in room_type::list_room_types_for_hotel(db, hotel_id).await? {
        let adjustments = ledger::snapshot(db, room_type.id).await?;
        room_types.push(room_type::build_view(room_type, adjustments, reference_date)?);
    }

    Ok(HotelView {
        id: hotel.id,
        name: hotel.name,
        location: hotel.location,
        status: hotel.status,
        room_types,
    })
}
