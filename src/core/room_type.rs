//! Room type business logic - Creation, lookup, updates and the resolved read view.
//!
//! A room type stores only its base rate. Whenever a room type is presented to a caller
//! the effective rate is resolved on the spot from its ledger snapshot, so there is no
//! cached value that could drift from the adjustments.

use crate::{
    core::{
        ledger::{self, AdjustmentView},
        money::Money,
        resolver, validation,
    },
    entities::{Hotel, RateAdjustment, RoomType, rate_adjustment, room_type},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Room type as shown to callers, with its effective rate resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomTypeView {
    /// Room type ID
    pub id: i64,
    /// Owning hotel ID
    pub hotel_id: i64,
    /// Display name
    pub name: String,
    /// Stored base rate
    pub base_rate: Money,
    /// Base rate plus every adjustment effective on `reference_date`
    pub effective_rate: Money,
    /// Date the effective rate was resolved for
    pub reference_date: NaiveDate,
    /// Full ledger in audit order, future-dated entries included
    pub adjustments: Vec<AdjustmentView>,
}

/// Optional changes for [`update_room_type`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct RoomTypeUpdate {
    /// New display name
    pub name: Option<String>,
    /// New base rate
    pub base_rate: Option<Money>,
}

/// Creates a room type under an existing hotel.
///
/// The name is trimmed and must not be empty; the base rate must not be negative.
#[instrument(skip(db))]
pub async fn create_room_type<C>(
    db: &C,
    hotel_id: i64,
    name: &str,
    base_rate: Money,
) -> Result<room_type::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let name = validation::require_text("room type name", name)?;
    let base_rate = validation::require_non_negative("base rate", base_rate)?;

    let txn = db.begin().await?;

    Hotel::find_by_id(hotel_id)
        .one(&txn)
        .await?
        .ok_or(Error::HotelNotFound { id: hotel_id })?;

    let room_type = room_type::ActiveModel {
        hotel_id: Set(hotel_id),
        name: Set(name),
        base_rate_cents: Set(base_rate.cents()),
        ..Default::default()
    };

    let created = room_type.insert(&txn).await?;
    txn.commit().await?;

    info!(room_type_id = created.id, hotel_id, "Room type created");
    Ok(created)
}

/// Finds a room type by ID.
pub async fn get_room_type_by_id(
    db: &DatabaseConnection,
    room_type_id: i64,
) -> Result<Option<room_type::Model>> {
    RoomType::find_by_id(room_type_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the room types of a hotel in creation order.
pub async fn list_room_types_for_hotel(
    db: &DatabaseConnection,
    hotel_id: i64,
) -> Result<Vec<room_type::Model>> {
    RoomType::find()
        .filter(room_type::Column::HotelId.eq(hotel_id))
        .order_by_asc(room_type::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Renames a room type and/or changes its base rate.
///
/// The ledger is untouched; the effective rate follows automatically on the next read.
#[instrument(skip(db))]
pub async fn update_room_type(
    db: &DatabaseConnection,
    room_type_id: i64,
    update: RoomTypeUpdate,
) -> Result<room_type::Model> {
    let name = update
        .name
        .as_deref()
        .map(|name| validation::require_text("room type name", name))
        .transpose()?;
    let base_rate = update
        .base_rate
        .map(|rate| validation::require_non_negative("base rate", rate))
        .transpose()?;

    let existing = get_room_type_by_id(db, room_type_id)
        .await?
        .ok_or(Error::RoomTypeNotFound { id: room_type_id })?;

    let mut active: room_type::ActiveModel = existing.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(base_rate) = base_rate {
        active.base_rate_cents = Set(base_rate.cents());
    }

    let updated = active.update(db).await?;
    info!(room_type_id, "Room type updated");
    Ok(updated)
}

/// Deletes a room type together with its whole ledger, atomically.
#[instrument(skip(db))]
pub async fn delete_room_type(db: &DatabaseConnection, room_type_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let room_type = RoomType::find_by_id(room_type_id)
        .one(&txn)
        .await?
        .ok_or(Error::RoomTypeNotFound { id: room_type_id })?;

    let removed = RateAdjustment::delete_many()
        .filter(rate_adjustment::Column::RoomTypeId.eq(room_type_id))
        .exec(&txn)
        .await?;
    room_type.delete(&txn).await?;

    txn.commit().await?;
    info!(
        room_type_id,
        adjustments_removed = removed.rows_affected,
        "Room type deleted"
    );
    Ok(())
}

/// Assembles the read view from a room type and its ledger.
///
/// Pure; `adjustments` may be in any order.
pub fn build_view(
    room_type: room_type::Model,
    mut adjustments: Vec<rate_adjustment::Model>,
    reference_date: NaiveDate,
) -> Result<RoomTypeView> {
    let base_rate = Money::from_cents(room_type.base_rate_cents);
    let effective_rate = resolver::resolve(base_rate, &adjustments, reference_date)?;

    adjustments.sort_by(ledger::audit_order);

    Ok(RoomTypeView {
        id: room_type.id,
        hotel_id: room_type.hotel_id,
        name: room_type.name,
        base_rate,
        effective_rate,
        reference_date,
        adjustments: adjustments.into_iter().map(AdjustmentView::from).collect(),
    })
}

/// Loads a room type and resolves its effective rate at `reference_date` (today if `None`).
pub async fn room_type_view(
    db: &DatabaseConnection,
    room_type_id: i64,
    reference_date: Option<NaiveDate>,
) -> Result<RoomTypeView> {
    let room_type = get_room_type_by_id(db, room_type_id)
        .await?
        .ok_or(Error::RoomTypeNotFound { id: room_type_id })?;
    let adjustments = ledger::snapshot(db, room_type_id).await?;

    build_view(
        room_type,
        adjustments,
        reference_date.unwrap_or_else(resolver::today),
    )
}

/// Resolves the effective rate of a stored room type at `reference_date`.
pub async fn effective_rate(
    db: &DatabaseConnection,
    room_type_id: i64,
    reference_date: NaiveDate,
) -> Result<Money> {
    let room_type = get_room_type_by_id(db, room_type_id)
        .await?
        .ok_or(Error::RoomTypeNotFound { id: room_type_id })?;
    let adjustments = ledger::snapshot(db, room_type_id).await?;

    resolver::resolve(
        Money::from_cents(room_type.base_rate_cents),
        &adjustments,
        reference_date,
    )
}

/// Reconstructs the price history of a stored room type.
pub async fn rate_timeline(
    db: &DatabaseConnection,
    room_type_id: i64,
) -> Result<Vec<resolver::RatePoint>> {
    let room_type = get_room_type_by_id(db, room_type_id)
        .await?
        .ok_or(Error::RoomTypeNotFound { id: room_type_id })?;
    let adjustments = ledger::snapshot(db, room_type_id).await?;

    resolver::rate_timeline(Money::from_cents(room_type.base_rate_cents), &adjustments)
}
