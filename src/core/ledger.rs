//! Adjustment ledger - Append-only storage of rate adjustments per room type.
//!
//! The ledger only ever inserts into the `rate_adjustments` table; it never updates or
//! deletes an entry. Rows disappear only when the catalog services in
//! [`crate::core::room_type`] and [`crate::core::hotel`] delete the owning room type.
//! Each append validates its input up front, then checks the room type and inserts the row
//! inside a single database transaction, so a failed append leaves nothing behind and a
//! successful one is visible to every later read. Two read orders are offered: audit order
//! for history display and effective order for feeding the resolver.

use crate::{
    core::{money::Money, validation},
    entities::{RateAdjustment, RoomType, rate_adjustment},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// Boundary shape of a ledger entry, with the amount as a decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentView {
    /// Adjustment ID
    pub id: i64,
    /// Signed delta
    pub adjustment_amount: Money,
    /// First date on which the delta counts
    pub effective_date: NaiveDate,
    /// Audit annotation
    pub reason: String,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

impl From<rate_adjustment::Model> for AdjustmentView {
    fn from(model: rate_adjustment::Model) -> Self {
        Self {
            id: model.id,
            adjustment_amount: Money::from_cents(model.amount_cents),
            effective_date: model.effective_date,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}

/// Appends an adjustment to a room type's ledger and returns the stored record.
///
/// The reason is trimmed before storage; `created_at` is the insertion time. `db` may be a
/// connection or an open transaction, in which case the append joins it as a savepoint.
///
/// # Errors
/// * [`Error::Validation`] if the reason is empty after trimming
/// * [`Error::RoomTypeNotFound`] if `room_type_id` names no room type
/// * [`Error::Database`] if the write could not be committed
#[instrument(skip(db, reason))]
pub async fn append<C>(
    db: &C,
    room_type_id: i64,
    amount: Money,
    effective_date: NaiveDate,
    reason: &str,
) -> Result<rate_adjustment::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let reason = validation::require_text("reason", reason)?;

    let txn = db.begin().await?;

    RoomType::find_by_id(room_type_id)
        .one(&txn)
        .await?
        .ok_or(Error::RoomTypeNotFound { id: room_type_id })?;

    let adjustment = rate_adjustment::ActiveModel {
        room_type_id: Set(room_type_id),
        amount_cents: Set(amount.cents()),
        effective_date: Set(effective_date),
        reason: Set(reason),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let stored = adjustment.insert(&txn).await?;
    txn.commit().await?;

    info!(
        adjustment_id = stored.id,
        room_type_id,
        %effective_date,
        "Rate adjustment recorded"
    );
    Ok(stored)
}

/// Appends an adjustment from unparsed boundary input.
///
/// `amount` is a decimal string such as `"-12.50"`; `effective_date` is an ISO-8601
/// calendar date. Parsing failures are reported as [`Error::Validation`] before any
/// database access.
pub async fn append_raw(
    db: &DatabaseConnection,
    room_type_id: i64,
    amount: &str,
    effective_date: &str,
    reason: &str,
) -> Result<rate_adjustment::Model> {
    let amount: Money = amount.parse()?;
    let effective_date = validation::parse_date(effective_date)?;
    append(db, room_type_id, amount, effective_date, reason).await
}

/// Returns every adjustment for a room type in audit order (oldest recording first).
///
/// An unknown room type or an empty ledger both yield an empty list.
#[instrument(skip(db))]
pub async fn history(
    db: &DatabaseConnection,
    room_type_id: i64,
) -> Result<Vec<rate_adjustment::Model>> {
    let entries = RateAdjustment::find()
        .filter(rate_adjustment::Column::RoomTypeId.eq(room_type_id))
        .order_by_asc(rate_adjustment::Column::CreatedAt)
        .order_by_asc(rate_adjustment::Column::Id)
        .all(db)
        .await?;
    debug!(count = entries.len(), "Loaded adjustment history");
    Ok(entries)
}

/// Returns every adjustment for a room type in effective order, ready for the resolver.
pub async fn snapshot<C>(db: &C, room_type_id: i64) -> Result<Vec<rate_adjustment::Model>>
where
    C: ConnectionTrait,
{
    RateAdjustment::find()
        .filter(rate_adjustment::Column::RoomTypeId.eq(room_type_id))
        .order_by_asc(rate_adjustment::Column::EffectiveDate)
        .order_by_asc(rate_adjustment::Column::CreatedAt)
        .order_by_asc(rate_adjustment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Audit order: recording time, then insertion sequence.
#[must_use]
pub fn audit_order(a: &rate_adjustment::Model, b: &rate_adjustment::Model) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Looks up a single adjustment by ID.
pub async fn get_adjustment_by_id(
    db: &DatabaseConnection,
    adjustment_id: i64,
) -> Result<Option<rate_adjustment::Model>> {
    RateAdjustment::find_by_id(adjustment_id)
        .one(db)
        .await
        .map_err(Into::into)
}
