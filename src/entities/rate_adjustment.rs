//! Rate adjustment entity - One permanent entry in a room type's price ledger.
//!
//! Each row carries a signed `amount_cents` delta, the calendar `effective_date` from which
//! it counts, a required `reason`, and the `created_at` insertion timestamp. Rows are never
//! updated; the autoincrement `id` doubles as the insertion sequence used to break ties.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Rate adjustment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rate_adjustments")]
pub struct Model {
    /// Unique identifier, monotonically increasing in insertion order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the room type whose ledger this entry belongs to
    pub room_type_id: i64,
    /// Signed delta in minor units (positive surcharge, negative discount)
    pub amount_cents: i64,
    /// Calendar date from which the delta applies
    pub effective_date: Date,
    /// Audit annotation explaining the change
    pub reason: String,
    /// When the entry was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `RateAdjustment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each adjustment belongs to one room type
    #[sea_orm(
        belongs_to = "super::room_type::Entity",
        from = "Column::RoomTypeId",
        to = "super::room_type::Column::Id",
        on_delete = "Cascade"
    )]
    RoomType,
}

impl Related<super::room_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
