//! Room type entity - A sellable class of room within a hotel.
//!
//! Only the `base_rate_cents` is stored. The effective rate is never persisted; it is
//! resolved from the base rate and the `rate_adjustments` ledger whenever it is read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_types")]
pub struct Model {
    /// Unique identifier for the room type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning hotel
    pub hotel_id: i64,
    /// Display name (e.g., "Deluxe Room")
    pub name: String,
    /// Base nightly rate in minor units (cents), never negative
    pub base_rate_cents: i64,
}

/// Defines relationships between `RoomType` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each room type belongs to one hotel
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id",
        on_delete = "Cascade"
    )]
    Hotel,
    /// One room type has many rate adjustments
    #[sea_orm(has_many = "super::rate_adjustment::Entity")]
    RateAdjustments,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl Related<super::rate_adjustment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RateAdjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
