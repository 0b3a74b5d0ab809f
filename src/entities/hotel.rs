//! Hotel entity - A property that owns a set of room types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hotel database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hotels")]
pub struct Model {
    /// Unique identifier for the hotel
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Grand Plaza")
    pub name: String,
    /// Free-form location (e.g., "New York")
    pub location: String,
    /// Operational status, `"active"` unless changed
    pub status: String,
}

/// Defines relationships between Hotel and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One hotel has many room types
    #[sea_orm(has_many = "super::room_type::Entity")]
    RoomTypes,
}

impl Related<super::room_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
