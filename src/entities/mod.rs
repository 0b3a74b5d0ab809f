//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod hotel;
pub mod rate_adjustment;
pub mod room_type;

// Re-export specific types to avoid conflicts
pub use hotel::{Column as HotelColumn, Entity as Hotel, Model as HotelModel};
pub use rate_adjustment::{
    Column as RateAdjustmentColumn, Entity as RateAdjustment, Model as RateAdjustmentModel,
};
pub use room_type::{Column as RoomTypeColumn, Entity as RoomType, Model as RoomTypeModel};
