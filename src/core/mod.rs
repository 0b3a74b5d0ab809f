/// Hotel catalog operations
pub mod hotel;
/// Append-only adjustment ledger
pub mod ledger;
/// Fixed-point money type
pub mod money;
/// Pure effective-rate resolution
pub mod resolver;
/// Room type operations and the resolved read view
pub mod room_type;
/// Shared input validation
pub mod validation;

pub use money::Money;
