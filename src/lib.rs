// Main library file for the hotel reservation system

// Export modules, leaf types first
pub mod error;
pub mod ids;
pub mod value_objects;
pub mod guest;
pub mod reservation;
pub mod room;
pub mod hotel;
pub mod config;
pub mod chain;
pub mod shared;

// Re-export key types for convenience
pub use chain::HotelChain;
pub use config::ChainConfig;
pub use error::{ReservationError, Result};
pub use guest::{Guest, ReserverPayer};
pub use hotel::Hotel;
pub use ids::{GuestId, HotelId};
pub use reservation::Reservation;
pub use room::{Room, RoomState};
pub use shared::{SharedHotel, SharedHotelChain, SharedRoom};
pub use value_objects::{
    Address, CreditCard, HowMany, Identity, Money, Name, RoomKind, RoomType,
};
