// The room state machine.
//
// A room is **Available** (no occupant, nothing pending), **Reserved** (no
// occupant, at least one pending reservation) or **Occupied**. An occupied
// room may still hold pending reservations for *other* guests.
//
// Every mutating operation runs its `ensure_*` check first and only then
// touches state, so a failed call leaves the room exactly as it was. The same
// checks are exposed to HotelChain for its validation pass.

use crate::error::{ReservationError, Result};
use crate::guest::Guest;
use crate::ids::GuestId;
use crate::reservation::Reservation;
use crate::value_objects::RoomType;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoomState {
    Available,
    Reserved,
    Occupied,
}

// Pending reservation together with the guest who made it
#[derive(Debug, Clone)]
struct Booking {
    guest: Guest,
    reservation: Reservation,
}

#[derive(Debug, Clone)]
struct Occupancy {
    guest: Guest,
    // Set when the stay started from a reservation, empty for walk-ins
    reservation: Option<Reservation>,
}

#[derive(Debug, Clone)]
pub struct Room {
    number: u32,
    room_type: RoomType,
    occupancy: Option<Occupancy>,
    bookings: HashMap<GuestId, Booking>,
}

impl Room {
    pub fn new(number: u32, room_type: RoomType) -> Result<Self> {
        if number == 0 {
            return Err(ReservationError::InvalidArgument(
                "Room number must be positive".to_string(),
            ));
        }
        Ok(Self {
            number,
            room_type,
            occupancy: None,
            bookings: HashMap::new(),
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn room_type(&self) -> &RoomType {
        &self.room_type
    }

    pub fn occupant(&self) -> Option<&Guest> {
        self.occupancy.as_ref().map(|o| &o.guest)
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_some()
    }

    pub fn is_available(&self) -> bool {
        !self.is_occupied() && self.bookings.is_empty()
    }

    pub fn state(&self) -> RoomState {
        if self.is_occupied() {
            RoomState::Occupied
        } else if self.bookings.is_empty() {
            RoomState::Available
        } else {
            RoomState::Reserved
        }
    }

    pub fn reservation_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn has_reservation(&self, guest_id: GuestId) -> bool {
        self.bookings.contains_key(&guest_id)
    }

    pub fn reservation_for(&self, guest_id: GuestId) -> Option<&Reservation> {
        self.bookings.get(&guest_id).map(|b| &b.reservation)
    }

    pub fn pending_guests(&self) -> impl Iterator<Item = &Guest> {
        self.bookings.values().map(|b| &b.guest)
    }

    /// Id of the guest whose stay started through [`Room::check_in_guest`].
    /// Walk-ins placed with [`Room::set_occupant`] leave this empty.
    pub fn checked_in_guest(&self) -> Option<GuestId> {
        self.occupancy
            .as_ref()
            .filter(|o| o.reservation.is_some())
            .map(|o| o.guest.id())
    }

    pub fn ensure_not_occupied(&self) -> Result<()> {
        match self.occupant() {
            Some(guest) => Err(ReservationError::InvalidState(format!(
                "Room {} is occupied by {}",
                self.number, guest
            ))),
            None => Ok(()),
        }
    }

    pub fn ensure_reservation(&self, guest_id: GuestId) -> Result<()> {
        if self.bookings.contains_key(&guest_id) {
            Ok(())
        } else {
            Err(ReservationError::NotFound(format!(
                "No reservation for guest {} in room {}",
                guest_id, self.number
            )))
        }
    }

    pub fn ensure_can_check_in(&self, guest_id: GuestId) -> Result<()> {
        self.ensure_not_occupied()?;
        self.ensure_reservation(guest_id)
    }

    pub fn ensure_can_check_out(&self, guest_id: GuestId) -> Result<()> {
        let occupant = self.occupant().ok_or_else(|| {
            ReservationError::InvalidState(format!(
                "Room {} has no occupant to check out",
                self.number
            ))
        })?;
        if occupant.id() != guest_id {
            return Err(ReservationError::IdentityMismatch {
                expected: occupant.id(),
                actual: guest_id,
            });
        }
        Ok(())
    }

    /// Holds the room for `guest`. A second reservation by the same guest
    /// replaces the first.
    pub fn add_reservation(&mut self, reservation: Reservation, guest: Guest) -> Result<()> {
        self.ensure_not_occupied()?;

        let guest_id = guest.id();
        let replaced = self
            .bookings
            .insert(guest_id, Booking { guest, reservation })
            .is_some();
        if replaced {
            debug!(room = self.number, %guest_id, "Replaced existing reservation");
        }
        info!(room = self.number, %guest_id, nights = reservation.nights(), "Reservation added");
        Ok(())
    }

    pub fn remove_reservation(&mut self, guest_id: GuestId) -> Result<Reservation> {
        self.ensure_reservation(guest_id)?;

        let booking = self.bookings.remove(&guest_id).ok_or_else(|| {
            ReservationError::NotFound(format!("No reservation for guest {}", guest_id))
        })?;
        info!(room = self.number, %guest_id, "Reservation removed");
        Ok(booking.reservation)
    }

    /// Moves the guest's reservation into occupancy in one step.
    pub fn check_in_guest(&mut self, guest_id: GuestId) -> Result<()> {
        self.ensure_can_check_in(guest_id)?;

        let booking = self.bookings.remove(&guest_id).ok_or_else(|| {
            ReservationError::NotFound(format!("No reservation for guest {}", guest_id))
        })?;
        info!(room = self.number, %guest_id, guest = %booking.guest, "Guest checked in");
        self.occupancy = Some(Occupancy {
            guest: booking.guest,
            reservation: Some(booking.reservation),
        });
        Ok(())
    }

    /// Places a guest in the room without consuming a reservation.
    /// Never overwrites an existing occupant.
    pub fn set_occupant(&mut self, guest: Guest) -> Result<()> {
        self.ensure_not_occupied()?;

        info!(room = self.number, guest_id = %guest.id(), "Occupant set");
        self.occupancy = Some(Occupancy {
            guest,
            reservation: None,
        });
        Ok(())
    }

    pub fn check_out_guest(&mut self, guest_id: GuestId) -> Result<Guest> {
        self.ensure_can_check_out(guest_id)?;

        let occupancy = self.occupancy.take().ok_or_else(|| {
            ReservationError::InvalidState(format!("Room {} has no occupant", self.number))
        })?;
        self.bookings.remove(&guest_id);
        info!(room = self.number, %guest_id, state = ?self.state(), "Guest checked out");
        Ok(occupancy.guest)
    }
}
