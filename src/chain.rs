// Entry point for reservation lifecycle operations across a hotel chain.
//
// Every lifecycle call runs in two phases. The validation phase only reads:
// it resolves the hotel and room, applies ChainConfig limits and asks the
// room whether the transition is legal. Only when all of that succeeds is the
// room resolved mutably and a single mutating call delegated to it. A failed
// call therefore never leaves partial changes behind.

use crate::config::ChainConfig;
use crate::error::{require_text, ReservationError, Result};
use crate::guest::{Guest, ReserverPayer};
use crate::hotel::Hotel;
use crate::ids::{GuestId, HotelId};
use crate::reservation::Reservation;
use crate::room::Room;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct HotelChain {
    name: String,
    config: ChainConfig,
    hotels: HashMap<HotelId, Hotel>,
}

impl HotelChain {
    pub fn new(name: &str) -> Result<Self> {
        Self::with_config(name, ChainConfig::default())
    }

    pub fn with_config(name: &str, config: ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: require_text(name, "Hotel chain name")?,
            config,
            hotels: HashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Adds a hotel and returns its id. Hotel full names stay unique within the
    /// chain, compared case-insensitively.
    pub fn add_hotel(&mut self, hotel: Hotel) -> Result<HotelId> {
        let id = hotel.id();
        if self.hotels.contains_key(&id) {
            return Err(ReservationError::AlreadyExists(format!(
                "Hotel {} is already part of chain '{}'",
                id, self.name
            )));
        }
        let key = hotel.name().full_name_key();
        if self.hotels.values().any(|h| h.name().full_name_key() == key) {
            return Err(ReservationError::AlreadyExists(format!(
                "Hotel named '{}' already exists in chain '{}'",
                hotel.name(),
                self.name
            )));
        }
        info!(chain = %self.name, hotel = %hotel.name(), %id, "Hotel added");
        self.hotels.insert(id, hotel);
        Ok(id)
    }

    pub fn hotel(&self, id: HotelId) -> Option<&Hotel> {
        self.hotels.get(&id)
    }

    /// Rooms are added to hotels that already belong to the chain through here.
    pub fn hotel_mut(&mut self, id: HotelId) -> Option<&mut Hotel> {
        self.hotels.get_mut(&id)
    }

    pub fn hotels(&self) -> impl Iterator<Item = &Hotel> {
        self.hotels.values()
    }

    pub fn find_hotel(&self, name: &str) -> Option<HotelId> {
        let key = name.trim().to_lowercase();
        self.hotels
            .values()
            .find(|h| h.name().full_name_key() == key)
            .map(|h| h.id())
    }

    pub fn hotel_count(&self) -> usize {
        self.hotels.len()
    }

    pub fn make_reservation(
        &mut self,
        hotel_id: HotelId,
        room_number: u32,
        guest: &Guest,
        payer: &ReserverPayer,
        reservation: Reservation,
    ) -> Result<()> {
        self.validate(hotel_id, room_number, |config, room| {
            config.check_reservation(&reservation)?;
            room.ensure_not_occupied()
        })?;
        debug!(guest_id = %guest.id(), %payer, "Payer accepted for reservation");

        self.room_mut(hotel_id, room_number)?
            .add_reservation(reservation, guest.clone())
    }

    pub fn cancel_reservation(
        &mut self,
        hotel_id: HotelId,
        room_number: u32,
        guest_id: GuestId,
    ) -> Result<Reservation> {
        self.validate(hotel_id, room_number, |_, room| {
            room.ensure_reservation(guest_id)
        })?;

        self.room_mut(hotel_id, room_number)?
            .remove_reservation(guest_id)
    }

    pub fn check_in_guest(
        &mut self,
        hotel_id: HotelId,
        room_number: u32,
        guest_id: GuestId,
    ) -> Result<()> {
        self.validate(hotel_id, room_number, |_, room| {
            room.ensure_can_check_in(guest_id)
        })?;

        self.room_mut(hotel_id, room_number)?
            .check_in_guest(guest_id)
    }

    pub fn check_out_guest(
        &mut self,
        hotel_id: HotelId,
        room_number: u32,
        guest_id: GuestId,
    ) -> Result<Guest> {
        self.validate(hotel_id, room_number, |_, room| {
            room.ensure_can_check_out(guest_id)
        })?;

        self.room_mut(hotel_id, room_number)?
            .check_out_guest(guest_id)
    }

    /// Occupies a room without a prior reservation.
    pub fn walk_in(&mut self, hotel_id: HotelId, room_number: u32, guest: Guest) -> Result<()> {
        self.validate(hotel_id, room_number, |config, room| {
            if !config.allow_walk_ins {
                return Err(ReservationError::InvalidState(
                    "Walk-ins are disabled for this chain".to_string(),
                ));
            }
            room.ensure_not_occupied()
        })?;

        self.room_mut(hotel_id, room_number)?.set_occupant(guest)
    }

    // Read-only pass: resolves the target and runs `check` against it
    fn validate<F>(&self, hotel_id: HotelId, room_number: u32, check: F) -> Result<()>
    where
        F: FnOnce(&ChainConfig, &Room) -> Result<()>,
    {
        let result = self
            .require_hotel(hotel_id)
            .and_then(|hotel| hotel.require_room(room_number))
            .and_then(|room| check(&self.config, room));
        if let Err(err) = &result {
            warn!(chain = %self.name, %hotel_id, room = room_number, error = %err, "Validation failed");
        }
        result
    }

    fn require_hotel(&self, id: HotelId) -> Result<&Hotel> {
        self.hotels
            .get(&id)
            .ok_or_else(|| ReservationError::NotFound(format!("Hotel {} does not exist", id)))
    }

    fn room_mut(&mut self, hotel_id: HotelId, room_number: u32) -> Result<&mut Room> {
        self.hotels
            .get_mut(&hotel_id)
            .ok_or_else(|| ReservationError::NotFound(format!("Hotel {} does not exist", hotel_id)))?
            .require_room_mut(room_number)
    }

    pub(crate) fn into_parts(self) -> (String, ChainConfig, HashMap<HotelId, Hotel>) {
        (self.name, self.config, self.hotels)
    }
}
