// A hotel: a named collection of rooms keyed by room number

use crate::error::{ReservationError, Result};
use crate::guest::Guest;
use crate::ids::HotelId;
use crate::reservation::Reservation;
use crate::room::Room;
use crate::value_objects::Name;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Hotel {
    id: HotelId,
    name: Name,
    rooms: HashMap<u32, Room>,
}

impl Hotel {
    pub fn new(name: Name) -> Self {
        Self {
            id: HotelId::new(),
            name,
            rooms: HashMap::new(),
        }
    }

    pub fn id(&self) -> HotelId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    // Room numbers are unique within a hotel
    pub fn add_room(&mut self, room: Room) -> Result<()> {
        let number = room.number();
        if self.rooms.contains_key(&number) {
            return Err(ReservationError::AlreadyExists(format!(
                "Room {} already exists in hotel '{}'",
                number, self.name
            )));
        }
        self.rooms.insert(number, room);
        info!(hotel = %self.name, room = number, "Room added");
        Ok(())
    }

    pub fn room(&self, number: u32) -> Option<&Room> {
        self.rooms.get(&number)
    }

    pub fn require_room(&self, number: u32) -> Result<&Room> {
        self.room(number).ok_or_else(|| missing_room(number, &self.name))
    }

    pub(crate) fn require_room_mut(&mut self, number: u32) -> Result<&mut Room> {
        let name = &self.name;
        self.rooms
            .get_mut(&number)
            .ok_or_else(|| missing_room(number, name))
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn room_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.rooms.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn create_reservation(
        &mut self,
        room_number: u32,
        guest: Guest,
        reservation: Reservation,
    ) -> Result<()> {
        self.require_room_mut(room_number)?
            .add_reservation(reservation, guest)
    }

    pub fn is_available(&self, room_number: u32) -> Result<bool> {
        Ok(self.require_room(room_number)?.is_available())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn available_room_count(&self) -> usize {
        self.rooms.values().filter(|room| room.is_available()).count()
    }

    pub fn occupied_room_count(&self) -> usize {
        self.rooms.values().filter(|room| room.is_occupied()).count()
    }

    pub(crate) fn into_parts(self) -> (HotelId, Name, HashMap<u32, Room>) {
        (self.id, self.name, self.rooms)
    }
}

fn missing_room(number: u32, hotel: &Name) -> ReservationError {
    ReservationError::NotFound(format!(
        "Room {} does not exist in hotel '{}'",
        number, hotel
    ))
}
