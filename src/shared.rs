// Thread-safe variant of HotelChain for callers that serve many clients.
//
// Hotels and rooms live in DashMaps so lookups and inserts never block the
// whole chain. Each room sits behind its own parking_lot::Mutex; every
// room transition runs its check and its mutation under that one lock, which
// makes the check-then-act sequences of Room atomic per room. No
// operation holds more than one room lock, and a room lock is never held while
// acquiring a map lock.

use crate::chain::HotelChain;
use crate::config::ChainConfig;
use crate::error::{require_text, ReservationError, Result};
use crate::guest::{Guest, ReserverPayer};
use crate::hotel::Hotel;
use crate::ids::{GuestId, HotelId};
use crate::reservation::Reservation;
use crate::room::Room;
use crate::value_objects::Name;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type SharedRoom = Arc<Mutex<Room>>;

#[derive(Debug)]
pub struct SharedHotel {
    id: HotelId,
    name: Name,
    rooms: DashMap<u32, SharedRoom>,
}

impl SharedHotel {
    pub fn new(name: Name) -> Self {
        Self::from(Hotel::new(name))
    }

    pub fn id(&self) -> HotelId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn add_room(&self, room: Room) -> Result<()> {
        let number = room.number();
        match self.rooms.entry(number) {
            Entry::Occupied(_) => Err(ReservationError::AlreadyExists(format!(
                "Room {} already exists in hotel '{}'",
                number, self.name
            ))),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(room)));
                info!(hotel = %self.name, room = number, "Room added");
                Ok(())
            }
        }
    }

    pub fn room(&self, number: u32) -> Option<SharedRoom> {
        self.rooms.get(&number).map(|r| Arc::clone(r.value()))
    }

    fn require_room(&self, number: u32) -> Result<SharedRoom> {
        self.room(number).ok_or_else(|| {
            ReservationError::NotFound(format!(
                "Room {} does not exist in hotel '{}'",
                number, self.name
            ))
        })
    }

    pub fn is_available(&self, number: u32) -> Result<bool> {
        Ok(self.require_room(number)?.lock().is_available())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    // Each room is sampled under its own lock; the total is not a global snapshot
    pub fn available_room_count(&self) -> usize {
        self.rooms
            .iter()
            .filter(|entry| entry.value().lock().is_available())
            .count()
    }

    pub fn pending_reservation_count(&self) -> usize {
        self.rooms
            .iter()
            .map(|entry| entry.value().lock().reservation_count())
            .sum()
    }

    pub fn occupied_room_count(&self) -> usize {
        self.rooms
            .iter()
            .filter(|entry| entry.value().lock().is_occupied())
            .count()
    }
}

impl From<Hotel> for SharedHotel {
    fn from(hotel: Hotel) -> Self {
        let (id, name, rooms) = hotel.into_parts();
        Self {
            id,
            name,
            rooms: rooms
                .into_iter()
                .map(|(number, room)| (number, Arc::new(Mutex::new(room))))
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct SharedHotelChain {
    name: String,
    config: ChainConfig,
    hotels: DashMap<HotelId, Arc<SharedHotel>>,
    // Lower-cased full names, claimed before a hotel is inserted so duplicates lose atomically
    names: DashMap<String, HotelId>,
}

impl SharedHotelChain {
    pub fn new(name: &str, config: ChainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: require_text(name, "Hotel chain name")?,
            config,
            hotels: DashMap::new(),
            names: DashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn add_hotel(&self, hotel: Hotel) -> Result<HotelId> {
        if self.hotels.contains_key(&hotel.id()) {
            return Err(ReservationError::AlreadyExists(format!(
                "Hotel {} is already part of chain '{}'",
                hotel.id(),
                self.name
            )));
        }
        match self.names.entry(hotel.name().full_name_key()) {
            Entry::Occupied(_) => Err(ReservationError::AlreadyExists(format!(
                "Hotel named '{}' already exists in chain '{}'",
                hotel.name(),
                self.name
            ))),
            Entry::Vacant(slot) => {
                let id = hotel.id();
                slot.insert(id);
                info!(chain = %self.name, hotel = %hotel.name(), %id, "Hotel added");
                self.hotels.insert(id, Arc::new(SharedHotel::from(hotel)));
                Ok(id)
            }
        }
    }

    pub fn hotel(&self, id: HotelId) -> Option<Arc<SharedHotel>> {
        self.hotels.get(&id).map(|h| Arc::clone(h.value()))
    }

    pub fn find_hotel(&self, name: &str) -> Option<HotelId> {
        self.names
            .get(&name.trim().to_lowercase())
            .map(|entry| *entry.value())
    }

    pub fn hotel_count(&self) -> usize {
        self.hotels.len()
    }

    pub fn make_reservation(
        &self,
        hotel_id: HotelId,
        room_number: u32,
        guest: &Guest,
        payer: &ReserverPayer,
        reservation: Reservation,
    ) -> Result<()> {
        let room = self.resolve(hotel_id, room_number, |config| {
            config.check_reservation(&reservation)
        })?;
        debug!(guest_id = %guest.id(), %payer, "Payer accepted for reservation");

        let mut room = room.lock();
        room.add_reservation(reservation, guest.clone())
    }

    pub fn cancel_reservation(
        &self,
        hotel_id: HotelId,
        room_number: u32,
        guest_id: GuestId,
    ) -> Result<Reservation> {
        let room = self.resolve(hotel_id, room_number, |_| Ok(()))?;
        let mut room = room.lock();
        room.remove_reservation(guest_id)
    }

    pub fn check_in_guest(
        &self,
        hotel_id: HotelId,
        room_number: u32,
        guest_id: GuestId,
    ) -> Result<()> {
        let room = self.resolve(hotel_id, room_number, |_| Ok(()))?;
        let mut room = room.lock();
        room.check_in_guest(guest_id)
    }

    pub fn check_out_guest(
        &self,
        hotel_id: HotelId,
        room_number: u32,
        guest_id: GuestId,
    ) -> Result<Guest> {
        let room = self.resolve(hotel_id, room_number, |_| Ok(()))?;
        let mut room = room.lock();
        room.check_out_guest(guest_id)
    }

    pub fn walk_in(&self, hotel_id: HotelId, room_number: u32, guest: Guest) -> Result<()> {
        let room = self.resolve(hotel_id, room_number, |config| {
            if config.allow_walk_ins {
                Ok(())
            } else {
                Err(ReservationError::InvalidState(
                    "Walk-ins are disabled for this chain".to_string(),
                ))
            }
        })?;
        let mut room = room.lock();
        room.set_occupant(guest)
    }

    // Validation pass: hotel, room and policy checks happen before any room lock
    fn resolve<F>(&self, hotel_id: HotelId, room_number: u32, check: F) -> Result<SharedRoom>
    where
        F: FnOnce(&ChainConfig) -> Result<()>,
    {
        let result = self
            .hotel(hotel_id)
            .ok_or_else(|| ReservationError::NotFound(format!("Hotel {} does not exist", hotel_id)))
            .and_then(|hotel| hotel.require_room(room_number))
            .and_then(|room| check(&self.config).map(|_| room));
        if let Err(err) = &result {
            warn!(chain = %self.name, %hotel_id, room = room_number, error = %err, "Validation failed");
        }
        result
    }
}

impl From<HotelChain> for SharedHotelChain {
    fn from(chain: HotelChain) -> Self {
        let (name, config, hotels) = chain.into_parts();
        let names = DashMap::new();
        let shared = DashMap::new();
        for (id, hotel) in hotels {
            names.insert(hotel.name().full_name_key(), id);
            shared.insert(id, Arc::new(SharedHotel::from(hotel)));
        }
        Self {
            name,
            config,
            hotels: shared,
            names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{
        Address, CreditCard, HowMany, Identity, Money, RoomKind, RoomType,
    };
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    fn assert_send_sync<T: Send + Sync>() {}

    fn guest(first: &str, last: &str) -> Guest {
        Guest::new(
            Name::new(first, last).unwrap(),
            Address::new("456 Park Avenue", "Lahore", "Pakistan", "54000").unwrap(),
        )
    }

    fn payer() -> ReserverPayer {
        ReserverPayer::new(
            CreditCard::new("5500000000000004", "Fatima Ali", "01/28").unwrap(),
            Identity::new("CN-42", "National ID").unwrap(),
        )
    }

    fn reservation() -> Reservation {
        Reservation::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
            HowMany::new(2).unwrap(),
        )
        .unwrap()
    }

    fn chain_with_rooms(rooms: u32) -> (SharedHotelChain, HotelId) {
        let chain = SharedHotelChain::new("Luxury Hotels International", ChainConfig::default())
            .unwrap();
        let mut hotel = Hotel::new(Name::new("Elite", "Hotel Lahore").unwrap());
        for number in 1..=rooms {
            let cost = Money::new(100.0, "USD").unwrap();
            hotel
                .add_room(Room::new(number, RoomType::new(RoomKind::Double, cost)).unwrap())
                .unwrap();
        }
        let id = chain.add_hotel(hotel).unwrap();
        (chain, id)
    }

    #[test]
    fn test_is_send_and_sync() {
        assert_send_sync::<SharedHotelChain>();
        assert_send_sync::<SharedHotel>();
    }

    #[test]
    fn test_converts_from_hotel_chain() {
        let mut chain = HotelChain::new("Luxury Hotels International").unwrap();
        let mut hotel = Hotel::new(Name::new("Grand", "Hotel Karachi").unwrap());
        let single = RoomType::new(RoomKind::Single, Money::new(50.0, "USD").unwrap());
        hotel.add_room(Room::new(101, single).unwrap()).unwrap();
        let karachi = chain.add_hotel(hotel).unwrap();
        let ahmed = guest("Ahmed", "Khan");
        chain
            .make_reservation(karachi, 101, &ahmed, &payer(), reservation())
            .unwrap();

        let shared = SharedHotelChain::from(chain);
        assert_eq!(shared.hotel_count(), 1);
        assert_eq!(shared.find_hotel("grand hotel karachi"), Some(karachi));
        let hotel = shared.hotel(karachi).unwrap();
        assert_eq!(hotel.available_room_count(), 0);

        shared.check_in_guest(karachi, 101, ahmed.id()).unwrap();
        shared.check_out_guest(karachi, 101, ahmed.id()).unwrap();
        assert!(hotel.is_available(101).unwrap());
    }

    #[test]
    fn test_duplicate_names_and_rooms_rejected() {
        let (chain, id) = chain_with_rooms(2);
        assert!(matches!(
            chain.add_hotel(Hotel::new(Name::new("elite", "HOTEL LAHORE").unwrap())),
            Err(ReservationError::AlreadyExists(_))
        ));

        let hotel = chain.hotel(id).unwrap();
        let suite = RoomType::new(RoomKind::Suite, Money::new(200.0, "USD").unwrap());
        assert!(matches!(
            hotel.add_room(Room::new(1, suite).unwrap()),
            Err(ReservationError::AlreadyExists(_))
        ));
        assert_eq!(hotel.room_count(), 2);
    }

    #[test]
    fn test_unknown_targets_are_not_found() {
        let (chain, id) = chain_with_rooms(1);
        let ahmed = guest("Ahmed", "Khan");
        assert!(matches!(
            chain.make_reservation(HotelId::new(), 1, &ahmed, &payer(), reservation()),
            Err(ReservationError::NotFound(_))
        ));
        assert!(matches!(
            chain.check_in_guest(id, 42, ahmed.id()),
            Err(ReservationError::NotFound(_))
        ));
        assert_eq!(chain.hotel_count(), 1);
    }

    #[test]
    fn test_hotel_names_are_unique_by_full_name() {
        let (chain, lahore) = chain_with_rooms(1);
        assert!(matches!(
            chain.add_hotel(Hotel::new(Name::new("Elite Hotel", "Lahore").unwrap())),
            Err(ReservationError::AlreadyExists(_))
        ));
        assert_eq!(chain.hotel_count(), 1);
        assert_eq!(chain.find_hotel("  ELITE hotel lahore "), Some(lahore));
    }

    #[test]
    fn test_walk_in() {
        let (chain, id) = chain_with_rooms(1);
        let fatima = guest("Fatima", "Ali");
        chain.walk_in(id, 1, fatima.clone()).unwrap();

        let hotel = chain.hotel(id).unwrap();
        assert_eq!(hotel.occupied_room_count(), 1);
        let room = hotel.room(1).unwrap();
        assert_eq!(room.lock().occupant().map(|g| g.id()), Some(fatima.id()));

        assert!(matches!(
            chain.walk_in(id, 1, guest("Ahmed", "Khan")),
            Err(ReservationError::InvalidState(_))
        ));
        assert_eq!(room.lock().occupant().map(|g| g.id()), Some(fatima.id()));
    }

    #[test]
    fn test_walk_in_disabled_by_config() {
        let config = ChainConfig {
            allow_walk_ins: false,
            ..ChainConfig::default()
        };
        let chain = SharedHotelChain::new("Luxury Hotels International", config).unwrap();
        let mut hotel = Hotel::new(Name::new("Elite", "Hotel Lahore").unwrap());
        let double = RoomType::new(RoomKind::Double, Money::new(100.0, "USD").unwrap());
        hotel.add_room(Room::new(1, double).unwrap()).unwrap();
        let id = chain.add_hotel(hotel).unwrap();

        assert!(matches!(
            chain.walk_in(id, 1, guest("Fatima", "Ali")),
            Err(ReservationError::InvalidState(_))
        ));
        let hotel = chain.hotel(id).unwrap();
        assert!(hotel.is_available(1).unwrap());
        assert_eq!(hotel.occupied_room_count(), 0);
    }

    #[test]
    fn test_concurrent_hotel_registration_keeps_names_unique() {
        let chain = Arc::new(
            SharedHotelChain::new("Luxury Hotels International", ChainConfig::default()).unwrap(),
        );
        let barrier = Arc::new(Barrier::new(8));
        let accepted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let chain = Arc::clone(&chain);
                let barrier = Arc::clone(&barrier);
                let accepted = Arc::clone(&accepted);
                thread::spawn(move || {
                    let hotel = Hotel::new(Name::new("Grand", "Hotel Karachi").unwrap());
                    barrier.wait();
                    if chain.add_hotel(hotel).is_ok() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(chain.hotel_count(), 1);
    }

    #[test]
    fn test_racing_check_ins_admit_one_guest() {
        let (chain, id) = chain_with_rooms(1);
        let chain = Arc::new(chain);
        let guests: Vec<Guest> = (0..6).map(|i| guest("Guest", &format!("No{}", i))).collect();
        for g in &guests {
            chain.make_reservation(id, 1, g, &payer(), reservation()).unwrap();
        }

        let barrier = Arc::new(Barrier::new(guests.len()));
        let handles: Vec<_> = guests
            .iter()
            .map(|g| {
                let chain = Arc::clone(&chain);
                let barrier = Arc::clone(&barrier);
                let guest_id = g.id();
                thread::spawn(move || {
                    barrier.wait();
                    chain.check_in_guest(id, 1, guest_id)
                })
            })
            .collect();
        let results: Vec<Result<()>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let admitted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(admitted, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, ReservationError::InvalidState(_))));

        let hotel = chain.hotel(id).unwrap();
        assert_eq!(hotel.occupied_room_count(), 1);
        assert_eq!(hotel.pending_reservation_count(), guests.len() - 1);
    }

    // Mixed lifecycle traffic against a handful of rooms; every thread checks
    // out whatever it checks in, so the books must balance at the end
    #[test]
    fn test_concurrent_lifecycle_with_contention() {
        let (chain, id) = chain_with_rooms(4);
        let chain = Arc::new(chain);
        let threads_count = 8;
        let operations_per_thread = 250;

        let made = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicUsize::new(0));
        let stayed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..threads_count)
            .map(|i| {
                let chain = Arc::clone(&chain);
                let made = Arc::clone(&made);
                let cancelled = Arc::clone(&cancelled);
                let stayed = Arc::clone(&stayed);
                thread::spawn(move || {
                    for j in 0..operations_per_thread {
                        let room = rand::random::<u32>() % 4 + 1;
                        let g = guest("Thread", &format!("T{}-{}", i, j));
                        match chain.make_reservation(id, room, &g, &payer(), reservation()) {
                            Ok(()) => {
                                made.fetch_add(1, Ordering::SeqCst);
                            }
                            Err(ReservationError::InvalidState(_)) => continue,
                            Err(other) => panic!("unexpected reservation error: {}", other),
                        }

                        match rand::random::<u8>() % 3 {
                            0 => {
                                chain.cancel_reservation(id, room, g.id()).unwrap();
                                cancelled.fetch_add(1, Ordering::SeqCst);
                            }
                            1 => {
                                if chain.check_in_guest(id, room, g.id()).is_ok() {
                                    let departed =
                                        chain.check_out_guest(id, room, g.id()).unwrap();
                                    assert_eq!(departed.id(), g.id());
                                    stayed.fetch_add(1, Ordering::SeqCst);
                                }
                            }
                            _ => {}
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let hotel = chain.hotel(id).unwrap();
        assert_eq!(hotel.occupied_room_count(), 0);
        assert_eq!(
            hotel.pending_reservation_count(),
            made.load(Ordering::SeqCst)
                - cancelled.load(Ordering::SeqCst)
                - stayed.load(Ordering::SeqCst)
        );
    }
}
