// The two parties of a booking: the guest who stays and the party who pays

use crate::ids::GuestId;
use crate::value_objects::{Address, CreditCard, Identity, Name};
use serde::Serialize;
use std::fmt;

/// The person staying in a room.
///
/// Each guest gets a fresh [`GuestId`] on creation; that id, not the name, is
/// what rooms use to index reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guest {
    id: GuestId,
    name: Name,
    address: Address,
}

impl Guest {
    pub fn new(name: Name, address: Address) -> Self {
        Self {
            id: GuestId::new(),
            name,
            address,
        }
    }

    pub fn id(&self) -> GuestId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn full_name(&self) -> String {
        self.name.full_name()
    }
}

impl fmt::Display for Guest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The party paying for a reservation. May or may not be the guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReserverPayer {
    card: CreditCard,
    identity: Identity,
}

impl ReserverPayer {
    pub fn new(card: CreditCard, identity: Identity) -> Self {
        Self { card, identity }
    }

    pub fn card(&self) -> &CreditCard {
        &self.card
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl fmt::Display for ReserverPayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Card: {}", self.identity, self.card.masked_number())
    }
}
