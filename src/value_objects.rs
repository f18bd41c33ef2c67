// Immutable value objects used across the reservation domain
// All constructors trim their input and reject blanks with InvalidArgument

use crate::error::{require_text, ReservationError, Result};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

// Case folding covers non-ASCII letters too
fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// Person or hotel name; compared case-insensitively
#[derive(Debug, Clone, Serialize)]
pub struct Name {
    first: String,
    last: String,
}

impl Name {
    pub fn new(first: &str, last: &str) -> Result<Self> {
        Ok(Self {
            first: require_text(first, "First name")?,
            last: require_text(last, "Last name")?,
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    // Hotels are unique by this key, so "Grand"/"Hotel X" and "Grand Hotel"/"X" collide
    pub fn full_name_key(&self) -> String {
        self.full_name().to_lowercase()
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        same_text(&self.first, &other.first) && same_text(&self.last, &other.last)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.to_lowercase().hash(state);
        self.last.to_lowercase().hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Address {
    street: String,
    city: String,
    country: String,
    postal_code: String,
}

impl Address {
    pub fn new(street: &str, city: &str, country: &str, postal_code: &str) -> Result<Self> {
        Ok(Self {
            street: require_text(street, "Street")?,
            city: require_text(city, "City")?,
            country: require_text(country, "Country")?,
            postal_code: require_text(postal_code, "Postal code")?,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn complete_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.street, self.city, self.country, self.postal_code
        )
    }

    fn fields(&self) -> [&str; 4] {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.country.as_str(),
            self.postal_code.as_str(),
        ]
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.fields()
            .iter()
            .zip(other.fields().iter())
            .all(|(a, b)| same_text(a, b))
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for field in self.fields() {
            field.to_lowercase().hash(state);
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.complete_address())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Money {
    amount: f64,
    currency: String,
}

impl Money {
    pub fn new(amount: f64, currency: &str) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ReservationError::InvalidArgument(format!(
                "Amount must be a non-negative number, got {}",
                amount
            )));
        }
        // -0.0 and 0.0 must compare equal under bitwise equality
        let amount = if amount == 0.0 { 0.0 } else { amount };
        Ok(Self {
            amount,
            currency: require_text(currency, "Currency")?.to_uppercase(),
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.amount.to_bits() == other.amount.to_bits() && self.currency == other.currency
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.amount.to_bits().hash(state);
        self.currency.hash(state);
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

// Identity document of a paying party
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    number: String,
    kind: String,
}

impl Identity {
    pub fn new(number: &str, kind: &str) -> Result<Self> {
        Ok(Self {
            number: require_text(number, "Identity number")?,
            kind: require_text(kind, "Identity type")?,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && same_text(&self.kind, &other.kind)
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
        self.kind.to_lowercase().hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.number)
    }
}

// The full card number is never rendered by Display
#[derive(Debug, Clone, Serialize)]
pub struct CreditCard {
    #[serde(skip_serializing)]
    number: String,
    holder: String,
    expiry: String,
}

impl CreditCard {
    pub fn new(number: &str, holder: &str, expiry: &str) -> Result<Self> {
        Ok(Self {
            number: require_text(number, "Card number")?,
            holder: require_text(holder, "Cardholder name")?,
            expiry: require_text(expiry, "Expiry date")?,
        })
    }

    pub fn masked_number(&self) -> String {
        let chars: Vec<char> = self.number.chars().collect();
        if chars.len() < 4 {
            return "****".to_string();
        }
        let last_four: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", last_four)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }
}

impl PartialEq for CreditCard {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && same_text(&self.holder, &other.holder)
            && self.expiry == other.expiry
    }
}

impl Eq for CreditCard {}

impl Hash for CreditCard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
        self.holder.to_lowercase().hash(state);
        self.expiry.hash(state);
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.masked_number(), self.holder)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoomKind {
    Single,
    Double,
    Suite,
}

impl RoomKind {
    pub fn description(&self) -> &'static str {
        match self {
            RoomKind::Single => "Single Bed",
            RoomKind::Double => "Double Bed",
            RoomKind::Suite => "Suite",
        }
    }
}

// Kind of room together with its nightly cost
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomType {
    kind: RoomKind,
    cost: Money,
}

impl RoomType {
    pub fn new(kind: RoomKind, cost: Money) -> Self {
        Self { kind, cost }
    }

    pub fn kind(&self) -> RoomKind {
        self.kind
    }

    pub fn cost(&self) -> &Money {
        &self.cost
    }

    pub fn cost_amount(&self) -> f64 {
        self.cost.amount()
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind.description(), self.cost)
    }
}

// A positive head count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HowMany(u32);

impl HowMany {
    pub fn new(number: u32) -> Result<Self> {
        if number == 0 {
            return Err(ReservationError::InvalidArgument(
                "Guest count must be at least 1".to_string(),
            ));
        }
        Ok(Self(number))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HowMany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
