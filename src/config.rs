// Reservation policy for a hotel chain
// Limits are checked during a chain's validation pass, before any room is touched

use crate::error::{ReservationError, Result};
use crate::reservation::Reservation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    pub max_nights: Option<u32>,
    pub max_guests_per_reservation: Option<u32>,
    pub allow_walk_ins: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_nights: None,
            max_guests_per_reservation: None,
            allow_walk_ins: true,
        }
    }
}

impl ChainConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChainConfig = serde_json::from_str(json)
            .map_err(|e| ReservationError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_nights == Some(0) {
            return Err(ReservationError::ConfigError(
                "max_nights must be at least 1".to_string(),
            ));
        }
        if self.max_guests_per_reservation == Some(0) {
            return Err(ReservationError::ConfigError(
                "max_guests_per_reservation must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn check_reservation(&self, reservation: &Reservation) -> Result<()> {
        if let Some(max) = self.max_nights {
            if reservation.nights() > i64::from(max) {
                return Err(ReservationError::InvalidArgument(format!(
                    "Stay of {} nights exceeds the limit of {}",
                    reservation.nights(),
                    max
                )));
            }
        }
        if let Some(max) = self.max_guests_per_reservation {
            if reservation.guests().get() > max {
                return Err(ReservationError::InvalidArgument(format!(
                    "Party of {} exceeds the limit of {} guests",
                    reservation.guests(),
                    max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::HowMany;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn reservation(nights: i64, guests: u32) -> Reservation {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        Reservation::new(
            start,
            start + chrono::Duration::days(nights),
            HowMany::new(guests).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_has_no_limits() {
        let config = ChainConfig::default();
        assert!(config.allow_walk_ins);
        assert!(config.check_reservation(&reservation(365, 40)).is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = ChainConfig::from_json(r#"{ "max_nights": 14 }"#).unwrap();
        assert_eq!(config.max_nights, Some(14));
        assert_eq!(config.max_guests_per_reservation, None);
        assert!(config.allow_walk_ins);
    }

    #[test_case(r#"{ "max_nights": 0 }"#; "zero nights")]
    #[test_case(r#"{ "max_guests_per_reservation": 0 }"#; "zero guests")]
    #[test_case(r#"{ "max_nights": "many" }"#; "wrong type")]
    #[test_case(r#"{ "max_stay": 3 }"#; "unknown field")]
    #[test_case("not json"; "malformed")]
    fn test_from_json_rejects(json: &str) {
        assert!(matches!(
            ChainConfig::from_json(json),
            Err(ReservationError::ConfigError(_))
        ));
    }

    #[test_case(7, 2, true; "within limits")]
    #[test_case(8, 2, false; "too many nights")]
    #[test_case(7, 5, false; "party too large")]
    fn test_check_reservation(nights: i64, guests: u32, accepted: bool) {
        let config = ChainConfig {
            max_nights: Some(7),
            max_guests_per_reservation: Some(4),
            allow_walk_ins: true,
        };
        let result = config.check_reservation(&reservation(nights, guests));
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(matches!(result, Err(ReservationError::InvalidArgument(_))));
        }
    }
}
