//! Identifier newtypes shared across the simulation.

use std::fmt;

/// Simulation minutes. The clock advances by exactly one per step.
pub type Ticks = u64;

/// Cargo weight in tonnes.
pub type Tonnes = u32;

/// A ship's IMO number: exactly seven digits, no leading zero.
///
/// The shape is enforced at construction, so holding an `ImoNumber` is proof
/// the identifier is well-formed. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImoNumber(u64);

impl ImoNumber {
    /// Validate and wrap a raw IMO number.
    pub fn new(raw: u64) -> Result<Self, InvalidImoNumber> {
        if (1_000_000..=9_999_999).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidImoNumber(raw))
        }
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImoNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a raw value is not a seven-digit IMO number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("IMO number must be exactly 7 digits with no leading zero: {0}")]
pub struct InvalidImoNumber(pub u64);

/// Identifies a piece of cargo. Unique for the lifetime of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CargoId(pub u32);

impl fmt::Display for CargoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a quay within a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuayId(pub u32);

impl fmt::Display for QuayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_digit_imo_accepted() {
        let imo = ImoNumber::new(1234567).unwrap();
        assert_eq!(imo.get(), 1234567);
    }

    #[test]
    fn boundary_imo_values() {
        assert!(ImoNumber::new(1_000_000).is_ok());
        assert!(ImoNumber::new(9_999_999).is_ok());
    }

    #[test]
    fn short_imo_rejected() {
        assert_eq!(ImoNumber::new(123456), Err(InvalidImoNumber(123456)));
    }

    #[test]
    fn long_imo_rejected() {
        assert!(ImoNumber::new(12345678).is_err());
    }

    #[test]
    fn zero_imo_rejected() {
        assert!(ImoNumber::new(0).is_err());
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(CargoId(0), "grain");
        map.insert(CargoId(1), "reefer");
        assert_eq!(map[&CargoId(0)], "grain");
    }
}
