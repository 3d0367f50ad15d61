//! Identity stores for ships and cargo.
//!
//! Every entity registers here exactly once; all cross-references elsewhere
//! in the simulation (queue entries, berths, warehouse contents, movement
//! payloads) are bare ids resolved through these stores at the point of use.
//! Registration order is preserved and is the canonical order for snapshots,
//! so iteration is deterministic without any ordered-map machinery.
//!
//! The stores are plain owned values with no global state; test isolation is
//! a fresh store (or [`ShipRegistry::clear`] / [`CargoRegistry::clear`]).

use crate::cargo::Cargo;
use crate::id::{CargoId, ImoNumber};
use crate::ship::Ship;
use std::collections::HashMap;

/// Raised when an entity is registered under a key already in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("a ship is already registered with IMO number {0}")]
    DuplicateShip(ImoNumber),
    #[error("a piece of cargo is already registered with id {0}")]
    DuplicateCargo(CargoId),
}

// ---------------------------------------------------------------------------
// ShipRegistry
// ---------------------------------------------------------------------------

/// All ships active in one simulation, keyed by IMO number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShipRegistry {
    ships: Vec<Ship>,
    index: HashMap<ImoNumber, usize>,
}

impl ShipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ship, rejecting a duplicate IMO number.
    pub fn register(&mut self, ship: Ship) -> Result<ImoNumber, RegistryError> {
        let imo = ship.imo();
        if self.index.contains_key(&imo) {
            return Err(RegistryError::DuplicateShip(imo));
        }
        self.index.insert(imo, self.ships.len());
        self.ships.push(ship);
        Ok(imo)
    }

    pub fn contains(&self, imo: ImoNumber) -> bool {
        self.index.contains_key(&imo)
    }

    pub fn get(&self, imo: ImoNumber) -> Option<&Ship> {
        self.index.get(&imo).map(|&i| &self.ships[i])
    }

    pub fn get_mut(&mut self, imo: ImoNumber) -> Option<&mut Ship> {
        self.index.get(&imo).map(|&i| &mut self.ships[i])
    }

    /// Ships in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Remove every ship. The explicit reset for test isolation.
    pub fn clear(&mut self) {
        self.ships.clear();
        self.index.clear();
    }
}

// ---------------------------------------------------------------------------
// CargoRegistry
// ---------------------------------------------------------------------------

/// All cargo active in one simulation, keyed by cargo id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CargoRegistry {
    cargo: Vec<Cargo>,
    index: HashMap<CargoId, usize>,
}

impl CargoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a piece of cargo, rejecting a duplicate id.
    pub fn register(&mut self, cargo: Cargo) -> Result<CargoId, RegistryError> {
        let id = cargo.id();
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateCargo(id));
        }
        self.index.insert(id, self.cargo.len());
        self.cargo.push(cargo);
        Ok(id)
    }

    pub fn contains(&self, id: CargoId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: CargoId) -> Option<&Cargo> {
        self.index.get(&id).map(|&i| &self.cargo[i])
    }

    /// Cargo in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Cargo> {
        self.cargo.iter()
    }

    pub fn len(&self) -> usize {
        self.cargo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cargo.is_empty()
    }

    /// Remove every piece of cargo. The explicit reset for test isolation.
    pub fn clear(&mut self) {
        self.cargo.clear();
        self.index.clear();
    }
}
