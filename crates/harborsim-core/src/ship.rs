//! Ships: bulk carriers and container ships.
//!
//! A ship owns its capability checks: whether it fits a quay
//! ([`Ship::can_dock`]) and whether a piece of cargo may come aboard
//! ([`Ship::can_load`]). Both are exhaustive matches over the hold and quay
//! variants, so cross-type combinations are rejected statically rather than
//! by runtime type tests.

use crate::cargo::{Cargo, CargoKind};
use crate::id::{CargoId, ImoNumber, Tonnes};
use crate::quay::{Quay, QuayKind};
use crate::registry::CargoRegistry;

// ---------------------------------------------------------------------------
// Nautical flag
// ---------------------------------------------------------------------------

/// The status flag a ship flies while waiting offshore.
///
/// Drives the dispatch priority of the ship queue: dangerous cargo first,
/// then medical assistance, then ready to dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NauticalFlag {
    /// Carrying dangerous cargo.
    Bravo,
    /// Ready to be docked.
    Hotel,
    /// Requires medical assistance.
    Whiskey,
    /// No particular status.
    November,
}

impl NauticalFlag {
    /// The canonical snapshot spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bravo => "BRAVO",
            Self::Hotel => "HOTEL",
            Self::Whiskey => "WHISKEY",
            Self::November => "NOVEMBER",
        }
    }

    /// Parse the canonical snapshot spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BRAVO" => Some(Self::Bravo),
            "HOTEL" => Some(Self::Hotel),
            "WHISKEY" => Some(Self::Whiskey),
            "NOVEMBER" => Some(Self::November),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Hold
// ---------------------------------------------------------------------------

/// What a ship can carry and what is currently aboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hold {
    /// A single bulk load, at most `capacity` tonnes.
    Bulk {
        capacity: Tonnes,
        cargo: Option<CargoId>,
    },
    /// Up to `capacity` containers, in loading order.
    Container {
        capacity: u32,
        aboard: Vec<CargoId>,
    },
}

// ---------------------------------------------------------------------------
// Ship
// ---------------------------------------------------------------------------

/// A ship whose movement is managed by the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    imo: ImoNumber,
    name: String,
    origin: String,
    flag: NauticalFlag,
    hold: Hold,
}

impl Ship {
    /// Create a bulk carrier with an empty hold.
    pub fn bulk_carrier(
        imo: ImoNumber,
        name: &str,
        origin: &str,
        flag: NauticalFlag,
        capacity: Tonnes,
    ) -> Self {
        Self {
            imo,
            name: name.to_string(),
            origin: origin.to_string(),
            flag,
            hold: Hold::Bulk {
                capacity,
                cargo: None,
            },
        }
    }

    /// Create a container ship with an empty hold.
    pub fn container_ship(
        imo: ImoNumber,
        name: &str,
        origin: &str,
        flag: NauticalFlag,
        capacity: u32,
    ) -> Self {
        Self {
            imo,
            name: name.to_string(),
            origin: origin.to_string(),
            flag,
            hold: Hold::Container {
                capacity,
                aboard: Vec::new(),
            },
        }
    }

    pub fn imo(&self) -> ImoNumber {
        self.imo
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Country of origin; outbound cargo is only loaded when its destination
    /// matches this.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn flag(&self) -> NauticalFlag {
        self.flag
    }

    pub fn hold(&self) -> &Hold {
        &self.hold
    }

    pub fn is_container_ship(&self) -> bool {
        matches!(self.hold, Hold::Container { .. })
    }

    /// Ids of everything currently aboard, in loading order.
    pub fn cargo_aboard(&self) -> Vec<CargoId> {
        match &self.hold {
            Hold::Bulk { cargo, .. } => cargo.iter().copied().collect(),
            Hold::Container { aboard, .. } => aboard.clone(),
        }
    }

    /// Whether this ship may dock at the given quay.
    ///
    /// Bulk carriers need a bulk quay whose tonnage limit covers the load
    /// currently aboard (an empty hold always fits); container ships need a
    /// container quay with room for every container aboard. Cross-type
    /// pairings are never compatible. The carried bulk load's weight is
    /// looked up live in the cargo store, never cached.
    pub fn can_dock(&self, quay: &Quay, cargo: &CargoRegistry) -> bool {
        match (&self.hold, quay.kind()) {
            (Hold::Bulk { cargo: carried, .. }, QuayKind::Bulk { max_tonnage }) => {
                match carried {
                    None => true,
                    Some(id) => cargo
                        .get(*id)
                        .and_then(Cargo::tonnage)
                        .is_some_and(|t| t <= *max_tonnage),
                }
            }
            (Hold::Container { aboard, .. }, QuayKind::Container { max_containers }) => {
                aboard.len() <= *max_containers as usize
            }
            (Hold::Bulk { .. }, QuayKind::Container { .. })
            | (Hold::Container { .. }, QuayKind::Bulk { .. }) => false,
        }
    }

    /// Whether the given cargo may be loaded aboard right now.
    ///
    /// Bulk carriers take a single bulk load within their tonnage capacity;
    /// container ships take containers while below their count capacity. In
    /// both cases the cargo's destination must equal this ship's origin.
    pub fn can_load(&self, cargo: &Cargo) -> bool {
        let kind_fits = match (&self.hold, cargo.kind()) {
            (Hold::Bulk { capacity, cargo: carried }, CargoKind::Bulk { tonnage, .. }) => {
                carried.is_none() && *tonnage <= *capacity
            }
            (Hold::Container { capacity, aboard }, CargoKind::Container { .. }) => {
                aboard.len() < *capacity as usize
            }
            (Hold::Bulk { .. }, CargoKind::Container { .. })
            | (Hold::Container { .. }, CargoKind::Bulk { .. }) => false,
        };
        kind_fits && cargo.destination() == self.origin
    }

    /// Put the cargo with the given id aboard.
    ///
    /// The caller must have checked [`Ship::can_load`] with the matching
    /// cargo first; loading replaces any bulk load already aboard.
    pub fn load(&mut self, id: CargoId) {
        match &mut self.hold {
            Hold::Bulk { cargo, .. } => *cargo = Some(id),
            Hold::Container { aboard, .. } => aboard.push(id),
        }
    }

    /// Empty the hold, returning the ids of everything that was aboard.
    ///
    /// An already-empty hold returns an empty vec; unloading is never an
    /// error.
    pub fn unload(&mut self) -> Vec<CargoId> {
        match &mut self.hold {
            Hold::Bulk { cargo, .. } => cargo.take().into_iter().collect(),
            Hold::Container { aboard, .. } => std::mem::take(aboard),
        }
    }
}
