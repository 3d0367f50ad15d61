//! Cargo entities: bulk loads and shipping containers.

use crate::id::{CargoId, Tonnes};

// ---------------------------------------------------------------------------
// Cargo varieties
// ---------------------------------------------------------------------------

/// The commodity carried by a bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkCargoType {
    Grain,
    Minerals,
    Coal,
    Oil,
    Other,
}

impl BulkCargoType {
    /// The canonical snapshot spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grain => "GRAIN",
            Self::Minerals => "MINERALS",
            Self::Coal => "COAL",
            Self::Oil => "OIL",
            Self::Other => "OTHER",
        }
    }

    /// Parse the canonical snapshot spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GRAIN" => Some(Self::Grain),
            "MINERALS" => Some(Self::Minerals),
            "COAL" => Some(Self::Coal),
            "OIL" => Some(Self::Oil),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// The construction style of a shipping container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    Standard,
    OpenTop,
    Reefer,
    Tanker,
    Other,
}

impl ContainerType {
    /// The canonical snapshot spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::OpenTop => "OPEN_TOP",
            Self::Reefer => "REEFER",
            Self::Tanker => "TANKER",
            Self::Other => "OTHER",
        }
    }

    /// Parse the canonical snapshot spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STANDARD" => Some(Self::Standard),
            "OPEN_TOP" => Some(Self::OpenTop),
            "REEFER" => Some(Self::Reefer),
            "TANKER" => Some(Self::Tanker),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cargo
// ---------------------------------------------------------------------------

/// What a piece of cargo physically is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CargoKind {
    /// A loose bulk load measured in tonnes.
    Bulk {
        tonnage: Tonnes,
        variety: BulkCargoType,
    },
    /// A single shipping container.
    Container { variety: ContainerType },
}

/// A piece of cargo moving through the port, bound for a destination country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cargo {
    id: CargoId,
    destination: String,
    kind: CargoKind,
}

impl Cargo {
    /// Create a bulk load.
    pub fn bulk(id: CargoId, destination: &str, tonnage: Tonnes, variety: BulkCargoType) -> Self {
        Self {
            id,
            destination: destination.to_string(),
            kind: CargoKind::Bulk { tonnage, variety },
        }
    }

    /// Create a shipping container.
    pub fn container(id: CargoId, destination: &str, variety: ContainerType) -> Self {
        Self {
            id,
            destination: destination.to_string(),
            kind: CargoKind::Container { variety },
        }
    }

    pub fn id(&self) -> CargoId {
        self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn kind(&self) -> &CargoKind {
        &self.kind
    }

    /// Weight in tonnes, for bulk loads only.
    pub fn tonnage(&self) -> Option<Tonnes> {
        match self.kind {
            CargoKind::Bulk { tonnage, .. } => Some(tonnage),
            CargoKind::Container { .. } => None,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self.kind, CargoKind::Bulk { .. })
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, CargoKind::Container { .. })
    }
}
