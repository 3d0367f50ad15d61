//! Scheduled movements across the port boundary.
//!
//! A movement is immutable once constructed: it fires at its action time,
//! is consumed exactly once, and carries either one ship or a non-empty
//! batch of cargo in a fixed direction.

use crate::id::{CargoId, ImoNumber, Ticks};

/// Which way a movement crosses the port boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementDirection {
    Inbound,
    Outbound,
}

impl MovementDirection {
    /// The canonical snapshot spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
        }
    }

    /// Parse the canonical snapshot spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INBOUND" => Some(Self::Inbound),
            "OUTBOUND" => Some(Self::Outbound),
            _ => None,
        }
    }
}

/// What a movement transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementPayload {
    /// One ship arriving at or departing from the port.
    Ship(ImoNumber),
    /// A non-empty batch of cargo delivered to or collected from the
    /// warehouse.
    Cargo(Vec<CargoId>),
}

/// A scheduled, time-stamped event moving a ship or cargo across the port
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    time: Ticks,
    direction: MovementDirection,
    payload: MovementPayload,
}

impl Movement {
    /// A ship movement at the given action time.
    pub fn ship(time: Ticks, direction: MovementDirection, imo: ImoNumber) -> Self {
        Self {
            time,
            direction,
            payload: MovementPayload::Ship(imo),
        }
    }

    /// A cargo movement at the given action time. The batch must be
    /// non-empty.
    pub fn cargo(time: Ticks, direction: MovementDirection, ids: Vec<CargoId>) -> Self {
        assert!(!ids.is_empty(), "a cargo movement must carry cargo");
        Self {
            time,
            direction,
            payload: MovementPayload::Cargo(ids),
        }
    }

    /// The simulation minute at which this movement fires.
    pub fn time(&self) -> Ticks {
        self.time
    }

    pub fn direction(&self) -> MovementDirection {
        self.direction
    }

    pub fn payload(&self) -> &MovementPayload {
        &self.payload
    }
}
