//! Quays: the docking points of a port.
//!
//! A quay holds at most one ship and has a type-specific capacity fixed at
//! construction: a tonnage limit for bulk quays, a container-count limit for
//! container quays.

use crate::id::{ImoNumber, QuayId, Tonnes};

/// The handling family and capacity limit of a quay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuayKind {
    /// Handles bulk carriers up to `max_tonnage` tonnes of carried load.
    Bulk { max_tonnage: Tonnes },
    /// Handles container ships carrying up to `max_containers` containers.
    Container { max_containers: u32 },
}

/// A berth where one ship may be moored for unloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quay {
    id: QuayId,
    berth: Option<ImoNumber>,
    kind: QuayKind,
}

impl Quay {
    /// Create a vacant bulk quay.
    pub fn bulk(id: QuayId, max_tonnage: Tonnes) -> Self {
        Self {
            id,
            berth: None,
            kind: QuayKind::Bulk { max_tonnage },
        }
    }

    /// Create a vacant container quay.
    pub fn container(id: QuayId, max_containers: u32) -> Self {
        Self {
            id,
            berth: None,
            kind: QuayKind::Container { max_containers },
        }
    }

    pub fn id(&self) -> QuayId {
        self.id
    }

    pub fn kind(&self) -> &QuayKind {
        &self.kind
    }

    /// The ship currently moored here, if any.
    pub fn berth(&self) -> Option<ImoNumber> {
        self.berth
    }

    pub fn is_vacant(&self) -> bool {
        self.berth.is_none()
    }

    /// Moor the given ship. Replaces any previous occupant; callers check
    /// vacancy and compatibility first.
    pub fn dock(&mut self, imo: ImoNumber) {
        self.berth = Some(imo);
    }

    /// Clear the berth, returning the departing ship if one was moored.
    pub fn release(&mut self) -> Option<ImoNumber> {
        self.berth.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_quay_is_vacant() {
        let quay = Quay::bulk(QuayId(3), 120);
        assert!(quay.is_vacant());
        assert_eq!(quay.berth(), None);
        assert_eq!(quay.kind(), &QuayKind::Bulk { max_tonnage: 120 });
    }

    #[test]
    fn dock_and_release() {
        let imo = ImoNumber::new(1234567).unwrap();
        let mut quay = Quay::container(QuayId(0), 32);
        quay.dock(imo);
        assert!(!quay.is_vacant());
        assert_eq!(quay.berth(), Some(imo));
        assert_eq!(quay.release(), Some(imo));
        assert!(quay.is_vacant());
        assert_eq!(quay.release(), None);
    }
}
