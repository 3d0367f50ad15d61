//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::cargo::{BulkCargoType, Cargo, ContainerType};
use crate::id::{CargoId, ImoNumber, QuayId, Tonnes};
use crate::movement::{Movement, MovementDirection};
use crate::port::Port;
use crate::quay::Quay;
use crate::ship::{NauticalFlag, Ship};

// ===========================================================================
// Identifiers
// ===========================================================================

/// Wrap a raw IMO number known to be valid.
pub fn imo(raw: u64) -> ImoNumber {
    match ImoNumber::new(raw) {
        Ok(imo) => imo,
        Err(err) => panic!("test fixture used a bad IMO number: {err}"),
    }
}

// ===========================================================================
// Entity constructors
// ===========================================================================

pub fn grain(id: u32, destination: &str, tonnage: Tonnes) -> Cargo {
    Cargo::bulk(CargoId(id), destination, tonnage, BulkCargoType::Grain)
}

pub fn reefer(id: u32, destination: &str) -> Cargo {
    Cargo::container(CargoId(id), destination, ContainerType::Reefer)
}

pub fn carrier(raw_imo: u64, name: &str, origin: &str, capacity: Tonnes) -> Ship {
    Ship::bulk_carrier(imo(raw_imo), name, origin, NauticalFlag::November, capacity)
}

pub fn boxship(raw_imo: u64, name: &str, origin: &str, capacity: u32) -> Ship {
    Ship::container_ship(imo(raw_imo), name, origin, NauticalFlag::November, capacity)
}

// ===========================================================================
// Port builders
// ===========================================================================

/// A port with one bulk quay (limit 100 tonnes) and one docked, loaded bulk
/// carrier bound for Australia. The next unloading sweep fills the
/// warehouse.
pub fn loaded_bulk_port() -> Port {
    let mut port = Port::new("Gladstone");
    register(&mut port, grain(1, "Australia", 40));
    let ship_id = match port.register_ship(carrier(1234567, "Alpha", "Australia", 80)) {
        Ok(id) => id,
        Err(err) => panic!("fixture ship rejected: {err}"),
    };
    if let Some(ship) = port.ships.get_mut(ship_id) {
        ship.load(CargoId(1));
    }
    port.add_quay(Quay::bulk(QuayId(0), 100));
    port.quays[0].dock(ship_id);
    port
}

/// A busy mixed port: several ships queued offshore, cargo registered, and
/// movements scheduled over the first hundred minutes.
pub fn busy_port(queued_ships: u32, scheduled_movements: u32) -> Port {
    let mut port = Port::new("Brisbane");
    port.add_quay(Quay::bulk(QuayId(0), 500));
    port.add_quay(Quay::container(QuayId(1), 200));

    for i in 0..queued_ships {
        let raw = 1_000_000 + u64::from(i);
        let ship = if i % 2 == 0 {
            carrier(raw, &format!("Carrier-{i}"), "Australia", 200)
        } else {
            boxship(raw, &format!("Boxer-{i}"), "Australia", 50)
        };
        match port.register_ship(ship) {
            Ok(id) => port.enqueue_ship(id),
            Err(err) => panic!("fixture ship rejected: {err}"),
        }
    }

    for i in 0..scheduled_movements {
        register(&mut port, grain(i, "Australia", 10));
        let movement = Movement::cargo(
            u64::from(i % 100) + 1,
            MovementDirection::Inbound,
            vec![CargoId(i)],
        );
        if let Err(err) = port.schedule_movement(movement) {
            panic!("fixture movement rejected: {err}");
        }
    }
    port
}

fn register(port: &mut Port, cargo: Cargo) {
    if let Err(err) = port.register_cargo(cargo) {
        panic!("fixture cargo rejected: {err}");
    }
}
