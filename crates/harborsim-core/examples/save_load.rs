//! Save/load example: snapshot round-trip.
//!
//! Builds a port, runs 30 minutes, encodes the state to text, decodes it
//! into a new port, and verifies both continue in lockstep.
//!
//! Run with: `cargo run -p harborsim-core --example save_load`

use harborsim_core::cargo::{Cargo, ContainerType};
use harborsim_core::evaluator::EvaluatorCatalog;
use harborsim_core::id::{CargoId, ImoNumber, QuayId};
use harborsim_core::movement::{Movement, MovementDirection};
use harborsim_core::port::Port;
use harborsim_core::quay::Quay;
use harborsim_core::ship::{NauticalFlag, Ship};

/// A small mixed port: one container quay, one boxship, a stream of
/// container deliveries.
fn build_port() -> Port {
    let mut port = Port::new("Brisbane");

    let imo = ImoNumber::new(7654321).expect("valid IMO number");
    let ship = port
        .register_ship(Ship::container_ship(
            imo,
            "Meridian",
            "China",
            NauticalFlag::November,
            20,
        ))
        .expect("fresh IMO number");
    port.add_quay(Quay::container(QuayId(0), 50));

    for i in 1..=6 {
        port.register_cargo(Cargo::container(
            CargoId(i),
            "China",
            ContainerType::Standard,
        ))
        .expect("fresh cargo id");
        port.schedule_movement(Movement::cargo(
            u64::from(i) * 4,
            MovementDirection::Inbound,
            vec![CargoId(i)],
        ))
        .expect("scheduled in the future");
    }

    port.enqueue_ship(ship);
    port.schedule_movement(Movement::ship(28, MovementDirection::Outbound, ship))
        .expect("scheduled in the future");
    port
}

fn main() {
    let mut original = build_port();
    for _ in 0..30 {
        original.step();
    }

    // Encode to the text snapshot format.
    let snapshot = original.encode();
    println!("--- snapshot ({} bytes) ---", snapshot.len());
    println!("{snapshot}");

    // Decode into a fresh port. No evaluators were registered, so an empty
    // catalog suffices.
    let mut restored =
        Port::decode(&snapshot, &EvaluatorCatalog::new()).expect("own snapshot decodes");
    assert_eq!(restored, original);

    // Both runs continue identically.
    for _ in 0..30 {
        original.step();
        restored.step();
    }
    assert_eq!(restored.encode(), original.encode());
    println!("--- resumed 30 more minutes, states identical ---");
}
