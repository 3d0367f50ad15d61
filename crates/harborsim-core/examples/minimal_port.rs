//! Minimal port example: one quay, one loaded bulk carrier.
//!
//! Registers a grain load and a carrier, schedules the carrier's arrival,
//! and runs 20 minutes. After each minute, prints the port state.
//!
//! Run with: `cargo run -p harborsim-core --example minimal_port`

use harborsim_core::cargo::{BulkCargoType, Cargo};
use harborsim_core::id::{CargoId, ImoNumber, QuayId};
use harborsim_core::movement::{Movement, MovementDirection};
use harborsim_core::port::Port;
use harborsim_core::quay::Quay;
use harborsim_core::ship::{NauticalFlag, Ship};

fn main() {
    let mut port = Port::new("Gladstone");

    // --- Step 1: Register the entities ---

    let grain = port
        .register_cargo(Cargo::bulk(
            CargoId(1),
            "Australia",
            40,
            BulkCargoType::Grain,
        ))
        .expect("fresh cargo id");

    let imo = ImoNumber::new(1234567).expect("valid IMO number");
    let mut carrier = Ship::bulk_carrier(imo, "Evergreen", "Australia", NauticalFlag::Hotel, 120);
    carrier.load(grain);
    let carrier = port.register_ship(carrier).expect("fresh IMO number");

    port.add_quay(Quay::bulk(QuayId(0), 200));

    // --- Step 2: Schedule the arrival ---

    port.schedule_movement(Movement::ship(3, MovementDirection::Inbound, carrier))
        .expect("scheduled in the future");

    // --- Step 3: Run the simulation ---

    for _ in 0..20 {
        port.step();
        let quay = &port.quays()[0];
        println!(
            "minute {:>2}: queued={} berth={} warehouse={:?}",
            port.time(),
            port.ship_queue().len(),
            quay.berth()
                .map(|imo| imo.to_string())
                .unwrap_or_else(|| "vacant".to_string()),
            port.warehouse(),
        );
    }

    // Minute 3: the carrier joins the queue.
    // Minute 10: it docks (first docking minute after arrival).
    // Minute 15: it unloads its grain into the warehouse.
}
