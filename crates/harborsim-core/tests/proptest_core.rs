//! Property-based tests for the port simulation engine.
//!
//! Uses proptest to generate random ports and movement schedules, then
//! verify structural invariants hold.

use harborsim_core::cargo::{BulkCargoType, Cargo, ContainerType};
use harborsim_core::evaluator::EvaluatorCatalog;
use harborsim_core::id::{CargoId, ImoNumber, QuayId};
use harborsim_core::movement::{Movement, MovementDirection};
use harborsim_core::port::Port;
use harborsim_core::quay::Quay;
use harborsim_core::ship::{NauticalFlag, Ship};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// One randomly shaped piece of cargo. Ids are assigned by position.
#[derive(Debug, Clone)]
enum CargoSpec {
    Bulk(BulkCargoType, u32),
    Container(ContainerType),
}

fn arb_cargo_spec() -> impl Strategy<Value = CargoSpec> {
    prop_oneof![
        (arb_bulk_type(), 1..=200u32).prop_map(|(v, t)| CargoSpec::Bulk(v, t)),
        arb_container_type().prop_map(CargoSpec::Container),
    ]
}

fn arb_bulk_type() -> impl Strategy<Value = BulkCargoType> {
    prop_oneof![
        Just(BulkCargoType::Grain),
        Just(BulkCargoType::Minerals),
        Just(BulkCargoType::Coal),
        Just(BulkCargoType::Oil),
        Just(BulkCargoType::Other),
    ]
}

fn arb_container_type() -> impl Strategy<Value = ContainerType> {
    prop_oneof![
        Just(ContainerType::Standard),
        Just(ContainerType::OpenTop),
        Just(ContainerType::Reefer),
        Just(ContainerType::Tanker),
        Just(ContainerType::Other),
    ]
}

fn arb_flag() -> impl Strategy<Value = NauticalFlag> {
    prop_oneof![
        Just(NauticalFlag::Bravo),
        Just(NauticalFlag::Hotel),
        Just(NauticalFlag::Whiskey),
        Just(NauticalFlag::November),
    ]
}

#[derive(Debug, Clone)]
struct ShipSpec {
    flag: NauticalFlag,
    container_ship: bool,
    capacity: u32,
}

fn arb_ship_spec() -> impl Strategy<Value = ShipSpec> {
    (arb_flag(), any::<bool>(), 1..=500u32).prop_map(|(flag, container_ship, capacity)| {
        ShipSpec {
            flag,
            container_ship,
            capacity,
        }
    })
}

#[derive(Debug, Clone)]
struct PortSpec {
    cargo: Vec<CargoSpec>,
    ships: Vec<ShipSpec>,
    bulk_quays: u8,
    container_quays: u8,
    /// (minute, inbound) per scheduled ship arrival, by ship index.
    arrivals: Vec<u64>,
}

fn arb_port_spec() -> impl Strategy<Value = PortSpec> {
    (
        proptest::collection::vec(arb_cargo_spec(), 0..12),
        proptest::collection::vec(arb_ship_spec(), 1..8),
        0..3u8,
        0..3u8,
        proptest::collection::vec(1..60u64, 0..8),
    )
        .prop_map(|(cargo, ships, bulk_quays, container_quays, arrivals)| PortSpec {
            cargo,
            ships,
            bulk_quays,
            container_quays,
            arrivals,
        })
}

/// Destinations rotate so some cargo matches ship origins and some does not.
const COUNTRIES: [&str; 3] = ["Australia", "China", "France"];

fn build_port(spec: &PortSpec) -> Port {
    let mut port = Port::new("Fuzzharbour");

    for (i, cargo_spec) in spec.cargo.iter().enumerate() {
        let id = CargoId(i as u32);
        let destination = COUNTRIES[i % COUNTRIES.len()];
        let cargo = match cargo_spec {
            CargoSpec::Bulk(variety, tonnage) => Cargo::bulk(id, destination, *tonnage, *variety),
            CargoSpec::Container(variety) => Cargo::container(id, destination, *variety),
        };
        port.register_cargo(cargo).unwrap();
    }

    let mut imos = Vec::new();
    for (i, ship_spec) in spec.ships.iter().enumerate() {
        let imo = ImoNumber::new(1_000_000 + i as u64).unwrap();
        let origin = COUNTRIES[i % COUNTRIES.len()];
        let name = format!("Ship-{i}");
        let ship = if ship_spec.container_ship {
            Ship::container_ship(imo, &name, origin, ship_spec.flag, ship_spec.capacity)
        } else {
            Ship::bulk_carrier(imo, &name, origin, ship_spec.flag, ship_spec.capacity)
        };
        port.register_ship(ship).unwrap();
        imos.push(imo);
    }

    for q in 0..spec.bulk_quays {
        port.add_quay(Quay::bulk(QuayId(u32::from(q)), 300));
    }
    for q in 0..spec.container_quays {
        port.add_quay(Quay::container(
            QuayId(u32::from(spec.bulk_quays) + u32::from(q)),
            100,
        ));
    }

    for (i, &minute) in spec.arrivals.iter().enumerate() {
        let imo = imos[i % imos.len()];
        port.schedule_movement(Movement::ship(minute, MovementDirection::Inbound, imo))
            .unwrap();
    }
    port
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    /// Every snapshot a port produces is accepted back and re-encodes to
    /// the identical text.
    #[test]
    fn snapshot_round_trip_is_exact(spec in arb_port_spec(), steps in 0..80usize) {
        let mut port = build_port(&spec);
        for _ in 0..steps {
            port.step();
        }
        let text = port.encode();
        let decoded = Port::decode(&text, &EvaluatorCatalog::new()).unwrap();
        prop_assert_eq!(decoded.encode(), text);
        prop_assert_eq!(decoded, port);
    }

    /// The clock advances by exactly one per step, from zero.
    #[test]
    fn clock_is_monotonic(spec in arb_port_spec(), steps in 0..200u64) {
        let mut port = build_port(&spec);
        prop_assert_eq!(port.time(), 0);
        for expected in 1..=steps {
            port.step();
            prop_assert_eq!(port.time(), expected);
        }
    }

    /// Identical builds stepped identically remain identical.
    #[test]
    fn runs_are_deterministic(spec in arb_port_spec(), steps in 0..120usize) {
        let mut a = build_port(&spec);
        let mut b = build_port(&spec);
        for _ in 0..steps {
            a.step();
            b.step();
        }
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.encode(), b.encode());
    }

    /// The queue head is always from the highest occupied priority tier:
    /// Bravo, then Whiskey, then Hotel, then container ships, then anyone.
    #[test]
    fn queue_peek_respects_priority(spec in arb_port_spec()) {
        let mut port = build_port(&spec);
        let imos: Vec<ImoNumber> = port.ships().iter().map(|s| s.imo()).collect();
        for imo in &imos {
            port.enqueue_ship(*imo);
        }

        let tier = |imo: ImoNumber| -> u8 {
            let ship = port.ships().get(imo).unwrap();
            match ship.flag() {
                NauticalFlag::Bravo => 0,
                NauticalFlag::Whiskey => 1,
                NauticalFlag::Hotel => 2,
                NauticalFlag::November if ship.is_container_ship() => 3,
                NauticalFlag::November => 4,
            }
        };

        if let Some(head) = port.ship_queue().peek(port.ships()) {
            let best = imos.iter().map(|&i| tier(i)).min().unwrap();
            prop_assert_eq!(tier(head), best);
        }
    }

    /// Stepping never leaves a dangling reference: everything in the
    /// warehouse, on quays, in holds, or queued is registered.
    #[test]
    fn references_stay_registered(spec in arb_port_spec(), steps in 0..100usize) {
        let mut port = build_port(&spec);
        for _ in 0..steps {
            port.step();
        }
        for id in port.warehouse() {
            prop_assert!(port.cargo().contains(*id));
        }
        for imo in port.ship_queue().ships() {
            prop_assert!(port.ships().contains(*imo));
        }
        for quay in port.quays() {
            if let Some(imo) = quay.berth() {
                prop_assert!(port.ships().contains(imo));
            }
        }
        for ship in port.ships().iter() {
            for id in ship.cargo_aboard() {
                prop_assert!(port.cargo().contains(id));
            }
        }
    }

    /// A docked bulk carrier never carries more than its quay's limit, in
    /// any reachable state.
    #[test]
    fn berth_capacity_never_exceeded(spec in arb_port_spec(), steps in 0..100usize) {
        let mut port = build_port(&spec);
        for _ in 0..steps {
            port.step();
        }
        for quay in port.quays() {
            let Some(imo) = quay.berth() else { continue };
            let ship = port.ships().get(imo).unwrap();
            if let harborsim_core::quay::QuayKind::Bulk { max_tonnage } = quay.kind() {
                let carried: u32 = ship
                    .cargo_aboard()
                    .iter()
                    .filter_map(|id| port.cargo().get(*id))
                    .filter_map(Cargo::tonnage)
                    .sum();
                prop_assert!(carried <= *max_tonnage);
            }
        }
    }
}
