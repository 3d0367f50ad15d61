//! Statistics evaluators for the Harborsim port engine.
//!
//! Each evaluator implements
//! [`StatisticsEvaluator`](harborsim_core::evaluator::StatisticsEvaluator)
//! and aggregates one slice of port activity: hourly ship throughput, cargo
//! type distributions, country-of-origin counts, or quay occupancy. The
//! port forwards every processed movement and every elapsed minute to each
//! registered evaluator, in registration order.
//!
//! # Usage
//!
//! ```ignore
//! let mut port = Port::new("Brisbane");
//! port.register_evaluator(Box::new(ShipThroughputEvaluator::new()));
//! // ... run the simulation ...
//! // Snapshot decoding resolves evaluator names through a catalog:
//! let port = Port::decode(&text, &standard_catalog())?;
//! ```

use harborsim_core::cargo::{BulkCargoType, CargoKind, ContainerType};
use harborsim_core::evaluator::{EvaluatorCatalog, PortView, StatisticsEvaluator};
use harborsim_core::id::{CargoId, Ticks};
use harborsim_core::movement::{Movement, MovementDirection, MovementPayload};
use std::collections::{HashMap, VecDeque};

/// A catalog holding every evaluator this crate provides, keyed by the
/// names used in snapshot `Evaluators:` lines.
pub fn standard_catalog() -> EvaluatorCatalog {
    let mut catalog = EvaluatorCatalog::new();
    catalog.register("ShipThroughputEvaluator", || {
        Box::new(ShipThroughputEvaluator::new())
    });
    catalog.register("CargoDecompositionEvaluator", || {
        Box::new(CargoDecompositionEvaluator::new())
    });
    catalog.register("ShipFlagEvaluator", || Box::new(ShipFlagEvaluator::new()));
    catalog.register("QuayOccupancyEvaluator", || {
        Box::new(QuayOccupancyEvaluator::new())
    });
    catalog
}

// ===========================================================================
// Ship throughput
// ===========================================================================

/// How long a departure stays in the throughput window, in minutes.
const THROUGHPUT_WINDOW: Ticks = 60;

/// Counts ships that have passed through the port in the last hour.
///
/// A ship "passes through" when its outbound movement is processed. Each
/// departure stays in the count for the following hour of evaluator time,
/// then ages out.
#[derive(Debug, Default)]
pub struct ShipThroughputEvaluator {
    time: Ticks,
    /// Expiry minute per recorded departure, oldest first.
    departures: VecDeque<Ticks>,
}

impl ShipThroughputEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ships that departed within the last 60 minutes.
    pub fn throughput_per_hour(&self) -> usize {
        self.departures.len()
    }
}

impl StatisticsEvaluator for ShipThroughputEvaluator {
    fn name(&self) -> &'static str {
        "ShipThroughputEvaluator"
    }

    fn on_movement_processed(&mut self, movement: &Movement, _view: PortView<'_>) {
        if movement.direction() == MovementDirection::Outbound
            && matches!(movement.payload(), MovementPayload::Ship(_))
        {
            self.departures.push_back(self.time + THROUGHPUT_WINDOW);
        }
    }

    fn on_minute_elapsed(&mut self, _view: PortView<'_>) {
        self.time += 1;
        while self.departures.front().is_some_and(|&expiry| expiry < self.time) {
            self.departures.pop_front();
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Cargo decomposition
// ===========================================================================

/// Counts how often each cargo family and each cargo type enters the port.
///
/// Inbound ship movements contribute everything aboard the arriving ship;
/// inbound cargo movements contribute the moved batch. Outbound traffic is
/// ignored.
#[derive(Debug, Default)]
pub struct CargoDecompositionEvaluator {
    bulk_seen: u32,
    containers_seen: u32,
    bulk_distribution: HashMap<BulkCargoType, u32>,
    container_distribution: HashMap<ContainerType, u32>,
}

impl CargoDecompositionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bulk loads that have entered the port.
    pub fn bulk_seen(&self) -> u32 {
        self.bulk_seen
    }

    /// Total containers that have entered the port.
    pub fn containers_seen(&self) -> u32 {
        self.containers_seen
    }

    /// Arrival count per bulk cargo type. Unseen types are absent.
    pub fn bulk_distribution(&self) -> &HashMap<BulkCargoType, u32> {
        &self.bulk_distribution
    }

    /// Arrival count per container type. Unseen types are absent.
    pub fn container_distribution(&self) -> &HashMap<ContainerType, u32> {
        &self.container_distribution
    }

    fn tally(&mut self, id: CargoId, view: PortView<'_>) {
        let Some(cargo) = view.cargo.get(id) else {
            return;
        };
        match cargo.kind() {
            CargoKind::Bulk { variety, .. } => {
                self.bulk_seen += 1;
                *self.bulk_distribution.entry(*variety).or_insert(0) += 1;
            }
            CargoKind::Container { variety } => {
                self.containers_seen += 1;
                *self.container_distribution.entry(*variety).or_insert(0) += 1;
            }
        }
    }
}

impl StatisticsEvaluator for CargoDecompositionEvaluator {
    fn name(&self) -> &'static str {
        "CargoDecompositionEvaluator"
    }

    fn on_movement_processed(&mut self, movement: &Movement, view: PortView<'_>) {
        if movement.direction() != MovementDirection::Inbound {
            return;
        }
        match movement.payload() {
            MovementPayload::Ship(imo) => {
                let aboard = view
                    .ships
                    .get(*imo)
                    .map(|ship| ship.cargo_aboard())
                    .unwrap_or_default();
                for id in aboard {
                    self.tally(id, view);
                }
            }
            MovementPayload::Cargo(ids) => {
                for id in ids {
                    self.tally(*id, view);
                }
            }
        }
    }

    fn on_minute_elapsed(&mut self, _view: PortView<'_>) {}

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Ship flags
// ===========================================================================

/// Counts how many ships each country of origin has sent to the port.
///
/// Only inbound ship movements are recorded.
#[derive(Debug, Default)]
pub struct ShipFlagEvaluator {
    origins: HashMap<String, u32>,
}

impl ShipFlagEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrival count per country of origin. Unseen countries are absent.
    pub fn flag_distribution(&self) -> &HashMap<String, u32> {
        &self.origins
    }

    /// Arrival count for one country, zero if never seen.
    pub fn flag_statistics(&self, origin: &str) -> u32 {
        self.origins.get(origin).copied().unwrap_or(0)
    }
}

impl StatisticsEvaluator for ShipFlagEvaluator {
    fn name(&self) -> &'static str {
        "ShipFlagEvaluator"
    }

    fn on_movement_processed(&mut self, movement: &Movement, view: PortView<'_>) {
        if movement.direction() != MovementDirection::Inbound {
            return;
        }
        if let MovementPayload::Ship(imo) = movement.payload() {
            if let Some(ship) = view.ships.get(*imo) {
                *self.origins.entry(ship.origin().to_string()).or_insert(0) += 1;
            }
        }
    }

    fn on_minute_elapsed(&mut self, _view: PortView<'_>) {}

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Quay occupancy
// ===========================================================================

/// Tracks how many quays currently have a ship moored.
///
/// Recomputed from the port state after every movement and every minute, so
/// the reading is never stale.
#[derive(Debug, Default)]
pub struct QuayOccupancyEvaluator {
    occupied: usize,
}

impl QuayOccupancyEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quays with a ship moored, as of the last update.
    pub fn quays_occupied(&self) -> usize {
        self.occupied
    }

    fn refresh(&mut self, view: PortView<'_>) {
        self.occupied = view.quays.iter().filter(|quay| !quay.is_vacant()).count();
    }
}

impl StatisticsEvaluator for QuayOccupancyEvaluator {
    fn name(&self) -> &'static str {
        "QuayOccupancyEvaluator"
    }

    fn on_movement_processed(&mut self, _movement: &Movement, view: PortView<'_>) {
        self.refresh(view);
    }

    fn on_minute_elapsed(&mut self, view: PortView<'_>) {
        self.refresh(view);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use harborsim_core::id::QuayId;
    use harborsim_core::movement::Movement;
    use harborsim_core::port::Port;
    use harborsim_core::quay::Quay;
    use harborsim_core::test_utils::*;

    fn view_probe(port: &mut Port, evaluator: &mut dyn StatisticsEvaluator, minutes: u64) {
        // Drive an evaluator that is not registered on the port by stepping
        // the port and forwarding minutes manually.
        for _ in 0..minutes {
            port.step();
            let view = PortView {
                name: "probe",
                time: port.time(),
                ships: port.ships(),
                cargo: port.cargo(),
                quays: port.quays(),
                warehouse: port.warehouse(),
            };
            evaluator.on_minute_elapsed(view);
        }
    }

    // -- throughput ---------------------------------------------------------

    #[test]
    fn throughput_starts_at_zero() {
        assert_eq!(ShipThroughputEvaluator::new().throughput_per_hour(), 0);
    }

    #[test]
    fn each_departure_adds_one() {
        let mut port = Port::new("P");
        let ship_id = port
            .register_ship(carrier(1234567, "Alpha", "Australia", 80))
            .unwrap();
        let mut eval = ShipThroughputEvaluator::new();

        let view = PortView {
            name: "P",
            time: 0,
            ships: port.ships(),
            cargo: port.cargo(),
            quays: port.quays(),
            warehouse: port.warehouse(),
        };
        let depart = Movement::ship(0, MovementDirection::Outbound, ship_id);
        eval.on_movement_processed(&depart, view);
        assert_eq!(eval.throughput_per_hour(), 1);
        eval.on_movement_processed(&depart, view);
        assert_eq!(eval.throughput_per_hour(), 2);

        // Inbound and cargo movements are ignored.
        eval.on_movement_processed(&Movement::ship(0, MovementDirection::Inbound, ship_id), view);
        assert_eq!(eval.throughput_per_hour(), 2);
    }

    #[test]
    fn departures_age_out_after_an_hour() {
        let mut port = Port::new("P");
        let ship_id = port
            .register_ship(carrier(1234567, "Alpha", "Australia", 80))
            .unwrap();
        let mut eval = ShipThroughputEvaluator::new();

        // Three minutes pass, then a ship departs.
        view_probe(&mut port, &mut eval, 3);
        let view = PortView {
            name: "P",
            time: port.time(),
            ships: port.ships(),
            cargo: port.cargo(),
            quays: port.quays(),
            warehouse: port.warehouse(),
        };
        eval.on_movement_processed(&Movement::ship(3, MovementDirection::Outbound, ship_id), view);

        // Still counted through minute 63 of evaluator time.
        view_probe(&mut port, &mut eval, 59);
        assert_eq!(eval.throughput_per_hour(), 1);
        view_probe(&mut port, &mut eval, 1);
        assert_eq!(eval.throughput_per_hour(), 1);
        // Minute 64: aged out.
        view_probe(&mut port, &mut eval, 1);
        assert_eq!(eval.throughput_per_hour(), 0);
    }

    // -- decomposition ------------------------------------------------------

    #[test]
    fn decomposition_counts_inbound_cargo_batches() {
        let mut port = Port::new("P");
        port.register_evaluator(Box::new(CargoDecompositionEvaluator::new()));
        for (id, cargo) in [
            (1u32, grain(1, "Australia", 10)),
            (2, grain(2, "Australia", 20)),
            (3, reefer(3, "China")),
        ] {
            port.register_cargo(cargo).unwrap();
            port.schedule_movement(Movement::cargo(
                1,
                MovementDirection::Inbound,
                vec![harborsim_core::id::CargoId(id)],
            ))
            .unwrap();
        }
        port.step();

        let eval = port.evaluators()[0]
            .as_any()
            .downcast_ref::<CargoDecompositionEvaluator>()
            .unwrap();
        assert_eq!(eval.bulk_seen(), 2);
        assert_eq!(eval.containers_seen(), 1);
        assert_eq!(eval.bulk_distribution()[&BulkCargoType::Grain], 2);
        assert_eq!(eval.container_distribution()[&ContainerType::Reefer], 1);
    }

    #[test]
    fn decomposition_counts_cargo_aboard_arriving_ships() {
        let mut port = Port::new("P");
        port.register_evaluator(Box::new(CargoDecompositionEvaluator::new()));
        port.register_cargo(grain(1, "Australia", 10)).unwrap();
        let mut ship = carrier(1234567, "Alpha", "Australia", 80);
        ship.load(harborsim_core::id::CargoId(1));
        let ship_id = port.register_ship(ship).unwrap();
        port.schedule_movement(Movement::ship(1, MovementDirection::Inbound, ship_id))
            .unwrap();
        port.step();

        let eval = port.evaluators()[0]
            .as_any()
            .downcast_ref::<CargoDecompositionEvaluator>()
            .unwrap();
        assert_eq!(eval.bulk_seen(), 1);
        assert_eq!(eval.containers_seen(), 0);
    }

    #[test]
    fn decomposition_ignores_outbound_traffic() {
        let mut port = Port::new("P");
        port.register_evaluator(Box::new(CargoDecompositionEvaluator::new()));
        port.register_cargo(grain(1, "Australia", 10)).unwrap();
        port.store_cargo(harborsim_core::id::CargoId(1));
        port.schedule_movement(Movement::cargo(
            1,
            MovementDirection::Outbound,
            vec![harborsim_core::id::CargoId(1)],
        ))
        .unwrap();
        port.step();

        let eval = port.evaluators()[0]
            .as_any()
            .downcast_ref::<CargoDecompositionEvaluator>()
            .unwrap();
        assert_eq!(eval.bulk_seen(), 0);
    }

    // -- flags --------------------------------------------------------------

    #[test]
    fn flag_counts_track_inbound_origins() {
        let mut port = Port::new("P");
        port.register_evaluator(Box::new(ShipFlagEvaluator::new()));
        let a = port
            .register_ship(carrier(1111111, "A", "Australia", 80))
            .unwrap();
        let b = port
            .register_ship(carrier(2222222, "B", "China", 80))
            .unwrap();
        let c = port
            .register_ship(carrier(3333333, "C", "Australia", 80))
            .unwrap();
        for (minute, ship) in [(1, a), (2, b), (3, c)] {
            port.schedule_movement(Movement::ship(minute, MovementDirection::Inbound, ship))
                .unwrap();
        }
        // An outbound movement must not count.
        port.schedule_movement(Movement::ship(4, MovementDirection::Outbound, a))
            .unwrap();
        for _ in 0..5 {
            port.step();
        }

        let eval = port.evaluators()[0]
            .as_any()
            .downcast_ref::<ShipFlagEvaluator>()
            .unwrap();
        assert_eq!(eval.flag_statistics("Australia"), 2);
        assert_eq!(eval.flag_statistics("China"), 1);
        assert_eq!(eval.flag_statistics("France"), 0);
        assert_eq!(eval.flag_distribution().len(), 2);
    }

    // -- occupancy ----------------------------------------------------------

    #[test]
    fn occupancy_follows_docking_and_departure() {
        let mut port = Port::new("P");
        port.register_evaluator(Box::new(QuayOccupancyEvaluator::new()));
        let ship_id = port
            .register_ship(carrier(1234567, "Alpha", "Australia", 80))
            .unwrap();
        port.add_quay(Quay::bulk(QuayId(0), 100));
        port.add_quay(Quay::bulk(QuayId(1), 100));
        port.enqueue_ship(ship_id);

        let occupied = |port: &Port| {
            port.evaluators()[0]
                .as_any()
                .downcast_ref::<QuayOccupancyEvaluator>()
                .unwrap()
                .quays_occupied()
        };

        for _ in 0..9 {
            port.step();
        }
        assert_eq!(occupied(&port), 0);
        port.step();
        assert_eq!(occupied(&port), 1);

        port.schedule_movement(Movement::ship(12, MovementDirection::Outbound, ship_id))
            .unwrap();
        port.step();
        port.step();
        assert_eq!(occupied(&port), 0);
    }

    // -- catalog ------------------------------------------------------------

    #[test]
    fn standard_catalog_builds_every_evaluator() {
        let catalog = standard_catalog();
        for name in [
            "ShipThroughputEvaluator",
            "CargoDecompositionEvaluator",
            "ShipFlagEvaluator",
            "QuayOccupancyEvaluator",
        ] {
            let evaluator = catalog.build(name).unwrap();
            assert_eq!(evaluator.name(), name);
        }
        assert!(catalog.build("NoSuchEvaluator").is_none());
    }

    #[test]
    fn snapshot_with_evaluators_round_trips_through_the_catalog() {
        let mut port = Port::new("P");
        port.register_evaluator(Box::new(ShipThroughputEvaluator::new()));
        port.register_evaluator(Box::new(QuayOccupancyEvaluator::new()));

        let text = port.encode();
        assert!(text.ends_with("Evaluators:2:ShipThroughputEvaluator,QuayOccupancyEvaluator"));
        let decoded = Port::decode(&text, &standard_catalog()).unwrap();
        assert_eq!(decoded.encode(), text);
    }
}
