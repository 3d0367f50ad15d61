//! The port tick engine.
//!
//! # Architecture
//!
//! The `Port` owns every piece of simulation state for one run:
//! - the ship and cargo identity stores ([`ShipRegistry`], [`CargoRegistry`])
//! - the offshore [`ShipQueue`]
//! - the quay list (order = order added)
//! - the warehouse (cargo ashore, not aboard any ship)
//! - the pending movements, bucketed by action time
//! - the registered statistics evaluators
//!
//! # Five-phase step
//!
//! Each [`Port::step`] advances the simulation by one minute:
//! 1. **Clock** -- the tick counter increments by one.
//! 2. **Docking** -- every 10th minute, vacant quays take compatible ships
//!    from the head of the priority queue.
//! 3. **Unloading** -- every 5th minute, docked ships empty their holds into
//!    the warehouse.
//! 4. **Movements** -- every movement whose action time equals the clock is
//!    executed and consumed.
//! 5. **Observation** -- every evaluator's minute hook fires, in
//!    registration order.
//!
//! Later phases depend on the effects of earlier ones within the same call,
//! so the order is fixed. Each phase is total: benign empty conditions
//! (empty queue, empty hold) are no-ops, never errors.

use crate::evaluator::{PortView, StatisticsEvaluator};
use crate::id::{CargoId, ImoNumber, Ticks};
use crate::movement::{Movement, MovementDirection, MovementPayload};
use crate::quay::Quay;
use crate::registry::{CargoRegistry, RegistryError, ShipRegistry};
use crate::queue::ShipQueue;
use crate::ship::Ship;
use std::collections::BTreeMap;

/// Minutes between docking attempts.
const DOCKING_INTERVAL: Ticks = 10;

/// Minutes between unloading sweeps.
const UNLOADING_INTERVAL: Ticks = 5;

/// Raised when a movement is scheduled for a minute that has already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("movement scheduled for minute {scheduled} is before the current minute {current}")]
pub struct ScheduleError {
    pub scheduled: Ticks,
    pub current: Ticks,
}

/// A place where ships dock at quays to unload cargo, driven by a discrete
/// minute clock.
#[derive(Debug)]
pub struct Port {
    pub(crate) name: String,
    pub(crate) time: Ticks,
    pub(crate) ships: ShipRegistry,
    pub(crate) cargo: CargoRegistry,
    pub(crate) queue: ShipQueue,
    pub(crate) quays: Vec<Quay>,
    pub(crate) warehouse: Vec<CargoId>,
    /// Pending movements bucketed by action time; FIFO within a bucket.
    pub(crate) movements: BTreeMap<Ticks, Vec<Movement>>,
    pub(crate) evaluators: Vec<Box<dyn StatisticsEvaluator>>,
}

impl Port {
    /// Create an empty port with the clock at zero.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            time: 0,
            ships: ShipRegistry::new(),
            cargo: CargoRegistry::new(),
            queue: ShipQueue::new(),
            quays: Vec::new(),
            warehouse: Vec::new(),
            movements: BTreeMap::new(),
            evaluators: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minutes elapsed since the simulation started.
    pub fn time(&self) -> Ticks {
        self.time
    }

    pub fn ships(&self) -> &ShipRegistry {
        &self.ships
    }

    pub fn cargo(&self) -> &CargoRegistry {
        &self.cargo
    }

    pub fn ship_queue(&self) -> &ShipQueue {
        &self.queue
    }

    /// The quays, in the order they were added.
    pub fn quays(&self) -> &[Quay] {
        &self.quays
    }

    /// Cargo ids currently stored ashore.
    pub fn warehouse(&self) -> &[CargoId] {
        &self.warehouse
    }

    /// Pending movements in action-time order, FIFO within a minute.
    pub fn pending_movements(&self) -> impl Iterator<Item = &Movement> {
        self.movements.values().flatten()
    }

    pub fn pending_movement_count(&self) -> usize {
        self.movements.values().map(Vec::len).sum()
    }

    pub fn evaluators(&self) -> &[Box<dyn StatisticsEvaluator>] {
        &self.evaluators
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Register a ship in the identity store.
    pub fn register_ship(&mut self, ship: Ship) -> Result<ImoNumber, RegistryError> {
        self.ships.register(ship)
    }

    /// Register a piece of cargo in the identity store.
    pub fn register_cargo(&mut self, cargo: crate::cargo::Cargo) -> Result<CargoId, RegistryError> {
        self.cargo.register(cargo)
    }

    /// Add a quay to the port's control. Quays keep the order added.
    pub fn add_quay(&mut self, quay: Quay) {
        self.quays.push(quay);
    }

    /// Send a registered ship to the back of the offshore queue.
    pub fn enqueue_ship(&mut self, imo: ImoNumber) {
        self.queue.push(imo);
    }

    /// Put a registered piece of cargo into the warehouse.
    pub fn store_cargo(&mut self, id: CargoId) {
        self.warehouse.push(id);
    }

    /// Register an evaluator, keeping at most one per kind.
    ///
    /// A second evaluator with a name already registered is silently
    /// ignored.
    pub fn register_evaluator(&mut self, evaluator: Box<dyn StatisticsEvaluator>) {
        if self
            .evaluators
            .iter()
            .all(|existing| existing.name() != evaluator.name())
        {
            self.evaluators.push(evaluator);
        }
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Queue a movement for execution at its action time.
    ///
    /// Scheduling a movement dated before the current minute is a caller
    /// error and is rejected.
    pub fn schedule_movement(&mut self, movement: Movement) -> Result<(), ScheduleError> {
        if movement.time() < self.time {
            return Err(ScheduleError {
                scheduled: movement.time(),
                current: self.time,
            });
        }
        self.restore_movement(movement);
        Ok(())
    }

    /// Insert a movement without the past-time check. Snapshot decoding uses
    /// this to rebuild the pending set exactly as encoded.
    pub(crate) fn restore_movement(&mut self, movement: Movement) {
        self.movements
            .entry(movement.time())
            .or_default()
            .push(movement);
    }

    // -----------------------------------------------------------------------
    // Tick pipeline
    // -----------------------------------------------------------------------

    /// Advance the simulation by one minute, running all five phases.
    pub fn step(&mut self) {
        self.time += 1;

        if self.time % DOCKING_INTERVAL == 0 {
            self.phase_docking();
        }
        if self.time % UNLOADING_INTERVAL == 0 {
            self.phase_unloading();
        }
        self.phase_movements();
        self.notify_minute_elapsed();
    }

    /// Docking: walk the quays in order; each vacant quay re-peeks the queue
    /// and takes the current head if the ship fits. One ship per quay per
    /// minute; a ship is never docked twice because `take_next` removes it
    /// before the next quay peeks.
    fn phase_docking(&mut self) {
        for i in 0..self.quays.len() {
            if !self.quays[i].is_vacant() {
                continue;
            }
            let Some(head) = self.queue.peek(&self.ships) else {
                break;
            };
            let compatible = self
                .ships
                .get(head)
                .is_some_and(|ship| ship.can_dock(&self.quays[i], &self.cargo));
            if compatible {
                if let Some(imo) = self.queue.take_next(&self.ships) {
                    self.quays[i].dock(imo);
                }
            }
        }
    }

    /// Unloading: every docked ship empties its hold into the warehouse. An
    /// empty hold contributes nothing; the sweep never fails.
    fn phase_unloading(&mut self) {
        let mut unloaded = Vec::new();
        for quay in &self.quays {
            if let Some(imo) = quay.berth() {
                if let Some(ship) = self.ships.get_mut(imo) {
                    unloaded.extend(ship.unload());
                }
            }
        }
        self.warehouse.extend(unloaded);
    }

    /// Movements: detach the bucket for the current minute and execute each
    /// entry in scheduling order. Detaching first means nothing iterates the
    /// pending set while it is being consumed.
    fn phase_movements(&mut self) {
        if let Some(due) = self.movements.remove(&self.time) {
            for movement in due {
                self.process_movement(movement);
            }
        }
    }

    /// Execute one movement immediately.
    ///
    /// - Ship, inbound: the ship joins the offshore queue.
    /// - Ship, outbound: every warehouse cargo the ship can load goes
    ///   aboard, then the ship leaves whichever quay holds it.
    /// - Cargo, inbound: the batch is added to the warehouse.
    /// - Cargo, outbound: every stored item whose id is in the batch is
    ///   removed.
    ///
    /// The movement is then forwarded to every evaluator.
    pub fn process_movement(&mut self, movement: Movement) {
        match (movement.payload(), movement.direction()) {
            (MovementPayload::Ship(imo), MovementDirection::Inbound) => {
                self.queue.push(*imo);
            }
            (MovementPayload::Ship(imo), MovementDirection::Outbound) => {
                self.load_departing_ship(*imo);
                for quay in &mut self.quays {
                    if quay.berth() == Some(*imo) {
                        quay.release();
                    }
                }
            }
            (MovementPayload::Cargo(ids), MovementDirection::Inbound) => {
                self.warehouse.extend(ids.iter().copied());
            }
            (MovementPayload::Cargo(ids), MovementDirection::Outbound) => {
                self.warehouse.retain(|stored| !ids.contains(stored));
            }
        }

        self.notify_movement_processed(&movement);
    }

    /// Move every warehouse item the departing ship can load into its hold,
    /// preserving warehouse order for everything left behind.
    fn load_departing_ship(&mut self, imo: ImoNumber) {
        let Some(ship) = self.ships.get_mut(imo) else {
            return;
        };
        let stored = std::mem::take(&mut self.warehouse);
        let mut kept = Vec::with_capacity(stored.len());
        for id in stored {
            let eligible = self.cargo.get(id).is_some_and(|c| ship.can_load(c));
            if eligible {
                ship.load(id);
            } else {
                kept.push(id);
            }
        }
        self.warehouse = kept;
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    fn notify_movement_processed(&mut self, movement: &Movement) {
        let view = PortView {
            name: &self.name,
            time: self.time,
            ships: &self.ships,
            cargo: &self.cargo,
            quays: &self.quays,
            warehouse: &self.warehouse,
        };
        for evaluator in &mut self.evaluators {
            evaluator.on_movement_processed(movement, view);
        }
    }

    fn notify_minute_elapsed(&mut self) {
        let view = PortView {
            name: &self.name,
            time: self.time,
            ships: &self.ships,
            cargo: &self.cargo,
            quays: &self.quays,
            warehouse: &self.warehouse,
        };
        for evaluator in &mut self.evaluators {
            evaluator.on_minute_elapsed(view);
        }
    }
}

impl PartialEq for Port {
    /// Ports compare by simulation state; evaluators compare by kind (their
    /// internal counters are not part of the persisted state).
    fn eq(&self, other: &Self) -> bool {
        let names = |p: &Self| -> Vec<&'static str> {
            p.evaluators.iter().map(|e| e.name()).collect()
        };
        self.name == other.name
            && self.time == other.time
            && self.ships == other.ships
            && self.cargo == other.cargo
            && self.queue == other.queue
            && self.quays == other.quays
            && self.warehouse == other.warehouse
            && self.movements == other.movements
            && names(self) == names(other)
    }
}
