//! The observer seam: statistics evaluators and the read-only view they see.
//!
//! Evaluators are passive: they are notified of every processed movement and
//! every elapsed minute, in registration order, and can never mutate or fail
//! the tick. Each hook receives a [`PortView`], a shared borrow of the
//! port's state valid for the duration of the call.

use crate::id::{CargoId, Ticks};
use crate::movement::Movement;
use crate::quay::Quay;
use crate::registry::{CargoRegistry, ShipRegistry};
use std::collections::HashMap;

/// A read-only snapshot borrow of a port, handed to evaluator hooks.
#[derive(Debug, Clone, Copy)]
pub struct PortView<'a> {
    /// The port's name.
    pub name: &'a str,
    /// Minutes elapsed since the simulation started.
    pub time: Ticks,
    /// Every ship active in the simulation.
    pub ships: &'a ShipRegistry,
    /// Every piece of cargo active in the simulation.
    pub cargo: &'a CargoRegistry,
    /// The port's quays, in the order they were added.
    pub quays: &'a [Quay],
    /// Cargo currently stored in the warehouse.
    pub warehouse: &'a [CargoId],
}

/// A passive observer of port activity.
///
/// At most one evaluator per [`StatisticsEvaluator::name`] may be registered
/// on a port; the name doubles as the snapshot tag.
pub trait StatisticsEvaluator: std::fmt::Debug {
    /// The stable name identifying this evaluator kind.
    fn name(&self) -> &'static str;

    /// Called once for every movement the port processes, immediately after
    /// the movement's effects have been applied.
    fn on_movement_processed(&mut self, movement: &Movement, view: PortView<'_>);

    /// Called once at the end of every simulated minute.
    fn on_minute_elapsed(&mut self, view: PortView<'_>);

    /// Upcast for reading concrete evaluator state back out of a port.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Constructor for one evaluator kind.
pub type EvaluatorConstructor = fn() -> Box<dyn StatisticsEvaluator>;

/// Maps snapshot names to evaluator constructors.
///
/// Snapshot decoding needs to rebuild evaluators from their names without
/// this crate knowing the concrete types; callers register the kinds they
/// support and pass the catalog to the decoder.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorCatalog {
    constructors: HashMap<&'static str, EvaluatorConstructor>,
}

impl EvaluatorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under its evaluator name. The last
    /// registration for a name wins.
    pub fn register(&mut self, name: &'static str, constructor: EvaluatorConstructor) {
        self.constructors.insert(name, constructor);
    }

    /// Construct the evaluator registered under `name`, if any.
    pub fn build(&self, name: &str) -> Option<Box<dyn StatisticsEvaluator>> {
        self.constructors.get(name).map(|ctor| ctor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}
