//! Harborsim Core -- a deterministic cargo-port simulation engine.
//!
//! This crate provides the entities (ships, cargo, quays), the priority
//! ship queue, the movement scheduler, the five-phase minute pipeline, the
//! statistics observer seam, and the text snapshot format that every
//! Harborsim frontend depends on.
//!
//! # Five-Phase Minute Pipeline
//!
//! Each call to [`port::Port::step`] advances the simulation by one minute
//! through the following phases:
//!
//! 1. **Clock** -- Increment the minute counter.
//! 2. **Docking** -- Every 10th minute, vacant quays take compatible ships
//!    from the head of the priority queue.
//! 3. **Unloading** -- Every 5th minute, docked ships empty their holds
//!    into the warehouse.
//! 4. **Movements** -- Execute and consume every movement whose action time
//!    is the current minute.
//! 5. **Observation** -- Fire every registered evaluator's minute hook.
//!
//! # Identity Pattern
//!
//! Ships and cargo live in per-port registries and are referenced
//! everywhere else by id ([`id::ImoNumber`], [`id::CargoId`]). Holders of
//! an id look the entity up at the point of use, never caching derived
//! state such as carried tonnage.
//!
//! # Key Types
//!
//! - [`port::Port`] -- Owns all simulation state and runs the pipeline.
//! - [`ship::Ship`] -- Bulk carriers and container ships, with docking and
//!   loading eligibility rules.
//! - [`queue::ShipQueue`] -- Offshore queue with flag-based priority.
//! - [`movement::Movement`] -- A scheduled arrival or departure of a ship
//!   or a cargo batch.
//! - [`evaluator::StatisticsEvaluator`] -- Observer seam; implementations
//!   live in the `harborsim-stats` crate.
//! - [`codec`] -- Line-oriented text snapshot encoding and decoding.

pub mod cargo;
pub mod codec;
pub mod evaluator;
pub mod id;
pub mod movement;
pub mod port;
pub mod quay;
pub mod queue;
pub mod registry;
pub mod ship;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
