//! The offshore waiting line and its dispatch priority policy.
//!
//! The queue itself is a plain insertion-ordered list and is never sorted.
//! Priority is a *selection* applied lazily at peek time: ship status flags
//! can change between insertion and dispatch, so the ranking is always
//! computed against the live ship store. Relative order among the waiting
//! ships is never disturbed by peeking.

use crate::id::ImoNumber;
use crate::registry::ShipRegistry;
use crate::ship::{NauticalFlag, Ship};

/// Ships waiting offshore for a quay, in arrival order.
///
/// Two queues are equal iff they hold the same ships in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ShipQueue {
    waiting: Vec<ImoNumber>,
}

impl ShipQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a ship to the back of the queue.
    pub fn push(&mut self, imo: ImoNumber) {
        self.waiting.push(imo);
    }

    /// The ship that would be dispatched next, without removing it.
    ///
    /// Evaluated as a sequence of filters over the current queue contents,
    /// each returning the earliest-inserted match:
    ///
    /// 1. a ship flying Bravo (dangerous cargo),
    /// 2. else a ship flying Whiskey (medical assistance),
    /// 3. else a ship flying Hotel (ready to dock),
    /// 4. else a container ship,
    /// 5. else the head of the queue.
    ///
    /// Returns `None` for an empty queue.
    pub fn peek(&self, ships: &ShipRegistry) -> Option<ImoNumber> {
        if self.waiting.is_empty() {
            return None;
        }
        self.first_where(ships, |s| s.flag() == NauticalFlag::Bravo)
            .or_else(|| self.first_where(ships, |s| s.flag() == NauticalFlag::Whiskey))
            .or_else(|| self.first_where(ships, |s| s.flag() == NauticalFlag::Hotel))
            .or_else(|| self.first_where(ships, Ship::is_container_ship))
            .or_else(|| self.waiting.first().copied())
    }

    /// Remove and return the ship [`ShipQueue::peek`] selects.
    pub fn take_next(&mut self, ships: &ShipRegistry) -> Option<ImoNumber> {
        let imo = self.peek(ships)?;
        if let Some(pos) = self.waiting.iter().position(|&w| w == imo) {
            self.waiting.remove(pos);
        }
        Some(imo)
    }

    /// The waiting ships in arrival order.
    pub fn ships(&self) -> &[ImoNumber] {
        &self.waiting
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    fn first_where(
        &self,
        ships: &ShipRegistry,
        pred: impl Fn(&Ship) -> bool,
    ) -> Option<ImoNumber> {
        self.waiting
            .iter()
            .copied()
            .find(|&imo| ships.get(imo).is_some_and(&pred))
    }
}
