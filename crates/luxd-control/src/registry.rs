//! Fixture registry
//!
//! Maps external fixture ids to lamps and stripes. Iteration order is
//! registration order; later registrations win when fixtures overlap on a
//! channel, and universe recomputation relies on that.

use std::collections::HashMap;

use crate::error::{ControlError, Result};
use crate::fixture::Fixture;

/// Owning collection of fixtures, keyed by external id.
#[derive(Default)]
pub struct FixtureRegistry {
    fixtures: Vec<(u32, Box<dyn Fixture>)>,
    index: HashMap<u32, usize>,
}

impl FixtureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixture; fails if the id is taken
    pub fn register(&mut self, id: u32, fixture: Box<dyn Fixture>) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(ControlError::DuplicateFixture(id));
        }
        self.index.insert(id, self.fixtures.len());
        self.fixtures.push((id, fixture));
        Ok(())
    }

    /// Look up a fixture by id
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Box<dyn Fixture>> {
        let position = *self.index.get(&id)?;
        Some(&mut self.fixtures[position].1)
    }

    /// Whether an id is registered
    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    /// Fixtures in registration order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut Box<dyn Fixture>)> {
        self.fixtures.iter_mut().map(|(id, fixture)| (*id, fixture))
    }

    /// Highest channel any fixture uses in a universe, if any fixture
    /// writes there at all
    pub fn max_channel(&self, universe: u16) -> Option<usize> {
        self.fixtures
            .iter()
            .flat_map(|(_, fixture)| fixture.footprint())
            .filter(|span| span.universe == universe)
            .map(|span| span.max_channel)
            .max()
    }

    /// Number of registered fixtures
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Lamp;
    use luxd_core::{Color, Program};

    fn lamp(universe: u16, address: usize) -> Box<dyn Fixture> {
        Box::new(Lamp::new(universe, address, "red", Program::Constant(Color::BLACK)).unwrap())
    }

    #[test]
    fn test_register_rejects_duplicate_ids() {
        let mut registry = FixtureRegistry::new();
        registry.register(2, lamp(0, 2)).unwrap();
        assert!(matches!(
            registry.register(2, lamp(0, 10)),
            Err(ControlError::DuplicateFixture(2))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iteration_is_registration_order() {
        let mut registry = FixtureRegistry::new();
        registry.register(9, lamp(0, 2)).unwrap();
        registry.register(1, lamp(0, 8)).unwrap();
        registry.register(4, lamp(0, 14)).unwrap();
        let ids: Vec<u32> = registry.iter_mut().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![9, 1, 4]);
    }

    #[test]
    fn test_max_channel_per_universe() {
        let mut registry = FixtureRegistry::new();
        registry.register(1, lamp(0, 2)).unwrap();
        registry.register(2, lamp(0, 30)).unwrap();
        registry.register(3, lamp(7, 5)).unwrap();
        assert_eq!(registry.max_channel(0), Some(33));
        assert_eq!(registry.max_channel(7), Some(8));
        assert_eq!(registry.max_channel(1), None);
    }
}
