//! One DMX universe's channel buffer

use crate::registry::FixtureRegistry;

/// A DMX universe: a 16-bit id and the channel buffer written into it.
///
/// The buffer is sized to the highest channel any registered fixture uses,
/// reallocated (zero-filled) only when that size changes.
#[derive(Debug)]
pub struct Universe {
    id: u16,
    buffer: Vec<u8>,
}

impl Universe {
    /// Create a universe with an empty buffer
    pub fn new(id: u16) -> Self {
        Self {
            id,
            buffer: Vec::new(),
        }
    }

    /// The universe id
    pub fn id(&self) -> u16 {
        self.id
    }

    /// The channel buffer as last recomputed
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Recompute the buffer by asking every fixture registered to this
    /// universe to write its channels, in registration order.
    ///
    /// Overlapping writes are last-writer-wins on purpose; do not reorder.
    pub fn recompute(&mut self, registry: &mut FixtureRegistry) -> &[u8] {
        let Some(max_channel) = registry.max_channel(self.id) else {
            self.buffer.clear();
            return &self.buffer;
        };
        let size = max_channel + 1;
        if self.buffer.len() != size {
            self.buffer = vec![0u8; size];
        }
        for (_, fixture) in registry.iter_mut() {
            if fixture.footprint().iter().any(|span| span.universe == self.id) {
                fixture.write(self.id, &mut self.buffer);
            }
        }
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{Fixture, Lamp};
    use luxd_core::{Color, Program};

    fn lamp(universe: u16, address: usize, color: Color) -> Box<dyn Fixture> {
        Box::new(Lamp::new(universe, address, "x", Program::Constant(color)).unwrap())
    }

    #[test]
    fn test_recompute_sizes_buffer_from_fixtures() {
        let mut registry = FixtureRegistry::new();
        registry
            .register(1, lamp(0, 2, Color::new(255, 0, 0)))
            .unwrap();
        let mut universe = Universe::new(0);
        universe.recompute(&mut registry);
        assert_eq!(universe.buffer().len(), 6);
        assert_eq!(universe.buffer(), &[0, 0, 255, 0, 0, 0]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut registry = FixtureRegistry::new();
        registry
            .register(1, lamp(0, 4, Color::new(10, 20, 30)))
            .unwrap();
        let mut universe = Universe::new(0);
        let first = universe.recompute(&mut registry).to_vec();
        let second = universe.recompute(&mut registry).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overlapping_fixtures_last_writer_wins() {
        let mut registry = FixtureRegistry::new();
        registry
            .register(1, lamp(0, 2, Color::new(100, 100, 100)))
            .unwrap();
        // Overlaps the first lamp's blue channel (4) with its framing zero.
        registry
            .register(2, lamp(0, 5, Color::new(200, 0, 0)))
            .unwrap();
        let mut universe = Universe::new(0);
        universe.recompute(&mut registry);
        assert_eq!(universe.buffer()[4], 0);
        assert_eq!(universe.buffer()[5], 200);
    }

    #[test]
    fn test_universe_without_fixtures_has_empty_buffer() {
        let mut registry = FixtureRegistry::new();
        let mut universe = Universe::new(3);
        assert!(universe.recompute(&mut registry).is_empty());
    }
}
