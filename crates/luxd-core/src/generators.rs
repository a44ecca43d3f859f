//! Compiled-in animation generators
//!
//! Named program constructors, looked up by the resolver as the last
//! resolution step before sequence files. These replace externally loaded
//! program code with statically linked implementations.

use std::collections::HashMap;

use crate::color::Color;
use crate::program::{Generator, Program};

/// Constructor table for the builtin generators, keyed by spec name.
pub fn builtins() -> HashMap<&'static str, fn() -> Program> {
    let mut table: HashMap<&'static str, fn() -> Program> = HashMap::new();
    table.insert("backgroundc", || {
        Program::Generator(Box::new(ColorRamp::default())).scrolled()
    });
    table.insert("backgroundd", || {
        Program::Generator(Box::new(Alternate::default())).scrolled()
    });
    table
}

const RAMP_STEPS: u32 = 256;
const RAMP_HOLD: u32 = 30;
const RAMP_PERIOD: u32 = RAMP_STEPS * 3 + RAMP_HOLD;

/// Ramps red, then green, then blue up from black, holds yellow briefly,
/// then starts over.
#[derive(Debug, Default)]
pub struct ColorRamp {
    t: u32,
}

impl Generator for ColorRamp {
    fn current(&self) -> Color {
        let t = self.t;
        if t < RAMP_STEPS {
            Color::new(t as u8, 0, 0)
        } else if t < RAMP_STEPS * 2 {
            Color::new(0, (t - RAMP_STEPS) as u8, 0)
        } else if t < RAMP_STEPS * 3 {
            Color::new(0, 0, (t - RAMP_STEPS * 2) as u8)
        } else {
            Color::new(255, 255, 0)
        }
    }

    fn advance(&mut self) {
        self.t = (self.t + 1) % RAMP_PERIOD;
    }
}

/// Alternating red/green cells that swap every tick.
#[derive(Debug, Default)]
pub struct Alternate {
    t: usize,
}

impl Alternate {
    fn cell(&self, index: usize) -> Color {
        if (self.t + index) % 2 == 1 {
            Color::new(200, 0, 0)
        } else {
            Color::new(0, 200, 0)
        }
    }
}

impl Generator for Alternate {
    fn current(&self) -> Color {
        self.cell(0)
    }

    fn advance(&mut self) {
        self.t = self.t.wrapping_add(1);
    }

    fn current_at(&mut self, index: usize, _length: usize) -> Color {
        self.cell(index)
    }

    fn per_pixel(&self) -> bool {
        true
    }
}
