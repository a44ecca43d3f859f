//! Lighting fixtures and how they map onto DMX channels

use luxd_core::Program;

use crate::error::{ControlError, Result};

/// Pixels that fit in one DMX universe (512 channels / 3 bytes per pixel)
pub const PIXELS_PER_UNIVERSE: usize = 170;

/// Highest channel index a fixture writes within one universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseSpan {
    pub universe: u16,
    pub max_channel: usize,
}

/// A controllable lighting device mapped onto DMX channels.
pub trait Fixture: Send {
    /// Universes this fixture occupies and the highest channel used in each
    fn footprint(&self) -> Vec<UniverseSpan>;

    /// Write the current colors into one universe's channel buffer
    fn write(&mut self, universe: u16, buffer: &mut [u8]);

    /// Advance the running program one tick
    fn advance(&mut self);

    /// Replace the running program
    fn set_program(&mut self, program: Program);

    /// The program spec string the fixture falls back to on reset
    fn default_spec(&self) -> &str;

    /// Whether assigned programs need per-pixel addressing
    fn wants_stripe_program(&self) -> bool {
        false
    }
}

fn set(buffer: &mut [u8], channel: usize, value: u8) {
    if let Some(slot) = buffer.get_mut(channel) {
        *slot = value;
    }
}

/// A single-color lamp at one DMX address.
///
/// The physical fixtures frame their RGB channels with a zeroed channel on
/// either side (address-1 and address+3), so a lamp occupies five channels.
pub struct Lamp {
    universe: u16,
    address: usize,
    default_spec: String,
    program: Program,
}

impl Lamp {
    /// Create a lamp; the address must be at least 1 so the framing
    /// channel below it exists.
    pub fn new(
        universe: u16,
        address: usize,
        default_spec: impl Into<String>,
        program: Program,
    ) -> Result<Self> {
        if address < 1 {
            return Err(ControlError::InvalidFixture(
                "lamp address must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            universe,
            address,
            default_spec: default_spec.into(),
            program,
        })
    }
}

impl Fixture for Lamp {
    fn footprint(&self) -> Vec<UniverseSpan> {
        vec![UniverseSpan {
            universe: self.universe,
            max_channel: self.address + 3,
        }]
    }

    fn write(&mut self, universe: u16, buffer: &mut [u8]) {
        if universe != self.universe {
            return;
        }
        let color = self.program.current();
        set(buffer, self.address - 1, 0);
        set(buffer, self.address, color.r);
        set(buffer, self.address + 1, color.g);
        set(buffer, self.address + 2, color.b);
        set(buffer, self.address + 3, 0);
    }

    fn advance(&mut self) {
        self.program.advance();
    }

    fn set_program(&mut self, program: Program) {
        self.program = program;
    }

    fn default_spec(&self) -> &str {
        &self.default_spec
    }
}

/// One universe-sized slice of a stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeSegment {
    /// Universe this segment writes into
    pub universe: u16,
    /// First stripe pixel covered by this segment
    pub offset: usize,
    /// Pixels in this segment (at most [`PIXELS_PER_UNIVERSE`])
    pub len: usize,
}

/// An addressable LED stripe of N pixels spanning consecutive universes.
///
/// Pixel data starts at channel 0 of each universe; segment `k` covers
/// stripe pixels `[k*170, k*170 + len)` on universe `start_universe + k`.
pub struct Stripe {
    start_universe: u16,
    pixels: usize,
    default_spec: String,
    program: Program,
}

impl Stripe {
    /// Create a stripe; the program is wrapped into a stripe-capable
    /// decorator if it is not already per-pixel aware.
    pub fn new(
        start_universe: u16,
        pixels: usize,
        default_spec: impl Into<String>,
        program: Program,
    ) -> Result<Self> {
        if pixels == 0 {
            return Err(ControlError::InvalidFixture(
                "stripe needs at least one pixel".to_string(),
            ));
        }
        Ok(Self {
            start_universe,
            pixels,
            default_spec: default_spec.into(),
            program: program.into_stripe(),
        })
    }

    /// Total pixel count
    pub fn pixels(&self) -> usize {
        self.pixels
    }

    /// The universe-sized segments of this stripe, in universe order
    pub fn segments(&self) -> impl Iterator<Item = StripeSegment> + '_ {
        let count = self.pixels.div_ceil(PIXELS_PER_UNIVERSE);
        (0..count).map(move |k| {
            let offset = k * PIXELS_PER_UNIVERSE;
            StripeSegment {
                universe: self.start_universe + k as u16,
                offset,
                len: (self.pixels - offset).min(PIXELS_PER_UNIVERSE),
            }
        })
    }
}

impl Fixture for Stripe {
    fn footprint(&self) -> Vec<UniverseSpan> {
        self.segments()
            .map(|segment| UniverseSpan {
                universe: segment.universe,
                max_channel: segment.len * 3 - 1,
            })
            .collect()
    }

    fn write(&mut self, universe: u16, buffer: &mut [u8]) {
        let Some(segment) = self.segments().find(|s| s.universe == universe) else {
            return;
        };
        for pixel in 0..segment.len {
            let color = self.program.current_at(segment.offset + pixel, self.pixels);
            set(buffer, pixel * 3, color.r);
            set(buffer, pixel * 3 + 1, color.g);
            set(buffer, pixel * 3 + 2, color.b);
        }
    }

    fn advance(&mut self) {
        self.program.advance();
    }

    fn set_program(&mut self, program: Program) {
        self.program = program.into_stripe();
    }

    fn default_spec(&self) -> &str {
        &self.default_spec
    }

    fn wants_stripe_program(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luxd_core::{Color, Generator};

    struct PixelIndexColor;

    impl Generator for PixelIndexColor {
        fn current(&self) -> Color {
            Color::new(0, 0, 0)
        }

        fn advance(&mut self) {}

        fn current_at(&mut self, index: usize, _length: usize) -> Color {
            Color::new((index % 256) as u8, 0, 0)
        }

        fn per_pixel(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_lamp_rejects_address_zero() {
        let result = Lamp::new(0, 0, "red", Program::Constant(Color::BLACK));
        assert!(matches!(result, Err(ControlError::InvalidFixture(_))));
    }

    #[test]
    fn test_lamp_write_frames_rgb_with_zeroes() {
        let mut lamp = Lamp::new(
            0,
            2,
            "red",
            Program::Constant(Color::new(255, 10, 20)),
        )
        .unwrap();
        let mut buffer = vec![9u8; 6];
        lamp.write(0, &mut buffer);
        assert_eq!(buffer, vec![9, 0, 255, 10, 20, 0]);
    }

    #[test]
    fn test_lamp_ignores_other_universes() {
        let mut lamp = Lamp::new(3, 1, "red", Program::Constant(Color::new(1, 1, 1))).unwrap();
        let mut buffer = vec![0u8; 5];
        lamp.write(0, &mut buffer);
        assert_eq!(buffer, vec![0; 5]);
    }

    #[test]
    fn test_stripe_segmentation() {
        let stripe = Stripe::new(
            30,
            400,
            "spec",
            Program::Constant(Color::BLACK),
        )
        .unwrap();
        let segments: Vec<StripeSegment> = stripe.segments().collect();
        assert_eq!(
            segments,
            vec![
                StripeSegment { universe: 30, offset: 0, len: 170 },
                StripeSegment { universe: 31, offset: 170, len: 170 },
                StripeSegment { universe: 32, offset: 340, len: 60 },
            ]
        );
        let footprint = stripe.footprint();
        assert_eq!(footprint[0].max_channel, 509);
        assert_eq!(footprint[2].max_channel, 179);
    }

    #[test]
    fn test_stripe_write_uses_global_pixel_indices() {
        let mut stripe = Stripe::new(
            0,
            200,
            "spec",
            Program::Generator(Box::new(PixelIndexColor)),
        )
        .unwrap();
        let mut buffer = vec![0u8; 30 * 3];
        stripe.write(1, &mut buffer);
        // Second segment starts at stripe pixel 170.
        assert_eq!(buffer[0], 170);
        assert_eq!(buffer[3], 171);
        assert_eq!(buffer[87], 199);
    }

    #[test]
    fn test_stripe_wraps_plain_programs() {
        let stripe = Stripe::new(
            0,
            10,
            "spec",
            Program::Constant(Color::new(5, 6, 7)),
        )
        .unwrap();
        assert!(stripe.program.stripe_aware());
    }
}
