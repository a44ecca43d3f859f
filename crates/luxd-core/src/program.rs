//! Animation program state machines
//!
//! A [`Program`] produces the current color of a fixture and advances one
//! step per tick. Stripe-aware variants additionally answer per-pixel
//! queries via [`Program::current_at`].

use std::fmt;

use crate::color::Color;
use crate::error::{EngineError, Result};

/// Open extension point for compiled-in animation generators.
///
/// Generators replace the old habit of loading program files as code: they
/// are registered by name at build time (see [`crate::generators`]).
pub trait Generator: Send {
    /// The generator's current color
    fn current(&self) -> Color;

    /// Advance one tick
    fn advance(&mut self);

    /// Per-pixel color for stripe-aware generators.
    ///
    /// The default ignores the pixel index.
    fn current_at(&mut self, index: usize, length: usize) -> Color {
        let _ = (index, length);
        self.current()
    }

    /// Whether `current_at` varies per pixel
    fn per_pixel(&self) -> bool {
        false
    }
}

/// A playable lighting animation.
pub enum Program {
    /// One fixed color, `advance` is a no-op
    Constant(Color),
    /// A circular list of colors
    Sequence(Sequence),
    /// Decorator that answers per-pixel queries with the inner program's
    /// single color
    StripeConstant(Box<Program>),
    /// Decorator that flows the inner program's colors along a stripe
    StripeScroll(StripeScroll),
    /// A compiled-in generator
    Generator(Box<dyn Generator>),
}

impl Program {
    /// The color the program shows right now
    pub fn current(&self) -> Color {
        match self {
            Program::Constant(color) => *color,
            Program::Sequence(sequence) => sequence.current(),
            Program::StripeConstant(inner) => inner.current(),
            Program::StripeScroll(scroll) => scroll.current(),
            Program::Generator(generator) => generator.current(),
        }
    }

    /// Advance the animation one step
    pub fn advance(&mut self) {
        match self {
            Program::Constant(_) => {}
            Program::Sequence(sequence) => sequence.advance(),
            Program::StripeConstant(inner) => inner.advance(),
            Program::StripeScroll(scroll) => scroll.advance(),
            Program::Generator(generator) => generator.advance(),
        }
    }

    /// The color at one pixel of a stripe with `length` pixels.
    ///
    /// Programs without per-pixel addressing return `current()` for every
    /// index.
    pub fn current_at(&mut self, index: usize, length: usize) -> Color {
        match self {
            Program::StripeConstant(inner) => inner.current(),
            Program::StripeScroll(scroll) => scroll.current_at(index, length),
            Program::Generator(generator) => generator.current_at(index, length),
            other => other.current(),
        }
    }

    /// Whether the program answers per-pixel queries on its own
    pub fn stripe_aware(&self) -> bool {
        match self {
            Program::StripeConstant(_) | Program::StripeScroll(_) => true,
            Program::Generator(generator) => generator.per_pixel(),
            _ => false,
        }
    }

    /// Wrap into a stripe-capable program unless it already is one
    pub fn into_stripe(self) -> Program {
        if self.stripe_aware() {
            self
        } else {
            Program::StripeConstant(Box::new(self))
        }
    }

    /// Wrap into a [`StripeScroll`] that flows this program along a stripe
    pub fn scrolled(self) -> Program {
        Program::StripeScroll(StripeScroll::new(self))
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Constant(color) => f.debug_tuple("Constant").field(color).finish(),
            Program::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
            Program::StripeConstant(inner) => {
                f.debug_tuple("StripeConstant").field(inner).finish()
            }
            Program::StripeScroll(scroll) => f.debug_tuple("StripeScroll").field(scroll).finish(),
            Program::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// An ordered, non-empty list of colors with a circular cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    colors: Vec<Color>,
    cursor: usize,
}

impl Sequence {
    /// Create a sequence; fails on an empty color list.
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(EngineError::EmptyProgram("sequence".to_string()));
        }
        Ok(Self { colors, cursor: 0 })
    }

    /// The color under the cursor
    pub fn current(&self) -> Color {
        self.colors[self.cursor]
    }

    /// Move the cursor forward, wrapping to the start
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.colors.len();
    }

    /// Number of colors in the sequence
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false, construction rejects empty lists
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Flows an inner program's colors along a stripe.
///
/// A ring buffer holds one color per pixel. Each `advance` advances the
/// inner program, writes its new color into the slot the head pointer is
/// vacating and shifts the head backward by one, so existing colors drift
/// toward pixel 0 while fresh colors enter at the far end.
#[derive(Debug)]
pub struct StripeScroll {
    inner: Box<Program>,
    ring: Vec<Color>,
    head: usize,
}

impl StripeScroll {
    /// Wrap a program; the ring grows lazily on first per-pixel use.
    pub fn new(inner: Program) -> Self {
        Self {
            inner: Box::new(inner),
            ring: Vec::new(),
            head: 0,
        }
    }

    /// The color at pixel 0
    pub fn current(&self) -> Color {
        if self.ring.is_empty() {
            self.inner.current()
        } else {
            self.ring[self.head]
        }
    }

    /// The color at `index` of a stripe with `length` pixels
    pub fn current_at(&mut self, index: usize, length: usize) -> Color {
        self.ensure_len(length);
        let len = self.ring.len();
        self.ring[(self.head + len - index % len) % len]
    }

    /// Advance the inner program and shift the ring by one pixel
    pub fn advance(&mut self) {
        self.inner.advance();
        if self.ring.is_empty() {
            return;
        }
        let len = self.ring.len();
        self.ring[self.head] = self.inner.current();
        self.head = (self.head + len - 1) % len;
    }

    fn ensure_len(&mut self, length: usize) {
        while self.ring.len() < length.max(1) {
            self.ring.push(self.inner.current());
        }
    }
}
