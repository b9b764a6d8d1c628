//! LED Driver abstraction layer
//!
//! The engine is generic over [`LedDriver`], so the same render loop runs
//! against the RMT-backed WS2812 driver on the board and a recording mock in
//! host tests.

use core::fmt::Debug;

use crate::color::Rgb;

/// Abstract LED driver trait
pub trait LedDriver<const N: usize> {
    type Error: Debug;

    /// Push a complete frame to the strip
    fn write(&mut self, colors: &[Rgb; N]) -> Result<(), Self::Error>;
}
