//! Linear range mapping for control values.

use crate::error::{Error, Result};

/// Maps a closed input range linearly onto an output range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    min_in: f32,
    max_in: f32,
    min_out: f32,
    factor: f32,
}

impl Scaler {
    /// Create a scaler. `min_in` and `max_in` must differ.
    #[must_use]
    pub fn new(min_in: f32, max_in: f32, min_out: f32, max_out: f32) -> Self {
        Self { min_in, max_in, min_out, factor: (max_out - min_out) / (max_in - min_in) }
    }

    /// MIDI data range (0-127) onto 0.0-1.0.
    #[must_use]
    pub fn midi_to_unit() -> Self {
        Self::new(0.0, 127.0, 0.0, 1.0)
    }

    /// Scale a value.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `value` lies outside the input range.
    pub fn scale(&self, value: f32) -> Result<f32> {
        if value < self.min_in || value > self.max_in {
            return Err(Error::OutOfRange { value, min: self.min_in, max: self.max_in });
        }
        Ok((value - self.min_in) * self.factor + self.min_out)
    }
}
