//! Parameter ranges with clamp-and-log semantics.
//!
//! Out-of-range durations, frequencies and gains are never an error here:
//! they are pulled back into range and, with the `tracing` feature, logged
//! at debug level as an invalid parameter.

/// Inclusive numeric range for a named synthesis parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Parameter name used in log output.
    pub name: &'static str,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl ParamRange {
    /// Create a range. Bounds are swapped if given in the wrong order.
    pub const fn new(name: &'static str, min: f32, max: f32) -> Self {
        if min <= max {
            Self { name, min, max }
        } else {
            Self {
                name,
                min: max,
                max: min,
            }
        }
    }

    /// True if `value` lies inside the range.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the range.
    ///
    /// Non-finite input maps to the lower bound.
    ///
    /// ```rust
    /// use metro_core::ParamRange;
    ///
    /// const CRUISE: ParamRange = ParamRange::new("cruise_secs", 10.0, 18.0);
    /// assert_eq!(CRUISE.clamp(30.0), 18.0);
    /// assert_eq!(CRUISE.clamp(f32::NAN), 10.0);
    /// ```
    pub fn clamp(&self, value: f32) -> f32 {
        if self.contains(value) {
            return value;
        }
        let clamped = if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.min
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            param = self.name,
            value,
            clamped,
            "invalid parameter clamped into range"
        );
        clamped
    }

    /// Map `t` in [0, 1] onto the range.
    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t.clamp(0.0, 1.0)
    }

    /// Midpoint of the range.
    #[inline]
    pub fn mid(&self) -> f32 {
        self.at(0.5)
    }
}
