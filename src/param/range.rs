//! Value ranges for [`FloatParam`][super::FloatParam]s.

/// How a float parameter's plain values map onto the normalized `[0, 1]` range. Both endpoints are
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatRange {
    /// Plain values are spread evenly over the normalized range.
    Linear { min: f32, max: f32 },
    /// The normalized value is the linear proportion raised to `factor`. Factors between 0 and 1
    /// give more of the normalized range to the start of the range, factors above 1 give more to
    /// the end. [`FloatRange::skew_factor()`] is usually easier to reason about.
    Skewed { min: f32, max: f32, factor: f32 },
    /// Skewed away from `center` in both directions. `center` always normalizes to 0.5.
    SymmetricalSkewed {
        min: f32,
        max: f32,
        factor: f32,
        center: f32,
    },
}

impl Default for FloatRange {
    fn default() -> Self {
        Self::Linear { min: 0.0, max: 1.0 }
    }
}

impl FloatRange {
    /// A skew factor from a skew amount. Positive amounts widen the end of the range, negative
    /// amounts widen the start, and 0 is linear.
    pub fn skew_factor(amount: f32) -> f32 {
        2.0f32.powf(amount)
    }

    pub fn min(&self) -> f32 {
        self.bounds().0
    }

    pub fn max(&self) -> f32 {
        self.bounds().1
    }

    /// Map a plain value to `[0, 1]`. Values outside of the range are clamped.
    pub fn normalize(&self, plain: f32) -> f32 {
        let proportion = self.proportion(plain).clamp(0.0, 1.0);
        match *self {
            FloatRange::Linear { .. } => proportion,
            FloatRange::Skewed { factor, .. } => proportion.powf(factor),
            FloatRange::SymmetricalSkewed { factor, center, .. } => {
                let center = self.proportion(center);
                if proportion > center {
                    // The upper part is skewed on its own and then squeezed into [0.5, 1]
                    0.5 + ((proportion - center) / (1.0 - center)).powf(factor) * 0.5
                } else {
                    // The lower part is mirrored first so it also gets skewed away from the center
                    0.5 - ((center - proportion) / center).powf(factor) * 0.5
                }
            }
        }
    }

    /// Map a normalized value back to a plain value. The normalized value is clamped to `[0, 1]`.
    pub fn unnormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let proportion = match *self {
            FloatRange::Linear { .. } => normalized,
            FloatRange::Skewed { factor, .. } => normalized.powf(factor.recip()),
            FloatRange::SymmetricalSkewed { factor, center, .. } => {
                let center = self.proportion(center);
                if normalized > 0.5 {
                    center + ((normalized - 0.5) * 2.0).powf(factor.recip()) * (1.0 - center)
                } else {
                    center - ((0.5 - normalized) * 2.0).powf(factor.recip()) * center
                }
            }
        };

        self.from_proportion(proportion)
    }

    /// Round a value to the nearest multiple of `step_size`, staying within the range.
    pub fn snap_to_step(&self, value: f32, step_size: f32) -> f32 {
        ((value / step_size).round() * step_size).clamp(self.min(), self.max())
    }

    fn bounds(&self) -> (f32, f32) {
        match *self {
            FloatRange::Linear { min, max }
            | FloatRange::Skewed { min, max, .. }
            | FloatRange::SymmetricalSkewed { min, max, .. } => (min, max),
        }
    }

    /// Where `plain` lies between the minimum and the maximum. Not clamped.
    fn proportion(&self, plain: f32) -> f32 {
        let (min, max) = self.bounds();
        (plain - min) / (max - min)
    }

    fn from_proportion(&self, proportion: f32) -> f32 {
        let (min, max) = self.bounds();
        min + proportion * (max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GAIN: FloatRange = FloatRange::Linear {
        min: -30.0,
        max: 30.0,
    };

    fn frequency(amount: f32) -> FloatRange {
        FloatRange::Skewed {
            min: 20.0,
            max: 20_000.0,
            factor: FloatRange::skew_factor(amount),
        }
    }

    fn pan(amount: f32) -> FloatRange {
        FloatRange::SymmetricalSkewed {
            min: -1.0,
            max: 3.0,
            factor: FloatRange::skew_factor(amount),
            center: 0.0,
        }
    }

    #[test]
    fn linear_gain() {
        assert_eq!(GAIN.normalize(0.0), 0.5);
        assert_eq!(GAIN.normalize(15.0), 0.75);
        assert_eq!(GAIN.unnormalize(0.25), -15.0);
        assert_eq!(GAIN.unnormalize(1.0), 30.0);
        assert_eq!((GAIN.min(), GAIN.max()), (-30.0, 30.0));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(GAIN.normalize(-100.0), 0.0);
        assert_eq!(GAIN.normalize(100.0), 1.0);
        assert_eq!(GAIN.unnormalize(-0.5), -30.0);
        assert_eq!(GAIN.unnormalize(2.0), 30.0);

        assert_eq!(frequency(-2.0).normalize(5.0), 0.0);
        assert_eq!(pan(1.0).normalize(4.0), 1.0);
    }

    #[test]
    fn skewed_widens_the_start() {
        let range = frequency(-2.0);
        // The first tenth of the plain range takes up more than half of the normalized range
        assert!(range.normalize(2018.0) > 0.5);
        assert_relative_eq!(range.unnormalize(range.normalize(1000.0)), 1000.0, epsilon = 1e-2);
    }

    #[test]
    fn unskewed_is_linear() {
        let skewed = frequency(0.0);
        let linear = FloatRange::Linear {
            min: 20.0,
            max: 20_000.0,
        };
        assert_relative_eq!(skewed.normalize(5000.0), linear.normalize(5000.0));
        assert_relative_eq!(skewed.unnormalize(0.3), linear.unnormalize(0.3));
    }

    #[test]
    fn symmetrical_center_is_half() {
        for amount in [-2.0, 0.0, 1.5] {
            let range = pan(amount);
            assert_eq!(range.normalize(0.0), 0.5);
            assert_eq!(range.unnormalize(0.5), 0.0);
        }
    }

    #[test]
    fn symmetrical_round_trip_on_both_sides() {
        let range = pan(-1.0);
        for plain in [-0.75, -0.2, 0.4, 2.5] {
            assert_relative_eq!(range.unnormalize(range.normalize(plain)), plain, epsilon = 1e-5);
        }
        assert!(range.normalize(-0.5) < 0.5);
        assert!(range.normalize(1.5) > 0.5);
    }

    #[test]
    fn step_snapping() {
        assert_eq!(GAIN.snap_to_step(12.3, 5.0), 10.0);
        assert_eq!(GAIN.snap_to_step(-12.5, 1.0), -13.0);
        assert_eq!(GAIN.snap_to_step(29.0, 7.0), 28.0);
        // The nearest step may lie outside of the range
        assert_eq!(GAIN.snap_to_step(29.9, 40.0), 30.0);
    }
}
