/// A range over a scaled integer domain.
///
/// A raw value is inside the range iff `value / scale` lies in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdrRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub scale: f64,
}

impl SdrRange {
    pub const fn new(min: i64, max: i64, step: i64, scale: f64) -> Self {
        Self {
            min,
            max,
            step,
            scale,
        }
    }

    pub fn is_within_range(&self, value: i64) -> bool {
        let scaled = value as f64 / self.scale;
        scaled >= self.min as f64 && scaled <= self.max as f64
    }

    /// Saturate `value` to the nearest bound. Never fails.
    pub fn clamp_to_range(&self, value: i64) -> i64 {
        let scaled = value as f64 / self.scale;

        if scaled < self.min as f64 {
            let clamped = (self.min as f64 * self.scale) as i64;
            log::warn!("Requested value {value} is below range, clamping to {clamped}");
            clamped
        } else if scaled > self.max as f64 {
            let clamped = (self.max as f64 * self.scale) as i64;
            log::warn!("Requested value {value} is above range, clamping to {clamped}");
            clamped
        } else {
            value
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RangeItem {
    Interval(f64, f64),
    Value(f64),
    /// min, max, step, scale
    Step(f64, f64, f64, f64),
}

/// Public description of supported values, e.g. for frequency or gain queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Range {
    pub items: Vec<RangeItem>,
}

impl Range {
    pub fn new(items: Vec<RangeItem>) -> Self {
        Self { items }
    }

    pub fn min(&self) -> Option<f64> {
        self.items
            .iter()
            .map(|item| match item {
                RangeItem::Interval(min, _) => *min,
                RangeItem::Value(v) => *v,
                RangeItem::Step(min, _, _, scale) => min * scale,
            })
            .reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.items
            .iter()
            .map(|item| match item {
                RangeItem::Interval(_, max) => *max,
                RangeItem::Value(v) => *v,
                RangeItem::Step(_, max, _, scale) => max * scale,
            })
            .reduce(f64::max)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.items.iter().any(|item| match item {
            RangeItem::Interval(min, max) => *min <= value && value <= *max,
            RangeItem::Value(v) => *v == value,
            RangeItem::Step(min, max, _, scale) => min * scale <= value && value <= max * scale,
        })
    }
}

impl From<&SdrRange> for Range {
    fn from(range: &SdrRange) -> Self {
        Range {
            items: vec![RangeItem::Step(
                range.min as f64,
                range.max as f64,
                range.step as f64,
                range.scale,
            )],
        }
    }
}

impl From<SdrRange> for Range {
    fn from(range: SdrRange) -> Self {
        Range::from(&range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TX_GAIN: SdrRange = SdrRange::new(-89750, 0, 250, 0.001);
    const SAMPLE_RATE: SdrRange = SdrRange::new(2083334, 61440000, 1, 1.0);

    #[test]
    fn within_range_uses_scaled_value() {
        assert!(TX_GAIN.is_within_range(-30));
        assert!(TX_GAIN.is_within_range(0));
        assert!(!TX_GAIN.is_within_range(1));
        assert!(!TX_GAIN.is_within_range(-90));
    }

    #[test]
    fn clamp_is_idempotent() {
        for value in [0i64, 1_000_000, 2_083_334, 30_000_000, 61_440_000, 100_000_000] {
            let once = SAMPLE_RATE.clamp_to_range(value);
            assert_eq!(once, SAMPLE_RATE.clamp_to_range(once));
            if SAMPLE_RATE.is_within_range(value) {
                assert_eq!(once, value);
            }
        }
        for value in [-200i64, -90, -89, -10, 0, 5] {
            let once = TX_GAIN.clamp_to_range(value);
            assert_eq!(once, TX_GAIN.clamp_to_range(once));
        }
    }

    #[test]
    fn range_bounds_are_scaled() {
        let range = Range::from(&TX_GAIN);
        assert_eq!(range.max(), Some(0.0));
        assert!((range.min().unwrap_or_default() + 89.75).abs() < 1e-9);
    }
}
