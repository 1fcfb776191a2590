//! Persistent step-selection control
//!
//! One control lives for the whole session. Switching models resets its
//! range and value instead of tearing it down and building a new one.

use std::ops::RangeInclusive;

/// Slider-backed step selection bound to `[1, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepControl {
    value: usize,
    max: usize,
}

impl Default for StepControl {
    fn default() -> Self {
        Self { value: 1, max: 1 }
    }
}

impl StepControl {
    pub fn new(max: usize) -> Self {
        let mut control = Self::default();
        control.reset(max);
        control
    }

    /// Rebind the control to `[1, max]` and move it back to step 1
    pub fn reset(&mut self, max: usize) {
        self.max = max.max(1);
        self.value = 1;
    }

    /// Move to `step`; returns false and leaves the value alone when the
    /// step is outside the bound range.
    pub fn set(&mut self, step: usize) -> bool {
        if self.contains(step) {
            self.value = step;
            true
        } else {
            false
        }
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        1..=self.max
    }

    pub fn contains(&self, step: usize) -> bool {
        self.range().contains(&step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_rebinds_range_and_value() {
        let mut control = StepControl::new(25);
        assert!(control.set(17));
        control.reset(3);
        assert_eq!(control.value(), 1);
        assert_eq!(control.range(), 1..=3);
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut control = StepControl::new(3);
        assert!(!control.set(0));
        assert!(!control.set(4));
        assert_eq!(control.value(), 1);
        assert!(control.set(3));
        assert_eq!(control.value(), 3);
    }
}
