//! Spell gauge: the per-combatant casting resource.

/// Bounded casting resource, `0 <= current <= maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellGauge {
    current: u32,
    maximum: u32,
    regen: u32,
}

impl SpellGauge {
    /// Creates a full gauge.
    pub fn full(maximum: u32, regen: u32) -> Self {
        Self {
            current: maximum,
            maximum,
            regen,
        }
    }

    /// Creates a gauge at `current`, clamped to `maximum`.
    pub fn new(current: u32, maximum: u32, regen: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
            regen,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn regen(&self) -> u32 {
        self.regen
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Deducts `cost`. Returns false and changes nothing if unaffordable.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    /// Adds one round of regeneration, clamped to the maximum.
    pub fn regenerate(&mut self) {
        self.current = self.current.saturating_add(self.regen).min(self.maximum);
    }

    /// Changes the per-round regeneration (e.g. on a new depth).
    pub fn set_regen(&mut self, regen: u32) {
        self.regen = regen;
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerate_clamps_to_maximum() {
        let mut gauge = SpellGauge::new(8, 10, 5);
        gauge.regenerate();
        assert_eq!(gauge.current(), 10);
    }

    #[test]
    fn spend_is_all_or_nothing() {
        let mut gauge = SpellGauge::new(3, 10, 1);
        assert!(!gauge.spend(4));
        assert_eq!(gauge.current(), 3);
        assert!(gauge.spend(3));
        assert_eq!(gauge.current(), 0);
    }

    #[test]
    fn new_clamps_current() {
        assert_eq!(SpellGauge::new(50, 10, 1).current(), 10);
    }
}
