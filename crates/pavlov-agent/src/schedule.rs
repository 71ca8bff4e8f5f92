//! Exploration noise as a function of the learn cycle

/// Noise level to pass to `decide` at a given cycle
pub trait Schedule: Send + Sync {
    /// Noise at `cycle`, never negative
    fn noise(&self, cycle: usize) -> f64;
}

/// Fixed noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSchedule(pub f64);

impl ConstantSchedule {
    /// Create a constant schedule
    #[must_use]
    pub fn new(noise: f64) -> Self {
        Self(noise)
    }
}

impl Schedule for ConstantSchedule {
    fn noise(&self, _cycle: usize) -> f64 {
        self.0.max(0.0)
    }
}

/// Straight line from `from` to `to` over `cycles`, then flat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSchedule {
    from: f64,
    to: f64,
    cycles: usize,
}

impl LinearSchedule {
    /// Create a linear ramp
    #[must_use]
    pub fn new(from: f64, to: f64, cycles: usize) -> Self {
        Self { from, to, cycles }
    }
}

impl Schedule for LinearSchedule {
    fn noise(&self, cycle: usize) -> f64 {
        let noise = match self.cycles {
            0 => self.to,
            n if cycle >= n => self.to,
            n => self.from + (self.to - self.from) * (cycle as f64 / n as f64),
        };
        noise.max(0.0)
    }
}

/// Geometric decay by `factor` per cycle, bounded below by `floor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSchedule {
    initial: f64,
    floor: f64,
    factor: f64,
}

impl ExponentialSchedule {
    /// Create a decaying schedule
    #[must_use]
    pub fn new(initial: f64, floor: f64, factor: f64) -> Self {
        Self {
            initial,
            floor,
            factor,
        }
    }
}

impl Schedule for ExponentialSchedule {
    fn noise(&self, cycle: usize) -> f64 {
        let exponent = i32::try_from(cycle).unwrap_or(i32::MAX);
        (self.initial * self.factor.powi(exponent))
            .max(self.floor)
            .max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_ramp() {
        let schedule = LinearSchedule::new(0.8, 0.2, 100);
        assert_relative_eq!(schedule.noise(0), 0.8);
        assert_relative_eq!(schedule.noise(50), 0.5);
        assert_relative_eq!(schedule.noise(500), 0.2);
        assert_relative_eq!(LinearSchedule::new(1.0, 0.3, 0).noise(0), 0.3);
    }

    #[test]
    fn test_exponential_floor() {
        let schedule = ExponentialSchedule::new(1.0, 0.05, 0.5);
        assert_relative_eq!(schedule.noise(1), 0.5);
        assert_relative_eq!(schedule.noise(10), 0.05);
        assert_relative_eq!(schedule.noise(usize::MAX), 0.05);
    }

    #[test]
    fn test_never_negative() {
        assert_relative_eq!(ConstantSchedule::new(-0.4).noise(3), 0.0);
        assert_relative_eq!(LinearSchedule::new(0.5, -1.0, 10).noise(20), 0.0);
        assert_relative_eq!(ConstantSchedule::new(0.4).noise(1234), 0.4);
    }
}
