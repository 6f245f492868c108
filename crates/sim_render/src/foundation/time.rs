//! Simulation time carried by the update stream

/// Simulation timestamp as reported by pose batch messages
///
/// Scenes are stamped with the time of the last pose batch applied to them,
/// so backends can interpolate or display the simulated clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimTime {
    /// Whole seconds
    pub sec: i32,

    /// Nanoseconds past the second
    pub nsec: i32,
}

impl SimTime {
    /// Create a timestamp from seconds and nanoseconds
    pub const fn new(sec: i32, nsec: i32) -> Self {
        Self { sec, nsec }
    }

    /// Timestamp as fractional seconds
    pub fn as_secs_f64(&self) -> f64 {
        f64::from(self.sec) + f64::from(self.nsec) * 1e-9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time_ordering() {
        assert!(SimTime::new(1, 0) > SimTime::new(0, 999_999_999));
        assert!(SimTime::new(1, 500) > SimTime::new(1, 400));
    }

    #[test]
    fn test_as_secs() {
        let time = SimTime::new(2, 500_000_000);
        assert!((time.as_secs_f64() - 2.5).abs() < 1e-12);
    }
}
