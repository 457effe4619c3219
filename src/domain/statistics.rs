use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// How a negative wait time is recorded.
///
/// A wait is negative when the clock dispatches a request before its arrival
/// timestamp, e.g. when the first row arrives after second 0 and the server is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitPolicy {
    /// Keep the raw `dispatch_second - timestamp`, negative values included.
    #[default]
    Signed,
    /// Record `max(0, dispatch_second - timestamp)`.
    ClampToZero,
}

impl WaitPolicy {
    pub fn apply(&self, wait: i64) -> i64 {
        match self {
            WaitPolicy::Signed => wait,
            WaitPolicy::ClampToZero => wait.max(0),
        }
    }
}

impl FromStr for WaitPolicy {
    type Err = Error;

    fn from_str(policy: &str) -> Result<WaitPolicy> {
        match policy {
            "signed" => Ok(WaitPolicy::Signed),
            "clamp-to-zero" => Ok(WaitPolicy::ClampToZero),
            _ => Err(Error::ConfigError(format!("unknown wait policy '{}'", policy))),
        }
    }
}

/// Wait time of every dispatched request, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitTimeSamples {
    samples: Vec<i64>,
    policy: WaitPolicy,
}

impl WaitTimeSamples {
    pub fn new(policy: WaitPolicy) -> Self {
        Self { samples: Vec::new(), policy }
    }

    /// Records one wait after applying the wait policy and returns the stored value.
    pub fn record(&mut self, wait: i64) -> i64 {
        let wait = self.policy.apply(wait);
        self.samples.push(wait);
        wait
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.samples
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Sum of all samples, accumulated in `i128`.
    pub fn total(&self) -> i128 {
        self.samples.iter().map(|&w| w as i128).sum()
    }

    pub fn min(&self) -> Option<i64> {
        self.samples.iter().copied().min()
    }

    pub fn max(&self) -> Option<i64> {
        self.samples.iter().copied().max()
    }

    /// Arithmetic mean of all samples.
    ///
    /// Fails with [`Error::EmptyInput`] when nothing was dispatched.
    pub fn average(&self) -> Result<f64> {
        if self.samples.is_empty() {
            return Err(Error::EmptyInput);
        }

        Ok(self.total() as f64 / self.samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_samples() {
        let mut samples = WaitTimeSamples::new(WaitPolicy::Signed);
        for wait in [0, 4, 6] {
            samples.record(wait);
        }

        let average = samples.average().unwrap();
        assert!((average - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(samples.total(), 10);
        assert_eq!(samples.min(), Some(0));
        assert_eq!(samples.max(), Some(6));
    }

    #[test]
    fn test_average_of_empty_samples_is_an_error() {
        let samples = WaitTimeSamples::new(WaitPolicy::Signed);

        assert!(matches!(samples.average(), Err(Error::EmptyInput)));
        assert_eq!(samples.min(), None);
    }

    #[test]
    fn test_total_of_extreme_waits_does_not_overflow() {
        let mut samples = WaitTimeSamples::new(WaitPolicy::Signed);
        samples.record(-i64::MAX);
        samples.record(1 - i64::MAX);

        assert_eq!(samples.total(), 1 - 2 * i64::MAX as i128);
        let average = samples.average().unwrap();
        assert!((average / -(i64::MAX as f64) - 1.0).abs() < 1e-12, "average {}", average);
    }

    #[test]
    fn test_signed_policy_keeps_negative_waits() {
        let mut samples = WaitTimeSamples::new(WaitPolicy::Signed);

        assert_eq!(samples.record(-3), -3);
        assert_eq!(samples.record(1), 1);
        assert_eq!(samples.as_slice(), &[-3, 1]);
        assert_eq!(samples.average().unwrap(), -1.0);
    }

    #[test]
    fn test_clamp_policy_floors_negative_waits() {
        let mut samples = WaitTimeSamples::new(WaitPolicy::ClampToZero);

        assert_eq!(samples.record(-3), 0);
        assert_eq!(samples.record(2), 2);
        assert_eq!(samples.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_wait_policy_from_str() {
        assert_eq!("signed".parse::<WaitPolicy>().unwrap(), WaitPolicy::Signed);
        assert_eq!("clamp-to-zero".parse::<WaitPolicy>().unwrap(), WaitPolicy::ClampToZero);
        assert!("clamp".parse::<WaitPolicy>().is_err());
    }
}
