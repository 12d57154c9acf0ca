//! Numeric tolerances and iteration bounds.
//!
//! Every [`Vector`](crate::Vector), [`Matrix`](crate::Matrix) and
//! [`SquareMatrix`](crate::SquareMatrix) carries the [`Config`] it was built
//! with, and everything derived from it inherits the same configuration.

use serde::{Deserialize, Serialize};

use crate::Float;
use crate::error::{CoreError, Result};

/// Tolerances used by comparisons, pivot selection and the QR algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Two values closer than this are equal; entries smaller than this are zero.
    pub epsilon: f64,
    /// Eigenvalue multisets are compared at `epsilon * similarity_factor`.
    pub similarity_factor: f64,
    /// Triangularity threshold and noise floor for the QR algorithm's running matrix.
    pub convergence: f64,
    /// Upper bound on QR-algorithm iterations.
    pub max_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            similarity_factor: 100.0,
            convergence: 1e-10,
            max_iterations: 10_000,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// ```
    /// # use lava_core::Config;
    /// let cfg = Config::from_json(r#"{ "epsilon": 1e-6 }"#).unwrap();
    /// assert_eq!(cfg.epsilon, 1e-6);
    /// assert_eq!(cfg.max_iterations, 10_000);
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).map_err(|e| {
            log::warn!("rejecting configuration: {e}");
            CoreError::InvalidArgument {
                reason: "configuration is not valid JSON for Config",
            }
        })?;
        config.validate()
    }

    /// Check that every tolerance is positive and finite.
    pub fn validate(self) -> Result<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.epsilon) || !positive(self.convergence) {
            return Err(CoreError::InvalidArgument {
                reason: "tolerances must be positive and finite",
            });
        }
        if !positive(self.similarity_factor) {
            return Err(CoreError::InvalidArgument {
                reason: "similarity factor must be positive and finite",
            });
        }
        if self.max_iterations == 0 {
            return Err(CoreError::InvalidArgument {
                reason: "max_iterations must be at least 1",
            });
        }
        Ok(self)
    }

    /// Replace the equality tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Replace the multiplier applied to `epsilon` when comparing eigenvalues.
    #[must_use]
    pub fn with_similarity_factor(mut self, similarity_factor: f64) -> Self {
        self.similarity_factor = similarity_factor;
        self
    }

    /// Replace the iteration bound.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// The configuration used for the QR algorithm's running matrix: its
    /// equality tolerance is the convergence tolerance.
    pub(crate) fn for_iteration(self) -> Self {
        Self {
            epsilon: self.convergence,
            ..self
        }
    }

    pub(crate) fn eps<T: Float>(&self) -> T {
        T::from_f64(self.epsilon)
    }

    pub(crate) fn similarity_eps<T: Float>(&self) -> T {
        T::from_f64(self.epsilon * self.similarity_factor)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.epsilon, 1e-4);
        assert_eq!(cfg.similarity_factor, 100.0);
        assert_eq!(cfg.max_iterations, 10_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let cfg =
            Config::from_json(r#"{ "max_iterations": 25, "similarity_factor": 10 }"#).unwrap();
        assert_eq!(cfg.max_iterations, 25);
        assert_eq!(cfg.similarity_factor, 10.0);
        assert_eq!(cfg.epsilon, 1e-4);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(Config::from_json("not json").is_err());
        assert!(Config::from_json(r#"{ "epsilon": -1.0 }"#).is_err());
        assert!(Config::from_json(r#"{ "max_iterations": 0 }"#).is_err());
    }

    #[test]
    fn test_round_trip_through_serde() {
        let cfg = Config::default().with_epsilon(1e-6).with_max_iterations(7);
        let text = serde_json::to_string(&cfg).unwrap();
        assert_eq!(Config::from_json(&text).unwrap(), cfg);
    }

    #[test]
    fn test_for_iteration_swaps_epsilon() {
        let cfg = Config::default().for_iteration();
        assert_eq!(cfg.epsilon, 1e-10);
        assert_eq!(cfg.convergence, 1e-10);
    }
}
