//! Fixed-step forward Euler integration
//!
//! Every vehicle model advances its state through an `EulerIntegrator`. The
//! integrator only decides how a duration is cut into steps; the model
//! supplies the per-step update.

use crate::common::{RoboticsError, RoboticsResult};

/// Relative slack when counting full steps, so that e.g. 0.3 / 0.1 counts as
/// 3 steps. Only covers rounding error, never a real shortfall.
const STEP_COUNT_RELATIVE_TOLERANCE: f64 = 4.0 * f64::EPSILON;
/// Remainders shorter than this are treated as zero
const MIN_REMAINDER: f64 = 1e-12;

/// What to do with the part of a duration shorter than one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Drop it: a duration below one step produces no motion
    Truncate,
    /// Integrate it as one final shorter step
    Integrate,
}

/// Configuration for the integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    /// Integration step [s]
    pub dt: f64,
    /// Handling of the final partial step
    pub remainder: RemainderPolicy,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            remainder: RemainderPolicy::Truncate,
        }
    }
}

/// Fixed-step explicit Euler integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerIntegrator {
    config: IntegratorConfig,
}

impl EulerIntegrator {
    pub fn new(config: IntegratorConfig) -> RoboticsResult<Self> {
        if !config.dt.is_finite() || config.dt <= 0.0 {
            return Err(RoboticsError::InvalidParameter(format!(
                "integration step must be positive and finite, got {}",
                config.dt
            )));
        }
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: IntegratorConfig::default(),
        }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Number of full steps that fit in `duration`
    pub fn full_steps(&self, duration: f64) -> usize {
        let dt = self.config.dt;
        let limit = duration * (1.0 + STEP_COUNT_RELATIVE_TOLERANCE);
        let mut n = (duration / dt).floor() as usize;
        if (n + 1) as f64 * dt <= limit {
            n += 1;
        }
        while n > 0 && n as f64 * dt > limit {
            n -= 1;
        }
        n
    }

    /// Advance `state` over `duration`, calling `step(state, h)` once per
    /// sub-step of length `h`.
    ///
    /// # Panics
    /// If `duration` is negative or not finite.
    pub fn integrate<S: ?Sized, F>(&self, duration: f64, state: &mut S, mut step: F)
    where
        F: FnMut(&mut S, f64),
    {
        assert!(
            duration.is_finite() && duration >= 0.0,
            "propagation duration must be finite and non-negative, got {}",
            duration
        );
        let dt = self.config.dt;
        let n = self.full_steps(duration);
        for _ in 0..n {
            step(state, dt);
        }
        if self.config.remainder == RemainderPolicy::Integrate {
            let remainder = duration - n as f64 * dt;
            if remainder > MIN_REMAINDER {
                step(state, remainder);
            }
        }
    }
}

impl Default for EulerIntegrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
