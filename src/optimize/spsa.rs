// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Ref: Spall (1992), IEEE Trans. Autom. Control 37, 332.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::types::{OptimizerState, SpsaConfig, SpsaOutcome};
use crate::error::{Error, Result};
use crate::validation::validate_params;

/// Iterations over which the plateau criterion compares losses.
pub const PLATEAU_WINDOW: usize = 10;

/// SPSA optimizer.
///
/// Each iteration estimates the full gradient from two loss evaluations
/// along a random ±1 direction, independent of dimensionality.
pub struct SpsaOptimizer {
    config: SpsaConfig,
    rng: StdRng,
    state: OptimizerState,
}

impl SpsaOptimizer {
    /// Create a new optimizer with the given configuration.
    pub fn new(config: SpsaConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let rng = seeded_rng(config.seed);
        Ok(Self {
            config,
            rng,
            state: OptimizerState::default(),
        })
    }

    pub fn config(&self) -> &SpsaConfig {
        &self.config
    }

    /// State of the most recent run.
    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    /// Step size a / (k + 1 + A)^α.
    pub fn step_size(&self, k: usize) -> f64 {
        self.config.a / (k as f64 + 1.0 + self.config.stability).powf(self.config.alpha)
    }

    /// Perturbation size c / (k + 1)^γ.
    pub fn perturbation_size(&self, k: usize) -> f64 {
        self.config.c / (k as f64 + 1.0).powf(self.config.gamma)
    }

    /// Clear run state. A configured seed is re-applied so the next run
    /// replays the same perturbation sequence.
    pub fn reset(&mut self) {
        self.state.reset();
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
    }

    /// Minimize `loss` from `initial_params`.
    ///
    /// Runs at most `max_iterations` iterations and stops early once
    /// k > 10 and |history[k] − history[k−10]| < `tolerance`. Reaching the
    /// budget is a normal outcome with `converged == false`.
    ///
    /// # Returns
    /// The best point ever observed (the starting point included) and the
    /// full loss history.
    pub fn optimize<F>(
        &mut self,
        mut loss: F,
        initial_params: &[f64],
        max_iterations: usize,
        tolerance: f64,
    ) -> Result<SpsaOutcome>
    where
        F: FnMut(&[f64]) -> f64,
    {
        validate_params("initial_params", initial_params)?;
        self.reset();

        let dim = initial_params.len();
        let initial_loss = loss(initial_params);
        self.state = OptimizerState::start(initial_params, initial_loss);

        let mut converged = false;
        let mut plus = vec![0.0; dim];
        let mut minus = vec![0.0; dim];

        for k in 0..max_iterations {
            let a_k = self.step_size(k);
            let c_k = self.perturbation_size(k);
            let delta: Vec<f64> = (0..dim)
                .map(|_| if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();

            for i in 0..dim {
                plus[i] = self.state.params[i] + c_k * delta[i];
                minus[i] = self.state.params[i] - c_k * delta[i];
            }
            let diff = loss(&plus) - loss(&minus);

            for i in 0..dim {
                let gradient = diff / (2.0 * c_k * delta[i]);
                self.state.params[i] -= a_k * gradient;
            }

            let current = loss(&self.state.params);
            self.state.record(current);

            debug!(
                iteration = k,
                loss = current,
                best_loss = self.state.best_loss,
                step = a_k,
                perturbation = c_k,
                "SPSA iteration"
            );

            let history = &self.state.loss_history;
            if k > PLATEAU_WINDOW
                && (history[k] - history[k - PLATEAU_WINDOW]).abs() < tolerance
            {
                converged = true;
                break;
            }
        }

        let iterations = self.state.loss_history.len();
        info!(
            iterations,
            best_loss = self.state.best_loss,
            converged,
            "SPSA finished"
        );

        Ok(SpsaOutcome {
            best_params: self.state.best_params.clone(),
            best_loss: self.state.best_loss,
            history: self.state.loss_history.clone(),
            iterations,
            converged,
        })
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
