// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Two-phase optimizer: SPSA exploration followed by natural-gradient
//! refinement.

use ndarray::Array1;
use num_complex::Complex64;
use tracing::{debug, info};

use super::qng::QngOptimizer;
use super::spsa::{SpsaOptimizer, PLATEAU_WINDOW};
use super::types::{HybridConfig, HybridOutcome, HybridReport};
use crate::error::{Error, Result};
use crate::validation::validate_params;

/// Hybrid optimizer owning one SPSA and one QNG instance.
pub struct HybridOptimizer {
    config: HybridConfig,
    spsa: SpsaOptimizer,
    qng: QngOptimizer,
}

impl HybridOptimizer {
    /// Create a new optimizer with the given configuration.
    pub fn new(config: HybridConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let spsa = SpsaOptimizer::new(config.spsa.clone())?;
        let qng = QngOptimizer::new(config.qng.clone())?;
        Ok(Self { config, spsa, qng })
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Reset both inner optimizers.
    pub fn reset(&mut self) {
        self.spsa.reset();
        self.qng.reset();
    }

    /// Minimize `loss` from `initial_params`.
    ///
    /// Phase one always runs SPSA for `spsa_iterations`. Phase two runs only
    /// when SPSA produced more than ten losses and improved by more than
    /// `switch_threshold` (first minus last). It starts from the SPSA best
    /// point and, for `qng_iterations` steps, takes a natural-gradient step
    /// along a centered finite-difference gradient of `loss`. The returned
    /// loss is the SPSA best, lowered by any phase-two improvement.
    pub fn optimize<F, S>(
        &mut self,
        mut loss: F,
        state_fn: &S,
        initial_params: &[f64],
    ) -> Result<HybridOutcome>
    where
        F: FnMut(&[f64]) -> f64,
        S: Fn(&[f64]) -> Array1<Complex64> + ?Sized,
    {
        validate_params("initial_params", initial_params)?;
        self.reset();

        let first = self.spsa.optimize(
            &mut loss,
            initial_params,
            self.config.spsa_iterations,
            self.config.spsa_tolerance,
        )?;

        let mut params = first.best_params;
        let mut best_loss = first.best_loss;
        let mut report = HybridReport {
            spsa_history: first.history,
            ..HybridReport::default()
        };

        let improvement = match (report.spsa_history.first(), report.spsa_history.last()) {
            (Some(head), Some(tail)) => head - tail,
            _ => 0.0,
        };
        if report.spsa_history.len() > PLATEAU_WINDOW && improvement > self.config.switch_threshold
        {
            info!(
                spsa_iterations = report.spsa_history.len(),
                improvement,
                best_loss,
                "Switching to natural-gradient phase"
            );
            report.switched = true;

            for step in 0..self.config.qng_iterations {
                let gradient =
                    central_difference_gradient(&mut loss, &params, self.config.gradient_delta);
                params = self.qng.optimize_step(&params, &gradient, state_fn)?;
                let current = loss(&params);
                report.qng_history.push(current);
                if current < best_loss {
                    best_loss = current;
                }
                debug!(step, loss = current, best_loss, "QNG phase step");
            }
        }

        report.total_iterations = report.spsa_history.len() + report.qng_history.len();
        info!(
            total_iterations = report.total_iterations,
            switched = report.switched,
            best_loss,
            "Hybrid optimization finished"
        );

        Ok(HybridOutcome {
            params,
            best_loss,
            report,
        })
    }
}

/// Centered finite-difference gradient, (f(x+δeᵢ) − f(x−δeᵢ)) / 2δ.
pub fn central_difference_gradient<F>(mut loss: F, params: &[f64], delta: f64) -> Vec<f64>
where
    F: FnMut(&[f64]) -> f64,
{
    let mut shifted = params.to_vec();
    (0..params.len())
        .map(|i| {
            shifted[i] = params[i] + delta;
            let forward = loss(&shifted);
            shifted[i] = params[i] - delta;
            let backward = loss(&shifted);
            shifted[i] = params[i];
            (forward - backward) / (2.0 * delta)
        })
        .collect()
}
