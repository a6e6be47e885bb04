// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Optimizer configuration, state and outcome types.

use serde::{Deserialize, Serialize};

/// Configuration for the SPSA optimizer.
///
/// Gain sequences: step(k) = a / (k + 1 + A)^α, perturbation(k) = c / (k + 1)^γ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpsaConfig {
    /// Step scale `a`.
    #[serde(default = "default_spsa_a")]
    pub a: f64,
    /// Perturbation scale `c`.
    #[serde(default = "default_spsa_c")]
    pub c: f64,
    /// Step decay exponent α.
    #[serde(default = "default_spsa_alpha")]
    pub alpha: f64,
    /// Perturbation decay exponent γ.
    #[serde(default = "default_spsa_gamma")]
    pub gamma: f64,
    /// Stability offset `A`.
    #[serde(default)]
    pub stability: f64,
    /// Seed for the perturbation source. Drawn from entropy when `None`.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SpsaConfig {
    fn default() -> Self {
        Self {
            a: default_spsa_a(),
            c: default_spsa_c(),
            alpha: default_spsa_alpha(),
            gamma: default_spsa_gamma(),
            stability: 0.0,
            seed: None,
        }
    }
}

impl SpsaConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.a.is_finite() && self.a > 0.0) {
            return Err("spsa.a must be finite and > 0".into());
        }
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err("spsa.c must be finite and > 0".into());
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err("spsa.alpha must be finite and > 0".into());
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err("spsa.gamma must be finite and > 0".into());
        }
        if !(self.stability.is_finite() && self.stability >= 0.0) {
            return Err("spsa.stability must be finite and >= 0".into());
        }
        Ok(())
    }
}

fn default_spsa_a() -> f64 {
    0.16
}

fn default_spsa_c() -> f64 {
    0.1
}

fn default_spsa_alpha() -> f64 {
    0.602
}

fn default_spsa_gamma() -> f64 {
    0.101
}

/// Configuration for the quantum natural-gradient optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QngConfig {
    /// Step size applied to the natural gradient.
    #[serde(default = "default_qng_learning_rate")]
    pub learning_rate: f64,
    /// Tikhonov term ε added to the Fisher matrix diagonal.
    #[serde(default = "default_qng_regularization")]
    pub regularization: f64,
    /// Forward-difference step for state derivatives.
    #[serde(default = "default_fisher_delta")]
    pub fisher_delta: f64,
}

impl Default for QngConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_qng_learning_rate(),
            regularization: default_qng_regularization(),
            fisher_delta: default_fisher_delta(),
        }
    }
}

impl QngConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err("qng.learning_rate must be finite and > 0".into());
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err("qng.regularization must be finite and >= 0".into());
        }
        if !(self.fisher_delta.is_finite() && self.fisher_delta > 0.0) {
            return Err("qng.fisher_delta must be finite and > 0".into());
        }
        Ok(())
    }
}

fn default_qng_learning_rate() -> f64 {
    0.01
}

fn default_qng_regularization() -> f64 {
    1e-8
}

fn default_fisher_delta() -> f64 {
    1e-4
}

/// Configuration for the two-phase hybrid optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Iteration budget of the SPSA phase.
    #[serde(default = "default_spsa_iterations")]
    pub spsa_iterations: usize,
    /// Step budget of the natural-gradient phase.
    #[serde(default = "default_qng_iterations")]
    pub qng_iterations: usize,
    /// Minimum first-minus-last SPSA improvement required to enter phase two.
    #[serde(default = "default_switch_threshold")]
    pub switch_threshold: f64,
    /// Step for the centered finite-difference gradient in phase two.
    #[serde(default = "default_gradient_delta")]
    pub gradient_delta: f64,
    /// Plateau tolerance of the SPSA phase.
    #[serde(default = "default_spsa_tolerance")]
    pub spsa_tolerance: f64,
    /// Inner SPSA settings.
    #[serde(default)]
    pub spsa: SpsaConfig,
    /// Inner natural-gradient settings.
    #[serde(default)]
    pub qng: QngConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            spsa_iterations: default_spsa_iterations(),
            qng_iterations: default_qng_iterations(),
            switch_threshold: default_switch_threshold(),
            gradient_delta: default_gradient_delta(),
            spsa_tolerance: default_spsa_tolerance(),
            spsa: SpsaConfig::default(),
            qng: QngConfig::default(),
        }
    }
}

impl HybridConfig {
    /// Validate configuration parameters, including the inner optimizers.
    pub fn validate(&self) -> Result<(), String> {
        if self.spsa_iterations == 0 {
            return Err("hybrid.spsa_iterations must be > 0".into());
        }
        if !self.switch_threshold.is_finite() {
            return Err("hybrid.switch_threshold must be finite".into());
        }
        if !(self.gradient_delta.is_finite() && self.gradient_delta > 0.0) {
            return Err("hybrid.gradient_delta must be finite and > 0".into());
        }
        if !(self.spsa_tolerance.is_finite() && self.spsa_tolerance >= 0.0) {
            return Err("hybrid.spsa_tolerance must be finite and >= 0".into());
        }
        self.spsa.validate()?;
        self.qng.validate()
    }
}

fn default_spsa_iterations() -> usize {
    50
}

fn default_qng_iterations() -> usize {
    20
}

fn default_switch_threshold() -> f64 {
    0.1
}

fn default_gradient_delta() -> f64 {
    1e-4
}

fn default_spsa_tolerance() -> f64 {
    1e-6
}

/// Mutable per-instance optimizer state.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerState {
    /// Current parameter vector.
    pub params: Vec<f64>,
    /// Iterations taken since the last reset.
    pub iteration: usize,
    /// Best parameters observed.
    pub best_params: Vec<f64>,
    /// Loss at `best_params`; +∞ before any evaluation.
    pub best_loss: f64,
    /// Loss after each iteration, in order.
    pub loss_history: Vec<f64>,
}

impl Default for OptimizerState {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            iteration: 0,
            best_params: Vec::new(),
            best_loss: f64::INFINITY,
            loss_history: Vec::new(),
        }
    }
}

impl OptimizerState {
    /// Fresh state anchored at `params` with a known starting loss.
    pub fn start(params: &[f64], loss: f64) -> Self {
        Self {
            params: params.to_vec(),
            iteration: 0,
            best_params: params.to_vec(),
            best_loss: loss,
            loss_history: Vec::new(),
        }
    }

    /// Clear everything back to the pre-run state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the loss at the current parameters. Returns `true` when it
    /// improved on the best seen.
    pub fn record(&mut self, loss: f64) -> bool {
        self.loss_history.push(loss);
        self.iteration += 1;
        if loss < self.best_loss {
            self.best_loss = loss;
            self.best_params.clone_from(&self.params);
            true
        } else {
            false
        }
    }
}

/// Result of an SPSA run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpsaOutcome {
    /// Best parameters observed, including the starting point.
    pub best_params: Vec<f64>,
    /// Loss at `best_params`.
    pub best_loss: f64,
    /// Loss after every iteration.
    pub history: Vec<f64>,
    /// Iterations executed.
    pub iterations: usize,
    /// Whether the run stopped on the plateau criterion instead of the budget.
    pub converged: bool,
}

/// Per-phase record of a hybrid run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HybridReport {
    /// Loss history of the SPSA phase.
    pub spsa_history: Vec<f64>,
    /// Loss history of the natural-gradient phase (empty when not entered).
    pub qng_history: Vec<f64>,
    /// Iterations across both phases.
    pub total_iterations: usize,
    /// Whether phase two ran.
    pub switched: bool,
}

/// Result of a hybrid run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridOutcome {
    /// Final parameters.
    pub params: Vec<f64>,
    /// Best loss observed.
    pub best_loss: f64,
    /// Phase histories.
    pub report: HybridReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spsa_defaults() {
        let cfg = SpsaConfig::default();
        assert_eq!(cfg.a, 0.16);
        assert_eq!(cfg.c, 0.1);
        assert_eq!(cfg.alpha, 0.602);
        assert_eq!(cfg.gamma, 0.101);
        assert_eq!(cfg.stability, 0.0);
        assert!(cfg.seed.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_spsa_validation() {
        let bad = SpsaConfig {
            c: 0.0,
            ..SpsaConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SpsaConfig {
            stability: -1.0,
            ..SpsaConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SpsaConfig {
            a: f64::NAN,
            ..SpsaConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_qng_validation() {
        assert!(QngConfig::default().validate().is_ok());
        let bad = QngConfig {
            fisher_delta: 0.0,
            ..QngConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_hybrid_validation_checks_inner() {
        assert!(HybridConfig::default().validate().is_ok());

        let mut bad = HybridConfig::default();
        bad.qng.learning_rate = -0.1;
        let msg = bad.validate().unwrap_err();
        assert!(msg.contains("learning_rate"));

        let bad = HybridConfig {
            spsa_iterations: 0,
            ..HybridConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_state_record_tracks_best() {
        let mut state = OptimizerState::start(&[0.0, 0.0], 5.0);
        state.params = vec![1.0, 1.0];
        assert!(state.record(3.0));
        state.params = vec![2.0, 2.0];
        assert!(!state.record(4.0));

        assert_eq!(state.best_params, vec![1.0, 1.0]);
        assert_eq!(state.best_loss, 3.0);
        assert_eq!(state.loss_history, vec![3.0, 4.0]);
        assert_eq!(state.iteration, 2);
    }

    #[test]
    fn test_state_reset() {
        let mut state = OptimizerState::start(&[1.0], 2.0);
        state.record(1.0);
        state.reset();
        assert!(state.params.is_empty());
        assert!(state.loss_history.is_empty());
        assert_eq!(state.iteration, 0);
        assert!(state.best_loss.is_infinite());
    }

    #[test]
    fn test_hybrid_config_from_partial_yaml() {
        let cfg: HybridConfig = serde_yaml::from_str("spsa_iterations: 12\nspsa:\n  seed: 7\n").unwrap();
        assert_eq!(cfg.spsa_iterations, 12);
        assert_eq!(cfg.qng_iterations, 20);
        assert_eq!(cfg.spsa.seed, Some(7));
        assert_eq!(cfg.spsa.a, 0.16);
    }
}
