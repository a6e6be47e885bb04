// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fail-soft computation of every metric for a state.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use super::measures::{
    concurrence_of, mutual_information_with, negativity_of, pair_density,
    simplified_three_tangle_from, subsystem_spectrum, DEFAULT_ENTROPY_EPSILON,
};
use crate::error::{PreconditionError, Result};
use crate::validation::{validate_state, MAX_SUBSYSTEMS};

/// Metric settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Eigenvalue cutoff for entropy sums.
    #[serde(default = "default_entropy_epsilon")]
    pub entropy_epsilon: f64,
    /// Largest register accepted by [`compute_all_metrics_with`].
    #[serde(default = "default_max_subsystems")]
    pub max_subsystems: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            entropy_epsilon: default_entropy_epsilon(),
            max_subsystems: default_max_subsystems(),
        }
    }
}

impl MetricsConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.entropy_epsilon.is_finite() && self.entropy_epsilon >= 0.0) {
            return Err("metrics.entropy_epsilon must be finite and >= 0".into());
        }
        if self.max_subsystems == 0 || self.max_subsystems > MAX_SUBSYSTEMS {
            return Err(format!(
                "metrics.max_subsystems must be in [1, {}]",
                MAX_SUBSYSTEMS
            ));
        }
        Ok(())
    }
}

fn default_entropy_epsilon() -> f64 {
    DEFAULT_ENTROPY_EPSILON
}

fn default_max_subsystems() -> usize {
    MAX_SUBSYSTEMS
}

/// Unordered subsystem pair, stored as (low, high). Serializes as `"low-high"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubsystemPair(usize, usize);

impl SubsystemPair {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn low(&self) -> usize {
        self.0
    }

    pub fn high(&self) -> usize {
        self.1
    }
}

impl fmt::Display for SubsystemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

impl Serialize for SubsystemPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A metric value and whether it was replaced after a numerical failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measured {
    pub value: f64,
    pub degraded: bool,
}

impl Measured {
    pub fn ok(value: f64) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    /// Zero placeholder for a failed computation.
    pub fn degraded() -> Self {
        Self {
            value: 0.0,
            degraded: true,
        }
    }
}

/// Every metric for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub num_subsystems: usize,
    pub mutual_information: BTreeMap<SubsystemPair, Measured>,
    pub concurrence: BTreeMap<SubsystemPair, Measured>,
    pub tangle: BTreeMap<SubsystemPair, Measured>,
    pub negativity: BTreeMap<SubsystemPair, Measured>,
    /// Simplified three-tangle; `None` below three subsystems.
    pub three_tangle: Option<Measured>,
    /// Ascending eigenvalues per subsystem; empty for a subsystem whose
    /// decomposition failed.
    pub spectrum: Vec<Vec<f64>>,
    pub spectrum_degraded: bool,
}

impl MetricsReport {
    /// Pairs whose metrics were replaced by zeros.
    pub fn degraded_pairs(&self) -> Vec<SubsystemPair> {
        self.concurrence
            .iter()
            .filter(|(_, m)| m.degraded)
            .map(|(pair, _)| *pair)
            .collect()
    }

    /// Whether any entry in the report is degraded.
    pub fn is_degraded(&self) -> bool {
        self.spectrum_degraded
            || self.three_tangle.map_or(false, |m| m.degraded)
            || !self.degraded_pairs().is_empty()
    }
}

struct PairValues {
    mutual_information: f64,
    concurrence: f64,
    negativity: f64,
}

fn pair_values(
    state: &Array1<Complex64>,
    pair: SubsystemPair,
    num_subsystems: usize,
    epsilon: f64,
) -> Result<PairValues> {
    let rho = pair_density(state, pair.low(), pair.high(), num_subsystems)?;
    Ok(PairValues {
        mutual_information: mutual_information_with(
            state,
            pair.low(),
            pair.high(),
            num_subsystems,
            epsilon,
        )?,
        concurrence: concurrence_of(&rho)?,
        negativity: negativity_of(&rho)?,
    })
}

/// [`compute_all_metrics_with`] using default settings.
pub fn compute_all_metrics(
    state: &Array1<Complex64>,
    num_subsystems: usize,
) -> Result<MetricsReport> {
    compute_all_metrics_with(state, num_subsystems, &MetricsConfig::default())
}

/// Compute mutual information, concurrence, tangle and negativity for all
/// n·(n−1)/2 pairs, the simplified three-tangle when n ≥ 3, and the
/// entanglement spectrum.
///
/// A numerical failure inside one pair marks that pair's four entries as
/// [`Measured::degraded`] and the computation continues. Precondition
/// violations (bad length, n outside `[1, max_subsystems]`) abort with an
/// error.
pub fn compute_all_metrics_with(
    state: &Array1<Complex64>,
    num_subsystems: usize,
    config: &MetricsConfig,
) -> Result<MetricsReport> {
    validate_state(state.len(), num_subsystems)?;
    if num_subsystems > config.max_subsystems {
        return Err(PreconditionError::ResourceLimit {
            resource: "num_subsystems".into(),
            limit: config.max_subsystems as u64,
            requested: num_subsystems as u64,
        }
        .into());
    }

    let mut report = MetricsReport {
        num_subsystems,
        mutual_information: BTreeMap::new(),
        concurrence: BTreeMap::new(),
        tangle: BTreeMap::new(),
        negativity: BTreeMap::new(),
        three_tangle: None,
        spectrum: Vec::with_capacity(num_subsystems),
        spectrum_degraded: false,
    };

    for a in 0..num_subsystems {
        for b in (a + 1)..num_subsystems {
            let pair = SubsystemPair::new(a, b);
            let (mi, c, t, neg) =
                match pair_values(state, pair, num_subsystems, config.entropy_epsilon) {
                    Ok(v) => (
                        Measured::ok(v.mutual_information),
                        Measured::ok(v.concurrence),
                        Measured::ok(v.concurrence * v.concurrence),
                        Measured::ok(v.negativity),
                    ),
                    Err(e) if e.is_numerical() => {
                        warn!(%pair, error = %e, "Pair metrics degraded to zero");
                        let d = Measured::degraded();
                        (d, d, d, d)
                    }
                    Err(e) => return Err(e),
                };
            report.mutual_information.insert(pair, mi);
            report.concurrence.insert(pair, c);
            report.tangle.insert(pair, t);
            report.negativity.insert(pair, neg);
        }
    }

    if num_subsystems >= 3 {
        let t01 = report.tangle[&SubsystemPair::new(0, 1)];
        let t02 = report.tangle[&SubsystemPair::new(0, 2)];
        report.three_tangle = Some(if t01.degraded || t02.degraded {
            Measured::degraded()
        } else {
            Measured::ok(simplified_three_tangle_from(t01.value, t02.value))
        });
    }

    for q in 0..num_subsystems {
        match subsystem_spectrum(state, q, num_subsystems) {
            Ok(eigenvalues) => report.spectrum.push(eigenvalues),
            Err(e) if e.is_numerical() => {
                warn!(subsystem = q, error = %e, "Spectrum degraded");
                report.spectrum_degraded = true;
                report.spectrum.push(Vec::new());
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        num_subsystems,
        pairs = report.concurrence.len(),
        degraded_pairs = report.degraded_pairs().len(),
        "Computed entanglement metrics"
    );

    Ok(report)
}
