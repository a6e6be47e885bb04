// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! PDE-inspired control-field generators.
//!
//! Each model maps a time `t` and its physical parameters to a
//! [`ControlTriple`]. All functions are pure.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Control-field strengths for one time step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlTriple {
    /// Longitudinal (Z) field.
    pub longitudinal: f64,
    /// Transverse (X) field.
    pub transverse: f64,
    /// Nearest-neighbour coupling strength.
    pub coupling: f64,
}

impl ControlTriple {
    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.longitudinal.is_finite() && self.transverse.is_finite() && self.coupling.is_finite()
    }
}

/// Heat diffusion: monotone decay toward equilibrium.
pub fn heat(t: f64, diffusion_rate: f64, gradient: f64) -> ControlTriple {
    ControlTriple {
        longitudinal: (-diffusion_rate * t).exp(),
        transverse: diffusion_rate * gradient,
        coupling: 0.5 * (-0.5 * diffusion_rate * t).exp(),
    }
}

/// Wave oscillation. `longitudinal² + transverse² = amplitude²` for all `t`.
pub fn wave(t: f64, frequency: f64, amplitude: f64, phase: f64) -> ControlTriple {
    let omega = 2.0 * PI * frequency;
    ControlTriple {
        longitudinal: amplitude * (omega * t + phase).cos(),
        transverse: amplitude * (omega * t + phase).sin(),
        coupling: 0.5 * amplitude * (2.0 * omega * t).cos(),
    }
}

/// Coherent decay with time constant `coherence_time`.
pub fn schrodinger(t: f64, energy: f64, coherence_time: f64) -> ControlTriple {
    let decay = (-t / coherence_time).exp();
    ControlTriple {
        longitudinal: energy * decay,
        transverse: 0.5 * energy * decay,
        coupling: decay,
    }
}

/// Reaction-diffusion: a stimulus-driven reaction that saturates while
/// diffusion slowly decays.
pub fn reaction_diffusion(
    t: f64,
    reaction_rate: f64,
    diffusion_rate: f64,
    stimulus: f64,
) -> ControlTriple {
    let reaction = reaction_rate * stimulus * (1.0 - t.tanh());
    let diffusion = diffusion_rate * (-0.1 * t).exp();
    ControlTriple {
        longitudinal: 1.0 + reaction,
        transverse: diffusion,
        coupling: 2.0 * diffusion,
    }
}

/// Emotional needs, each conventionally in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub comfort: f64,
    pub stimulation: f64,
    pub connection: f64,
}

impl Default for Needs {
    fn default() -> Self {
        Self {
            comfort: 50.0,
            stimulation: 50.0,
            connection: 50.0,
        }
    }
}

/// Emotional state category, carrying only the need its model uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EmotionalCondition {
    /// anxious, stressed, overwhelmed: heat regulation
    Distressed { comfort: f64 },
    /// excited, joyful, energetic: wave oscillation
    Energized { stimulation: f64 },
    /// lonely, disconnected: reaction-diffusion
    Isolated { connection: f64 },
    /// everything else: coherent decay
    Settled { comfort: f64 },
}

impl EmotionalCondition {
    /// Classify a free-form emotion label.
    pub fn from_label(label: &str, needs: &Needs) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "anxious" | "stressed" | "overwhelmed" => Self::Distressed {
                comfort: needs.comfort,
            },
            "excited" | "joyful" | "energetic" => Self::Energized {
                stimulation: needs.stimulation,
            },
            "lonely" | "disconnected" => Self::Isolated {
                connection: needs.connection,
            },
            _ => Self::Settled {
                comfort: needs.comfort,
            },
        }
    }

    /// The concrete model this condition selects.
    pub fn model(&self) -> HamiltonianModel {
        match *self {
            Self::Distressed { comfort } => HamiltonianModel::Heat {
                diffusion_rate: 1.0 + (100.0 - comfort) / 100.0,
                gradient: DEFAULT_HEAT_GRADIENT,
            },
            Self::Energized { stimulation } => HamiltonianModel::Wave {
                frequency: 0.5 + stimulation / 200.0,
                amplitude: 1.0 + stimulation / 100.0,
                phase: 0.0,
            },
            Self::Isolated { connection } => HamiltonianModel::ReactionDiffusion {
                reaction_rate: 1.0,
                diffusion_rate: DEFAULT_RD_DIFFUSION,
                stimulus: (100.0 - connection) / 100.0,
            },
            Self::Settled { comfort } => HamiltonianModel::Schrodinger {
                energy: 1.0,
                coherence_time: 10.0 + comfort / 10.0,
            },
        }
    }
}

/// Adaptive control: dispatch on the emotional condition.
pub fn adaptive(t: f64, condition: &EmotionalCondition) -> ControlTriple {
    condition.model().controls(t)
}

const DEFAULT_HEAT_GRADIENT: f64 = 0.5;
const DEFAULT_RD_DIFFUSION: f64 = 0.5;

/// A control model with bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum HamiltonianModel {
    Heat {
        diffusion_rate: f64,
        gradient: f64,
    },
    Wave {
        frequency: f64,
        amplitude: f64,
        phase: f64,
    },
    Schrodinger {
        energy: f64,
        coherence_time: f64,
    },
    ReactionDiffusion {
        reaction_rate: f64,
        diffusion_rate: f64,
        stimulus: f64,
    },
    Adaptive(EmotionalCondition),
}

impl HamiltonianModel {
    /// Heat diffusion with D = 1, gradient 0.5.
    pub fn heat() -> Self {
        Self::Heat {
            diffusion_rate: 1.0,
            gradient: DEFAULT_HEAT_GRADIENT,
        }
    }

    /// Wave with unit frequency and amplitude, zero phase.
    pub fn wave() -> Self {
        Self::Wave {
            frequency: 1.0,
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    /// Coherent decay with E = 1, τ = 10.
    pub fn schrodinger() -> Self {
        Self::Schrodinger {
            energy: 1.0,
            coherence_time: 10.0,
        }
    }

    /// Reaction-diffusion with rate 1, diffusion 0.5 and no stimulus.
    pub fn reaction_diffusion() -> Self {
        Self::ReactionDiffusion {
            reaction_rate: 1.0,
            diffusion_rate: DEFAULT_RD_DIFFUSION,
            stimulus: 0.0,
        }
    }

    /// Control triple at time `t`.
    pub fn controls(&self, t: f64) -> ControlTriple {
        match *self {
            Self::Heat {
                diffusion_rate,
                gradient,
            } => heat(t, diffusion_rate, gradient),
            Self::Wave {
                frequency,
                amplitude,
                phase,
            } => wave(t, frequency, amplitude, phase),
            Self::Schrodinger {
                energy,
                coherence_time,
            } => schrodinger(t, energy, coherence_time),
            Self::ReactionDiffusion {
                reaction_rate,
                diffusion_rate,
                stimulus,
            } => reaction_diffusion(t, reaction_rate, diffusion_rate, stimulus),
            Self::Adaptive(condition) => adaptive(t, &condition),
        }
    }

    /// Short model name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Heat { .. } => "heat",
            Self::Wave { .. } => "wave",
            Self::Schrodinger { .. } => "schrodinger",
            Self::ReactionDiffusion { .. } => "reaction_diffusion",
            Self::Adaptive(_) => "adaptive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_heat_at_origin() {
        let c = heat(0.0, 1.0, 0.5);
        assert_relative_eq!(c.longitudinal, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.transverse, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.coupling, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_heat_decays_monotonically() {
        let mut prev = heat(0.0, 1.5, 0.5);
        for k in 1..50 {
            let next = heat(k as f64 * 0.1, 1.5, 0.5);
            assert!(next.longitudinal < prev.longitudinal);
            assert!(next.coupling < prev.coupling);
            prev = next;
        }
    }

    #[test]
    fn test_wave_preserves_amplitude() {
        for amplitude in [0.5, 1.0, 2.25] {
            for k in 0..200 {
                let t = k as f64 * 0.037;
                let c = wave(t, 0.75, amplitude, 0.3);
                let norm = c.longitudinal.powi(2) + c.transverse.powi(2);
                assert_relative_eq!(norm, amplitude * amplitude, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_wave_coupling_double_frequency() {
        // cos(2ω·t) at t = 1/(4f) is cos(π) = -1
        let c = wave(0.25, 1.0, 2.0, 0.0);
        assert_relative_eq!(c.coupling, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_schrodinger_decay() {
        let c = schrodinger(10.0, 2.0, 10.0);
        let decay = (-1.0f64).exp();
        assert_relative_eq!(c.longitudinal, 2.0 * decay, epsilon = 1e-12);
        assert_relative_eq!(c.transverse, decay, epsilon = 1e-12);
        assert_relative_eq!(c.coupling, decay, epsilon = 1e-12);
    }

    #[test]
    fn test_reaction_diffusion_values() {
        let c = reaction_diffusion(0.0, 1.0, 0.5, 0.8);
        assert_relative_eq!(c.longitudinal, 1.8, epsilon = 1e-12);
        assert_relative_eq!(c.transverse, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.coupling, 1.0, epsilon = 1e-12);

        // reaction saturates as tanh → 1
        let late = reaction_diffusion(20.0, 1.0, 0.5, 0.8);
        assert_relative_eq!(late.longitudinal, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_condition_from_label() {
        let needs = Needs {
            comfort: 20.0,
            stimulation: 80.0,
            connection: 10.0,
        };
        assert_eq!(
            EmotionalCondition::from_label("Anxious", &needs),
            EmotionalCondition::Distressed { comfort: 20.0 }
        );
        assert_eq!(
            EmotionalCondition::from_label("joyful", &needs),
            EmotionalCondition::Energized { stimulation: 80.0 }
        );
        assert_eq!(
            EmotionalCondition::from_label("disconnected", &needs),
            EmotionalCondition::Isolated { connection: 10.0 }
        );
        assert_eq!(
            EmotionalCondition::from_label("calm", &needs),
            EmotionalCondition::Settled { comfort: 20.0 }
        );
    }

    #[test]
    fn test_adaptive_distressed_uses_heat() {
        let cond = EmotionalCondition::Distressed { comfort: 20.0 };
        let expected = heat(0.3, 1.0 + (100.0 - 20.0) / 100.0, 0.5);
        assert_eq!(adaptive(0.3, &cond), expected);
    }

    #[test]
    fn test_adaptive_energized_uses_wave() {
        let cond = EmotionalCondition::Energized { stimulation: 100.0 };
        let expected = wave(0.3, 1.0, 2.0, 0.0);
        assert_eq!(adaptive(0.3, &cond), expected);
    }

    #[test]
    fn test_adaptive_isolated_uses_reaction_diffusion() {
        let cond = EmotionalCondition::Isolated { connection: 25.0 };
        let expected = reaction_diffusion(0.3, 1.0, 0.5, 0.75);
        assert_eq!(adaptive(0.3, &cond), expected);
    }

    #[test]
    fn test_adaptive_settled_uses_schrodinger() {
        let cond = EmotionalCondition::from_label("neutral", &Needs::default());
        let expected = schrodinger(0.3, 1.0, 15.0);
        assert_eq!(adaptive(0.3, &cond), expected);
    }

    #[test]
    fn test_model_defaults_match_free_functions() {
        assert_eq!(HamiltonianModel::heat().controls(0.4), heat(0.4, 1.0, 0.5));
        assert_eq!(HamiltonianModel::wave().controls(0.4), wave(0.4, 1.0, 1.0, 0.0));
        assert_eq!(
            HamiltonianModel::schrodinger().controls(0.4),
            schrodinger(0.4, 1.0, 10.0)
        );
        assert_eq!(
            HamiltonianModel::reaction_diffusion().controls(0.4),
            reaction_diffusion(0.4, 1.0, 0.5, 0.0)
        );
    }

    #[test]
    fn test_model_serializes_tagged() {
        let json = serde_json::to_value(HamiltonianModel::heat()).unwrap();
        assert_eq!(json["model"], "heat");
        assert_eq!(json["diffusion_rate"], 1.0);
    }
}
