//! Township morale.
//!
//! Satisfaction is a single scalar in [0, 100] nudged each day by food
//! balance, deaths, hospital load and hunger. It is damped toward the middle
//! of the range and amplified when it is critically low.

use crate::config::SatisfactionConfig;

/// Everything the scorer reads from the end of a day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SatisfactionInputs {
    pub satisfaction: f64,
    /// Food demanded today.
    pub consumption: f64,
    /// Stock left after distribution.
    pub food: f64,
    pub deaths: usize,
    pub population: usize,
    pub hospitalized: usize,
    pub doctors: usize,
    pub underfed: usize,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn food_impact(consumption: f64, food: f64, cfg: &SatisfactionConfig) -> f64 {
    let deficit_ratio = ratio((consumption - food).max(0.0), consumption);
    let surplus_ratio = ratio((food - consumption).max(0.0), consumption);
    if deficit_ratio == 0.0 {
        cfg.surplus_base + cfg.surplus_weight * surplus_ratio
    } else {
        let severity = if deficit_ratio > cfg.severe_deficit_ratio {
            cfg.severe_deficit_multiplier
        } else {
            1.0
        };
        -cfg.deficit_weight * deficit_ratio * severity
    }
}

/// Pull toward the middle band: recovery when low, decay when very high.
pub fn damping(satisfaction: f64, cfg: &SatisfactionConfig) -> f64 {
    if satisfaction < cfg.low_threshold {
        cfg.low_recovery
    } else if satisfaction > cfg.high_threshold {
        -cfg.high_decay
    } else {
        0.0
    }
}

/// Next day's satisfaction. An empty population leaves it unchanged.
pub fn calculate_satisfaction(
    inputs: &SatisfactionInputs,
    patients_per_doctor: u32,
    cfg: &SatisfactionConfig,
) -> f64 {
    let s = inputs.satisfaction;
    if inputs.population == 0 {
        return s;
    }

    let capacity = (inputs.doctors * patients_per_doctor as usize) as f64;
    let mortality = -cfg.mortality_weight * ratio(inputs.deaths as f64, inputs.population as f64);
    let hospital = -cfg.hospital_weight * ratio(inputs.hospitalized as f64, capacity);
    let underfed = -cfg.underfed_weight * inputs.underfed as f64;

    let multiplier = if s < cfg.critical_threshold {
        cfg.critical_multiplier
    } else {
        1.0
    };
    let delta = (food_impact(inputs.consumption, inputs.food, cfg)
        + mortality
        + hospital
        + underfed
        + damping(s, cfg))
        * multiplier;

    (s + delta).clamp(0.0, 100.0)
}
