//! Natural and starvation deaths.
//!
//! Old age ramps the daily death chance up linearly; prolonged hunger kills
//! outright. Disease deaths live in the epidemic module because they depend
//! on the post-distribution state of the day.

use rand::Rng;

use crate::config::MortalityConfig;
use crate::events::{DeathCause, DeathRecord};
use crate::population::Population;
use crate::resident::Resident;
use crate::types::ResidentId;

/// Daily probability of dying of old age.
///
/// Zero outside `[natural_min_age, natural_max_age]`. Flat base rate until
/// the ramp start, then linear:
/// - age 30 → 0.05%
/// - age 60 → 0.05%
/// - age 80 → ~0.53%
/// - age 100 → 1%
pub fn natural_death_probability(age: u32, cfg: &MortalityConfig) -> f64 {
    if age < cfg.natural_min_age || age > cfg.natural_max_age {
        0.0
    } else if age < cfg.ramp_start_age {
        cfg.base_rate
    } else {
        let years = f64::from(age - cfg.ramp_start_age);
        cfg.base_rate + years / cfg.ramp_span * cfg.ramp_increase
    }
}

pub fn is_starving(resident: &Resident, cfg: &MortalityConfig) -> bool {
    resident.days_hungry >= cfg.starvation_days && resident.food_deficit > cfg.starvation_deficit
}

/// Decide whether a resident dies today, and of what.
///
/// Natural death is rolled first (only for eligible ages, so younger
/// residents consume no randomness); starvation overrides the cause.
pub fn death_cause<R: Rng + ?Sized>(
    rng: &mut R,
    resident: &Resident,
    cfg: &MortalityConfig,
) -> Option<DeathCause> {
    let mut cause = None;

    let p_natural = natural_death_probability(resident.age, cfg);
    if p_natural > 0.0 && rng.random::<f64>() < p_natural {
        cause = Some(DeathCause::Natural);
    }

    if is_starving(resident, cfg) {
        cause = Some(DeathCause::Starvation);
    }

    cause
}

/// Remove everyone who dies of old age or hunger today.
pub fn check_deaths<R: Rng + ?Sized>(
    population: &mut Population,
    day: u32,
    cfg: &MortalityConfig,
    rng: &mut R,
) -> Vec<DeathRecord> {
    let dying: Vec<(ResidentId, DeathCause)> = population
        .iter()
        .filter_map(|(id, r)| death_cause(rng, r, cfg).map(|cause| (id, cause)))
        .collect();

    let mut deaths = Vec::with_capacity(dying.len());
    for (id, cause) in dying {
        if let Some(resident) = population.remove(id) {
            let record = DeathRecord::new(day, &resident, cause);

            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "death",
                day = day,
                job = record.job.as_str(),
                persona = record.persona.as_str(),
                age = resident.age,
                days_infected = record.days_infected,
                at_hospital = record.at_hospital,
                hospital_days = record.hospital_days,
                food_deficit = resident.food_deficit,
                cause = cause.as_str(),
            );

            deaths.push(record);
        }
    }

    deaths
}
