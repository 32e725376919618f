//! Social mobility: job loss, rehiring, coming of age, and persona drift.
//!
//! Every resident gets at most one job transition and at most one persona
//! transition per day, decided on the value the field had when the check ran.
//! Rich/normal drift is coupled to satisfaction and its trend.

use rand::Rng;

use crate::config::{MobilityConfig, Rules};
use crate::events::StatusChange;
use crate::population::Population;
use crate::resident::Resident;
use crate::types::{Job, Persona};

/// Daily chance that a rich resident falls back to normal.
pub fn rich_decline_probability(satisfaction: f64, previous: f64, cfg: &MobilityConfig) -> f64 {
    let bonus = if satisfaction < previous {
        cfg.trend_bonus
    } else {
        0.0
    };
    (100.0 - satisfaction) / 100.0 * cfg.rich_decline_scale + bonus
}

/// Daily chance that a normal resident becomes rich.
pub fn rich_gain_probability(satisfaction: f64, previous: f64, cfg: &MobilityConfig) -> f64 {
    let bonus = if satisfaction > previous {
        cfg.trend_bonus
    } else {
        0.0
    };
    satisfaction / 100.0 * cfg.rich_gain_scale + bonus
}

fn next_job<R: Rng + ?Sized>(resident: &Resident, rules: &Rules, rng: &mut R) -> Option<Job> {
    let cfg = &rules.config.mobility;
    let working_age = rules.config.residents.working_age;
    match resident.job {
        Job::Worker if rng.random::<f64>() < cfg.layoff_rate => Some(Job::Jobless),
        Job::Jobless if resident.age >= working_age && rng.random::<f64>() < cfg.rehire_rate => {
            Some(rules.jobless_rehire.sample(rng))
        }
        Job::None if resident.age >= working_age => Some(rules.adult_jobs.sample(rng)),
        _ => None,
    }
}

fn next_persona<R: Rng + ?Sized>(
    resident: &Resident,
    satisfaction: f64,
    previous: f64,
    cfg: &MobilityConfig,
    rng: &mut R,
) -> Option<Persona> {
    match resident.persona {
        Persona::Poor if rng.random::<f64>() < cfg.poor_uplift_rate => Some(Persona::Normal),
        Persona::Rich
            if rng.random::<f64>() < rich_decline_probability(satisfaction, previous, cfg) =>
        {
            Some(Persona::Normal)
        }
        Persona::Normal
            if rng.random::<f64>() < rich_gain_probability(satisfaction, previous, cfg) =>
        {
            Some(Persona::Rich)
        }
        _ => None,
    }
}

/// Apply today's job and persona transitions, returning one record per change.
pub fn update_status_changes<R: Rng + ?Sized>(
    population: &mut Population,
    satisfaction: f64,
    previous_satisfaction: f64,
    rules: &Rules,
    rng: &mut R,
) -> Vec<StatusChange> {
    let mut changes = Vec::new();

    population.for_each_mut(|_, resident| {
        if let Some(job) = next_job(resident, rules, rng) {
            // A custom table can redraw the current job; that is not a change.
            if job != resident.job {
                changes.push(StatusChange::job(resident.job, job, resident.persona));
                resident.job = job;
            }
        }

        if let Some(persona) = next_persona(
            resident,
            satisfaction,
            previous_satisfaction,
            &rules.config.mobility,
            rng,
        ) {
            changes.push(StatusChange::persona(resident.persona, persona, resident.job));
            resident.persona = persona;
        }
    });

    #[cfg(feature = "instrument")]
    for change in &changes {
        tracing::info!(
            target: "status_change",
            conversion = change.conversion_key().as_str(),
            job = change.job.as_str(),
            persona = change.persona.as_str(),
        );
    }

    changes
}
