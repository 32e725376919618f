//! Doctor capacity, split between treating inpatients and admitting new ones.

use rand::Rng;

use crate::config::HealthcareConfig;
use crate::events::VisitRecord;
use crate::population::Population;
use crate::types::{Job, ResidentId};

/// Chance that a treatment attempt cures a patient. Falls with illness length.
pub fn cure_probability(days_infected: u32, cfg: &HealthcareConfig) -> f64 {
    let days = f64::from(days_infected.saturating_sub(1));
    (cfg.cure_base - days * cfg.cure_decay).max(0.0)
}

/// Chance that an infected resident is admitted. Rises with illness length.
pub fn admit_probability(days_infected: u32, cfg: &HealthcareConfig) -> f64 {
    let days = f64::from(days_infected.saturating_sub(1));
    (cfg.admit_base + days * cfg.admit_growth).min(1.0)
}

/// Run one day of healthcare. Returns the admissions and the doctor count.
///
/// Each treatment attempt and each successful admission costs one unit of
/// capacity; inpatients are treated before anyone new is admitted.
pub fn update_doctor<R: Rng + ?Sized>(
    population: &mut Population,
    day: u32,
    cfg: &HealthcareConfig,
    rng: &mut R,
) -> (Vec<VisitRecord>, usize) {
    let doctors = population.count(|r| r.job == Job::Doctor);
    let mut visits = Vec::new();
    if day <= cfg.grace_days || doctors == 0 {
        return (visits, doctors);
    }

    let mut capacity = doctors * cfg.patients_per_doctor as usize;
    let mut cured = 0usize;

    // Phase 1: treat inpatients
    let inpatients: Vec<ResidentId> = population
        .iter()
        .filter(|(_, r)| r.at_hospital && r.is_infected())
        .map(|(id, _)| id)
        .collect();
    for id in inpatients {
        if capacity == 0 {
            break;
        }
        capacity -= 1;
        let patient = &mut population[id];
        if rng.random::<f64>() < cure_probability(patient.days_infected, cfg) {
            patient.cure();
            cured += 1;
        }
    }

    // Phase 2: admit
    if capacity > 0 {
        let candidates: Vec<ResidentId> = population
            .iter()
            .filter(|(_, r)| r.is_infected() && !r.at_hospital)
            .map(|(id, _)| id)
            .collect();
        for id in candidates {
            if capacity == 0 {
                break;
            }
            let resident = &mut population[id];
            if rng.random::<f64>() < admit_probability(resident.days_infected, cfg) {
                resident.admit();
                capacity -= 1;
                let visit = VisitRecord {
                    job: resident.job,
                    persona: resident.persona,
                    days_infected: resident.days_infected,
                };

                #[cfg(feature = "instrument")]
                tracing::info!(
                    target: "visit",
                    day = day,
                    job = visit.job.as_str(),
                    persona = visit.persona.as_str(),
                    days_infected = visit.days_infected,
                );

                visits.push(visit);
            }
        }
    }

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "healthcare",
        day = day,
        doctors = doctors as u64,
        cured = cured as u64,
        admitted = visits.len() as u64,
        spare_capacity = capacity as u64,
    );
    let _ = cured; // Suppress unused warning when feature disabled

    (visits, doctors)
}
