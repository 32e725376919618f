//! Proximity transmission and disease progression.
//!
//! Transmission is an all-pairs scan over the population. Only residents who
//! were infected when the scan began can infect, so an infection never chains
//! within a single day.

use rand::Rng;

use crate::config::EpidemicConfig;
use crate::events::{DeathCause, DeathRecord};
use crate::population::Population;
use crate::types::{Position, ResidentId};

// === TRANSMISSION ===

/// Infect healthy residents standing near an infected one. Returns the number
/// of new infections.
///
/// Randomness is drawn only for carrier/target pairs inside the contact
/// radius, so the result does not depend on far-away residents.
pub fn spread_infection<R: Rng + ?Sized>(
    population: &mut Population,
    cfg: &EpidemicConfig,
    rng: &mut R,
) -> usize {
    let snapshot: Vec<(ResidentId, bool, Position)> = population
        .iter()
        .map(|(id, r)| (id, r.is_infected(), r.position))
        .collect();
    let mut queued = vec![false; snapshot.len()];

    for (_, carrier, from) in &snapshot {
        if !carrier {
            continue;
        }
        for (i, (_, infected, to)) in snapshot.iter().enumerate() {
            if *infected || queued[i] {
                continue;
            }
            if from.distance_to(to) < cfg.contact_radius
                && rng.random::<f64>() < cfg.transmission_probability
            {
                queued[i] = true;
            }
        }
    }

    let mut infections = 0;
    for (i, (id, _, _)) in snapshot.iter().enumerate() {
        if queued[i] {
            population[*id].infect();
            infections += 1;
        }
    }

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "infection",
        new_infections = infections as u64,
        infected = population.count(|r| r.is_infected()) as u64,
        population = population.len() as u64,
    );

    infections
}

// === PROGRESSION ===

/// Advance every infection by a day and remove residents whose illness has
/// outlasted their persona's tolerance.
pub fn update_disease(
    population: &mut Population,
    day: u32,
    cfg: &EpidemicConfig,
) -> Vec<DeathRecord> {
    let mut dying = Vec::new();
    population.for_each_mut(|id, resident| {
        if !resident.is_infected() {
            return;
        }
        resident.days_infected += 1;
        if resident.at_hospital {
            resident.hospital_days += 1;
        }
        if resident.days_infected > cfg.tolerance.get(resident.persona) {
            dying.push(id);
        }
    });

    let mut deaths = Vec::with_capacity(dying.len());
    for id in dying {
        if let Some(resident) = population.remove(id) {
            let record = DeathRecord::new(day, &resident, DeathCause::Infection);

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
                cause = DeathCause::Infection.as_str(),
            );

            deaths.push(record);
        }
    }

    deaths
}
