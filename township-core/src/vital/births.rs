use rand::Rng;

use crate::config::{BirthConfig, Rules};
use crate::events::BirthRecord;
use crate::pairing::Couple;
use crate::population::Population;

/// Per-couple daily birth probability.
///
/// Zero unless satisfaction clears the gate. Food shortage cuts the base rate;
/// overcrowding divides whatever rate applies.
pub fn birth_probability(
    satisfaction: f64,
    food: f64,
    consumption: f64,
    population_size: usize,
    cfg: &BirthConfig,
) -> f64 {
    if satisfaction <= cfg.min_satisfaction {
        return 0.0;
    }
    let mut p = if food < consumption {
        cfg.rate_short
    } else {
        cfg.rate_fed
    };
    if population_size > cfg.crowding_threshold {
        p /= cfg.crowding_divisor;
    }
    p
}

/// Each living couple rolls once; every success appends a newborn.
#[allow(clippy::too_many_arguments)]
pub fn handle_births<R: Rng + ?Sized>(
    population: &mut Population,
    couples: &[Couple],
    satisfaction: f64,
    day: u32,
    food: f64,
    consumption: f64,
    rules: &Rules,
    rng: &mut R,
) -> Vec<BirthRecord> {
    let p = birth_probability(
        satisfaction,
        food,
        consumption,
        population.len(),
        &rules.config.births,
    );
    if p <= 0.0 {
        return Vec::new();
    }

    let mut births = Vec::new();
    for couple in couples {
        if !couple.is_alive(population) {
            continue;
        }
        if rng.random::<f64>() < p {
            let child = rules.factory.create(0, rng);
            let record = BirthRecord {
                day,
                persona: child.persona,
                job: child.job,
            };

            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "birth",
                day = day,
                persona = record.persona.as_str(),
                infected = child.is_infected(),
                probability = p,
            );

            population.push(child);
            births.push(record);
        }
    }

    births
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::form_couples;
    use crate::resident::Resident;
    use crate::types::{Job, Persona, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_birth_probability_table() {
        let cfg = BirthConfig::default();

        assert_eq!(birth_probability(30.0, 100.0, 10.0, 10, &cfg), 0.0);
        assert_eq!(birth_probability(31.0, 100.0, 10.0, 10, &cfg), 0.2);
        assert_eq!(birth_probability(31.0, 5.0, 10.0, 10, &cfg), 0.05);
        assert!((birth_probability(31.0, 100.0, 10.0, 1001, &cfg) - 0.02).abs() < 1e-12);
        assert!((birth_probability(31.0, 5.0, 10.0, 1001, &cfg) - 0.005).abs() < 1e-12);
        // Exactly at the threshold is not crowded
        assert_eq!(birth_probability(31.0, 100.0, 10.0, 1000, &cfg), 0.2);
    }

    #[test]
    fn test_low_satisfaction_blocks_births() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut pop: Population = (0..20)
            .map(|_| Resident::new(25, Job::Worker, Persona::Normal, Position::default()))
            .collect();
        let couples = form_couples(&mut pop, &[], 18, &mut rng);

        let births = handle_births(&mut pop, &couples, 20.0, 1, 100.0, 10.0, &rules, &mut rng);
        assert!(births.is_empty());
        assert_eq!(pop.len(), 20);
    }

    #[test]
    fn test_newborns_join_population() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut pop: Population = (0..200)
            .map(|_| Resident::new(25, Job::Worker, Persona::Normal, Position::default()))
            .collect();
        let couples = form_couples(&mut pop, &[], 18, &mut rng);

        let births = handle_births(&mut pop, &couples, 80.0, 3, 1000.0, 10.0, &rules, &mut rng);
        // 100 couples at 20% each
        assert!(!births.is_empty());
        assert_eq!(pop.len(), 200 + births.len());
        for b in &births {
            assert_eq!(b.day, 3);
            assert_eq!(b.job, Job::None);
        }
        let newborns = pop.count(|r| r.age == 0);
        assert_eq!(newborns, births.len());
    }

    #[test]
    fn test_widowed_couple_cannot_give_birth() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut pop: Population = (0..2)
            .map(|_| Resident::new(25, Job::Worker, Persona::Normal, Position::default()))
            .collect();
        let couples = form_couples(&mut pop, &[], 18, &mut rng);
        pop.remove(couples[0].0);

        for day in 0..50 {
            let births = handle_births(&mut pop, &couples, 80.0, day, 1000.0, 10.0, &rules, &mut rng);
            assert!(births.is_empty());
        }
    }
}
