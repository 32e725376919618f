//! Couple formation.
//!
//! Unpaired adults are shuffled and paired off greedily each day. Couples are
//! only meaningful while both members are alive; stale couples are dropped
//! when the list is rebuilt.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::population::Population;
use crate::types::ResidentId;

/// Two residents that reference each other as partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Couple(pub ResidentId, pub ResidentId);

impl Couple {
    pub fn is_alive(&self, population: &Population) -> bool {
        population.contains(self.0) && population.contains(self.1)
    }
}

/// Pair off single residents at or above `pairing_age` and return the
/// still-valid previous couples followed by the new ones.
pub fn form_couples<R: Rng + ?Sized>(
    population: &mut Population,
    existing: &[Couple],
    pairing_age: u32,
    rng: &mut R,
) -> Vec<Couple> {
    let mut eligible: Vec<ResidentId> = population
        .iter()
        .filter(|(_, r)| r.is_single() && r.age >= pairing_age)
        .map(|(id, _)| id)
        .collect();
    eligible.shuffle(rng);

    let mut new_couples = Vec::with_capacity(eligible.len() / 2);
    for pair in eligible.chunks_exact(2) {
        population.link(pair[0], pair[1]);
        new_couples.push(Couple(pair[0], pair[1]));

        #[cfg(feature = "instrument")]
        {
            use crate::types::KeyToU64;
            tracing::info!(
                target: "pairing",
                first = pair[0].to_u64(),
                second = pair[1].to_u64(),
            );
        }
    }

    let mut couples: Vec<Couple> = existing
        .iter()
        .copied()
        .filter(|c| c.is_alive(population))
        .collect();
    couples.extend(new_couples);

    debug_assert!(population.partners_consistent());
    couples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::Resident;
    use crate::types::{Job, Persona, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn resident(age: u32) -> Resident {
        Resident::new(age, Job::Worker, Persona::Normal, Position::default())
    }

    #[test]
    fn pairs_are_mutual() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pop: Population = (0..10).map(|_| resident(25)).collect();

        let couples = form_couples(&mut pop, &[], 18, &mut rng);
        assert_eq!(couples.len(), 5);
        for Couple(a, b) in &couples {
            assert_eq!(pop[*a].partner, Some(*b));
            assert_eq!(pop[*b].partner, Some(*a));
        }
        assert!(pop.partners_consistent());
    }

    #[test]
    fn odd_candidate_waits() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop: Population = (0..5).map(|_| resident(25)).collect();

        let couples = form_couples(&mut pop, &[], 18, &mut rng);
        assert_eq!(couples.len(), 2);
        assert_eq!(pop.count(|r| r.is_single()), 1);
    }

    #[test]
    fn minors_are_not_paired() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pop: Population = vec![resident(17), resident(17), resident(18)]
            .into_iter()
            .collect();

        let couples = form_couples(&mut pop, &[], 18, &mut rng);
        assert!(couples.is_empty());
        assert_eq!(pop.count(|r| r.is_single()), 3);
    }

    #[test]
    fn dead_couples_are_dropped_and_survivor_repairs() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pop: Population = (0..4).map(|_| resident(30)).collect();
        let couples = form_couples(&mut pop, &[], 18, &mut rng);
        assert_eq!(couples.len(), 2);

        // Kill one member of each couple: the two widows re-pair.
        pop.remove(couples[0].0);
        pop.remove(couples[1].1);
        let couples = form_couples(&mut pop, &couples, 18, &mut rng);
        assert_eq!(couples.len(), 1);
        assert!(couples[0].is_alive(&pop));
        assert!(pop.partners_consistent());
    }

    #[test]
    fn empty_pool_keeps_valid_couples() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pop: Population = (0..4).map(|_| resident(30)).collect();
        let first = form_couples(&mut pop, &[], 18, &mut rng);

        let second = form_couples(&mut pop, &first, 18, &mut rng);
        assert_eq!(first, second);
    }
}
