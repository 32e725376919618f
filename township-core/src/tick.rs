use rand::Rng;

use crate::config::Rules;
use crate::epidemic::{spread_infection, update_disease};
use crate::events::DayEvents;
use crate::food::{distribute_food, update_food};
use crate::healthcare::update_doctor;
use crate::mobility::update_status_changes;
use crate::pairing::{Couple, form_couples};
use crate::population::Population;
use crate::satisfaction::{SatisfactionInputs, calculate_satisfaction};
use crate::vital::{check_deaths, handle_births};

// === WORLD STATE ===

/// Everything that persists from one day to the next.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    pub population: Population,
    /// Stock carried over; never negative.
    pub food: f64,
    /// In [0, 100].
    pub satisfaction: f64,
    pub couples: Vec<Couple>,
}

impl WorldState {
    pub fn new(population: Population, food: f64, satisfaction: f64) -> Self {
        Self {
            population,
            food: food.max(0.0),
            satisfaction: satisfaction.clamp(0.0, 100.0),
            couples: Vec::new(),
        }
    }

    pub fn infected(&self) -> usize {
        self.population.count(|r| r.is_infected())
    }

    pub fn hospitalized(&self) -> usize {
        self.population.count(|r| r.at_hospital)
    }
}

// === DAY ===

/// Run one day.
///
/// `previous_satisfaction` is the morale at the start of the previous day; the
/// mobility engine compares it with today's to detect a trend. The phase
/// order is fixed and every phase sees the effects of the ones before it.
pub fn advance<R: Rng + ?Sized>(
    mut state: WorldState,
    day: u32,
    previous_satisfaction: f64,
    rules: &Rules,
    rng: &mut R,
) -> (WorldState, DayEvents) {
    let cfg = &rules.config;
    let mut events = DayEvents::new(day);
    let population = &mut state.population;

    // 1. AGING
    population.for_each_mut(|_, r| r.age += 1);

    // 2. PAIRING
    state.couples = form_couples(population, &state.couples, cfg.births.pairing_age, rng);

    // 3. NATURAL AND STARVATION DEATHS
    events.deaths = check_deaths(population, day, &cfg.mortality, rng);

    // 4. PRODUCTION TALLY
    let (food, consumption) = update_food(population, state.food, &cfg.food);
    events.consumption = consumption;

    // 5. BIRTHS
    events.births = handle_births(
        population,
        &state.couples,
        state.satisfaction,
        day,
        food,
        consumption,
        rules,
        rng,
    );

    // 6. SOCIAL MOBILITY
    events.status_changes =
        update_status_changes(population, state.satisfaction, previous_satisfaction, rules, rng);

    // 7. DISTRIBUTION
    let (food, underfed) = distribute_food(population, food, &cfg.food);
    state.food = food;
    events.underfed = underfed;

    // 8. TRANSMISSION
    events.new_infections = spread_infection(population, &cfg.epidemic, rng);

    // 9. DISEASE PROGRESSION
    events
        .deaths
        .extend(update_disease(population, day, &cfg.epidemic));

    // 10. HEALTHCARE
    let (visits, doctors) = update_doctor(population, day, &cfg.healthcare, rng);
    events.visits = visits;
    events.doctors = doctors;
    events.hospitalized = population.count(|r| r.at_hospital);

    // 11. SATISFACTION
    let satisfaction_before = state.satisfaction;
    state.satisfaction = calculate_satisfaction(
        &SatisfactionInputs {
            satisfaction: state.satisfaction,
            consumption,
            food: state.food,
            deaths: events.deaths.len(),
            population: population.len(),
            hospitalized: events.hospitalized,
            doctors,
            underfed,
        },
        cfg.healthcare.patients_per_doctor,
        &cfg.satisfaction,
    );

    // Couples broken by today's deaths
    state.couples.retain(|c| c.is_alive(&state.population));

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "day",
        day = day,
        population = state.population.len() as u64,
        couples = state.couples.len() as u64,
        food = state.food,
        consumption = consumption,
        satisfaction_before = satisfaction_before,
        satisfaction = state.satisfaction,
        deaths = events.deaths.len() as u64,
        births = events.births.len() as u64,
        visits = events.visits.len() as u64,
        status_changes = events.status_changes.len() as u64,
        underfed = underfed as u64,
        infected = state.infected() as u64,
        new_infections = events.new_infections as u64,
        hospitalized = events.hospitalized as u64,
        doctors = doctors as u64,
    );
    let _ = satisfaction_before; // Suppress unused warning when feature disabled

    debug_assert!(state.food >= 0.0);
    debug_assert!((0.0..=100.0).contains(&state.satisfaction));
    debug_assert!(state.population.partners_consistent());

    (state, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resident::Resident;
    use crate::types::{Job, Persona, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_population_tick() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(0);
        let state = WorldState::new(Population::new(), 0.0, 50.0);

        let (state, events) = advance(state, 1, 50.0, &rules, &mut rng);
        assert!(state.population.is_empty());
        assert!(events.deaths.is_empty());
        assert!(events.visits.is_empty());
        assert!(events.status_changes.is_empty());
        assert!(events.births.is_empty());
        assert_eq!(events.consumption, 0.0);
        assert_eq!(state.satisfaction, 50.0);
        assert_eq!(state.food, 0.0);
    }

    #[test]
    fn test_everyone_ages() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let pop: Population = (0..5)
            .map(|_| Resident::new(3, Job::None, Persona::Poor, Position::default()))
            .collect();
        let state = WorldState::new(pop, 100.0, 50.0);

        let (state, events) = advance(state, 1, 50.0, &rules, &mut rng);
        assert_eq!(events.day, 1);
        assert!(state.population.residents().all(|r| r.age == 4));
    }

    #[test]
    fn test_farmers_feed_township() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(2);
        // Young enough to be exempt from natural death; farmers and doctors
        // never change job and Strong residents never drift.
        let pop: Population = (0..10)
            .map(|i| {
                let job = if i < 2 { Job::Farmer } else { Job::Doctor };
                Resident::new(5, job, Persona::Strong, Position::new(i as f64 * 100.0, 0.0))
            })
            .collect();
        let state = WorldState::new(pop, 0.0, 60.0);

        let (state, events) = advance(state, 1, 60.0, &rules, &mut rng);
        assert_eq!(events.consumption, 30.0);
        assert_eq!(events.underfed, 0);
        assert_eq!(events.doctors, 8);
        assert_eq!(state.food, 40.0);
        assert!(state.satisfaction > 60.0);
    }
}
