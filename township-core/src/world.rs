// World: seeded driver state around the daily tick

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::config::{ConfigError, Rules, SimConfig};
use crate::events::{DayEvents, DeathCause};
use crate::pairing::form_couples;
use crate::population::Population;
use crate::tick::{WorldState, advance};
use crate::types::{HealthState, Job, KeyToU64, Persona, Position};

// ============================================================================
// History - running totals across every simulated day
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub deaths_by_cause: BTreeMap<String, usize>,
    pub visits: usize,
    pub births: usize,
    /// Keyed by `StatusChange::conversion_key`.
    pub conversions: BTreeMap<String, usize>,
}

impl History {
    pub fn record(&mut self, events: &DayEvents) {
        for death in &events.deaths {
            *self
                .deaths_by_cause
                .entry(death.cause.as_str().to_string())
                .or_insert(0) += 1;
        }
        self.visits += events.visits.len();
        self.births += events.births.len();
        for change in &events.status_changes {
            *self.conversions.entry(change.conversion_key()).or_insert(0) += 1;
        }
    }

    pub fn total_deaths(&self) -> usize {
        self.deaths_by_cause.values().sum()
    }

    pub fn deaths(&self, cause: DeathCause) -> usize {
        self.deaths_by_cause
            .get(cause.as_str())
            .copied()
            .unwrap_or(0)
    }
}

// ============================================================================
// Snapshots - read-only views for renderers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct ResidentSnapshot {
    pub id: u64,
    pub position: Position,
    pub job: Job,
    pub persona: Persona,
    pub health: HealthState,
    pub age: u32,
    pub at_hospital: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct WorldSnapshot {
    pub day: u32,
    pub food: f64,
    pub satisfaction: f64,
    pub couples: Vec<(u64, u64)>,
    pub residents: Vec<ResidentSnapshot>,
}

/// Head counts by category, jobs and personas in their `ALL` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Census {
    pub population: usize,
    pub couples: usize,
    pub healthy: usize,
    pub infected: usize,
    pub hospitalized: usize,
    pub jobs: Vec<(Job, usize)>,
    pub personas: Vec<(Persona, usize)>,
}

// ============================================================================
// World
// ============================================================================

/// Simulation state plus everything needed to drive it day by day.
#[derive(Debug, Clone)]
pub struct World {
    pub state: WorldState,
    pub day: u32,
    /// Satisfaction at the start of the last completed day.
    pub previous_satisfaction: f64,
    pub rules: Rules,
    pub history: History,
    pub last_events: DayEvents,
    rng: StdRng,
}

impl World {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::with_rules(config.compile()?, seed))
    }

    /// Bootstrap the configured population and pair off the initial adults.
    pub fn with_rules(rules: Rules, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let boot = &rules.config.bootstrap;

        let mut population: Population = (0..boot.population)
            .map(|_| rules.factory.create(boot.age, &mut rng))
            .collect();
        let couples = form_couples(
            &mut population,
            &[],
            rules.config.births.pairing_age,
            &mut rng,
        );

        let mut state = WorldState::new(population, boot.food, boot.satisfaction);
        state.couples = couples;

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "bootstrap",
            seed = seed,
            population = state.population.len() as u64,
            couples = state.couples.len() as u64,
            infected = state.infected() as u64,
            food = state.food,
            satisfaction = state.satisfaction,
        );

        Self {
            previous_satisfaction: state.satisfaction,
            state,
            day: 0,
            rules,
            history: History::default(),
            last_events: DayEvents::default(),
            rng,
        }
    }

    /// Advance one day and return what happened during it.
    pub fn run_day(&mut self) -> &DayEvents {
        self.day += 1;
        let satisfaction_before = self.state.satisfaction;

        let state = std::mem::take(&mut self.state);
        let (state, events) = advance(
            state,
            self.day,
            self.previous_satisfaction,
            &self.rules,
            &mut self.rng,
        );
        self.state = state;
        self.previous_satisfaction = satisfaction_before;

        self.history.record(&events);
        self.last_events = events;
        &self.last_events
    }

    pub fn is_extinct(&self) -> bool {
        self.state.population.is_empty()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            day: self.day,
            food: self.state.food,
            satisfaction: self.state.satisfaction,
            couples: self
                .state
                .couples
                .iter()
                .map(|c| (c.0.to_u64(), c.1.to_u64()))
                .collect(),
            residents: self
                .state
                .population
                .iter()
                .map(|(id, r)| ResidentSnapshot {
                    id: id.to_u64(),
                    position: r.position,
                    job: r.job,
                    persona: r.persona,
                    health: r.health,
                    age: r.age,
                    at_hospital: r.at_hospital,
                })
                .collect(),
        }
    }

    pub fn census(&self) -> Census {
        let pop = &self.state.population;
        Census {
            population: pop.len(),
            couples: self.state.couples.len(),
            healthy: pop.count(|r| !r.is_infected()),
            infected: pop.count(|r| r.is_infected()),
            hospitalized: pop.count(|r| r.at_hospital),
            jobs: Job::ALL
                .iter()
                .map(|&job| (job, pop.count(|r| r.job == job)))
                .collect(),
            personas: Persona::ALL
                .iter()
                .map(|&persona| (persona, pop.count(|r| r.persona == persona)))
                .collect(),
        }
    }
}
