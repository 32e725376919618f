use rand::Rng;

use crate::config::Categorical;
use crate::types::{HealthState, Job, Persona, Position, ResidentId};

// === RESIDENT ===

/// One individual in the simulated township.
#[derive(Debug, Clone, PartialEq)]
pub struct Resident {
    pub age: u32,
    pub job: Job,
    pub persona: Persona,
    pub health: HealthState,
    /// 0 while healthy, 1 on the day of infection.
    pub days_infected: u32,
    pub at_hospital: bool,
    pub hospital_days: u32,
    /// Unmet food need accumulated since the last full meal.
    pub food_deficit: f64,
    pub days_hungry: u32,
    /// Back-reference into the population; the partner points back here.
    pub partner: Option<ResidentId>,
    pub position: Position,
}

impl Resident {
    /// A healthy, unpartnered resident with all counters at zero.
    pub fn new(age: u32, job: Job, persona: Persona, position: Position) -> Self {
        Self {
            age,
            job,
            persona,
            health: HealthState::Healthy,
            days_infected: 0,
            at_hospital: false,
            hospital_days: 0,
            food_deficit: 0.0,
            days_hungry: 0,
            partner: None,
            position,
        }
    }

    pub fn with_health(mut self, health: HealthState) -> Self {
        self.health = health;
        self
    }

    pub fn with_days_infected(mut self, days: u32) -> Self {
        self.health = HealthState::Infected;
        self.days_infected = days;
        self
    }

    pub fn is_infected(&self) -> bool {
        self.health == HealthState::Infected
    }

    pub fn is_single(&self) -> bool {
        self.partner.is_none()
    }

    pub fn infect(&mut self) {
        self.health = HealthState::Infected;
        self.days_infected = 1;
    }

    /// Full recovery: leaves hospital with every disease counter reset.
    pub fn cure(&mut self) {
        self.health = HealthState::Healthy;
        self.days_infected = 0;
        self.at_hospital = false;
        self.hospital_days = 0;
    }

    pub fn admit(&mut self) {
        self.at_hospital = true;
        self.hospital_days = 1;
    }
}

// === FACTORY ===

/// Draws new residents from the configured categorical distributions.
#[derive(Debug, Clone)]
pub struct ResidentFactory {
    health: Categorical<HealthState>,
    persona: Categorical<Persona>,
    adult_job: Categorical<Job>,
    working_age: u32,
    canvas: (f64, f64),
}

impl ResidentFactory {
    pub fn new(
        health: Categorical<HealthState>,
        persona: Categorical<Persona>,
        adult_job: Categorical<Job>,
        working_age: u32,
        canvas: (f64, f64),
    ) -> Self {
        Self {
            health,
            persona,
            adult_job,
            working_age,
            canvas,
        }
    }

    /// Create a resident of the given age. Children get `Job::None`.
    pub fn create<R: Rng + ?Sized>(&self, age: u32, rng: &mut R) -> Resident {
        let health = self.health.sample(rng);
        let persona = self.persona.sample(rng);
        let job = if age >= self.working_age {
            self.adult_job.sample(rng)
        } else {
            Job::None
        };
        let (width, height) = self.canvas;
        let position = Position::new(rng.random_range(0.0..width), rng.random_range(0.0..height));

        Resident::new(age, job, persona, position).with_health(health)
    }
}
