//! Simulation configuration.
//!
//! [`SimConfig`] is the serializable form: every field has a default matching
//! the reference rule set, so a JSON file only needs to name what it changes.
//! [`SimConfig::compile`] validates it once and produces [`Rules`], the
//! immutable structure every engine reads during a tick.

use std::path::Path;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::resident::ResidentFactory;
use crate::types::{HealthState, Job, Persona};

// === ERRORS ===

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("weight table `{table}` has no positive weight")]
    EmptyWeights { table: &'static str },

    #[error("weight table `{table}` is invalid: {reason}")]
    InvalidWeights { table: &'static str, reason: String },

    #[error("probability `{field}` = {value} is outside [0, 1]")]
    Probability { field: &'static str, value: f64 },

    #[error("canvas must have positive finite extent, got {width}x{height}")]
    Canvas { width: f64, height: f64 },

    #[error("`{field}` = {value} must be positive and finite")]
    NonPositive { field: &'static str, value: f64 },
}

// === LOOKUP TABLES ===

/// One value per persona.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonaTable<V> {
    pub strong: V,
    pub weak: V,
    pub rich: V,
    pub poor: V,
    pub normal: V,
}

impl<V: Copy> PersonaTable<V> {
    pub fn get(&self, persona: Persona) -> V {
        match persona {
            Persona::Strong => self.strong,
            Persona::Weak => self.weak,
            Persona::Rich => self.rich,
            Persona::Poor => self.poor,
            Persona::Normal => self.normal,
        }
    }
}

/// One value per job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobTable<V> {
    pub none: V,
    pub farmer: V,
    pub doctor: V,
    pub worker: V,
    pub jobless: V,
}

impl<V: Copy> JobTable<V> {
    pub fn get(&self, job: Job) -> V {
        match job {
            Job::None => self.none,
            Job::Farmer => self.farmer,
            Job::Doctor => self.doctor,
            Job::Worker => self.worker,
            Job::Jobless => self.jobless,
        }
    }
}

/// A weighted categorical distribution compiled from a `(value, weight)` table.
#[derive(Debug, Clone)]
pub struct Categorical<T> {
    values: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Copy> Categorical<T> {
    pub fn new(table: &'static str, entries: &[(T, u32)]) -> Result<Self, ConfigError> {
        let total: u64 = entries.iter().map(|(_, w)| u64::from(*w)).sum();
        if total == 0 {
            return Err(ConfigError::EmptyWeights { table });
        }
        let index = WeightedIndex::new(entries.iter().map(|(_, w)| *w)).map_err(|e| {
            ConfigError::InvalidWeights {
                table,
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            values: entries.iter().map(|(v, _)| *v).collect(),
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }
}

// === CONFIG SECTIONS ===

/// Initial world: how many residents, how old, and the starting aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub population: usize,
    pub age: u32,
    pub food: f64,
    pub satisfaction: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            population: 100,
            age: 25,
            food: 0.0,
            satisfaction: 50.0,
            canvas_width: 1720.0,
            canvas_height: 880.0,
        }
    }
}

/// Categorical draws used when a resident is created or changes job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentConfig {
    pub initial_health: Vec<(HealthState, u32)>,
    pub persona: Vec<(Persona, u32)>,
    pub adult_job: Vec<(Job, u32)>,
    pub jobless_rehire: Vec<(Job, u32)>,
    pub working_age: u32,
}

impl Default for ResidentConfig {
    fn default() -> Self {
        Self {
            // Sparse seeding: transmission does the spreading.
            initial_health: vec![(HealthState::Infected, 2), (HealthState::Healthy, 98)],
            persona: vec![
                (Persona::Strong, 5),
                (Persona::Weak, 5),
                (Persona::Rich, 5),
                (Persona::Poor, 10),
                (Persona::Normal, 75),
            ],
            adult_job: vec![
                (Job::Farmer, 17),
                (Job::Doctor, 5),
                (Job::Worker, 45),
                (Job::Jobless, 8),
            ],
            jobless_rehire: vec![(Job::Doctor, 1), (Job::Farmer, 30), (Job::Worker, 69)],
            working_age: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Daily output of one farmer.
    pub farmer_output: f64,
    pub persona_need: PersonaTable<f64>,
    /// Extra daily need on top of the persona need.
    pub job_surcharge: JobTable<f64>,
    /// Serve residents that match no priority tier as a final tier.
    /// Off by default: they are never fed.
    pub feed_untiered: bool,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            farmer_output: 35.0,
            persona_need: PersonaTable {
                strong: 3.0,
                weak: 3.0,
                rich: 5.0,
                poor: 1.0,
                normal: 3.0,
            },
            job_surcharge: JobTable {
                none: 0.0,
                farmer: 0.0,
                doctor: 0.0,
                worker: 3.0,
                jobless: 2.0,
            },
            feed_untiered: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortalityConfig {
    pub natural_min_age: u32,
    pub natural_max_age: u32,
    pub base_rate: f64,
    /// Age at which the linear ramp starts.
    pub ramp_start_age: u32,
    /// Years over which the ramp adds `ramp_increase`.
    pub ramp_span: f64,
    pub ramp_increase: f64,
    pub starvation_days: u32,
    pub starvation_deficit: f64,
}

impl Default for MortalityConfig {
    fn default() -> Self {
        Self {
            natural_min_age: 10,
            natural_max_age: 100,
            base_rate: 0.0005,
            ramp_start_age: 60,
            ramp_span: 40.0,
            ramp_increase: 0.0095,
            starvation_days: 7,
            starvation_deficit: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthConfig {
    pub pairing_age: u32,
    pub min_satisfaction: f64,
    pub rate_fed: f64,
    pub rate_short: f64,
    pub crowding_threshold: usize,
    pub crowding_divisor: f64,
}

impl Default for BirthConfig {
    fn default() -> Self {
        Self {
            pairing_age: 18,
            min_satisfaction: 30.0,
            rate_fed: 0.2,
            rate_short: 0.05,
            crowding_threshold: 1000,
            crowding_divisor: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilityConfig {
    pub layoff_rate: f64,
    pub rehire_rate: f64,
    pub poor_uplift_rate: f64,
    pub rich_decline_scale: f64,
    pub rich_gain_scale: f64,
    /// Added when satisfaction moved in the direction favouring the change.
    pub trend_bonus: f64,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            layoff_rate: 0.01,
            rehire_rate: 0.05,
            poor_uplift_rate: 0.05,
            rich_decline_scale: 0.1,
            rich_gain_scale: 0.05,
            trend_bonus: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemicConfig {
    pub contact_radius: f64,
    pub transmission_probability: f64,
    /// Days of infection survived; death when `days_infected` exceeds it.
    pub tolerance: PersonaTable<u32>,
}

impl Default for EpidemicConfig {
    fn default() -> Self {
        Self {
            contact_radius: 45.0,
            transmission_probability: 0.45,
            tolerance: PersonaTable {
                strong: 6,
                weak: 2,
                rich: 5,
                poor: 3,
                normal: 4,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcareConfig {
    pub patients_per_doctor: u32,
    /// No treatment happens on days up to and including this one.
    pub grace_days: u32,
    pub cure_base: f64,
    pub cure_decay: f64,
    pub admit_base: f64,
    pub admit_growth: f64,
}

impl Default for HealthcareConfig {
    fn default() -> Self {
        Self {
            patients_per_doctor: 3,
            grace_days: 2,
            cure_base: 0.80,
            cure_decay: 0.10,
            admit_base: 0.30,
            admit_growth: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatisfactionConfig {
    pub surplus_base: f64,
    pub surplus_weight: f64,
    pub deficit_weight: f64,
    pub severe_deficit_ratio: f64,
    pub severe_deficit_multiplier: f64,
    pub mortality_weight: f64,
    pub hospital_weight: f64,
    pub underfed_weight: f64,
    pub low_threshold: f64,
    pub low_recovery: f64,
    pub high_threshold: f64,
    pub high_decay: f64,
    pub critical_threshold: f64,
    pub critical_multiplier: f64,
}

impl Default for SatisfactionConfig {
    fn default() -> Self {
        Self {
            surplus_base: 5.0,
            surplus_weight: 2.0,
            deficit_weight: 5.0,
            severe_deficit_ratio: 0.3,
            severe_deficit_multiplier: 1.2,
            mortality_weight: 25.0,
            hospital_weight: 15.0,
            underfed_weight: 0.5,
            low_threshold: 50.0,
            low_recovery: 1.0,
            high_threshold: 90.0,
            high_decay: 2.0,
            critical_threshold: 30.0,
            critical_multiplier: 1.2,
        }
    }
}

// === TOP LEVEL ===

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub bootstrap: BootstrapConfig,
    pub residents: ResidentConfig,
    pub food: FoodConfig,
    pub mortality: MortalityConfig,
    pub births: BirthConfig,
    pub mobility: MobilityConfig,
    pub epidemic: EpidemicConfig,
    pub healthcare: HealthcareConfig,
    pub satisfaction: SatisfactionConfig,
}

impl SimConfig {
    /// Heavily infected starting population (80% infected at creation).
    pub fn heavy_outbreak() -> Self {
        let mut config = Self::default();
        config.residents.initial_health =
            vec![(HealthState::Infected, 80), (HealthState::Healthy, 20)];
        config
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validate and build the sampling tables.
    pub fn compile(self) -> Result<Rules, ConfigError> {
        let probabilities = [
            ("births.rate_fed", self.births.rate_fed),
            ("births.rate_short", self.births.rate_short),
            ("mobility.layoff_rate", self.mobility.layoff_rate),
            ("mobility.rehire_rate", self.mobility.rehire_rate),
            ("mobility.poor_uplift_rate", self.mobility.poor_uplift_rate),
            (
                "epidemic.transmission_probability",
                self.epidemic.transmission_probability,
            ),
            ("mortality.base_rate", self.mortality.base_rate),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        let (width, height) = (self.bootstrap.canvas_width, self.bootstrap.canvas_height);
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::Canvas { width, height });
        }
        let divisor = self.births.crowding_divisor;
        if !(divisor > 0.0 && divisor.is_finite()) {
            return Err(ConfigError::NonPositive {
                field: "births.crowding_divisor",
                value: divisor,
            });
        }

        let adult_jobs = Categorical::new("adult_job", &self.residents.adult_job)?;
        let jobless_rehire = Categorical::new("jobless_rehire", &self.residents.jobless_rehire)?;
        let factory = ResidentFactory::new(
            Categorical::new("initial_health", &self.residents.initial_health)?,
            Categorical::new("persona", &self.residents.persona)?,
            adult_jobs.clone(),
            self.residents.working_age,
            (width, height),
        );

        Ok(Rules {
            config: self,
            factory,
            adult_jobs,
            jobless_rehire,
        })
    }
}

/// Validated configuration plus the compiled categorical tables.
#[derive(Debug, Clone)]
pub struct Rules {
    pub config: SimConfig,
    pub factory: ResidentFactory,
    pub adult_jobs: Categorical<Job>,
    pub jobless_rehire: Categorical<Job>,
}

impl Default for Rules {
    fn default() -> Self {
        SimConfig::default()
            .compile()
            .expect("default configuration is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_config_compiles() {
        let rules = SimConfig::default().compile().unwrap();
        assert_eq!(rules.config.food.farmer_output, 35.0);
        assert_eq!(rules.config.epidemic.tolerance.get(Persona::Weak), 2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(
            r#"{ "epidemic": { "transmission_probability": 1.0 }, "food": { "feed_untiered": true } }"#,
        )
        .unwrap();
        assert_eq!(config.epidemic.transmission_probability, 1.0);
        assert_eq!(config.epidemic.contact_radius, 45.0);
        assert!(config.food.feed_untiered);
        assert_eq!(config.food.persona_need.get(Persona::Rich), 5.0);
        assert_eq!(config.bootstrap.age, 25);
    }

    #[test]
    fn zero_weight_table_is_rejected() {
        let mut config = SimConfig::default();
        config.residents.persona = vec![(Persona::Normal, 0)];
        let err = config.compile().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyWeights { table: "persona" }));
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let mut config = SimConfig::default();
        config.epidemic.transmission_probability = 1.5;
        let err = config.compile().unwrap_err();
        assert!(matches!(err, ConfigError::Probability { .. }));
    }

    #[test]
    fn unbounded_canvas_is_rejected() {
        let mut config = SimConfig::default();
        config.bootstrap.canvas_width = f64::INFINITY;
        let err = config.compile().unwrap_err();
        assert!(matches!(err, ConfigError::Canvas { .. }));

        let mut config = SimConfig::default();
        config.bootstrap.canvas_height = f64::NAN;
        assert!(matches!(config.compile(), Err(ConfigError::Canvas { .. })));
    }

    #[test]
    fn crowding_divisor_must_be_positive() {
        for divisor in [0.0, -10.0, f64::INFINITY] {
            let mut config = SimConfig::default();
            config.births.crowding_divisor = divisor;
            let err = config.compile().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::NonPositive {
                    field: "births.crowding_divisor",
                    ..
                }
            ));
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn categorical_only_draws_weighted_values() {
        let table = Categorical::new("t", &[(Job::Farmer, 0), (Job::Worker, 3)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(table.sample(&mut rng), Job::Worker);
        }
    }

    #[test]
    fn heavy_outbreak_mostly_infects() {
        let rules = SimConfig::heavy_outbreak().compile().unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let infected = (0..1000)
            .map(|_| rules.factory.create(25, &mut rng))
            .filter(|r| r.is_infected())
            .count();
        assert!(infected > 700 && infected < 900, "infected = {}", infected);
    }
}
