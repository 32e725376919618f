// Per-day event records returned by the tick.
//
// Field order matches the record layout report consumers rely on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resident::Resident;
use crate::types::{Job, Persona};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Natural,
    Starvation,
    Infection,
}

impl DeathCause {
    pub const ALL: [DeathCause; 3] = [
        DeathCause::Infection,
        DeathCause::Starvation,
        DeathCause::Natural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Natural => "natural",
            DeathCause::Starvation => "starvation",
            DeathCause::Infection => "infection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub day: u32,
    pub job: Job,
    pub persona: Persona,
    pub days_infected: u32,
    pub at_hospital: bool,
    pub hospital_days: u32,
    pub cause: DeathCause,
}

impl DeathRecord {
    pub fn new(day: u32, resident: &Resident, cause: DeathCause) -> Self {
        Self {
            day,
            job: resident.job,
            persona: resident.persona,
            days_infected: resident.days_infected,
            at_hospital: resident.at_hospital,
            hospital_days: resident.hospital_days,
            cause,
        }
    }
}

/// A new hospital admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub job: Job,
    pub persona: Persona,
    pub days_infected: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub day: u32,
    pub persona: Persona,
    pub job: Job,
}

/// Which attribute moved, and from what to what.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Job { from: Job, to: Job },
    Persona { from: Persona, to: Persona },
}

/// One social-mobility event; carries the attribute that did not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub transition: Transition,
    pub job: Job,
    pub persona: Persona,
}

impl StatusChange {
    pub fn job(from: Job, to: Job, persona: Persona) -> Self {
        Self {
            transition: Transition::Job { from, to },
            job: to,
            persona,
        }
    }

    pub fn persona(from: Persona, to: Persona, job: Job) -> Self {
        Self {
            transition: Transition::Persona { from, to },
            job,
            persona: to,
        }
    }

    /// `"Worker -> Jobless"`, used to tally conversions.
    pub fn conversion_key(&self) -> String {
        match self.transition {
            Transition::Job { from, to } => format!("{} -> {}", from.as_str(), to.as_str()),
            Transition::Persona { from, to } => {
                format!("{} -> {}", from.as_str(), to.as_str())
            }
        }
    }
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.transition {
            Transition::Job { .. } => write!(
                f,
                "{} : Persona: {}",
                self.conversion_key(),
                self.persona.as_str()
            ),
            Transition::Persona { .. } => {
                write!(f, "{} : Job: {}", self.conversion_key(), self.job.as_str())
            }
        }
    }
}

/// Everything that happened during one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayEvents {
    pub day: u32,
    pub deaths: Vec<DeathRecord>,
    pub visits: Vec<VisitRecord>,
    pub status_changes: Vec<StatusChange>,
    pub births: Vec<BirthRecord>,
    /// Food demanded by the population after the death step.
    pub consumption: f64,
    pub underfed: usize,
    pub new_infections: usize,
    pub doctors: usize,
    pub hospitalized: usize,
}

impl DayEvents {
    pub fn new(day: u32) -> Self {
        Self {
            day,
            ..Default::default()
        }
    }

    pub fn deaths_by(&self, cause: DeathCause) -> usize {
        self.deaths.iter().filter(|d| d.cause == cause).count()
    }
}
