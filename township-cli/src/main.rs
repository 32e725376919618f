//! Console driver for the township simulation.
//!
//! Runs a fixed number of days and prints a periodic snapshot, a one-line
//! summary for the other days, and a final report.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use township_core::{ConfigError, DayEvents, DeathCause, SimConfig, World};

/// Township simulation - residents, food, disease and morale, day by day
#[derive(Parser, Debug)]
#[command(name = "township")]
struct Args {
    /// Number of days to simulate
    #[arg(long, default_value_t = 100)]
    days: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Initial number of residents
    #[arg(long)]
    population: Option<usize>,

    /// Age of every initial resident
    #[arg(long)]
    age: Option<u32>,

    /// Initial food stock
    #[arg(long)]
    food: Option<f64>,

    /// Initial satisfaction (0-100)
    #[arg(long)]
    satisfaction: Option<f64>,

    /// JSON configuration file; flags above override its bootstrap section
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with 80% of residents infected
    #[arg(long)]
    heavy_outbreak: bool,

    /// Record every simulation event to parquet files in this directory
    #[arg(long)]
    record: Option<PathBuf>,
}

const SNAPSHOT_EVERY: u32 = 5;

impl Args {
    fn sim_config(&self) -> Result<SimConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        if self.heavy_outbreak {
            config.residents.initial_health = SimConfig::heavy_outbreak().residents.initial_health;
        }

        let boot = &mut config.bootstrap;
        if let Some(population) = self.population {
            boot.population = population;
        }
        if let Some(age) = self.age {
            boot.age = age;
        }
        if let Some(food) = self.food {
            boot.food = food;
        }
        if let Some(satisfaction) = self.satisfaction {
            boot.satisfaction = satisfaction;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Either record events to parquet or log them to stderr, not both
    let _recorder = match &args.record {
        Some(dir) => Some(instrument::ScopedRecorder::new(dir)),
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_target(true)
                .init();
            None
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut world = World::new(args.sim_config()?, seed)?;
    println!("{}", banner(&world, seed, args.days));

    let mut extinct = world.is_extinct();
    for _ in 0..args.days {
        let day = world.run_day().day;
        if day % SNAPSHOT_EVERY == 0 {
            print_snapshot(&world);
        } else {
            print_summary(&world);
        }
        if became_extinct(&mut extinct, &world) {
            tracing::warn!(day, "population extinct");
        }
    }

    print_report(&world);
    Ok(())
}

fn banner(world: &World, seed: u64, days: u32) -> String {
    format!(
        "Township: {} residents, {} couples, seed {}, {} days",
        world.state.population.len(),
        world.state.couples.len(),
        seed,
        days
    )
}

/// True only on the day the population first dies out.
fn became_extinct(extinct: &mut bool, world: &World) -> bool {
    let now = world.is_extinct();
    let transition = now && !*extinct;
    *extinct = now;
    transition
}

fn print_summary(world: &World) {
    println!(
        "Day {:>4} | population {:>5} | infected {:>4} | deaths {:>3}",
        world.day,
        world.state.population.len(),
        world.state.infected(),
        world.last_events.deaths.len()
    );
}

fn print_snapshot(world: &World) {
    let census = world.census();
    let events: &DayEvents = &world.last_events;

    println!();
    println!("=== Day {} ===", world.day);
    println!(
        " Population: {}   |   Couples: {}",
        census.population, census.couples
    );
    println!(
        " Food: {:.0}   |   Satisfaction: {:.0}",
        world.state.food, world.state.satisfaction
    );
    println!(
        " Healthy: {}   |   Infected: {}   |   Patients: {}",
        census.healthy, census.infected, census.hospitalized
    );
    let jobs: Vec<String> = census
        .jobs
        .iter()
        .map(|(job, n)| format!("{}: {}", job.as_str(), n))
        .collect();
    println!(" Jobs: {}", jobs.join(", "));
    let personas: Vec<String> = census
        .personas
        .iter()
        .map(|(persona, n)| format!("{}: {}", persona.as_str(), n))
        .collect();
    println!(" Personas: {}", personas.join(", "));

    println!(" Deaths today: {}", events.deaths.len());
    for death in &events.deaths {
        println!(
            "   {} {} ({}), infected {} days{}",
            death.persona.as_str(),
            death.job.as_str(),
            death.cause.as_str(),
            death.days_infected,
            if death.at_hospital { ", at hospital" } else { "" }
        );
    }
    println!(" Visits today: {}", events.visits.len());
    println!(" Status changes today: {}", events.status_changes.len());
    for change in &events.status_changes {
        println!("   {}", change);
    }
    println!(" Births today: {}", events.births.len());
    println!();
}

fn print_report(world: &World) {
    let history = &world.history;

    println!();
    println!("=== Final report after {} days ===", world.day);
    println!(" Total deaths: {}", history.total_deaths());
    for cause in DeathCause::ALL {
        println!("   {}: {}", cause.as_str(), history.deaths(cause));
    }
    println!(" Total visits: {}", history.visits);
    println!(" Conversions:");
    for (key, n) in history.conversions.iter().filter(|(_, n)| **n > 0) {
        println!("   {}: {}", key, n);
    }
    println!(" Total births: {}", history.births);
    println!(" Final population: {}", world.state.population.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(population: usize, seed: u64) -> World {
        let mut config = SimConfig::default();
        config.bootstrap.population = population;
        World::new(config, seed).unwrap()
    }

    #[test]
    fn banner_reports_initial_couples() {
        let world = world(40, 3);
        let couples = world.state.couples.len();
        // 40 adults of 25 pair off completely
        assert_eq!(couples, 20);
        assert_eq!(
            banner(&world, 3, 10),
            "Township: 40 residents, 20 couples, seed 3, 10 days"
        );
    }

    #[test]
    fn extinction_is_reported_once() {
        let mut empty = world(0, 1);
        let mut extinct = empty.is_extinct();
        assert!(extinct);
        for _ in 0..3 {
            empty.run_day();
            assert!(!became_extinct(&mut extinct, &empty));
        }

        let alive = world(5, 1);
        let mut extinct = false;
        assert!(!became_extinct(&mut extinct, &alive));
        let mut gone = world(0, 2);
        assert!(became_extinct(&mut extinct, &gone));
        gone.run_day();
        assert!(!became_extinct(&mut extinct, &gone));
    }
}
