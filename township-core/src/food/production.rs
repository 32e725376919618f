use crate::config::FoodConfig;
use crate::population::Population;
use crate::resident::Resident;
use crate::types::Job;

/// Food a resident needs per day: persona need plus job surcharge.
pub fn daily_need(resident: &Resident, cfg: &FoodConfig) -> f64 {
    cfg.persona_need.get(resident.persona) + cfg.job_surcharge.get(resident.job)
}

/// Add today's harvest to the stock and report what the population will eat.
///
/// Consumption is returned, not subtracted: births and satisfaction look at
/// it before the distribution step spends the stock.
pub fn update_food(population: &Population, food: f64, cfg: &FoodConfig) -> (f64, f64) {
    let farmers = population.count(|r| r.job == Job::Farmer);
    let production = farmers as f64 * cfg.farmer_output;
    let consumption: f64 = population.residents().map(|r| daily_need(r, cfg)).sum();

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "food",
        farmers = farmers as u64,
        production = production,
        consumption = consumption,
        stock_before = food,
        stock_after = food + production,
    );

    (food + production, consumption)
}
