use crate::config::FoodConfig;
use crate::population::Population;
use crate::resident::Resident;
use crate::types::{Job, Persona, ResidentId};

use super::production::daily_need;

// === PRIORITY TIERS ===

/// Food is handed out tier by tier, in this order, until the stock runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Rich,
    Employed,
    Jobless,
    Poor,
}

impl Tier {
    pub const ORDER: [Tier; 4] = [Tier::Rich, Tier::Employed, Tier::Jobless, Tier::Poor];

    fn matches(&self, resident: &Resident) -> bool {
        match self {
            Tier::Rich => resident.persona == Persona::Rich,
            Tier::Employed => matches!(resident.job, Job::Doctor | Job::Farmer | Job::Worker),
            Tier::Jobless => resident.job == Job::Jobless,
            Tier::Poor => resident.persona == Persona::Poor,
        }
    }

    /// The first tier a resident qualifies for, if any.
    ///
    /// Children with a Strong, Weak or Normal persona match none.
    pub fn of(resident: &Resident) -> Option<Tier> {
        Self::ORDER.into_iter().find(|t| t.matches(resident))
    }
}

// === DISTRIBUTION ===

/// Feed one resident from the shared stock. Returns whether they were fully fed.
fn serve(resident: &mut Resident, need: f64, stock: &mut f64) -> bool {
    if *stock >= need {
        *stock -= need;
        resident.days_hungry = 0;
        resident.food_deficit = 0.0;
        true
    } else {
        let shortfall = need - *stock;
        *stock = 0.0;
        resident.food_deficit += shortfall;
        resident.days_hungry += 1;
        false
    }
}

/// Spend the stock on the population by priority tier.
///
/// Within a tier residents are served in population order. Residents outside
/// every tier go hungry unless `feed_untiered` is set, in which case they are
/// served last. Returns the remaining stock and the number of underfed
/// residents.
pub fn distribute_food(population: &mut Population, food: f64, cfg: &FoodConfig) -> (f64, usize) {
    let mut tiers: [Vec<ResidentId>; 4] = Default::default();
    let mut untiered: Vec<ResidentId> = Vec::new();
    for (id, r) in population.iter() {
        match Tier::of(r) {
            Some(tier) => tiers[tier as usize].push(id),
            None => untiered.push(id),
        }
    }

    let stock_before = food;
    let mut stock = food.max(0.0);
    let mut underfed = 0usize;

    for id in tiers.iter().flatten() {
        let resident = &mut population[*id];
        let need = daily_need(resident, cfg);
        if !serve(resident, need, &mut stock) {
            underfed += 1;
        }
    }

    for id in &untiered {
        let resident = &mut population[*id];
        let need = daily_need(resident, cfg);
        let fed = if cfg.feed_untiered {
            serve(resident, need, &mut stock)
        } else {
            resident.food_deficit += need;
            resident.days_hungry += 1;
            false
        };
        if !fed {
            underfed += 1;
        }
    }

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "distribution",
        stock_before = stock_before,
        stock_after = stock,
        underfed = underfed as u64,
        untiered = untiered.len() as u64,
    );
    let _ = stock_before; // Suppress unused warning when feature disabled

    debug_assert!(stock >= 0.0);
    (stock, underfed)
}
