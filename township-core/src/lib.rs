use wasm_bindgen::prelude::*;

pub mod config;
pub mod epidemic;
pub mod events;
pub mod food;
pub mod healthcare;
pub mod mobility;
pub mod pairing;
pub mod population;
pub mod resident;
pub mod satisfaction;
pub mod tick;
pub mod types;
pub mod vital;
pub mod world;

pub use config::{ConfigError, Rules, SimConfig};
pub use events::*;
pub use pairing::Couple;
pub use population::Population;
pub use resident::{Resident, ResidentFactory};
pub use tick::{WorldState, advance};
pub use types::*;
pub use world::{Census, History, ResidentSnapshot, World, WorldSnapshot};

#[cfg(feature = "instrument")]
pub use instrument;

// ============================================================================
// WASM API - Simulation
// ============================================================================

#[wasm_bindgen]
pub struct Simulation {
    world: World,
}

#[wasm_bindgen]
impl Simulation {
    /// Default configuration with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        Self {
            world: World::with_rules(Rules::default(), seed),
        }
    }

    /// Build from a JSON `SimConfig`; missing fields take their defaults.
    #[wasm_bindgen]
    pub fn with_config(seed: u64, config_json: &str) -> Result<Simulation, JsValue> {
        console_error_panic_hook::set_once();

        let world = SimConfig::from_json_str(config_json)
            .and_then(|config| World::new(config, seed))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { world })
    }

    /// Advance the simulation by one day
    #[wasm_bindgen]
    pub fn advance_day(&mut self) {
        self.world.run_day();
    }

    #[wasm_bindgen]
    pub fn get_day(&self) -> u32 {
        self.world.day
    }

    #[wasm_bindgen]
    pub fn get_snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    #[wasm_bindgen]
    pub fn get_census(&self) -> Census {
        self.world.census()
    }

    /// Records of the most recent day (deaths, visits, changes, births).
    #[wasm_bindgen]
    pub fn get_day_events(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.world.last_events).map_err(JsValue::from)
    }
}

impl Simulation {
    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(0)
    }
}

// ============================================================================
// Tests
// ============================================================================
