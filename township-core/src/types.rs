// Core ID types and resident attribute enums

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use tsify_next::Tsify;

// ============================================================================
// IDs - Using slotmap for generational indices
// ============================================================================

new_key_type! {
    /// Handle to a resident in the [`Population`](crate::Population) container.
    pub struct ResidentId;
}

/// Trait for converting SlotMap keys to u64 for WASM boundary
pub trait KeyToU64 {
    fn to_u64(self) -> u64;
}

impl KeyToU64 for ResidentId {
    fn to_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

// ============================================================================
// Resident attributes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Job {
    /// Only children carry no job; mobility assigns one at working age.
    None,
    Farmer,
    Doctor,
    Worker,
    Jobless,
}

impl Job {
    pub const ALL: [Job; 5] = [
        Job::Farmer,
        Job::Doctor,
        Job::Worker,
        Job::Jobless,
        Job::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Job::None => "None",
            Job::Farmer => "Farmer",
            Job::Doctor => "Doctor",
            Job::Worker => "Worker",
            Job::Jobless => "Jobless",
        }
    }
}

/// Economic/constitutional archetype. Drives food need and disease tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Persona {
    Strong,
    Weak,
    Rich,
    Poor,
    Normal,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Strong,
        Persona::Weak,
        Persona::Rich,
        Persona::Poor,
        Persona::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Strong => "Strong",
            Persona::Weak => "Weak",
            Persona::Rich => "Rich",
            Persona::Poor => "Poor",
            Persona::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum HealthState {
    Healthy,
    Infected,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "Healthy",
            HealthState::Infected => "Infected",
        }
    }
}

// ============================================================================
// Position - canvas coordinates, fixed at creation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
