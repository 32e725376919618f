// Food economy: daily production tally and tiered distribution.

pub mod distribution;
pub mod production;

pub use distribution::*;
pub use production::*;
