pub mod births;
pub mod mortality;

pub use births::*;
pub use mortality::*;
