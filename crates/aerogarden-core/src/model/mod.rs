// ── Domain model ──

pub mod garden;
pub mod key;

pub use garden::{Garden, GardenMap, fields};
pub use key::GardenKey;
