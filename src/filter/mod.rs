mod evaluate;
mod selection;
mod store;

pub use evaluate::{evaluate, matches, preview_count};
pub use selection::{Dimension, FilterSelection, FilterUpdate};
pub use store::FilterStore;

#[cfg(test)]
pub use selection::{DietaryTag, OtherFlag, PovertyThreshold, Region};
