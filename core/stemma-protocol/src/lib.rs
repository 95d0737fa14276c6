#![no_std] // Shared with the WASM platform

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod category;
pub mod ids;
pub mod model;

#[cfg(feature = "serde")]
mod sentinel;

// Re-export core types for convenience
pub use category::{Category, CategorySet, UnknownCategory};
pub use ids::{NodeId, RuleId};
pub use model::*;
