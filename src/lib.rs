pub mod core;
pub mod error;
pub mod models;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{apply_update, GradientPair};
pub use crate::error::{NetworkError, Result};
pub use crate::models::{Network, TrainState};
pub use crate::utils::{argmax, column, shuffle_seeded, to_categorical};
