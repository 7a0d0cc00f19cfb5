pub use serde::{Serialize, Deserialize};
pub use std::fs::File;
pub use std::io::{Read, Write};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::Uniform;

pub use crate::models::{Network, TrainState};
pub use crate::error::*;

// Internal re-exports
pub use crate::core::{
    apply_update,
    sigmoid_backward,
    sigmoid_forward,
    squared_error,
    GradientPair,
};
pub use crate::utils::{argmax, column, shuffle_seeded, to_categorical};
