use crate::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Index of the largest entry, scanning left to right with a strict
/// comparison so ties resolve to the lowest index. An empty input maps
/// to 0.
pub fn argmax(values: &Array2<f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// One-hot column for a class label: a `(classes, 1)` vector with a 1.0
/// at the label's index.
pub fn to_categorical(label: usize, classes: usize) -> Result<Array2<f64>> {
    if label >= classes {
        return Err(NetworkError::InvalidLabel(format!(
            "label {} out of range for {} classes",
            label, classes
        )));
    }
    let mut encoded = Array2::zeros((classes, 1));
    encoded[[label, 0]] = 1.0;
    Ok(encoded)
}

/// Column vector from a slice.
pub fn column(values: &[f64]) -> Array2<f64> {
    Array2::from_shape_vec((values.len(), 1), values.to_vec()).unwrap()
}

/// Deterministic in-place shuffle: the same seed always produces the
/// same permutation.
pub fn shuffle_seeded<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}
