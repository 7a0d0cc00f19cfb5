use crate::prelude::*;

/// Half-weighted sum of squared error over a labeled sample, plus the
/// output delta `output - target` that seeds backpropagation.
pub fn squared_error(output: &Array2<f64>, target: &Array2<f64>) -> (f64, Array2<f64>) {
    let delta = output - target;
    let loss = 0.5 * delta.mapv(|e| e * e).sum();
    (loss, delta)
}
