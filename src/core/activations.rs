use crate::prelude::*;

/// Entrywise logistic sigmoid, the only activation this network uses.
pub fn sigmoid_forward(z: Array2<f64>) -> Array2<f64> {
    z.mapv(|z| 1.0 / (1.0 + (-z).exp()))
}

/// Entrywise sigmoid derivative, evaluated on the pre-activation.
pub fn sigmoid_backward(z: Array2<f64>) -> Array2<f64> {
    z.mapv(|z| {
        let s = 1.0 / (1.0 + (-z).exp());
        s * (1.0 - s)
    })
}
