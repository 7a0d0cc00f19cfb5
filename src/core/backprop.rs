use crate::core::activations::sigmoid_backward;
use crate::prelude::*;

/// Per-layer weight and bias gradients, ordered input to output like the
/// model's own parameter lists.
#[derive(Debug, Clone)]
pub struct GradientPair {
    pub dw: Array2<f64>,
    pub db: Array2<f64>,
}

/// Walks the layers from the output back to the input, turning the output
/// delta into one `GradientPair` per layer.
///
/// `trace` is the activation list from `Network::forward`, input first.
/// The parameter lists are zipped against the trace, so the walk stops at
/// the shortest of the three sequences instead of indexing past a ragged
/// one.
pub fn gradients(
    network: &Network,
    trace: &[Array2<f64>],
    output_delta: Array2<f64>,
) -> Vec<GradientPair> {
    let steps: Vec<_> = network
        .weights
        .iter()
        .zip(network.biases.iter())
        .zip(trace.iter())
        .collect();

    let mut grads = Vec::with_capacity(steps.len());
    let mut delta = output_delta;
    for ((w, b), a) in steps.into_iter().rev() {
        // pre-activation recomputed from the cached input of this layer
        let z = w.dot(a) + b;
        let dz = sigmoid_backward(z) * &delta;
        let dw = dz.dot(&a.t());
        delta = w.t().dot(&dz);
        grads.insert(0, GradientPair { dw, db: dz });
    }
    grads
}

/// Plain SGD step. Builds a new model; the input model is untouched.
///
/// Pairing truncates to the shorter of the parameter and gradient lists;
/// layers without a matching gradient carry over unchanged, so the result
/// is always a well-formed model.
pub fn apply_update(network: &Network, grads: &[GradientPair], learning_rate: f64) -> Network {
    let mut weights = network.weights.clone();
    let mut biases = network.biases.clone();
    for ((w, b), g) in weights.iter_mut().zip(biases.iter_mut()).zip(grads.iter()) {
        *w = w.clone() - learning_rate * g.dw.clone();
        *b = b.clone() - learning_rate * g.db.clone();
    }
    Network {
        layer_sizes: network.layer_sizes.clone(),
        weights,
        biases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::losses::squared_error;

    fn sample_loss(network: &Network, input: &Array2<f64>, target: &Array2<f64>) -> f64 {
        let (loss, _) = squared_error(&network.predict(input).unwrap(), target);
        loss
    }

    #[test]
    fn gradient_shapes_match_parameter_shapes() {
        let net = Network::random_seeded(&[3, 5, 4, 2], 7).unwrap();
        let input = column(&[0.1, 0.2, 0.3]);
        let target = column(&[1.0, 0.0]);
        let (grads, _) = net.gradients(&input, &target).unwrap();

        assert_eq!(grads.len(), net.weights.len());
        for (g, (w, b)) in grads.iter().zip(net.weights.iter().zip(net.biases.iter())) {
            assert_eq!(g.dw.dim(), w.dim());
            assert_eq!(g.db.dim(), b.dim());
        }
    }

    #[test]
    fn gradients_agree_with_finite_differences() {
        let net = Network::random_seeded(&[2, 3, 1], 11).unwrap();
        let input = column(&[0.6, -0.4]);
        let target = column(&[1.0]);
        let (grads, _) = net.gradients(&input, &target).unwrap();

        let eps = 1e-6;
        for layer in 0..net.weights.len() {
            for ((row, col), &analytic) in grads[layer].dw.indexed_iter() {
                let mut plus = net.clone();
                plus.weights[layer][[row, col]] += eps;
                let mut minus = net.clone();
                minus.weights[layer][[row, col]] -= eps;
                let numeric = (sample_loss(&plus, &input, &target)
                    - sample_loss(&minus, &input, &target))
                    / (2.0 * eps);
                assert!(
                    (analytic - numeric).abs() < 1e-5,
                    "layer {} weight ({}, {}): analytic {} vs numeric {}",
                    layer,
                    row,
                    col,
                    analytic,
                    numeric
                );
            }
            for ((row, col), &analytic) in grads[layer].db.indexed_iter() {
                let mut plus = net.clone();
                plus.biases[layer][[row, col]] += eps;
                let mut minus = net.clone();
                minus.biases[layer][[row, col]] -= eps;
                let numeric = (sample_loss(&plus, &input, &target)
                    - sample_loss(&minus, &input, &target))
                    / (2.0 * eps);
                assert!(
                    (analytic - numeric).abs() < 1e-5,
                    "layer {} bias ({}, {}): analytic {} vs numeric {}",
                    layer,
                    row,
                    col,
                    analytic,
                    numeric
                );
            }
        }
    }

    #[test]
    fn backward_walk_stops_at_the_shortest_sequence() {
        let net = Network::random_seeded(&[2, 3, 1], 3).unwrap();
        let input = column(&[0.5, 0.5]);
        let trace = net.forward(&input).unwrap();

        // only the first layer's input is available: one pair comes back
        let grads = gradients(&net, &trace[..1], column(&[0.2, 0.1, 0.3]));
        assert_eq!(grads.len(), 1);
        assert_eq!(grads[0].dw.dim(), net.weights[0].dim());
    }

    #[test]
    fn ragged_update_leaves_unpaired_layers_unchanged() {
        let net = Network::random_seeded(&[2, 3, 1], 5).unwrap();
        let input = column(&[0.5, 0.5]);
        let target = column(&[1.0]);
        let (grads, _) = net.gradients(&input, &target).unwrap();

        let updated = apply_update(&net, &grads[..1], 0.1);
        assert_ne!(updated.weights[0], net.weights[0]);
        assert_eq!(updated.weights[1], net.weights[1]);
        assert_eq!(updated.biases[1], net.biases[1]);
        assert_eq!(updated.layer_sizes, net.layer_sizes);
    }

    #[test]
    fn update_scales_with_the_learning_rate() {
        let net = Network::random_seeded(&[1, 1], 9).unwrap();
        let input = column(&[1.0]);
        let target = column(&[0.0]);
        let (grads, _) = net.gradients(&input, &target).unwrap();

        let updated = apply_update(&net, &grads, 0.5);
        let expected = net.weights[0][[0, 0]] - 0.5 * grads[0].dw[[0, 0]];
        assert!((updated.weights[0][[0, 0]] - expected).abs() < 1e-12);
    }
}
