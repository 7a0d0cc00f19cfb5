//! Plain-text model codec.
//!
//! One bracketed, comma-separated line of numbers: the depth (layer
//! count), then each layer size, then every weight entry layer by layer
//! in row-major order, then every bias entry layer by layer.
//!
//! Unlike the binary codec this path goes through a number-to-string
//! conversion, so a round trip is only guaranteed to reproduce the
//! parameters to small tolerance, not bit-for-bit. Layer sizes are
//! always exact.

use crate::models::{check_layer_sizes, Network};
use crate::prelude::*;

pub fn encode(network: &Network) -> String {
    let mut tokens: Vec<String> = Vec::new();
    tokens.push(network.layer_sizes.len().to_string());
    for &size in &network.layer_sizes {
        tokens.push(size.to_string());
    }
    for w in &network.weights {
        tokens.extend(w.iter().map(|v| v.to_string()));
    }
    for b in &network.biases {
        tokens.extend(b.iter().map(|v| v.to_string()));
    }
    format!("[{}]", tokens.join(","))
}

pub fn decode(input: &str) -> Result<Network> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(']').unwrap_or(trimmed);

    let mut values = Vec::new();
    for (i, token) in trimmed.split(',').enumerate() {
        let token = token.trim();
        values.push(token.parse::<f64>().map_err(|_| {
            NetworkError::ParseError(format!("token {} is not a number: {:?}", i, token))
        })?);
    }

    let depth = as_count(values[0], "depth")?;
    if values.len().saturating_sub(1) < depth {
        return Err(NetworkError::ParseError(format!(
            "expected {} layer sizes after the depth, found {}",
            depth,
            values.len() - 1
        )));
    }
    let mut layer_sizes = Vec::with_capacity(depth);
    for (i, &v) in values[1..1 + depth].iter().enumerate() {
        layer_sizes.push(as_count(v, &format!("layer size {}", i))?);
    }
    check_layer_sizes(&layer_sizes).map_err(|e| NetworkError::ParseError(e.to_string()))?;

    // offset table over the flat value list, weight blocks then bias
    // blocks, built once from the already-parsed sizes
    let layers = depth - 1;
    let mut spans = Vec::with_capacity(2 * layers);
    let mut cursor = 1 + depth;
    for pair in layer_sizes.windows(2) {
        let count = pair[1].saturating_mul(pair[0]);
        spans.push((cursor, count));
        cursor = cursor.saturating_add(count);
    }
    for &rows in &layer_sizes[1..] {
        spans.push((cursor, rows));
        cursor = cursor.saturating_add(rows);
    }
    if values.len() != cursor {
        return Err(NetworkError::ParseError(format!(
            "expected {} values in total for layer sizes {:?}, found {}",
            cursor, layer_sizes, values.len()
        )));
    }

    let mut weights = Vec::with_capacity(layers);
    for (i, (&(offset, count), pair)) in spans[..layers]
        .iter()
        .zip(layer_sizes.windows(2))
        .enumerate()
    {
        let (rows, cols) = (pair[1], pair[0]);
        let block = values[offset..offset + count].to_vec();
        weights.push(
            Array2::from_shape_vec((rows, cols), block)
                .map_err(|e| NetworkError::ParseError(format!("weight block {}: {}", i, e)))?,
        );
    }
    let mut biases = Vec::with_capacity(layers);
    for (i, &(offset, count)) in spans[layers..].iter().enumerate() {
        let block = values[offset..offset + count].to_vec();
        biases.push(
            Array2::from_shape_vec((count, 1), block)
                .map_err(|e| NetworkError::ParseError(format!("bias block {}: {}", i, e)))?,
        );
    }
    Ok(Network {
        layer_sizes,
        weights,
        biases,
    })
}

fn as_count(value: f64, what: &str) -> Result<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 {
        return Err(NetworkError::ParseError(format!(
            "{} must be a non-negative integer, got {}",
            what, value
        )));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_depth_sizes_weights_then_biases() {
        let mut net = Network::random_seeded(&[2, 1], 1).unwrap();
        net.weights[0] = array![[0.5, -0.25]];
        assert_eq!(encode(&net), "[2,2,1,0.5,-0.25,0]");
    }

    #[test]
    fn round_trip_reproduces_sizes_exactly_and_values_closely() {
        let net = Network::random_seeded(&[3, 5, 2], 77).unwrap();
        let restored = decode(&encode(&net)).unwrap();

        assert_eq!(restored.layer_sizes, net.layer_sizes);
        for (a, b) in restored.weights.iter().zip(net.weights.iter()) {
            assert_eq!(a.dim(), b.dim());
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-5);
            }
        }
        for (a, b) in restored.biases.iter().zip(net.biases.iter()) {
            assert_eq!(a.dim(), b.dim());
            for (x, y) in a.iter().zip(b.iter()) {
                assert!((x - y).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn decode_accepts_plain_unbracketed_lists() {
        let net = decode("2, 1, 1, 0.5, -0.25").unwrap();
        assert_eq!(net.layer_sizes, vec![1, 1]);
        assert_eq!(net.weights[0], array![[0.5]]);
        assert_eq!(net.biases[0], array![[-0.25]]);
    }

    #[test]
    fn non_numeric_token_is_a_parse_error() {
        let err = decode("[2,2,1,0.5,oops,0]").unwrap_err();
        match err {
            NetworkError::ParseError(msg) => assert!(msg.contains("token 4")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_values_are_a_parse_error() {
        // one weight entry short for a [2, 1] network
        let err = decode("[2,2,1,0.5,0]").unwrap_err();
        assert!(matches!(err, NetworkError::ParseError(_)));
    }

    #[test]
    fn trailing_values_are_a_parse_error() {
        let err = decode("[2,2,1,0.5,-0.25,0,9.9]").unwrap_err();
        assert!(matches!(err, NetworkError::ParseError(_)));
    }

    #[test]
    fn fractional_or_tiny_depth_is_rejected() {
        let err = decode("[2.5,2,1]").unwrap_err();
        assert!(matches!(err, NetworkError::ParseError(_)));

        let err = decode("[1,4]").unwrap_err();
        assert!(matches!(err, NetworkError::ParseError(_)));
    }

    #[test]
    fn zero_layer_size_is_rejected() {
        let err = decode("[2,2,0]").unwrap_err();
        assert!(matches!(err, NetworkError::ParseError(_)));
    }
}
