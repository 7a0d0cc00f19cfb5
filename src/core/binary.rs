//! Binary model codec.
//!
//! Layout, as written by `bincode` with its default fixed-width
//! little-endian integer encoding:
//!
//! 1. the layer sizes, as one length-prefixed `Vec<u64>`;
//! 2. one length-prefixed `Vec<f64>` per weight matrix, flattened
//!    row-major, in layer order;
//! 3. one length-prefixed `Vec<f64>` per bias column, in layer order.
//!
//! The header makes the stream self-describing: every matrix shape is
//! derived from the layer sizes on decode, and a decode failure names
//! the section it happened in. Round trips are bit-exact.

use crate::models::{check_layer_sizes, Network};
use crate::prelude::*;

pub fn encode<W: Write>(mut writer: W, network: &Network) -> Result<()> {
    let sizes: Vec<u64> = network.layer_sizes.iter().map(|&s| s as u64).collect();
    bincode::serialize_into(&mut writer, &sizes).map_err(NetworkError::SerializationError)?;
    for w in &network.weights {
        let flat: Vec<f64> = w.iter().copied().collect();
        bincode::serialize_into(&mut writer, &flat).map_err(NetworkError::SerializationError)?;
    }
    for b in &network.biases {
        let flat: Vec<f64> = b.iter().copied().collect();
        bincode::serialize_into(&mut writer, &flat).map_err(NetworkError::SerializationError)?;
    }
    Ok(())
}

pub fn decode<R: Read>(mut reader: R) -> Result<Network> {
    let sizes: Vec<u64> = bincode::deserialize_from(&mut reader)
        .map_err(|e| NetworkError::DecodeError(format!("layer size header: {}", e)))?;
    let layer_sizes: Vec<usize> = sizes.iter().map(|&s| s as usize).collect();
    check_layer_sizes(&layer_sizes)
        .map_err(|e| NetworkError::DecodeError(format!("layer size header: {}", e)))?;

    let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
    for (i, pair) in layer_sizes.windows(2).enumerate() {
        let (rows, cols) = (pair[1], pair[0]);
        weights.push(read_matrix(
            &mut reader,
            rows,
            cols,
            &format!("weight block {}", i),
        )?);
    }
    let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
    for (i, &rows) in layer_sizes[1..].iter().enumerate() {
        biases.push(read_matrix(
            &mut reader,
            rows,
            1,
            &format!("bias block {}", i),
        )?);
    }
    Ok(Network {
        layer_sizes,
        weights,
        biases,
    })
}

pub fn to_bytes(network: &Network) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    encode(&mut buffer, network)?;
    Ok(buffer)
}

pub fn from_bytes(bytes: &[u8]) -> Result<Network> {
    decode(bytes)
}

fn read_matrix<R: Read>(reader: &mut R, rows: usize, cols: usize, block: &str) -> Result<Array2<f64>> {
    let flat: Vec<f64> = bincode::deserialize_from(&mut *reader)
        .map_err(|e| NetworkError::DecodeError(format!("{}: {}", block, e)))?;
    if flat.len() != rows * cols {
        return Err(NetworkError::DecodeError(format!(
            "{}: expected {} values for a {}x{} matrix, got {}",
            block,
            rows * cols,
            rows,
            cols,
            flat.len()
        )));
    }
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|e| NetworkError::DecodeError(format!("{}: {}", block, e)))
}
