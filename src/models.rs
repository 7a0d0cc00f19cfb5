use crate::core::backprop::{self, GradientPair};
use crate::core::losses::squared_error;
use crate::core::{binary, text};
use crate::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufReader, BufWriter};

/// A fully connected feedforward network with sigmoid activations.
///
/// `layer_sizes` fixes the topology: `weights[i]` has shape
/// `(layer_sizes[i + 1], layer_sizes[i])` and `biases[i]` has shape
/// `(layer_sizes[i + 1], 1)`. Inputs and targets are column vectors.
///
/// Training is value-semantic: every update builds a new `Network` and
/// the previous one is dropped, so a model handed out to a caller is
/// never mutated behind its back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Network {
    pub layer_sizes: Vec<usize>,
    pub weights: Vec<Array2<f64>>,
    pub biases: Vec<Array2<f64>>,
}

/// Folding state of the training loop: the model after the latest step
/// plus the running totals used for progress reporting.
#[derive(Debug, Clone)]
pub struct TrainState {
    pub network: Network,
    pub total_loss: f64,
    pub seen: usize,
}

impl Network {
    /// Fresh network with weights drawn uniformly from [-1, 1] and all
    /// biases zero, using the caller's random source.
    pub fn random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Self> {
        check_layer_sizes(layer_sizes)?;
        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            weights.push(Array2::random_using(
                (next, prev),
                Uniform::new(-1.0, 1.0),
                rng,
            ));
            biases.push(Array2::zeros((next, 1)));
        }
        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            biases,
        })
    }

    /// Reproducible variant of [`Network::random`]: the same seed always
    /// yields the same parameters.
    pub fn random_seeded(layer_sizes: &[usize], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(layer_sizes, &mut rng)
    }

    pub fn input_width(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_width(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Full activation trace for one input: element 0 is the input
    /// itself, element k the post-sigmoid output of layer k, so the
    /// result always has `layer_sizes.len()` entries.
    pub fn forward(&self, input: &Array2<f64>) -> Result<Vec<Array2<f64>>> {
        if input.dim() != (self.input_width(), 1) {
            return Err(NetworkError::InputShapeMismatch(format!(
                "expected a {}x1 column vector, got {}x{}",
                self.input_width(),
                input.nrows(),
                input.ncols()
            )));
        }
        let mut trace = Vec::with_capacity(self.layer_sizes.len());
        trace.push(input.clone());
        let mut a = input.clone();
        for (w, b) in self.weights.iter().zip(self.biases.iter()) {
            a = sigmoid_forward(w.dot(&a) + b);
            trace.push(a.clone());
        }
        Ok(trace)
    }

    /// Output column for one input; pure, no side effects.
    pub fn predict(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        let mut trace = self.forward(input)?;
        Ok(trace.pop().unwrap())
    }

    /// Per-layer gradients and the scalar loss for one labeled sample.
    pub fn gradients(
        &self,
        input: &Array2<f64>,
        target: &Array2<f64>,
    ) -> Result<(Vec<GradientPair>, f64)> {
        self.check_target(target)?;
        let trace = self.forward(input)?;
        let (loss, delta) = squared_error(trace.last().unwrap(), target);
        Ok((backprop::gradients(self, &trace, delta), loss))
    }

    /// One SGD step on a single sample: the updated model and the
    /// sample's pre-update loss.
    pub fn train_step(
        &self,
        input: &Array2<f64>,
        target: &Array2<f64>,
        learning_rate: f64,
    ) -> Result<(Network, f64)> {
        let (grads, loss) = self.gradients(input, target)?;
        Ok((backprop::apply_update(self, &grads, learning_rate), loss))
    }

    /// Sample-by-sample SGD over `samples`, printing one
    /// `"<index>: <running mean loss>"` line per sample.
    ///
    /// Sample order matters; shuffle beforehand (see
    /// [`crate::utils::shuffle_seeded`]) if i.i.d. behavior is wanted.
    /// An empty slice returns the model unchanged.
    pub fn train(
        &self,
        samples: &[(Array2<f64>, Array2<f64>)],
        learning_rate: f64,
    ) -> Result<Network> {
        let mut state = TrainState {
            network: self.clone(),
            total_loss: 0.0,
            seen: 0,
        };
        for (i, (input, target)) in samples.iter().enumerate() {
            let (next, loss) = state.network.train_step(input, target, learning_rate)?;
            state = TrainState {
                network: next,
                total_loss: state.total_loss + loss,
                seen: state.seen + 1,
            };
            println!("{}: {}", i, state.total_loss / state.seen as f64);
        }
        Ok(state.network)
    }

    /// Mean per-sample loss over a labeled set; 0.0 for an empty set.
    pub fn evaluate(&self, samples: &[(Array2<f64>, Array2<f64>)]) -> Result<f64> {
        if samples.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for (input, target) in samples {
            self.check_target(target)?;
            let (loss, _) = squared_error(&self.predict(input)?, target);
            total += loss;
        }
        Ok(total / samples.len() as f64)
    }

    /// Fraction of samples whose predicted class (argmax of the output)
    /// matches the target's class; 0.0 for an empty set.
    pub fn accuracy(&self, samples: &[(Array2<f64>, Array2<f64>)]) -> Result<f64> {
        if samples.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for (input, target) in samples {
            self.check_target(target)?;
            if argmax(&self.predict(input)?) == argmax(target) {
                correct += 1;
            }
        }
        Ok(correct as f64 / samples.len() as f64)
    }

    pub fn summary(&self) {
        let mut total_param = 0;
        let mut res = format!("\nNetwork {:?}\n", self.layer_sizes);
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer\t\t Output shape\t\t No.of params\n");
        for (i, (w, b)) in self.weights.iter().zip(self.biases.iter()).enumerate() {
            let params = w.len() + b.len();
            total_param += params;
            res.push_str(&format!("dense {}\t\t  ({}, 1)\t\t  {}\n", i, b.nrows(), params));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", total_param));
        println!("{}", res);
    }

    /// Binary checkpoint; see [`crate::core::binary`] for the layout.
    pub fn save(&self, path: &str) -> Result<()> {
        let file = File::create(path).map_err(NetworkError::IoError)?;
        binary::encode(BufWriter::new(file), self)
    }

    pub fn load(path: &str) -> Result<Network> {
        let file = File::open(path).map_err(NetworkError::IoError)?;
        binary::decode(BufReader::new(file))
    }

    /// Plain-text checkpoint; see [`crate::core::text`]. Unlike [`Network::save`]
    /// this path is not bit-exact across a round trip.
    pub fn save_text(&self, path: &str) -> Result<()> {
        let mut file = File::create(path).map_err(NetworkError::IoError)?;
        file.write_all(text::encode(self).as_bytes())
            .map_err(NetworkError::IoError)
    }

    pub fn load_text(path: &str) -> Result<Network> {
        let mut buffer = String::new();
        File::open(path)
            .map_err(NetworkError::IoError)?
            .read_to_string(&mut buffer)
            .map_err(NetworkError::IoError)?;
        text::decode(&buffer)
    }

    fn check_target(&self, target: &Array2<f64>) -> Result<()> {
        if target.dim() != (self.output_width(), 1) {
            return Err(NetworkError::TargetShapeMismatch(format!(
                "expected a {}x1 column vector, got {}x{}",
                self.output_width(),
                target.nrows(),
                target.ncols()
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(NetworkError::InvalidLayerSizes(format!(
            "need at least an input and an output layer, got {} entries",
            layer_sizes.len()
        )));
    }
    if let Some(pos) = layer_sizes.iter().position(|&s| s == 0) {
        return Err(NetworkError::InvalidLayerSizes(format!(
            "layer {} has width 0",
            pos
        )));
    }
    Ok(())
}
