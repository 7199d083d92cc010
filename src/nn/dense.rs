use tracing::instrument;

use crate::nn::Layer;
use crate::tensor::{broadcast, Result, Tensor, TensorError};

/// Dense (fully-connected) layer: y = xW + b
#[derive(Debug, Clone)]
pub struct Dense {
    weights: Tensor<f64>,
    biases: Tensor<f64>,
    num_inputs: usize,
    num_neurons: usize,
}

impl Dense {
    /// Create a layer with Xavier-uniform weights and zero biases
    #[instrument(err)]
    pub fn new(num_inputs: usize, num_neurons: usize) -> Result<Self> {
        // Xavier init: U(-x, x) with x = sqrt(6 / (fan_in + fan_out))
        let limit = (6.0 / (num_inputs + num_neurons) as f64).sqrt();
        let weights = Tensor::with_random(&[num_inputs, num_neurons], -limit, limit)?;
        let biases = Tensor::zeros(&[1, num_neurons])?;

        Ok(Dense {
            weights,
            biases,
            num_inputs,
            num_neurons,
        })
    }

    /// Create a layer from explicit weights `[num_inputs, num_neurons]` and
    /// biases `[1, num_neurons]`
    #[instrument(skip(weights, biases), err)]
    pub fn with_params(
        num_inputs: usize,
        num_neurons: usize,
        weights: Tensor<f64>,
        biases: Tensor<f64>,
    ) -> Result<Self> {
        expect_shape(&weights, &[num_inputs, num_neurons])?;
        expect_shape(&biases, &[1, num_neurons])?;

        Ok(Dense {
            weights,
            biases,
            num_inputs,
            num_neurons,
        })
    }

    pub fn weights(&self) -> &Tensor<f64> {
        &self.weights
    }

    pub fn biases(&self) -> &Tensor<f64> {
        &self.biases
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    /// Forward pass: y = xW + b
    ///
    /// The biases are broadcast against the product explicitly, and the
    /// addition itself is exact-shape.
    #[instrument(
        skip(self, input),
        fields(input_shape = ?input.shape(), inputs = self.num_inputs, neurons = self.num_neurons),
        err
    )]
    pub fn forward(&self, input: &Tensor<f64>) -> Result<Tensor<f64>> {
        let product = input.matmul(&self.weights)?;

        // biases can be replaced wholesale through `parameters`
        let views = broadcast(&[&product, &self.biases])?;
        if views[0].shape() != product.shape() {
            return Err(TensorError::ShapeMismatch {
                left: product.shape().to_vec(),
                right: self.biases.shape().to_vec(),
            });
        }
        let biases = views[1].to_tensor()?;

        product.add(&biases)
    }

    /// Get mutable references to parameters
    pub fn parameters(&mut self) -> Vec<&mut Tensor<f64>> {
        vec![&mut self.weights, &mut self.biases]
    }
}

fn expect_shape(tensor: &Tensor<f64>, expected: &[usize]) -> Result<()> {
    if tensor.shape() != expected {
        return Err(TensorError::ShapeMismatch {
            left: expected.to_vec(),
            right: tensor.shape().to_vec(),
        });
    }
    Ok(())
}

impl Layer<f64> for Dense {
    fn forward(&self, input: &Tensor<f64>) -> Result<Tensor<f64>> {
        self.forward(input)
    }

    fn parameters(&mut self) -> Vec<&mut Tensor<f64>> {
        self.parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_layer() -> Dense {
        let weights = Tensor::with_value(vec![
            vec![0.2, 0.8, -0.5],
            vec![0.5, -0.91, 0.26],
        ])
        .unwrap();
        let biases = Tensor::with_value(vec![vec![2.0, 3.0, 0.5]]).unwrap();
        Dense::with_params(2, 3, weights, biases).unwrap()
    }

    // ========================================================================
    // Construction Tests
    // ========================================================================

    #[test]
    fn test_new_shapes() {
        let layer = Dense::new(4, 3).unwrap();
        assert_eq!(layer.weights().shape(), &[4, 3]);
        assert_eq!(layer.biases().shape(), &[1, 3]);
        assert_eq!(layer.num_inputs(), 4);
        assert_eq!(layer.num_neurons(), 3);
    }

    #[test]
    fn test_new_xavier_bounds() {
        let layer = Dense::new(10, 6).unwrap();
        let limit = (6.0f64 / 16.0).sqrt();
        assert!(layer.weights().data().iter().all(|w| w.abs() <= limit));
        assert!(layer.biases().data().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_new_zero_size_fails() {
        assert!(matches!(
            Dense::new(0, 3).unwrap_err(),
            TensorError::InvalidShape { .. }
        ));
    }

    #[test]
    fn test_with_params_wrong_weight_shape() {
        let weights = Tensor::<f64>::zeros(&[3, 2]).unwrap();
        let biases = Tensor::<f64>::zeros(&[1, 3]).unwrap();
        assert_eq!(
            Dense::with_params(2, 3, weights, biases).unwrap_err(),
            TensorError::ShapeMismatch {
                left: vec![2, 3],
                right: vec![3, 2]
            }
        );
    }

    #[test]
    fn test_with_params_wrong_bias_shape() {
        let weights = Tensor::<f64>::zeros(&[2, 3]).unwrap();
        let biases = Tensor::<f64>::zeros(&[3]).unwrap();
        assert!(Dense::with_params(2, 3, weights, biases).is_err());
    }

    // ========================================================================
    // Forward Tests
    // ========================================================================

    #[test]
    fn test_forward_single_sample() {
        let layer = fixed_layer();
        let x = Tensor::with_value(vec![vec![1.0, 2.0]]).unwrap();
        let y = layer.forward(&x).unwrap();

        assert_eq!(y.shape(), &[1, 3]);
        let expected = [2.0 + 0.2 + 1.0, 3.0 + 0.8 - 1.82, 0.5 - 0.5 + 0.52];
        for (got, want) in y.data().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_forward_batch_repeats_biases() {
        let weights = Tensor::<f64>::zeros(&[2, 3]).unwrap();
        let biases = Tensor::with_value(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let layer = Dense::with_params(2, 3, weights, biases).unwrap();

        let x = Tensor::<f64>::full(&[4, 2], 5.0).unwrap();
        let y = layer.forward(&x).unwrap();
        assert_eq!(y.shape(), &[4, 3]);
        for row in y.data().chunks(3) {
            assert_eq!(row, &[1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_forward_wrong_input_width() {
        let layer = fixed_layer();
        let x = Tensor::<f64>::zeros(&[1, 3]).unwrap();
        assert!(matches!(
            layer.forward(&x).unwrap_err(),
            TensorError::ConflictingDimensions { .. }
        ));
    }

    #[test]
    fn test_forward_through_layer_trait() {
        let mut layer = fixed_layer();
        let x = Tensor::with_value(vec![vec![0.0, 0.0]]).unwrap();
        let as_layer: &dyn Layer<f64> = &layer;
        assert_eq!(as_layer.forward(&x).unwrap().data(), &[2.0, 3.0, 0.5]);
        assert_eq!(layer.parameters().len(), 2);
    }

    #[test]
    fn test_parameters_are_mutable() {
        let mut layer = fixed_layer();
        layer.parameters()[1].set(&[0, 0], 10.0).unwrap();
        assert_eq!(layer.biases().get(&[0, 0]).unwrap(), 10.0);
    }

    #[test]
    fn test_forward_rejects_replaced_bias_shape() {
        let mut layer = fixed_layer();
        *layer.parameters()[1] = Tensor::<f64>::zeros(&[3, 3]).unwrap();

        let x = Tensor::with_value(vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            layer.forward(&x).unwrap_err(),
            TensorError::ShapeMismatch {
                left: vec![1, 3],
                right: vec![3, 3]
            }
        );

        // a batch of three resolves to the product shape again
        let batch = Tensor::<f64>::zeros(&[3, 2]).unwrap();
        assert_eq!(layer.forward(&batch).unwrap().shape(), &[3, 3]);
    }
}
