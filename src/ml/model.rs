use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{log_softmax, relu},
};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::ModelError,
    mode::ForwardMode,
    shape::{
        ShapePlan, CONV1_CHANNELS, CONV2_CHANNELS, INPUT_CHANNELS, KERNEL_SIZE, POOL_SIZE,
    },
};
use crate::ml::{
    dropout::{apply_mask, ChannelDropout, FeatureDropout},
    features::num_flat_features,
};

/// Sizes of the two fully-connected layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDims {
    /// Flattened conv output per sample, input of fc1
    pub flat_features: usize,
    /// Output of fc1, input of fc2
    pub hidden: usize,
}

impl Default for FeatureDims {
    fn default() -> Self {
        Self { flat_features: 4800, hidden: 400 }
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ConvNetConfig {
    #[config(default = 2)]
    pub n_classes: usize,
    #[config(default = "FeatureDims::default()")]
    pub features: FeatureDims,
    /// Drop probability of the channel dropout after conv2
    #[config(default = 0.5)]
    pub conv_dropout: f64,
    /// Drop probability of the dropout after fc1
    #[config(default = 0.5)]
    pub fc_dropout: f64,
}

impl ConvNetConfig {
    /// Default configuration with `flat_features` derived from the
    /// input spatial size.
    pub fn for_input(height: usize, width: usize) -> Result<Self, ModelError> {
        let plan = ShapePlan::for_input(height, width)?;
        Ok(Self::new().with_features(FeatureDims {
            flat_features: plan.flat_features(),
            ..FeatureDims::default()
        }))
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let positive = [
            ("n_classes",     self.n_classes),
            ("flat_features", self.features.flat_features),
            ("hidden",        self.features.hidden),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ModelError::InvalidConfig(format!("{name} must be positive")));
            }
        }

        for (name, prob) in [("conv_dropout", self.conv_dropout), ("fc_dropout", self.fc_dropout)] {
            if !(0.0..1.0).contains(&prob) {
                return Err(ModelError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {prob}"
                )));
            }
        }

        let linear = [
            ("fc1", self.features.flat_features, self.features.hidden),
            ("fc2", self.features.hidden,        self.n_classes),
        ];
        for (name, d_in, d_out) in linear {
            if d_in.checked_mul(d_out).is_none() {
                return Err(ModelError::InvalidConfig(format!(
                    "{name} weight of {d_in} x {d_out} does not fit in usize"
                )));
            }
        }

        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<ConvNet<B>, ModelError> {
        self.validate()?;

        let kernel = [KERNEL_SIZE, KERNEL_SIZE];
        let conv1  = Conv2dConfig::new([INPUT_CHANNELS, CONV1_CHANNELS], kernel).init(device);
        let conv2  = Conv2dConfig::new([CONV1_CHANNELS, CONV2_CHANNELS], kernel).init(device);
        let pool   = MaxPool2dConfig::new([POOL_SIZE, POOL_SIZE])
            .with_strides([POOL_SIZE, POOL_SIZE])
            .init();
        let fc1 = LinearConfig::new(self.features.flat_features, self.features.hidden).init(device);
        let fc2 = LinearConfig::new(self.features.hidden, self.n_classes).init(device);

        tracing::debug!(
            "Initialised ConvNet: flat_features={} hidden={} n_classes={}",
            self.features.flat_features, self.features.hidden, self.n_classes,
        );

        Ok(ConvNet {
            conv1,
            conv2,
            conv2_drop: ChannelDropout::new(self.conv_dropout),
            pool,
            fc1,
            fc1_drop: FeatureDropout::new(self.fc_dropout),
            fc2,
            flat_features: self.features.flat_features,
            hidden:        self.features.hidden,
            n_classes:     self.n_classes,
        })
    }
}

#[derive(Module, Debug)]
pub struct ConvNet<B: Backend> {
    pub conv1:         Conv2d<B>,
    pub conv2:         Conv2d<B>,
    pub conv2_drop:    ChannelDropout,
    pub pool:          MaxPool2d,
    pub fc1:           Linear<B>,
    pub fc1_drop:      FeatureDropout,
    pub fc2:           Linear<B>,
    pub flat_features: usize,
    pub hidden:        usize,
    pub n_classes:     usize,
}

impl<B: Backend> ConvNet<B> {
    /// input: [batch, 1, height, width] → log-probabilities [batch, n_classes]
    pub fn forward(&self, input: Tensor<B, 4>, mode: ForwardMode) -> Result<Tensor<B, 2>, ModelError> {
        let (batch, plan) = self.check_input(&input)?;

        // Both dropout masks are drawn before any layer runs, so the
        // backend RNG state right after `Backend::seed` alone decides them.
        // Only constant fields are read here: touching a parameter would
        // initialise it and consume the RNG first.
        let device    = input.device();
        let conv_mask = self.conv2_drop.sample_mask::<B>(
            [batch, plan.conv2.channels, plan.conv2.height, plan.conv2.width],
            mode,
            &device,
        );
        let fc_mask = self.fc1_drop.sample_mask::<B, 2>([batch, self.hidden], mode, &device);

        // Stage 1: conv → pool → relu
        let x = self.conv1.forward(input);
        let x = relu(self.pool.forward(x));

        // Stage 2: conv → channel dropout → pool → relu
        let x = self.conv2.forward(x);
        let x = apply_mask(x, conv_mask);
        let x = relu(self.pool.forward(x));

        // Stage 3: [batch, 20, h, w] → [batch, 20 * h * w]
        let features = num_flat_features(&x);
        let x = x.reshape([batch, features]);

        // Stage 4: linear → relu → dropout
        let x = relu(self.fc1.forward(x));
        let x = apply_mask(x, fc_mask);

        // Stage 5: linear → log-softmax over classes
        let x = self.fc2.forward(x);
        Ok(log_softmax(x, 1))
    }

    /// Eval-mode forward followed by arg-max per row: [batch] class indices.
    pub fn predict(&self, input: Tensor<B, 4>) -> Result<Tensor<B, 1, Int>, ModelError> {
        let log_probs = self.forward(input, ForwardMode::Eval)?;
        Ok(log_probs.argmax(1).flatten::<1>(0, 1))
    }

    /// Trainable parameter count of each layer, in forward order.
    pub fn layer_params(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("conv1", self.conv1.num_params()),
            ("conv2", self.conv2.num_params()),
            ("fc1",   self.fc1.num_params()),
            ("fc2",   self.fc2.num_params()),
        ]
    }

    /// Rejects inputs the layer stack cannot consume, before any
    /// tensor work is done. Returns the batch size and shape plan.
    fn check_input(&self, input: &Tensor<B, 4>) -> Result<(usize, ShapePlan), ModelError> {
        let [batch, channels, height, width] = input.dims();

        if channels != INPUT_CHANNELS {
            return Err(ModelError::ChannelMismatch { expected: INPUT_CHANNELS, actual: channels });
        }
        if batch == 0 {
            return Err(ModelError::EmptyBatch);
        }

        let plan   = ShapePlan::for_input(height, width)?;
        let actual = plan.flat_features();
        if actual != self.flat_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.flat_features,
                actual,
                height,
                width,
            });
        }

        Ok((batch, plan))
    }
}
