//! Caller-facing sampling options and the builder that turns them into a
//! [`Sampler`].
//!
//! Options are validated eagerly: an out-of-range value fails at build time,
//! before any logits are seen. A zero or absent `top_k`/`top_p`/`min_p`
//! disables that stage. A `temperature` of zero always selects greedy
//! decoding, whatever else is set.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplerError};
use crate::greedy::GreedySampler;
use crate::min_p::MinPTransform;
use crate::sampler::{Pipeline, Sampler};
use crate::temperature::TemperatureTransform;
use crate::top_k::TopKTransform;
use crate::top_p::TopPTransform;
use crate::weighted::WeightedSampler;

/// Upper bound accepted for `temperature`.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Sampling options for one generation request.
///
/// Deserializes from request JSON such as
/// `{"temperature": 0.8, "top_k": 40, "top_p": 0.95, "seed": 7}`; missing
/// fields take their defaults and unknown fields are rejected. The default
/// configuration is greedy decoding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    /// Logit divisor in `[0, 2]`. Zero selects the greedy sampler.
    pub temperature: f32,
    /// Keep the `k` most probable tokens. Zero or absent disables the stage.
    pub top_k: Option<i32>,
    /// Nucleus threshold in `[0, 1)`. Zero or absent disables the stage.
    pub top_p: Option<f32>,
    /// Relative probability floor in `[0, 1)`. Zero or absent disables the stage.
    pub min_p: Option<f32>,
    /// RNG seed for reproducible draws. Absent means OS entropy.
    pub seed: Option<u64>,
}

impl SamplerConfig {
    pub fn new(temperature: f32) -> Self {
        Self {
            temperature,
            ..Self::default()
        }
    }

    pub fn with_top_k(mut self, k: i32) -> Self {
        self.top_k = Some(k);
        self
    }

    pub fn with_top_p(mut self, p: f32) -> Self {
        self.top_p = Some(p);
        self
    }

    pub fn with_min_p(mut self, min_p: f32) -> Self {
        self.min_p = Some(min_p);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every option against its legal range. The first violation wins,
    /// in the order temperature, top_k, top_p, min_p.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(SamplerError::invalid_param(
                "temperature",
                self.temperature,
                "must be between 0 and 2",
            ));
        }

        if let Some(k) = self.top_k {
            if k < 0 {
                return Err(SamplerError::invalid_param(
                    "top_k",
                    k,
                    "must be greater than 0",
                ));
            }
        }

        if let Some(p) = self.top_p {
            if !(0.0..1.0).contains(&p) {
                return Err(SamplerError::invalid_param(
                    "top_p",
                    p,
                    "must be in [0, 1)",
                ));
            }
        }

        if let Some(m) = self.min_p {
            if !(0.0..1.0).contains(&m) {
                return Err(SamplerError::invalid_param(
                    "min_p",
                    m,
                    "must be in [0, 1)",
                ));
            }
        }

        Ok(())
    }

    fn active_top_k(&self) -> Option<usize> {
        self.top_k.filter(|&k| k > 0).map(|k| k as usize)
    }

    fn active_top_p(&self) -> Option<f32> {
        self.top_p.filter(|&p| p > 0.0)
    }

    fn active_min_p(&self) -> Option<f32> {
        self.min_p.filter(|&m| m > 0.0)
    }

    /// Assemble the transform pipeline in its fixed order:
    /// temperature, top-k, top-p, min-p. Assumes a validated config.
    fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new();
        if self.temperature > 0.0 {
            pipeline = pipeline.with(Box::new(TemperatureTransform::new(self.temperature)));
        }
        if let Some(k) = self.active_top_k() {
            pipeline = pipeline.with(Box::new(TopKTransform::new(k)));
        }
        if let Some(p) = self.active_top_p() {
            pipeline = pipeline.with(Box::new(TopPTransform::new(p)));
        }
        if let Some(m) = self.active_min_p() {
            pipeline = pipeline.with(Box::new(MinPTransform::new(m)));
        }
        pipeline
    }

    /// Validate and build the sampler this configuration describes.
    ///
    /// # Errors
    /// - [`SamplerError::InvalidParameter`] if any option is out of range.
    /// - [`SamplerError::InvalidConfiguration`] if the temperature is
    ///   non-zero but no truncation stage (top-k, top-p, min-p) is active.
    pub fn build(&self) -> Result<Box<dyn Sampler>> {
        self.validate()?;

        if self.temperature == 0.0 {
            tracing::debug!(config = ?self, "building greedy sampler");
            return Ok(Box::new(GreedySampler::new()));
        }

        if self.active_top_k().is_none()
            && self.active_top_p().is_none()
            && self.active_min_p().is_none()
        {
            return Err(SamplerError::InvalidConfiguration(
                "at least one transform is required".to_string(),
            ));
        }

        let pipeline = self.pipeline();
        tracing::debug!(
            temperature = self.temperature,
            stages = ?pipeline,
            seeded = self.seed.is_some(),
            "building weighted sampler"
        );
        Ok(Box::new(WeightedSampler::new(self.seed, pipeline)))
    }
}

/// Build a sampler from individual options.
///
/// Shorthand for [`SamplerConfig::build`]; `0` means "unset" for `top_k`,
/// `top_p` and `min_p`.
pub fn new_sampler(
    temperature: f32,
    top_k: i32,
    top_p: f32,
    min_p: f32,
    seed: Option<u64>,
) -> Result<Box<dyn Sampler>> {
    SamplerConfig {
        temperature,
        top_k: Some(top_k),
        top_p: Some(top_p),
        min_p: Some(min_p),
        seed,
    }
    .build()
}
