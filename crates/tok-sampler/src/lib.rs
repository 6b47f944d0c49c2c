//! `tok-sampler` - picks the next token id from a vector of logits.
//!
//! This crate provides:
//! - A numerically stable softmax over `f32` logits (computed in `f64`)
//! - A `TokenSet` candidate container threaded through a `Pipeline` of
//!   `Transform` stages: temperature, top-k, top-p (nucleus), min-p
//! - Two terminal `Sampler`s: greedy arg-max and seeded weighted choice
//! - `SamplerConfig`, which validates caller options and builds the sampler
//!
//! ```
//! use tok_sampler::{Sampler, SamplerConfig};
//!
//! let mut sampler = SamplerConfig::new(0.8)
//!     .with_top_k(40)
//!     .with_top_p(0.95)
//!     .with_seed(42)
//!     .build()?;
//! let token = sampler.sample(&[0.1, 2.5, -1.0, 0.7])?;
//! assert!(token < 4);
//! # Ok::<(), tok_sampler::SamplerError>(())
//! ```

pub mod config;
pub mod error;
pub mod greedy;
pub mod min_p;
pub mod probs;
pub mod sampler;
pub mod temperature;
pub mod token;
pub mod top_k;
pub mod top_p;
pub mod weighted;

pub use config::{new_sampler, SamplerConfig, MAX_TEMPERATURE};
pub use error::{Result, SamplerError};
pub use greedy::GreedySampler;
pub use min_p::MinPTransform;
pub use probs::softmax;
pub use sampler::{Pipeline, Sampler, SamplerKind, Transform};
pub use temperature::TemperatureTransform;
pub use token::{TokenRecord, TokenSet};
pub use top_k::TopKTransform;
pub use top_p::TopPTransform;
pub use weighted::WeightedSampler;
