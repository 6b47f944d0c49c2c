use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Result, SamplerError};
use crate::probs::has_admissible;
use crate::sampler::{Pipeline, Sampler, SamplerKind};
use crate::token::TokenSet;

/// Distribution-based sampler: softmax, then the transform pipeline, then a
/// random draw weighted by the surviving probabilities.
///
/// The RNG is owned by the sampler and advances on every draw, so two
/// samplers built with the same seed produce the same sequence of tokens
/// for the same sequence of inputs.
pub struct WeightedSampler {
    rng: StdRng,
    pipeline: Pipeline,
}

impl WeightedSampler {
    /// Create a weighted sampler. With `Some(seed)` draws are reproducible;
    /// with `None` the RNG is seeded from OS entropy.
    pub fn new(seed: Option<u64>, pipeline: Pipeline) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run softmax and the pipeline without drawing. Useful for inspecting
    /// which candidates a draw would choose from.
    pub fn candidates(&self, logits: &[f32]) -> TokenSet {
        self.pipeline.apply(TokenSet::from_logits(logits))
    }
}

impl Sampler for WeightedSampler {
    fn name(&self) -> &str {
        "weighted"
    }

    fn kind(&self) -> SamplerKind {
        SamplerKind::Weighted
    }

    fn sample(&mut self, logits: &[f32]) -> Result<u32> {
        if !has_admissible(logits) {
            tracing::debug!(vocab = logits.len(), "weighted: no finite logit");
            return Err(SamplerError::NoValidToken(
                "no valid logits found for weighted sampling".to_string(),
            ));
        }

        let tokens = self.candidates(logits);
        if tokens.is_empty() {
            tracing::debug!(pipeline = ?self.pipeline, "weighted: every candidate filtered out");
            return Err(SamplerError::NoValidToken(
                "no candidates left after filtering".to_string(),
            ));
        }

        // Weights need not sum to one; WeightedIndex normalizes internally.
        let dist: WeightedIndex<f64> = WeightedIndex::new(tokens.iter().map(|t| t.prob))
            .map_err(|e| SamplerError::SamplingFailure(e.to_string()))?;

        let idx = dist.sample(&mut self.rng);
        let id = tokens.records()[idx].id;
        tracing::trace!(candidates = tokens.len(), token = id, "weighted draw");
        Ok(id)
    }
}

impl std::fmt::Debug for WeightedSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedSampler")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinPTransform, TemperatureTransform, TopKTransform, TopPTransform};

    fn pipeline() -> Pipeline {
        Pipeline::new()
            .with(Box::new(TemperatureTransform::new(1.0)))
            .with(Box::new(TopKTransform::new(3)))
    }

    #[test]
    fn test_pipeline_stages() {
        let s = WeightedSampler::new(Some(5), pipeline());
        assert_eq!(s.pipeline().names(), vec!["temperature", "top_k"]);
        assert_eq!(s.kind(), crate::SamplerKind::Weighted);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let logits = [1.0, 1.2, 0.9, 1.1, -0.5];
        let mut a = WeightedSampler::new(Some(42), pipeline());
        let mut b = WeightedSampler::new(Some(42), pipeline());
        let seq_a: Vec<u32> = (0..50).map(|_| a.sample(&logits).unwrap()).collect();
        let seq_b: Vec<u32> = (0..50).map(|_| b.sample(&logits).unwrap()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_rng_advances() {
        let logits = [0.0; 8];
        let mut s = WeightedSampler::new(
            Some(7),
            Pipeline::new().with(Box::new(MinPTransform::new(0.5))),
        );
        let draws: Vec<u32> = (0..64).map(|_| s.sample(&logits).unwrap()).collect();
        // uniform over 8 ids: 64 draws that all agree would mean the RNG is stuck
        assert!(draws.iter().any(|&d| d != draws[0]));
    }

    #[test]
    fn test_only_survivors_drawn() {
        let logits = [0.0, 5.0, 4.0, 3.0, -1.0];
        let mut s = WeightedSampler::new(
            Some(1),
            Pipeline::new().with(Box::new(TopKTransform::new(2))),
        );
        for _ in 0..200 {
            let id = s.sample(&logits).unwrap();
            assert!(id == 1 || id == 2, "unexpected token {id}");
        }
    }

    #[test]
    fn test_single_survivor() {
        let logits = [0.1, 9.0, 0.2];
        let mut s = WeightedSampler::new(
            None,
            Pipeline::new().with(Box::new(TopPTransform::new(0.5))),
        );
        assert_eq!(s.sample(&logits).unwrap(), 1);
    }

    #[test]
    fn test_ignores_neg_inf_tokens() {
        let logits = [f32::NEG_INFINITY, 0.0, f32::NEG_INFINITY, 0.0];
        let mut s = WeightedSampler::new(Some(3), pipeline());
        for _ in 0..100 {
            let id = s.sample(&logits).unwrap();
            assert!(id == 1 || id == 3);
        }
    }

    #[test]
    fn test_no_valid_token() {
        let mut s = WeightedSampler::new(Some(0), pipeline());
        assert!(matches!(
            s.sample(&[f32::NEG_INFINITY; 4]),
            Err(SamplerError::NoValidToken(_))
        ));
        assert!(matches!(s.sample(&[]), Err(SamplerError::NoValidToken(_))));
    }

    #[test]
    fn test_filtered_to_empty() {
        struct DropAll;
        impl crate::Transform for DropAll {
            fn name(&self) -> &str {
                "drop_all"
            }
            fn apply(&self, mut tokens: TokenSet) -> TokenSet {
                tokens.retain(|_| false);
                tokens
            }
        }

        let mut s = WeightedSampler::new(Some(0), Pipeline::new().with(Box::new(DropAll)));
        assert!(matches!(
            s.sample(&[1.0, 2.0]),
            Err(SamplerError::NoValidToken(_))
        ));
    }

    #[test]
    fn test_zero_weights_fail() {
        struct ZeroMass;
        impl crate::Transform for ZeroMass {
            fn name(&self) -> &str {
                "zero_mass"
            }
            fn apply(&self, tokens: TokenSet) -> TokenSet {
                let records = tokens
                    .iter()
                    .map(|t| crate::TokenRecord::new(t.id, t.logit, 0.0))
                    .collect();
                TokenSet::from_records(records)
            }
        }

        let mut s = WeightedSampler::new(Some(0), Pipeline::new().with(Box::new(ZeroMass)));
        assert!(matches!(
            s.sample(&[1.0, 2.0]),
            Err(SamplerError::SamplingFailure(_))
        ));
    }
}
