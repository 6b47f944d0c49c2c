use crate::error::{Result, SamplerError};
use crate::sampler::{Sampler, SamplerKind};

/// Greedy sampler: selects the token with the highest raw logit.
///
/// No transforms run; scaling and truncation cannot change the arg-max.
/// Ties go to the lowest token id. NaN logits are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySampler;

impl GreedySampler {
    pub fn new() -> Self {
        Self
    }
}

impl Sampler for GreedySampler {
    fn name(&self) -> &str {
        "greedy"
    }

    fn kind(&self) -> SamplerKind {
        SamplerKind::Greedy
    }

    fn sample(&mut self, logits: &[f32]) -> Result<u32> {
        let mut max_idx = 0usize;
        let mut max_logit = f32::NEG_INFINITY;
        for (i, &logit) in logits.iter().enumerate() {
            if logit > max_logit {
                max_logit = logit;
                max_idx = i;
            }
        }

        if max_logit == f32::NEG_INFINITY {
            tracing::debug!(vocab = logits.len(), "greedy: no finite logit");
            return Err(SamplerError::NoValidToken(
                "no valid logits found for greedy sampling".to_string(),
            ));
        }

        Ok(max_idx as u32)
    }
}
