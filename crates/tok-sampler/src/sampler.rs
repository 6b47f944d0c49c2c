use crate::error::Result;
use crate::token::TokenSet;

/// A stage of the sampling pipeline that reshapes or filters candidates.
///
/// Transforms are stateless: the same input always yields the same output.
/// A transform may drop records but never adds new ids.
pub trait Transform: Send + Sync {
    /// Returns the name of this transform.
    fn name(&self) -> &str;

    /// Consume a candidate set and return the reshaped/filtered set.
    fn apply(&self, tokens: TokenSet) -> TokenSet;
}

/// The two terminal strategies a [`Sampler`] can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    Greedy,
    Weighted,
}

/// Terminal strategy that turns a logit vector into a single token id.
///
/// `sample` takes `&mut self` because the weighted sampler advances its RNG
/// on every draw. One instance per generation stream.
pub trait Sampler: Send + std::fmt::Debug {
    /// Returns the name of this sampler.
    fn name(&self) -> &str;

    fn kind(&self) -> SamplerKind;

    /// Select the next token id from `logits` (indexed by token id).
    fn sample(&mut self, logits: &[f32]) -> Result<u32>;
}

/// Ordered sequence of transforms applied one after another.
#[derive(Default)]
pub struct Pipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Add a transform to the end of the pipeline. Returns self for builder-style usage.
    pub fn with(mut self, transform: Box<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Names of the stages, in application order.
    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Run every transform in order. Stops early once the set is empty.
    pub fn apply(&self, mut tokens: TokenSet) -> TokenSet {
        for transform in &self.transforms {
            if tokens.is_empty() {
                break;
            }
            tokens = transform.apply(tokens);
        }
        tokens
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TopKTransform, TopPTransform};

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::new();
        let set = TokenSet::from_logits(&[0.5, 1.5, -2.0]);
        assert_eq!(pipeline.apply(set.clone()), set);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_names_in_order() {
        let pipeline = Pipeline::new()
            .with(Box::new(TopKTransform::new(3)))
            .with(Box::new(TopPTransform::new(0.9)));
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.names(), vec!["top_k", "top_p"]);
        assert_eq!(format!("{:?}", pipeline), r#"["top_k", "top_p"]"#);
    }
}
