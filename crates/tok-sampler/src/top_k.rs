use crate::sampler::Transform;
use crate::token::TokenSet;

/// Keeps only the top K tokens by probability, discarding the rest.
///
/// Ties are broken by lower token id. Survivors are renormalized.
#[derive(Debug, Clone, Copy)]
pub struct TopKTransform {
    k: usize,
}

impl TopKTransform {
    /// Create a new top-K transform that retains the `k` most probable tokens.
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl Transform for TopKTransform {
    fn name(&self) -> &str {
        "top_k"
    }

    fn apply(&self, mut tokens: TokenSet) -> TokenSet {
        if self.k == 0 || self.k >= tokens.len() {
            return tokens;
        }

        tokens.sort_desc();
        tokens.truncate(self.k);
        tokens
    }
}
