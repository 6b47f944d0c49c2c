use crate::sampler::Transform;
use crate::token::TokenSet;

/// Keeps tokens whose probability is at least `min_p` times the probability
/// of the most likely token.
///
/// Does not need sorted input and does not reorder; the most likely token
/// always survives.
#[derive(Debug, Clone, Copy)]
pub struct MinPTransform {
    min_p: f64,
}

impl MinPTransform {
    pub fn new(min_p: f32) -> Self {
        Self {
            min_p: f64::from(min_p),
        }
    }
}

impl Transform for MinPTransform {
    fn name(&self) -> &str {
        "min_p"
    }

    fn apply(&self, mut tokens: TokenSet) -> TokenSet {
        let Some(max) = tokens.max_prob() else {
            return tokens;
        };

        let threshold = self.min_p * max;
        tokens.retain(|t| t.prob >= threshold);
        tokens
    }
}
