use crate::sampler::Transform;
use crate::token::TokenSet;

/// Nucleus sampling: keeps the smallest prefix of tokens, sorted by
/// descending probability, whose cumulative probability reaches `p`.
///
/// At least one token is always kept.
#[derive(Debug, Clone, Copy)]
pub struct TopPTransform {
    p: f64,
}

impl TopPTransform {
    /// Create a new top-p (nucleus) transform with the given probability threshold.
    pub fn new(p: f32) -> Self {
        Self { p: f64::from(p) }
    }
}

impl Transform for TopPTransform {
    fn name(&self) -> &str {
        "top_p"
    }

    fn apply(&self, mut tokens: TokenSet) -> TokenSet {
        if tokens.is_empty() {
            return tokens;
        }

        tokens.sort_desc();

        // Find the cutoff: keep tokens until cumulative probability reaches p.
        // If rounding keeps the total just under p, everything is kept.
        let mut cumulative = 0.0f64;
        let mut cutoff = tokens.len();
        for (i, token) in tokens.iter().enumerate() {
            cumulative += token.prob;
            if cumulative >= self.p {
                cutoff = i + 1;
                break;
            }
        }

        tokens.truncate(cutoff.max(1));
        tokens
    }
}
