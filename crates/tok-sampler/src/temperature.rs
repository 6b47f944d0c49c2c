use crate::sampler::Transform;
use crate::token::TokenSet;

/// Scales all logits by dividing by a temperature value, then recomputes
/// probabilities.
///
/// Higher temperatures produce more uniform distributions (more random),
/// while lower temperatures sharpen the distribution (more deterministic).
/// The temperature must be strictly positive; a temperature of zero is
/// handled by selecting the greedy sampler instead.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureTransform {
    temperature: f64,
}

impl TemperatureTransform {
    /// Create a new temperature transform. `temperature` must be > 0.
    pub fn new(temperature: f32) -> Self {
        debug_assert!(temperature > 0.0, "temperature must be positive");
        Self {
            temperature: f64::from(temperature),
        }
    }
}

impl Transform for TemperatureTransform {
    fn name(&self) -> &str {
        "temperature"
    }

    fn apply(&self, mut tokens: TokenSet) -> TokenSet {
        tokens.scale_logits(self.temperature);
        tokens
    }
}
