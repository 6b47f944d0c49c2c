use tok_sampler::{SamplerConfig, SamplerKind};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorInvalidParameter = 2,
    ErrorInvalidConfiguration = 3,
    ErrorNoValidToken = 4,
    ErrorSamplingFailure = 5,
    ErrorInternal = 6,
}

/// Which terminal strategy a sampler handle uses.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokSamplerKind {
    Greedy = 0,
    Weighted = 1,
}

/// Sampling options. Zero disables `top_k`, `top_p` and `min_p`;
/// `seed` is only honoured when `use_seed` is true.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TokSamplerParams {
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    pub min_p: f32,
    pub seed: u64,
    pub use_seed: bool,
}

impl From<TokSamplerParams> for SamplerConfig {
    fn from(p: TokSamplerParams) -> Self {
        SamplerConfig {
            temperature: p.temperature,
            top_k: Some(p.top_k),
            top_p: Some(p.top_p),
            min_p: Some(p.min_p),
            seed: p.use_seed.then_some(p.seed),
        }
    }
}

impl From<SamplerKind> for TokSamplerKind {
    fn from(kind: SamplerKind) -> Self {
        match kind {
            SamplerKind::Greedy => TokSamplerKind::Greedy,
            SamplerKind::Weighted => TokSamplerKind::Weighted,
        }
    }
}
