use std::cmp::Ordering;

use crate::probs::softmax;

/// A token ID with its (possibly rescaled) logit and probability.
///
/// `prob` is only meaningful after softmax has run over the set that owns
/// this record, and goes stale whenever `logit` is rescaled.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub id: u32,
    pub logit: f64,
    pub prob: f64,
}

impl TokenRecord {
    pub fn new(id: u32, logit: f64, prob: f64) -> Self {
        Self { id, logit, prob }
    }
}

/// Descending by probability, lower id first on ties.
fn by_prob_desc(a: &TokenRecord, b: &TokenRecord) -> Ordering {
    b.prob.total_cmp(&a.prob).then(a.id.cmp(&b.id))
}

/// The candidate set threaded through the transform pipeline.
///
/// Ids are unique and the set only ever shrinks. When `is_sorted()` is true
/// the records are ordered by descending probability with ties broken by
/// lower id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    tokens: Vec<TokenRecord>,
    sorted: bool,
}

impl TokenSet {
    /// Build a set from raw logits, one record per vocabulary index, with
    /// probabilities from a softmax over the whole vector.
    pub fn from_logits(logits: &[f32]) -> Self {
        let logits64: Vec<f64> = logits.iter().map(|&x| f64::from(x)).collect();
        let probs = softmax(&logits64);

        let tokens = logits64
            .into_iter()
            .zip(probs)
            .enumerate()
            .map(|(i, (logit, prob))| TokenRecord::new(i as u32, logit, prob))
            .collect();

        Self {
            tokens,
            sorted: false,
        }
    }

    /// Wrap pre-built records. The caller guarantees unique ids.
    pub fn from_records(tokens: Vec<TokenRecord>) -> Self {
        Self {
            tokens,
            sorted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn records(&self) -> &[TokenRecord] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenRecord> {
        self.tokens.iter()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.tokens.iter().map(|t| t.id).collect()
    }

    /// Largest probability in the set, or `None` if empty.
    pub fn max_prob(&self) -> Option<f64> {
        if self.sorted {
            return self.tokens.first().map(|t| t.prob);
        }
        self.tokens.iter().map(|t| t.prob).reduce(f64::max)
    }

    /// Sort descending by probability unless already sorted.
    pub fn sort_desc(&mut self) {
        if !self.sorted {
            self.tokens.sort_by(by_prob_desc);
            self.sorted = true;
        }
    }

    /// Divide every logit by `t` and recompute probabilities.
    ///
    /// Clears the sorted flag: records whose probabilities underflowed to the
    /// same value were ordered by id and may separate after rescaling.
    pub fn scale_logits(&mut self, t: f64) {
        for token in self.tokens.iter_mut() {
            token.logit /= t;
        }
        self.recompute_probs();
        self.sorted = false;
    }

    /// Recompute every probability from the current logits.
    pub fn recompute_probs(&mut self) {
        let logits: Vec<f64> = self.tokens.iter().map(|t| t.logit).collect();
        for (token, p) in self.tokens.iter_mut().zip(softmax(&logits)) {
            token.prob = p;
        }
    }

    /// Keep the first `n` records and renormalize.
    pub fn truncate(&mut self, n: usize) {
        if n < self.tokens.len() {
            self.tokens.truncate(n);
            self.renormalize();
        }
    }

    /// Keep the records matching `keep`, preserving order, and renormalize.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&TokenRecord) -> bool,
    {
        let before = self.tokens.len();
        self.tokens.retain(keep);
        if self.tokens.len() != before {
            self.renormalize();
        }
    }

    /// Rescale probabilities so they sum to one. A zero-mass set is left
    /// alone.
    fn renormalize(&mut self) {
        let sum: f64 = self.tokens.iter().map(|t| t.prob).sum();
        if sum > 0.0 && sum.is_finite() {
            for token in self.tokens.iter_mut() {
                token.prob /= sum;
            }
        }
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a TokenRecord;
    type IntoIter = std::slice::Iter<'a, TokenRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_from_logits() {
        let set = TokenSet::from_logits(&[1.0, 2.0, 3.0, 0.5]);
        assert_eq!(set.len(), 4);
        assert!(!set.is_sorted());
        assert_eq!(set.ids(), vec![0, 1, 2, 3]);
        assert_abs_diff_eq!(set.records()[2].prob, 0.6652, epsilon = 1e-4);
        assert_abs_diff_eq!(set.records()[2].logit, 3.0);
    }

    #[test]
    fn test_sort_tie_break_lower_id() {
        let mut set = TokenSet::from_logits(&[1.0, 5.0, 1.0, 5.0]);
        set.sort_desc();
        assert!(set.is_sorted());
        assert_eq!(set.ids(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_max_prob() {
        let set = TokenSet::from_logits(&[0.0, 2.0, 1.0]);
        let max = set.records()[1].prob;
        assert_eq!(set.max_prob(), Some(max));
        assert_eq!(TokenSet::default().max_prob(), None);
    }

    #[test]
    fn test_truncate_renormalizes() {
        let mut set = TokenSet::from_logits(&[3.0, 2.0, 1.0, 0.0]);
        set.sort_desc();
        set.truncate(2);
        assert_eq!(set.ids(), vec![0, 1]);
        let sum: f64 = set.iter().map(|t| t.prob).sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
        // ratio between survivors is preserved
        let r = set.records()[0].prob / set.records()[1].prob;
        assert_abs_diff_eq!(r, std::f64::consts::E, epsilon = 1e-9);
    }

    #[test]
    fn test_retain_keeps_order() {
        let mut set = TokenSet::from_logits(&[0.0, 4.0, 1.0, 3.0]);
        set.retain(|t| t.id % 2 == 1);
        assert_eq!(set.ids(), vec![1, 3]);
        assert!(!set.is_sorted());
    }

    #[test]
    fn test_scale_logits_recomputes_probs() {
        let mut set = TokenSet::from_logits(&[1.0, 2.0]);
        let before = set.records()[1].prob;
        set.scale_logits(0.5);
        assert_abs_diff_eq!(set.records()[1].logit, 4.0);
        assert!(set.records()[1].prob > before);
        let sum: f64 = set.iter().map(|t| t.prob).sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_logits_clears_sorted() {
        // -900 and -800 both underflow to probability 0, so they sort by id
        let mut set = TokenSet::from_logits(&[0.0, -900.0, -800.0]);
        set.sort_desc();
        assert_eq!(set.ids(), vec![0, 1, 2]);

        set.scale_logits(2.0);
        assert!(!set.is_sorted());
        assert!(set.records()[2].prob > set.records()[1].prob);

        set.sort_desc();
        assert_eq!(set.ids(), vec![0, 2, 1]);
    }

    #[test]
    fn test_zero_mass_left_alone() {
        let mut set = TokenSet::from_logits(&[f32::NEG_INFINITY; 3]);
        set.truncate(1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].prob, 0.0);
    }
}
