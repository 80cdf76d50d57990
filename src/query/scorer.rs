use serde::{Deserialize, Serialize};

/// How a term matched a symbol name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Substring,
    Regex,
    Prefix,
    Exact,
}

/// Configurable weights for ranking query hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub exact_weight: f32,
    pub prefix_weight: f32,
    pub substring_weight: f32,
    pub regex_weight: f32,
    /// Bonus per additional definition site, capped below
    pub overload_bonus: f32,
    pub max_overload_bonus: f32,
    /// Penalty per name character beyond the matched term
    pub length_penalty: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_weight: 100.0,
            prefix_weight: 60.0,
            substring_weight: 30.0,
            regex_weight: 50.0,
            overload_bonus: 0.5,
            max_overload_bonus: 5.0,
            length_penalty: 0.2,
        }
    }
}

/// Score calculation context for a single record
#[derive(Debug, Default)]
pub struct ScoreContext {
    pub kind: Option<MatchKind>,
    /// Name length minus matched term length; 0 for exact hits
    pub excess_chars: usize,
    /// Number of definition sites
    pub occurrence_count: usize,
}

/// Scorer with configurable weights
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn score(&self, ctx: &ScoreContext) -> f32 {
        let base = match ctx.kind {
            Some(MatchKind::Exact) => self.weights.exact_weight,
            Some(MatchKind::Prefix) => self.weights.prefix_weight,
            Some(MatchKind::Regex) => self.weights.regex_weight,
            Some(MatchKind::Substring) => self.weights.substring_weight,
            None => 0.0,
        };

        let overload = (ctx.occurrence_count.saturating_sub(1) as f32
            * self.weights.overload_bonus)
            .min(self.weights.max_overload_bonus);

        let penalty = ctx.excess_chars as f32 * self.weights.length_penalty;

        base + overload - penalty
    }
}
