pub mod executor;
pub mod parser;
pub mod scorer;

pub use executor::{QueryExecutor, SymbolMatch, lookup_key};
pub use parser::{Query, SortOrder, TermNode, parse_query};
pub use scorer::{MatchKind, ScoreContext, Scorer, ScoringWeights};
