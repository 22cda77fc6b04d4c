//! Decision making, fighter generation, and commentary.
//!
//! Everything here can run without network access. The text oracle is an
//! optional first choice and every caller has a rule-based fallback.

pub mod commentary;
pub mod generation;
pub mod oracle;
pub mod policy;

pub use commentary::{rule_based_commentary, Commentator};
pub use generation::{rule_based_profile, FighterGenerator};
pub use oracle::{extract_json_block, GeminiOracle, OracleError, TextOracle};
pub use policy::{
    ActionWeights, DecisionContext, DecisionError, DecisionPolicy, DecisionStrategy,
    OracleStrategy, RuleBasedStrategy,
};
