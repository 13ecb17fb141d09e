// Inline autocomplete analysis: trigger matching and context queries

pub mod completion;
pub mod grammar;
pub mod query;
pub mod trigger;

pub use completion::{complete, Completion};
pub use grammar::{CandidateForm, Grammar};
pub use query::{analyze_query, extract_query, QueryContext, QueryKind};
pub use trigger::{find_trigger, match_trigger, TriggerMatch, TriggerMatcher, TriggerSet};
