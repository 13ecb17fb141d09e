//! Matcher and extractor in one call, as an editor does on every keystroke.

use serde::Serialize;

use crate::query::{analyze_query_with, QueryContext};
use crate::trigger::{find_trigger, TriggerMatch, TriggerSet};

/// An active trigger region and the query to look suggestions up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    #[serde(flatten)]
    pub matched: TriggerMatch,
    #[serde(flatten)]
    pub context: QueryContext,
}

impl Completion {
    pub fn query(&self) -> &str {
        &self.context.query
    }
}

/// Run the default-grammar matcher for `trigger`, then extract the query.
pub fn complete(trigger: char, text: &str) -> Option<Completion> {
    let matched = find_trigger(trigger, text)?;
    let context = analyze_query_with(crate::grammar::DEFAULT_FORMULA_OPEN, &matched.candidate);
    Some(Completion { matched, context })
}

impl TriggerSet {
    pub fn complete(&self, text: &str) -> Option<Completion> {
        let matched = self.find(text)?;
        let context = analyze_query_with(self.grammar().formula_open, &matched.candidate);
        Some(Completion { matched, context })
    }
}
