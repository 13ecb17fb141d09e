//! Trigger matcher
//!
//! Finds the active trigger region at the end of the text a user is typing.
//! Only the last occurrence of the trigger character is ever considered, and
//! the candidate always runs to the end of the input.

use serde::Serialize;

use crate::grammar::{CandidateForm, Grammar};

/// A trigger region that is active at the end of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerMatch {
    /// The trigger character that opened the region
    pub trigger: char,
    /// Text after the trigger, up to the end of the input
    pub candidate: String,
    /// Which grammar accepted the candidate
    pub form: CandidateForm,
    /// Char index in the input where the candidate starts
    pub start: usize,
}

impl TriggerMatch {
    /// Char range of the candidate in the input (what an accepted suggestion replaces)
    pub fn replace_range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.candidate.chars().count()
    }

    pub fn is_formula(&self) -> bool {
        self.form == CandidateForm::Formula
    }
}

/// Matches a single trigger character against text using a [`Grammar`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerMatcher {
    grammar: Grammar,
}

impl TriggerMatcher {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn find(&self, trigger: char, text: &str) -> Option<TriggerMatch> {
        let pos = text.rfind(trigger)?;
        let before = &text[..pos];

        // A doubled trigger is a literal; earlier triggers are not searched
        if before.ends_with(trigger) {
            log::debug!("trigger {:?} at byte {} is escaped", trigger, pos);
            return None;
        }

        let candidate = &text[pos + trigger.len_utf8()..];
        let Some(form) = self.grammar.recognize(candidate) else {
            log::debug!("candidate {:?} rejected by grammar", candidate);
            return None;
        };

        Some(TriggerMatch {
            trigger,
            candidate: candidate.to_string(),
            form,
            start: before.chars().count() + 1,
        })
    }
}

/// Find the active trigger region for `trigger` with the default grammar.
pub fn find_trigger(trigger: char, text: &str) -> Option<TriggerMatch> {
    TriggerMatcher::default().find(trigger, text)
}

/// Candidate substring after the active trigger, or `None` when there is no
/// active region (absent, escaped, or invalid content).
pub fn match_trigger(trigger: char, text: &str) -> Option<String> {
    find_trigger(trigger, text).map(|m| m.candidate)
}

/// Several trigger characters registered on one text field.
///
/// Whichever of them occurs last in the text is the one that gets matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSet {
    triggers: Vec<char>,
    matcher: TriggerMatcher,
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self::new(['@'])
    }
}

impl TriggerSet {
    /// Duplicates are dropped; first occurrence order is kept.
    pub fn new(triggers: impl IntoIterator<Item = char>) -> Self {
        let mut unique = Vec::new();
        for c in triggers {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }
        Self { triggers: unique, matcher: TriggerMatcher::default() }
    }

    pub fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.matcher = TriggerMatcher::new(grammar);
        self
    }

    pub fn triggers(&self) -> &[char] {
        &self.triggers
    }

    pub fn grammar(&self) -> Grammar {
        self.matcher.grammar()
    }

    pub fn find(&self, text: &str) -> Option<TriggerMatch> {
        let trigger = text.chars().rev().find(|c| self.triggers.contains(c))?;
        self.matcher.find(trigger, text)
    }
}
