//! Candidate grammar recognizer
//!
//! Decides whether the text after a trigger is a valid candidate. Two
//! grammars are tried: a variable path (`contact.first_name`) and a formula
//! (`(SUM(contact.age, step.value`). The formula grammar is a small state
//! machine so each whitespace and parenthesis rule can be tested on its own.

use serde::{Deserialize, Serialize};

/// Default character that switches a candidate into formula form.
pub const DEFAULT_FORMULA_OPEN: char = '(';

/// Which grammar accepted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateForm {
    /// Dotted identifier path, no parentheses
    Variable,
    /// Leading formula-open char, a name, optional argument groups
    Formula,
}

/// Recognizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    /// Character that opens formula mode when it follows the trigger
    pub formula_open: char,
}

impl Default for Grammar {
    fn default() -> Self {
        Self { formula_open: DEFAULT_FORMULA_OPEN }
    }
}

/// States of the formula recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormulaState {
    /// Reading the name right after the formula-open char
    Name,
    /// Inside `depth` open argument lists
    Group { depth: usize },
    /// Every argument list is balanced again
    Closed,
}

/// Identifier characters: letters, digits, `_` and `.`
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

impl Grammar {
    pub fn new(formula_open: char) -> Self {
        Self { formula_open }
    }

    /// Classify a candidate, or `None` if neither grammar accepts it.
    pub fn recognize(&self, candidate: &str) -> Option<CandidateForm> {
        match candidate.strip_prefix(self.formula_open) {
            Some(body) => self.recognize_formula(body).then_some(CandidateForm::Formula),
            None => recognize_variable(candidate).then_some(CandidateForm::Variable),
        }
    }

    /// Body is the candidate with the formula-open char already removed.
    fn recognize_formula(&self, body: &str) -> bool {
        let mut state = FormulaState::Name;

        for c in body.chars() {
            state = match (state, c) {
                (FormulaState::Name, c) if is_ident_char(c) => FormulaState::Name,
                (FormulaState::Name, '(') => FormulaState::Group { depth: 1 },
                (FormulaState::Name, ')') => FormulaState::Closed,

                (FormulaState::Group { depth }, '(') => FormulaState::Group { depth: depth + 1 },
                (FormulaState::Group { depth: 1 }, ')') => FormulaState::Closed,
                (FormulaState::Group { depth }, ')') => FormulaState::Group { depth: depth - 1 },
                (FormulaState::Group { depth }, c)
                    if is_ident_char(c) || c == ',' || c.is_whitespace() =>
                {
                    FormulaState::Group { depth }
                }

                // Surplus closers are absorbed
                (FormulaState::Closed, ')') => FormulaState::Closed,
                (FormulaState::Closed, '(') => FormulaState::Group { depth: 1 },

                (state, c) => {
                    log::trace!("formula rejected at {:?} in state {:?}", c, state);
                    return false;
                }
            };
        }

        // A space ends the mention unless more text follows inside a group
        !body.ends_with(char::is_whitespace)
    }
}

fn recognize_variable(candidate: &str) -> bool {
    candidate.chars().all(is_ident_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(s: &str) -> Option<CandidateForm> {
        Grammar::default().recognize(s)
    }

    #[test]
    fn test_variable_forms() {
        assert_eq!(recognize(""), Some(CandidateForm::Variable));
        assert_eq!(recognize("contact"), Some(CandidateForm::Variable));
        assert_eq!(recognize("contact.born.where"), Some(CandidateForm::Variable));
        assert_eq!(recognize("contact.first_name"), Some(CandidateForm::Variable));
        assert_eq!(recognize("step.value2"), Some(CandidateForm::Variable));
    }

    #[test]
    fn test_variable_rejects_whitespace_and_symbols() {
        assert_eq!(recognize("contact "), None);
        assert_eq!(recognize("contact contact"), None);
        assert_eq!(recognize("contact)"), None);
        assert_eq!(recognize("a+b"), None);
    }

    #[test]
    fn test_formula_name_only() {
        assert_eq!(recognize("("), Some(CandidateForm::Formula));
        assert_eq!(recognize("(SUM"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(contact.age"), Some(CandidateForm::Formula));
    }

    #[test]
    fn test_formula_groups() {
        assert_eq!(recognize("(SUM()"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(SUM(contact.age, step.value"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(IF(SUM(a, b), c"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(SUM(a)(b"), Some(CandidateForm::Formula));
    }

    #[test]
    fn test_formula_absorbs_surplus_closers() {
        assert_eq!(recognize("(SUM(contact.age, step.value))))"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(SUM)"), Some(CandidateForm::Formula));
    }

    #[test]
    fn test_formula_trailing_whitespace_fails() {
        assert_eq!(recognize("(SUM(a, b))))) "), None);
        assert_eq!(recognize("(SUM(a, "), None);
        assert_eq!(recognize("(SUM(a\t"), None);
    }

    #[test]
    fn test_formula_whitespace_outside_group_fails() {
        assert_eq!(recognize("( SUM"), None);
        assert_eq!(recognize("(SUM a"), None);
        assert_eq!(recognize("(SUM(a) b"), None);
    }

    #[test]
    fn test_formula_whitespace_inside_group() {
        assert_eq!(recognize("(SUM( a"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(SUM(a,  b"), Some(CandidateForm::Formula));
        assert_eq!(recognize("(IF(a, SUM(b, c"), Some(CandidateForm::Formula));
    }

    #[test]
    fn test_formula_rejects_top_level_comma_and_text_after_close() {
        assert_eq!(recognize("(a, b"), None);
        assert_eq!(recognize("(SUM(a)b"), None);
        assert_eq!(recognize("(SUM(a)),"), None);
    }

    #[test]
    fn test_custom_formula_open() {
        let grammar = Grammar::new('[');
        assert_eq!(grammar.recognize("[SUM(a, b"), Some(CandidateForm::Formula));
        // With a different opener, '(' is not a formula start
        assert_eq!(grammar.recognize("(SUM"), None);
    }
}
