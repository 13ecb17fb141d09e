//! Context query extraction
//!
//! Given a candidate accepted by the trigger matcher, work out which single
//! identifier the suggestion list should filter against: the token being typed
//! right now, or the call whose argument list was just closed.

use serde::Serialize;

use crate::grammar::DEFAULT_FORMULA_OPEN;

/// What the extracted query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Variable-form candidate; the whole path is the query
    Variable,
    /// A function name or argument being typed inside a formula
    Token,
    /// Nothing typed since a `)`; the query is the call that was closed
    ClosedCall,
    /// Nothing typed and nothing closed
    Empty,
}

/// Detailed result of [`analyze_query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryContext {
    pub query: String,
    pub kind: QueryKind,
    /// Argument lists still open at the end of the candidate
    pub depth: usize,
    /// Innermost call whose argument list is still open
    pub enclosing: Option<String>,
}

/// Returns the identifier to complete for a matched candidate.
///
/// Must only be called with a candidate the matcher accepted.
pub fn extract_query(candidate: &str) -> String {
    analyze_query(candidate).query
}

pub fn analyze_query(candidate: &str) -> QueryContext {
    analyze_query_with(DEFAULT_FORMULA_OPEN, candidate)
}

/// Same as [`analyze_query`] for a grammar with a custom formula-open char.
///
/// A `)` with no open call to close keeps the previously closed name, so
/// `(SUM(a))))` reports `SUM`; `(SUM)` has never closed a call and reports `""`.
pub fn analyze_query_with(formula_open: char, candidate: &str) -> QueryContext {
    let Some(body) = candidate.strip_prefix(formula_open) else {
        return QueryContext {
            query: candidate.to_string(),
            kind: QueryKind::Variable,
            depth: 0,
            enclosing: None,
        };
    };

    let mut current = String::new();
    let mut call_stack: Vec<String> = Vec::new();
    let mut last_closed: Option<String> = None;
    let mut just_closed = false;
    // Whitespace after a token ends it; the next char starts a new one
    let mut token_ended = false;

    for c in body.chars() {
        match c {
            '(' => {
                // The token typed just before '(' names the call
                call_stack.push(std::mem::take(&mut current));
                just_closed = false;
            }
            ')' => {
                // Surplus closers keep the previous close
                if let Some(name) = call_stack.pop() {
                    last_closed = Some(name);
                }
                current.clear();
                just_closed = true;
            }
            ',' => {
                current.clear();
                just_closed = false;
            }
            c if c.is_whitespace() => {
                token_ended = !current.is_empty();
            }
            c => {
                if token_ended {
                    current.clear();
                    token_ended = false;
                }
                current.push(c);
                just_closed = false;
            }
        }
    }

    let depth = call_stack.len();
    let enclosing = call_stack.pop();

    let (query, kind) = if !current.is_empty() {
        (current, QueryKind::Token)
    } else if just_closed {
        match last_closed {
            Some(name) => (name, QueryKind::ClosedCall),
            None => (String::new(), QueryKind::Empty),
        }
    } else {
        (String::new(), QueryKind::Empty)
    };

    QueryContext { query, kind, depth, enclosing }
}
