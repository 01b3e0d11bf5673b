//! Album query parsing
//!
//! Queries are zero or more terms. `field:value` restricts a named album
//! column (case-insensitive substring match); a bare term matches the album
//! title or album artist. Terms AND together.

use crate::{Error, Result};

/// Album columns addressable from a query term
const QUERYABLE_FIELDS: &[&str] = &[
    "album",
    "albumartist",
    "albumartist_sort",
    "mb_albumid",
    "mb_albumartistid",
    "mb_releasegroupid",
    "year",
];

/// A single parsed query term
#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    /// `field:value` — substring match on one column
    Field { column: String, value: String },
    /// Bare term — substring match on album title or album artist
    Bare(String),
}

/// Parsed album query, convertible to a SQL WHERE clause
#[derive(Debug, Clone, Default)]
pub struct AlbumQuery {
    terms: Vec<Term>,
}

impl AlbumQuery {
    /// Parse raw command-line terms into a query
    pub fn parse(terms: &[String]) -> Result<Self> {
        let mut parsed = Vec::new();

        for term in terms {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }

            match term.split_once(':') {
                Some((field, value)) if QUERYABLE_FIELDS.contains(&field) => {
                    parsed.push(Term::Field {
                        column: field.to_string(),
                        value: value.to_string(),
                    });
                }
                Some((field, _)) => {
                    return Err(Error::InvalidInput(format!(
                        "Unknown query field '{}' (expected one of: {})",
                        field,
                        QUERYABLE_FIELDS.join(", ")
                    )));
                }
                None => parsed.push(Term::Bare(term.to_string())),
            }
        }

        Ok(Self { terms: parsed })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Render as a SQL WHERE clause with positional binds
    ///
    /// Returns `("1=1", [])` for the empty query so callers can always
    /// append the clause.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        if self.terms.is_empty() {
            return ("1=1".to_string(), Vec::new());
        }

        let mut clauses = Vec::with_capacity(self.terms.len());
        let mut binds = Vec::new();

        for term in &self.terms {
            match term {
                Term::Field { column, value } => {
                    clauses.push(format!("{} LIKE ?", column));
                    binds.push(format!("%{}%", value));
                }
                Term::Bare(value) => {
                    clauses.push("(album LIKE ? OR albumartist LIKE ?)".to_string());
                    binds.push(format!("%{}%", value));
                    binds.push(format!("%{}%", value));
                }
            }
        }

        (clauses.join(" AND "), binds)
    }
}
