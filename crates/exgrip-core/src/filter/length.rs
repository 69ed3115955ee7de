//! The length range grammar.
//!
//! Clients describe the wanted overall length with a short expression. The
//! forms are tried in a fixed order and the first match wins:
//!
//! | Expression | Meaning                  |
//! |------------|--------------------------|
//! | `<=200`    | at most 200              |
//! | `201-250`  | 201 through 250 inclusive |
//! | `>600`     | more than 600            |
//! | `300`      | exactly 300              |
//!
//! Because the range form is checked before `>`, any expression containing
//! a `-` that does not start with `<=` is read as a range. A lone negative
//! number is therefore malformed.
//!
//! Literals are plain decimal `i64`s with optional surrounding whitespace.
//! Digit separators (`1_000`) are not accepted.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::filter::predicate::{Attribute, Comparison, Operand};

/// A parsed length expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRange {
    LessOrEqual(i64),
    /// `(start, end)` exactly as written, even when `start > end`.
    Between(i64, i64),
    GreaterThan(i64),
    Equals(i64),
}

impl LengthRange {
    /// The comparison on [`Attribute::Length`] this range stands for.
    #[must_use]
    pub fn comparison(self) -> Comparison {
        let attribute = Attribute::Length;
        match self {
            Self::LessOrEqual(bound) => Comparison::LessOrEqual { attribute, bound },
            Self::Between(low, high) => Comparison::Between {
                attribute,
                low,
                high,
            },
            Self::GreaterThan(bound) => Comparison::GreaterThan { attribute, bound },
            Self::Equals(n) => Comparison::Equals {
                attribute,
                value: Operand::Integer(n),
            },
        }
    }
}

impl FromStr for LengthRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix("<=") {
            return parse_literal(s, rest).map(Self::LessOrEqual);
        }

        if s.contains('-') {
            let mut bounds = s.split('-');
            return match (bounds.next(), bounds.next(), bounds.next()) {
                (Some(start), Some(end), None) => Ok(Self::Between(
                    parse_literal(s, start)?,
                    parse_literal(s, end)?,
                )),
                _ => Err(malformed(s, "a range takes exactly two bounds")),
            };
        }

        if let Some(rest) = s.strip_prefix('>') {
            return parse_literal(s, rest).map(Self::GreaterThan);
        }

        parse_literal(s, s).map(Self::Equals)
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LessOrEqual(n) => write!(f, "<={n}"),
            Self::Between(low, high) => write!(f, "{low}-{high}"),
            Self::GreaterThan(n) => write!(f, ">{n}"),
            Self::Equals(n) => write!(f, "{n}"),
        }
    }
}

/// Parse one integer literal of `input`, ignoring surrounding whitespace.
fn parse_literal(input: &str, literal: &str) -> Result<i64> {
    literal
        .trim()
        .parse::<i64>()
        .map_err(|e| malformed(input, &format!("{literal:?} is not an integer ({e})")))
}

fn malformed(input: &str, reason: &str) -> Error {
    Error::MalformedLength {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
