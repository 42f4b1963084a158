//! # Module for File IO (Writing and Parsing)
//!
//! Reading of the line-oriented instance files, writing and reading of
//! MathProg data documents and parsing of GLPK solution reports.

use std::io::{self, BufRead};

use nom::{
    character::complete::{char, digit1, one_of},
    combinator::{map_res, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

pub mod mathprog;

pub mod report;

/// Input format errors
///
/// Line numbers are 1-based and count non-empty lines only.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A token could not be read as a finite number
    #[error("line {line}: `{token}` is not a valid number")]
    InvalidNumber { line: usize, token: String },
    /// A line holds the wrong number of values
    #[error("line {line}: expected {expected} values, found {found}")]
    ValueCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A dimension is not a positive integer
    #[error("line {line}: {what} must be a positive integer, found {value}")]
    InvalidCount {
        line: usize,
        what: &'static str,
        value: f64,
    },
    /// The file does not hold the number of lines the declared dimensions require
    #[error("expected {expected} non-empty lines, found {found}")]
    LineCount { expected: usize, found: usize },
}

/// Reads all non-empty lines of a reader, trimmed
///
/// # Errors
///
/// If reading fails, returns [`io::Error`]
pub fn read_lines<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut lines = vec![];
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_owned());
        }
    }
    Ok(lines)
}

/// Splits a line into numbers separated by whitespace or commas
///
/// `line_num` is only used for error reporting.
///
/// # Errors
///
/// [`Error::InvalidNumber`] on tokens that are not finite numbers
pub fn parse_nums(line: &str, line_num: usize) -> Result<Vec<f64>, Error> {
    line.replace(',', " ")
        .split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(val) if val.is_finite() => Ok(val),
            _ => Err(Error::InvalidNumber {
                line: line_num,
                token: token.to_owned(),
            }),
        })
        .collect()
}

/// Parses a line that must hold exactly `expected` numbers
///
/// # Errors
///
/// [`Error::InvalidNumber`] or [`Error::ValueCount`]
pub fn parse_exact(line: &str, line_num: usize, expected: usize) -> Result<Vec<f64>, Error> {
    let vals = parse_nums(line, line_num)?;
    if vals.len() != expected {
        return Err(Error::ValueCount {
            line: line_num,
            expected,
            found: vals.len(),
        });
    }
    Ok(vals)
}

/// Interprets a parsed value as a dimension of the instance
///
/// # Errors
///
/// [`Error::InvalidCount`] if the value is not an integer of at least one
pub fn to_count(value: f64, line_num: usize, what: &'static str) -> Result<usize, Error> {
    if value < 1. || value.fract() != 0. || value > u32::MAX as f64 {
        return Err(Error::InvalidCount {
            line: line_num,
            what,
            value,
        });
    }
    Ok(value as usize)
}

/// Parses a signed decimal number with optional fraction and exponent
///
/// Unlike [`nom::number::complete::double`], this does not accept a missing
/// integer part or special values like `inf`.
pub(crate) fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        str::parse::<f64>,
    )(input)
}

/// Parses a 1-based index
pub(crate) fn index(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}
