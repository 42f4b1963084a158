//! # Writing and Parsing MathProg Data Documents
//!
//! Data documents bind the sets and parameters declared in a GNU MathProg model.
//! Only the subset of the data syntax needed by the bus scheduling models is
//! supported:
//!
//! ```text
//! set Autobuses := 1 2 3;
//! param coste_distancia := 1.5;
//! param distancia :=
//!   1 5
//!   2 10
//! ;
//! param disponibilidad : 1 2 :=
//!   1 1 0
//!   2 0 1
//! ;
//! end;
//! ```
//!
//! ## References
//!
//! - [GNU MathProg language, chapter "Model data"](https://www.gnu.org/software/glpk/)

use std::io::{self, Write};

use anyhow::Context;
use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric1, char, multispace0, multispace1},
    combinator::{eof, map, opt, recognize},
    error::Error as NomErr,
    multi::{count, many0, many0_count, many1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use super::{index, number};

/// A single statement of a data document
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// A `#` comment line
    Comment(String),
    /// A set of 1-based indices
    Set { name: String, members: Vec<usize> },
    /// A scalar parameter
    Scalar { name: String, value: f64 },
    /// A parameter indexed by one set
    Vector {
        name: String,
        entries: Vec<(usize, f64)>,
    },
    /// A parameter indexed by two sets, given as a table with one row per
    /// index of the first set
    Matrix {
        name: String,
        cols: Vec<usize>,
        rows: Vec<(usize, Vec<f64>)>,
    },
}

impl Declaration {
    /// A set holding the contiguous range `1..=n`
    #[must_use]
    pub fn range_set(name: &str, n: usize) -> Self {
        Declaration::Set {
            name: name.to_owned(),
            members: (1..=n).collect(),
        }
    }

    #[must_use]
    pub fn scalar(name: &str, value: f64) -> Self {
        Declaration::Scalar {
            name: name.to_owned(),
            value,
        }
    }

    /// A vector parameter where `values[i]` is bound to index `i + 1`
    #[must_use]
    pub fn vector(name: &str, values: &[f64]) -> Self {
        Declaration::Vector {
            name: name.to_owned(),
            entries: values
                .iter()
                .enumerate()
                .map(|(idx, &val)| (idx + 1, val))
                .collect(),
        }
    }

    /// A matrix parameter where `values[r][c]` is bound to `(r + 1, c + 1)`
    ///
    /// All rows are expected to have the length of the first one.
    #[must_use]
    pub fn matrix(name: &str, values: &[Vec<f64>]) -> Self {
        let n_cols = values.first().map_or(0, Vec::len);
        debug_assert!(values.iter().all(|row| row.len() == n_cols));
        Declaration::Matrix {
            name: name.to_owned(),
            cols: (1..=n_cols).collect(),
            rows: values
                .iter()
                .enumerate()
                .map(|(idx, row)| (idx + 1, row.clone()))
                .collect(),
        }
    }

    /// Gets the name of the declared set or parameter, if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Comment(_) => None,
            Declaration::Set { name, .. }
            | Declaration::Scalar { name, .. }
            | Declaration::Vector { name, .. }
            | Declaration::Matrix { name, .. } => Some(name),
        }
    }
}

/// A MathProg data document as an ordered list of declarations
///
/// Sets must come before parameters that are indexed over them. The document is
/// written with a closing `end;`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDocument {
    decls: Vec<Declaration>,
}

impl DataDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a declaration
    pub fn push(&mut self, decl: Declaration) {
        self.decls.push(decl);
    }

    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.decls
    }

    fn get(&self, name: &str) -> anyhow::Result<&Declaration> {
        self.decls
            .iter()
            .find(|decl| decl.name() == Some(name))
            .with_context(|| format!("no declaration named `{name}`"))
    }

    /// Gets the members of the set `name`
    ///
    /// # Errors
    ///
    /// If there is no set with this name
    pub fn set(&self, name: &str) -> anyhow::Result<&[usize]> {
        match self.get(name)? {
            Declaration::Set { members, .. } => Ok(members.as_slice()),
            _ => anyhow::bail!("`{name}` is not a set"),
        }
    }

    /// Gets the value of the scalar parameter `name`
    ///
    /// # Errors
    ///
    /// If there is no scalar parameter with this name
    pub fn scalar(&self, name: &str) -> anyhow::Result<f64> {
        match self.get(name)? {
            Declaration::Scalar { value, .. } => Ok(*value),
            _ => anyhow::bail!("`{name}` is not a scalar parameter"),
        }
    }

    /// Gets the entries of the vector parameter `name` as a dense vector over
    /// the indices `1..=n`
    ///
    /// # Errors
    ///
    /// If there is no vector parameter with this name or its indices are not
    /// exactly `1..=n`
    pub fn vector(&self, name: &str, n: usize) -> anyhow::Result<Vec<f64>> {
        let Declaration::Vector { entries, .. } = self.get(name)? else {
            anyhow::bail!("`{name}` is not a vector parameter");
        };
        anyhow::ensure!(
            entries.iter().map(|e| e.0).eq(1..=n),
            "`{name}` is not indexed by 1..{n}"
        );
        Ok(entries.iter().map(|e| e.1).collect())
    }

    /// Gets the matrix parameter `name` as dense rows over the indices
    /// `1..=n_rows` and `1..=n_cols`
    ///
    /// # Errors
    ///
    /// If there is no matrix parameter with this name or its indices do not
    /// match the dimensions
    pub fn matrix(
        &self,
        name: &str,
        n_rows: usize,
        n_cols: usize,
    ) -> anyhow::Result<Vec<Vec<f64>>> {
        let Declaration::Matrix { cols, rows, .. } = self.get(name)? else {
            anyhow::bail!("`{name}` is not a matrix parameter");
        };
        anyhow::ensure!(
            cols.iter().copied().eq(1..=n_cols),
            "`{name}` columns are not indexed by 1..{n_cols}"
        );
        anyhow::ensure!(
            rows.iter().map(|r| r.0).eq(1..=n_rows),
            "`{name}` rows are not indexed by 1..{n_rows}"
        );
        Ok(rows.iter().map(|r| r.1.clone()).collect())
    }
}

/// Writes a [`DataDocument`] in MathProg data syntax
///
/// # Errors
///
/// If writing fails, returns [`io::Error`]
pub fn write_data<W: Write>(writer: &mut W, doc: &DataDocument) -> io::Result<()> {
    for decl in &doc.decls {
        write_decl(writer, decl)?;
    }
    writeln!(writer, "end;")?;
    writer.flush()
}

fn write_decl<W: Write>(writer: &mut W, decl: &Declaration) -> io::Result<()> {
    match decl {
        Declaration::Comment(text) => writeln!(writer, "#{text}"),
        Declaration::Set { name, members } => {
            writeln!(writer, "set {name} := {};", members.iter().join(" "))
        }
        Declaration::Scalar { name, value } => writeln!(writer, "param {name} := {value};"),
        Declaration::Vector { name, entries } => {
            writeln!(writer, "param {name} :=")?;
            for (idx, val) in entries {
                writeln!(writer, "  {idx} {val}")?;
            }
            writeln!(writer, ";")
        }
        Declaration::Matrix { name, cols, rows } => {
            writeln!(writer, "param {name} : {} :=", cols.iter().join(" "))?;
            for (idx, vals) in rows {
                writeln!(writer, "  {idx} {}", vals.iter().join(" "))?;
            }
            writeln!(writer, ";")
        }
    }
}

/// Parses a data document as written by [`write_data`]
///
/// # Errors
///
/// If the input is not a sequence of supported declarations closed by `end;`
pub fn parse_data(input: &str) -> anyhow::Result<DataDocument> {
    let (_, decls) = terminated(
        many0(preceded(skip_blank, declaration)),
        tuple((skip_blank, tag("end"), skip_blank, char(';'), skip_blank, eof)),
    )(input)
    .map_err(|e: nom::Err<NomErr<&str>>| e.to_owned())
    .context("failed to parse MathProg data document")?;
    Ok(DataDocument { decls })
}

/// Skips whitespace between tokens
fn ws(input: &str) -> IResult<&str, ()> {
    map(multispace0, |_| ())(input)
}

/// Skips whitespace and comments between declarations
fn skip_blank(input: &str) -> IResult<&str, ()> {
    map(many0_count(alt((multispace1, comment_text))), |_| ())(input)
}

/// Recognizes a comment without producing it
fn comment_text(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('#'), opt(is_not("\n\r"))))(input)
}

fn name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_")))),
        )),
        str::to_owned,
    )(input)
}

fn declaration(input: &str) -> IResult<&str, Declaration> {
    alt((set_decl, param_decl))(input)
}

fn assign(input: &str) -> IResult<&str, ()> {
    map(tuple((ws, tag(":="))), |_| ())(input)
}

fn end_decl(input: &str) -> IResult<&str, ()> {
    map(tuple((ws, char(';'))), |_| ())(input)
}

fn set_decl(input: &str) -> IResult<&str, Declaration> {
    map(
        delimited(
            tag("set"),
            pair(
                preceded(ws, name),
                preceded(assign, many0(preceded(ws, index))),
            ),
            end_decl,
        ),
        |(name, members)| Declaration::Set { name, members },
    )(input)
}

fn param_decl(input: &str) -> IResult<&str, Declaration> {
    let (input, name) = preceded(pair(tag("param"), ws), name)(input)?;
    let result = alt((
        map(
            delimited(assign, preceded(ws, number), end_decl),
            |value| Declaration::Scalar {
                name: name.clone(),
                value,
            },
        ),
        map(
            delimited(
                assign,
                many0(pair(preceded(ws, index), preceded(ws, number))),
                end_decl,
            ),
            |entries| Declaration::Vector {
                name: name.clone(),
                entries,
            },
        ),
        |input| matrix_body(input, &name),
    ))(input);
    result
}

fn matrix_body<'input>(input: &'input str, name: &str) -> IResult<&'input str, Declaration> {
    let (input, cols) = preceded(
        pair(ws, char(':')),
        terminated(many1(preceded(ws, index)), assign),
    )(input)?;
    let (input, rows) = terminated(
        many0(pair(
            preceded(ws, index),
            count(preceded(ws, number), cols.len()),
        )),
        end_decl,
    )(input)?;
    Ok((
        input,
        Declaration::Matrix {
            name: name.to_owned(),
            cols,
            rows,
        },
    ))
}
