//! # Parsing GLPK Solution Reports
//!
//! Internal module for scraping the human-readable report that `glpsol` writes
//! with `--output`. The report is not meant to be machine read, so the approach
//! is to look for a few well-known lines and to tolerate the different layouts
//! GLPK uses for the column listing:
//!
//! - Names that fit the name column are printed on one line together with the
//!   activity:
//!   ```text
//!        3 x[2,1]       *              1             0             1
//!   ```
//! - Long names are printed alone and the values follow on the next line:
//!   ```text
//!        1 asignado[1,1]
//!                       *              1             0             1
//!   ```

use std::fmt;

use nom::{
    bytes::complete::{tag_no_case, take_till},
    character::complete::{char, digit1, space0, space1},
    combinator::{eof, opt, verify},
    multi::separated_list1,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use super::{index, number};

/// Maximum distance from `1.0` for an activity to count as a selected decision
pub const SELECTION_TOLERANCE: f64 = 1e-9;

/// Maximum length of the column listing excerpt returned by [`columns_excerpt`]
const EXCERPT_LEN: usize = 1000;

/// Solution status as reported on the `Status:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// `OPTIMAL`, for LP relaxations
    Optimal,
    /// `INTEGER OPTIMAL`
    IntegerOptimal,
    /// `INFEASIBLE` and its variants
    Infeasible,
    /// `NO PRIMAL FEASIBLE SOLUTION` and similar
    NoFeasible,
    /// `UNBOUNDED`
    Unbounded,
    /// `UNDEFINED`
    Undefined,
    /// Any other status, e.g. `INTEGER NON-OPTIMAL`
    Other(String),
}

impl Status {
    /// Classifies the text following `Status:`
    ///
    /// Rejecting keywords take precedence over accepting ones.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let text = text.trim().to_uppercase();
        if text.contains("NO PRIMAL") || text.contains("NO FEASIBLE") {
            Status::NoFeasible
        } else if text.contains("INFEASIBLE") {
            Status::Infeasible
        } else if text.contains("UNBOUNDED") {
            Status::Unbounded
        } else if text.contains("UNDEFINED") {
            Status::Undefined
        } else if text.contains("INTEGER OPTIMAL") {
            Status::IntegerOptimal
        } else if text.contains("NON-OPTIMAL") {
            Status::Other(text)
        } else if text.contains("OPTIMAL") {
            Status::Optimal
        } else {
            Status::Other(text)
        }
    }

    /// Whether the reported solution is proven optimal
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        matches!(self, Status::Optimal | Status::IntegerOptimal)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Optimal => write!(f, "OPTIMAL"),
            Status::IntegerOptimal => write!(f, "INTEGER OPTIMAL"),
            Status::Infeasible => write!(f, "INFEASIBLE"),
            Status::NoFeasible => write!(f, "NO FEASIBLE SOLUTION"),
            Status::Unbounded => write!(f, "UNBOUNDED"),
            Status::Undefined => write!(f, "UNDEFINED"),
            Status::Other(text) => write!(f, "{text}"),
        }
    }
}

/// A decision variable family to look for in the column listing
///
/// The name is matched case-insensitively and must be followed by exactly
/// `arity` bracketed indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarPattern {
    pub name: &'static str,
    pub arity: usize,
}

impl VarPattern {
    #[must_use]
    pub const fn new(name: &'static str, arity: usize) -> Self {
        VarPattern { name, arity }
    }
}

/// A decision variable with its activity level
#[derive(Debug, Clone, PartialEq)]
pub struct VarRecord {
    /// The name of the matching [`VarPattern`]
    pub name: &'static str,
    pub indices: Vec<usize>,
    pub activity: f64,
}

impl VarRecord {
    /// Whether the activity is within [`SELECTION_TOLERANCE`] of `1.0`
    #[must_use]
    pub fn is_selected(&self) -> bool {
        (self.activity - 1.).abs() < SELECTION_TOLERANCE
    }
}

/// The parts of a solution report relevant to decoding a solution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionReport {
    /// The status, if a `Status:` line is present
    pub status: Option<Status>,
    /// The first objective value found
    pub objective: Option<f64>,
    /// All variable records matching one of the requested patterns, selected or not
    pub records: Vec<VarRecord>,
}

impl SolutionReport {
    /// Parses a report, collecting records for the given variable patterns
    #[must_use]
    pub fn parse(text: &str, patterns: &[VarPattern]) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let report = SolutionReport {
            status: lines.iter().find_map(|line| status_line(line)),
            objective: lines.iter().find_map(|line| objective_line(line)),
            records: parse_records(&lines, patterns),
        };
        log::debug!(
            "report status {:?}, objective {:?}, {} variable records",
            report.status,
            report.objective,
            report.records.len()
        );
        report
    }

    /// Iterates over the records of selected decisions
    pub fn selected(&self) -> impl Iterator<Item = &VarRecord> {
        self.records.iter().filter(|rec| rec.is_selected())
    }
}

/// Layouts of variable records in the column listing, in the order they are
/// tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Name on one line, activity as the first number of the following line
    TwoLine,
    /// Name and activity on the same line
    SingleLine,
}

/// The result of a layout matching at some line
struct Consumed {
    record: Option<VarRecord>,
    lines: usize,
}

impl Layout {
    const PRIORITY: [Layout; 2] = [Layout::TwoLine, Layout::SingleLine];

    /// Tries to match the layout at the start of `lines`
    fn consume(self, lines: &[&str], pattern: VarPattern) -> Option<Consumed> {
        let head = *lines.first()?;
        match self {
            Layout::TwoLine => {
                let (_, (_, _, indices, _, _)) =
                    tuple((space0, opt(row_number), var_ref(pattern), space0, eof))(head).ok()?;
                let record = lines
                    .get(1)
                    .and_then(|next| first_number(next))
                    .map(|activity| VarRecord {
                        name: pattern.name,
                        indices,
                        activity,
                    });
                Some(Consumed {
                    record,
                    lines: lines.len().min(2),
                })
            }
            Layout::SingleLine => {
                let (_, (_, _, indices, _, activity)) = tuple((
                    space0,
                    opt(row_number),
                    var_ref(pattern),
                    tuple((space0, opt(char('*')), space0)),
                    number,
                ))(head)
                .ok()?;
                Some(Consumed {
                    record: Some(VarRecord {
                        name: pattern.name,
                        indices,
                        activity,
                    }),
                    lines: 1,
                })
            }
        }
    }
}

fn parse_records(lines: &[&str], patterns: &[VarPattern]) -> Vec<VarRecord> {
    let mut records = vec![];
    let mut idx = 0;
    while idx < lines.len() {
        let consumed = Layout::PRIORITY.iter().find_map(|layout| {
            patterns
                .iter()
                .find_map(|&pattern| layout.consume(&lines[idx..], pattern))
        });
        match consumed {
            Some(Consumed { record, lines }) => {
                records.extend(record);
                idx += lines;
            }
            None => idx += 1,
        }
    }
    records
}

/// The running number in front of a row or column name
fn row_number(input: &str) -> IResult<&str, &str> {
    terminated(digit1, space1)(input)
}

/// A variable reference like `name[1, 2]` with the pattern's arity
fn var_ref(pattern: VarPattern) -> impl FnMut(&str) -> IResult<&str, Vec<usize>> {
    move |input| {
        preceded(
            tag_no_case(pattern.name),
            verify(
                delimited(
                    tuple((char('['), space0)),
                    separated_list1(tuple((space0, char(','), space0)), index),
                    tuple((space0, char(']'))),
                ),
                |indices: &Vec<usize>| indices.len() == pattern.arity,
            ),
        )(input)
    }
}

/// Finds the leftmost number in a line
fn first_number(line: &str) -> Option<f64> {
    line.char_indices()
        .find_map(|(pos, _)| number(&line[pos..]).ok().map(|(_, val)| val))
}

fn status_line(line: &str) -> Option<Status> {
    let rest = line.trim_start().strip_prefix("Status:")?;
    Some(Status::classify(rest))
}

fn objective_line(line: &str) -> Option<f64> {
    let pos = line.find("Objective:")?;
    let rest = &line[pos + "Objective:".len()..];
    let (_, (_, _, _, value)) =
        tuple((take_till(|c| c == '='), char('='), space0, number))(rest).ok()?;
    Some(value)
}

/// Extracts the beginning of the column listing, to help troubleshooting
/// reports where no selected decision could be recognized
#[must_use]
pub fn columns_excerpt(text: &str) -> Option<String> {
    let mut lines = text
        .lines()
        .skip_while(|line| !line.contains("Column name"))
        .skip(1)
        .peekable();
    lines.peek()?;
    if lines.peek().is_some_and(|line| is_separator(line)) {
        lines.next();
    }
    let section = lines
        .take_while(|line| {
            !line.trim().is_empty()
                && !line.trim_start().starts_with("Karush")
                && !line.contains("Row name")
        })
        .collect::<Vec<_>>()
        .join("\n");
    Some(section.chars().take(EXCERPT_LEN).collect())
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| matches!(c, '-' | '=' | ' '))
}
