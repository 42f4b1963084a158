//! # Bus Scheduling Instances
//!
//! The two supported model shapes and the [`Instance`] trait that connects an
//! instance to its MathProg model: how it is read from an input file, how it is
//! rendered as a data document, how large the model built from it is, and which
//! variables of the solution report encode its decisions.

use std::io;

use crate::types::Plan;

pub mod fio;

mod timeslots;
pub use timeslots::TimeslotInstance;

mod workshops;
pub use workshops::WorkshopInstance;

use fio::{mathprog::DataDocument, report::VarPattern};

/// Interface of a bus scheduling model shape
pub trait Instance: Sized {
    /// The decoded solution type
    type Plan: Plan;

    /// File name of the MathProg model, looked up in the working directory
    const MODEL_FILE: &'static str;

    /// Short description of the expected input file layout
    const INPUT_FORMAT: &'static str;

    /// The decision variables of the model that make up the plan
    const VARIABLES: &'static [VarPattern];

    /// Whether a solution report must carry an optimal `Status:` line to be
    /// accepted
    const REQUIRES_STATUS: bool;

    /// Parses an instance from the non-empty, trimmed lines of an input file
    ///
    /// # Errors
    ///
    /// If the lines do not follow the layout in [`Instance::INPUT_FORMAT`]
    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, fio::Error>;

    /// Renders the instance as a data document for the model
    fn to_data(&self) -> DataDocument;

    /// Rebuilds an instance from a data document as produced by
    /// [`Instance::to_data`]
    ///
    /// # Errors
    ///
    /// If declarations are missing or do not match the declared sets
    fn from_data(doc: &DataDocument) -> anyhow::Result<Self>;

    /// The number of decision variables of the model for this instance
    fn n_vars(&self) -> u64;

    /// The number of constraints of the model for this instance
    fn n_constrs(&self) -> u64;

    /// Writes the data document for the model
    ///
    /// # Errors
    ///
    /// If writing fails, returns [`io::Error`]
    fn write_data<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        fio::mathprog::write_data(writer, &self.to_data())
    }
}

/// Number of unordered pairs of `n` elements
fn pairs(n: u64) -> u64 {
    n * n.saturating_sub(1) / 2
}

/// Gets the size of a set that must hold exactly `1..=n`
fn range_len(doc: &DataDocument, name: &str) -> anyhow::Result<usize> {
    let members = doc.set(name)?;
    anyhow::ensure!(
        members.iter().copied().eq(1..=members.len()),
        "set `{name}` is not a contiguous range starting at 1"
    );
    Ok(members.len())
}

#[cfg(test)]
mod tests {
    use super::{pairs, range_len};
    use crate::instances::fio::mathprog::{DataDocument, Declaration};

    #[test]
    fn unordered_pairs() {
        assert_eq!(pairs(0), 0);
        assert_eq!(pairs(1), 0);
        assert_eq!(pairs(2), 1);
        assert_eq!(pairs(5), 10);
    }

    #[test]
    fn contiguous_sets() {
        let mut doc = DataDocument::new();
        doc.push(Declaration::range_set("A", 3));
        doc.push(Declaration::Set {
            name: String::from("B"),
            members: vec![1, 3],
        });
        assert_eq!(range_len(&doc, "A").unwrap(), 3);
        assert!(range_len(&doc, "B").is_err());
        assert!(range_len(&doc, "C").is_err());
    }
}
