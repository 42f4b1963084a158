//! # assign-timeslots
//!
//! Assigns buses to timeslots, leaving buses unassigned when there are not
//! enough timeslots, by solving the `parte-2-1.mod` model with `glpsol`.

use std::process::ExitCode;

use busplan::instances::TimeslotInstance;

fn main() -> ExitCode {
    busplan_tools::cli::main::<TimeslotInstance>(
        "Assigns buses to timeslots with glpsol and prints the optimal assignment",
    )
}
