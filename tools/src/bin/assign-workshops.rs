//! # assign-workshops
//!
//! Assigns every bus to a workshop and a timeslot, avoiding buses that share
//! passengers in the same timeslot, by solving the `parte-2-2.mod` model with
//! `glpsol`.

use std::process::ExitCode;

use busplan::instances::WorkshopInstance;

fn main() -> ExitCode {
    busplan_tools::cli::main::<WorkshopInstance>(
        "Assigns buses to workshops and timeslots with glpsol and prints the optimal assignment",
    )
}
