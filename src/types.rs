//! # Solution Types
//!
//! Decoded solutions of the bus scheduling models and their textual rendering.

use std::{collections::BTreeSet, fmt};

use crate::instances::fio::report::VarRecord;

/// Index of a bus, starting from 1
pub type Bus = usize;
/// Index of a timeslot (_franja_), starting from 1
pub type Timeslot = usize;
/// Index of a workshop (_taller_), starting from 1
pub type Workshop = usize;

/// The summary line of a solved instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// The optimal objective value
    pub objective: f64,
    /// The number of decision variables of the model
    pub n_vars: u64,
    /// The number of constraints of the model
    pub n_constrs: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "valor óptimo = {:.2}, número de variables de decisión = {}, número de restricciones = {}",
            self.objective, self.n_vars, self.n_constrs
        )
    }
}

/// A decoded solution
///
/// The [`fmt::Display`] implementation writes one line per decision, each
/// terminated by a newline.
pub trait Plan: fmt::Display + Sized {
    /// Builds the plan from the selected records of a solution report
    ///
    /// Records of unknown variables are ignored.
    fn from_records<'rec, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'rec VarRecord>;

    /// Whether the plan holds no decision at all
    fn is_empty(&self) -> bool;
}

/// A bus-to-timeslot assignment, where some buses may stay unassigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeslotPlan {
    assigned: BTreeSet<(Bus, Timeslot)>,
    unassigned: BTreeSet<Bus>,
}

impl TimeslotPlan {
    /// Assigns `bus` to `slot`
    pub fn assign(&mut self, bus: Bus, slot: Timeslot) {
        self.assigned.insert((bus, slot));
    }

    /// Marks `bus` as unassigned
    pub fn leave_unassigned(&mut self, bus: Bus) {
        self.unassigned.insert(bus);
    }

    /// Iterates over the assignments in ascending `(bus, timeslot)` order
    pub fn assigned(&self) -> impl Iterator<Item = (Bus, Timeslot)> + '_ {
        self.assigned.iter().copied()
    }

    /// Iterates over the unassigned buses in ascending order
    pub fn unassigned(&self) -> impl Iterator<Item = Bus> + '_ {
        self.unassigned.iter().copied()
    }
}

impl Plan for TimeslotPlan {
    fn from_records<'rec, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'rec VarRecord>,
    {
        let mut plan = TimeslotPlan::default();
        for rec in records {
            match (rec.name, rec.indices.as_slice()) {
                ("asignado", &[bus, slot]) => plan.assign(bus, slot),
                ("sin_asignar", &[bus]) => plan.leave_unassigned(bus),
                _ => log::debug!("ignoring record {rec:?}"),
            }
        }
        plan
    }

    fn is_empty(&self) -> bool {
        self.assigned.is_empty() && self.unassigned.is_empty()
    }
}

impl fmt::Display for TimeslotPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bus, slot) in self.assigned() {
            writeln!(f, "BUS {bus} asignado a FRANJA {slot}")?;
        }
        for bus in self.unassigned() {
            writeln!(f, "BUS {bus} -> NO ASIGNADO")?;
        }
        Ok(())
    }
}

/// A bus-to-timeslot-to-workshop assignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopPlan {
    assigned: BTreeSet<(Bus, Timeslot, Workshop)>,
}

impl WorkshopPlan {
    /// Assigns `bus` to `workshop` during `slot`
    pub fn assign(&mut self, bus: Bus, slot: Timeslot, workshop: Workshop) {
        self.assigned.insert((bus, slot, workshop));
    }

    /// Iterates over the assignments in ascending `(bus, timeslot, workshop)` order
    pub fn assigned(&self) -> impl Iterator<Item = (Bus, Timeslot, Workshop)> + '_ {
        self.assigned.iter().copied()
    }
}

impl Plan for WorkshopPlan {
    fn from_records<'rec, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'rec VarRecord>,
    {
        let mut plan = WorkshopPlan::default();
        for rec in records {
            match (rec.name, rec.indices.as_slice()) {
                ("Asignado", &[bus, slot, workshop]) => plan.assign(bus, slot, workshop),
                _ => log::debug!("ignoring record {rec:?}"),
            }
        }
        plan
    }

    fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl fmt::Display for WorkshopPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bus, slot, workshop) in self.assigned() {
            writeln!(f, "BUS {bus} asignado a TALLER {workshop} en FRANJA {slot}")?;
        }
        Ok(())
    }
}
