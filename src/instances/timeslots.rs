//! # Bus-to-Timeslot Instances
//!
//! Every bus is either assigned to one timeslot or left unassigned. The input
//! file has four lines:
//!
//! ```text
//! <n_timeslots> <m_buses>
//! <cost_per_distance> <cost_per_passenger>
//! <distance_1> ... <distance_m>
//! <passengers_1> ... <passengers_m>
//! ```

use super::{
    fio::{
        self,
        mathprog::{DataDocument, Declaration},
        report::VarPattern,
    },
    range_len, Instance,
};
use crate::types::TimeslotPlan;

const N_LINES: usize = 4;

/// An instance of the bus-to-timeslot model
#[derive(Debug, Clone, PartialEq)]
pub struct TimeslotInstance {
    n_slots: usize,
    dist_cost: f64,
    pass_cost: f64,
    distances: Vec<f64>,
    passengers: Vec<f64>,
}

impl TimeslotInstance {
    /// The number of timeslots
    #[must_use]
    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    /// The number of buses
    #[must_use]
    pub fn n_buses(&self) -> usize {
        self.distances.len()
    }
}

impl Instance for TimeslotInstance {
    type Plan = TimeslotPlan;

    const MODEL_FILE: &'static str = "parte-2-1.mod";

    const INPUT_FORMAT: &'static str = "<n> <m> / <kd> <kp> / <d1 ... dm> / <p1 ... pm>";

    const VARIABLES: &'static [VarPattern] = &[
        VarPattern::new("asignado", 2),
        VarPattern::new("sin_asignar", 1),
    ];

    const REQUIRES_STATUS: bool = false;

    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, fio::Error> {
        let line = |idx: usize| lines[idx].as_ref();
        if lines.is_empty() {
            return Err(fio::Error::LineCount {
                expected: N_LINES,
                found: 0,
            });
        }
        let header = fio::parse_exact(line(0), 1, 2)?;
        let n_slots = fio::to_count(header[0], 1, "number of timeslots")?;
        let n_buses = fio::to_count(header[1], 1, "number of buses")?;
        if lines.len() != N_LINES {
            return Err(fio::Error::LineCount {
                expected: N_LINES,
                found: lines.len(),
            });
        }
        let costs = fio::parse_exact(line(1), 2, 2)?;
        let distances = fio::parse_exact(line(2), 3, n_buses)?;
        let passengers = fio::parse_exact(line(3), 4, n_buses)?;
        log::info!("read instance with {n_slots} timeslots and {n_buses} buses");
        Ok(TimeslotInstance {
            n_slots,
            dist_cost: costs[0],
            pass_cost: costs[1],
            distances,
            passengers,
        })
    }

    fn to_data(&self) -> DataDocument {
        let mut doc = DataDocument::new();
        doc.push(Declaration::range_set("Autobuses", self.n_buses()));
        doc.push(Declaration::range_set("Franjas", self.n_slots));
        doc.push(Declaration::scalar("coste_distancia", self.dist_cost));
        doc.push(Declaration::scalar("coste_pasajeros", self.pass_cost));
        doc.push(Declaration::vector("distancia", &self.distances));
        doc.push(Declaration::vector("pasajero", &self.passengers));
        doc
    }

    fn from_data(doc: &DataDocument) -> anyhow::Result<Self> {
        let n_buses = range_len(doc, "Autobuses")?;
        Ok(TimeslotInstance {
            n_slots: range_len(doc, "Franjas")?,
            dist_cost: doc.scalar("coste_distancia")?,
            pass_cost: doc.scalar("coste_pasajeros")?,
            distances: doc.vector("distancia", n_buses)?,
            passengers: doc.vector("pasajero", n_buses)?,
        })
    }

    /// One variable per bus and timeslot plus one per bus for leaving it
    /// unassigned
    fn n_vars(&self) -> u64 {
        let (n, m) = (self.n_slots as u64, self.n_buses() as u64);
        m * n + m
    }

    /// One constraint per bus and one per timeslot
    fn n_constrs(&self) -> u64 {
        (self.n_buses() + self.n_slots) as u64
    }
}
