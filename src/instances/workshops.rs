//! # Bus-to-Timeslot-to-Workshop Instances
//!
//! Every bus is assigned to one workshop during one timeslot. Buses sharing
//! passengers should not be serviced during the same timeslot. The input file
//! starts with the dimensions, followed by the shared-passenger matrix and the
//! workshop availability matrix:
//!
//! ```text
//! <n_timeslots> <m_buses> <u_workshops>
//! <c_11> ... <c_1m>
//! ...
//! <c_m1> ... <c_mm>
//! <o_11> ... <o_1u>
//! ...
//! <o_n1> ... <o_nu>
//! ```

use super::{
    fio::{
        self,
        mathprog::{DataDocument, Declaration},
        report::VarPattern,
    },
    pairs, range_len, Instance,
};
use crate::types::WorkshopPlan;

/// An instance of the bus-to-timeslot-to-workshop model
#[derive(Debug, Clone, PartialEq)]
pub struct WorkshopInstance {
    n_slots: usize,
    n_buses: usize,
    n_workshops: usize,
    /// Passengers shared by two buses, `m x m`
    shared: Vec<Vec<f64>>,
    /// Whether a workshop is open during a timeslot, `n x u`
    availability: Vec<Vec<i64>>,
}

impl WorkshopInstance {
    /// The number of timeslots
    #[must_use]
    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    /// The number of buses
    #[must_use]
    pub fn n_buses(&self) -> usize {
        self.n_buses
    }

    /// The number of workshops
    #[must_use]
    pub fn n_workshops(&self) -> usize {
        self.n_workshops
    }
}

impl Instance for WorkshopInstance {
    type Plan = WorkshopPlan;

    const MODEL_FILE: &'static str = "parte-2-2.mod";

    const INPUT_FORMAT: &'static str =
        "<n> <m> <u> / m rows <c_a1 ... c_am> / n rows <o_f1 ... o_fu>";

    const VARIABLES: &'static [VarPattern] = &[VarPattern::new("Asignado", 3)];

    const REQUIRES_STATUS: bool = true;

    fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, fio::Error> {
        let Some(first) = lines.first() else {
            return Err(fio::Error::LineCount {
                expected: 1,
                found: 0,
            });
        };
        let header = fio::parse_exact(first.as_ref(), 1, 3)?;
        let n_slots = fio::to_count(header[0], 1, "number of timeslots")?;
        let n_buses = fio::to_count(header[1], 1, "number of buses")?;
        let n_workshops = fio::to_count(header[2], 1, "number of workshops")?;
        let expected = 1 + n_buses + n_slots;
        if lines.len() != expected {
            return Err(fio::Error::LineCount {
                expected,
                found: lines.len(),
            });
        }
        // line numbers are 1-based and the header is line 1
        let shared = lines[1..=n_buses]
            .iter()
            .enumerate()
            .map(|(idx, line)| fio::parse_exact(line.as_ref(), idx + 2, n_buses))
            .collect::<Result<Vec<_>, _>>()?;
        let availability = lines[n_buses + 1..]
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let row = fio::parse_exact(line.as_ref(), idx + n_buses + 2, n_workshops)?;
                Ok(row
                    .into_iter()
                    .map(|val| val.round_ties_even() as i64)
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>, fio::Error>>()?;
        log::info!(
            "read instance with {n_slots} timeslots, {n_buses} buses and {n_workshops} workshops"
        );
        Ok(WorkshopInstance {
            n_slots,
            n_buses,
            n_workshops,
            shared,
            availability,
        })
    }

    fn to_data(&self) -> DataDocument {
        let availability: Vec<Vec<f64>> = self
            .availability
            .iter()
            .map(|row| row.iter().map(|&val| val as f64).collect())
            .collect();
        let mut doc = DataDocument::new();
        doc.push(Declaration::range_set("Autobuses", self.n_buses));
        doc.push(Declaration::range_set("Franjas", self.n_slots));
        doc.push(Declaration::range_set("Talleres", self.n_workshops));
        doc.push(Declaration::matrix("suma_pasajeros", &self.shared));
        doc.push(Declaration::Comment(String::from(
            "matriz que representa la suma de pasajeros de los autobuses a y b",
        )));
        doc.push(Declaration::matrix("disponibilidad", &availability));
        doc.push(Declaration::Comment(String::from(
            "matriz que representa la disponibilidad de franjas en cada taller, filas = franjas, columnas = talleres",
        )));
        doc
    }

    fn from_data(doc: &DataDocument) -> anyhow::Result<Self> {
        let n_buses = range_len(doc, "Autobuses")?;
        let n_slots = range_len(doc, "Franjas")?;
        let n_workshops = range_len(doc, "Talleres")?;
        let availability: Vec<Vec<i64>> = doc
            .matrix("disponibilidad", n_slots, n_workshops)?
            .into_iter()
            .map(|row| row.into_iter().map(|val| val as i64).collect())
            .collect();
        Ok(WorkshopInstance {
            n_slots,
            n_buses,
            n_workshops,
            shared: doc.matrix("suma_pasajeros", n_buses, n_buses)?,
            availability,
        })
    }

    /// One variable per bus, timeslot and workshop plus one per unordered bus
    /// pair and timeslot marking that both buses are serviced in that timeslot
    fn n_vars(&self) -> u64 {
        let (n, m, u) = self.dims();
        m * n * u + pairs(m) * n
    }

    /// One assignment constraint per bus, one capacity constraint per timeslot
    /// and workshop, one availability constraint per bus, timeslot and workshop,
    /// and three linking constraints per unordered bus pair and timeslot
    fn n_constrs(&self) -> u64 {
        let (n, m, u) = self.dims();
        m + n * u + m * n * u + 3 * pairs(m) * n
    }
}

impl WorkshopInstance {
    fn dims(&self) -> (u64, u64, u64) {
        (
            self.n_slots as u64,
            self.n_buses as u64,
            self.n_workshops as u64,
        )
    }
}
