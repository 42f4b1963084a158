//! # busplan - Bus Maintenance Scheduling through GLPK
//!
//! `busplan` prepares bus-to-timeslot (and bus-to-timeslot-to-workshop)
//! assignment instances for the GLPK MathProg solver `glpsol`, runs the solver
//! as an external process and decodes its textual solution report.
//!
//! The optimization model itself lives in a separately maintained MathProg
//! model file. This library only covers the three seams around it:
//!
//! 1. Rendering an instance as a MathProg data document
//!    ([`instances::fio::mathprog`])
//! 2. Invoking the solver with model, data and report paths ([`solvers`])
//! 3. Recovering status, objective and selected decision variables from the
//!    report ([`instances::fio::report`])
//!
//! The two supported model shapes are [`instances::TimeslotInstance`] and
//! [`instances::WorkshopInstance`].

pub mod instances;
pub mod solvers;
pub mod types;
