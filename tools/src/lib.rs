//! # busplan-tools - Command Line Tools for the busplan Library
//!
//! This crate contains the `assign-timeslots` and `assign-workshops` binaries
//! and the pipeline driver they share.

pub mod cli;
