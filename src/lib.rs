//! Core library for the hbp-curation command line application.
//!
//! Curation sheets are read by the adapters in [`io`] and interpreted by
//! [`sheets`] into the graph model of [`model`]. [`repository`] ties a rounds
//! directory to its output directory and graph cache, [`analysis`] holds the
//! reporting aggregations, and [`pipeline`] sequences them for the CLI.

pub mod analysis;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod repository;
pub mod sheets;

pub use error::{CurationError, Result};
