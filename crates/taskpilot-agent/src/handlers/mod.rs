//! The task handlers.
//!
//! Each handler serves one [`TaskKind`](taskpilot_intent::TaskKind).  The
//! table synthesizers and the HR lookup are pure: the clock and the random
//! source are passed in.  The report and presentation handlers make one
//! completion call each and return the model's text verbatim.

pub mod finance;
pub mod hr;
pub mod presentation;
pub mod report;
pub mod sales;
pub mod sheet;

/// Date format used in generated table cells.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
