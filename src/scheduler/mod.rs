//! Timetable scheduling facade and KPI evaluation.
//!
//! # Scheduler
//!
//! `TimetableScheduler` runs the full pipeline: validation, feasibility
//! checks, GA optimization, and decoding into a [`Timetable`](crate::models::Timetable).
//!
//! # KPI
//!
//! `TimetableKpi` computes load and occupancy metrics: sessions per
//! instructor, load spread, room utilization, and slot occupancy.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod kpi;
mod timetabler;

pub use kpi::TimetableKpi;
pub use timetabler::TimetableScheduler;
