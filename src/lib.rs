//! Course timetabling with a genetic algorithm.
//!
//! Assigns every course offering of every student group (unit) an eligible
//! instructor, a room, and a time slot, searching for a timetable with no
//! room or instructor double-booking.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Unit`, `EligibilityMap`, `TimetableInput`,
//!   `Assignment`, `Timetable`, `Diagnostic`
//! - **`validation`**: Input integrity checks and feasibility diagnostics
//! - **`ga`**: Compiled problem, candidate encoding, evaluator, operators,
//!   population, and the generational runner
//! - **`scheduler`**: End-to-end `TimetableScheduler` and `TimetableKpi`
//! - **`error`**: `TimetableError`
//!
//! # Example
//!
//! ```
//! use u_timetable::{GaConfig, TimetableScheduler};
//! use u_timetable::models::{EligibilityMap, TimetableInput, Unit};
//!
//! let input = TimetableInput::new()
//!     .with_unit(Unit::new("A", 30).with_courses(["Math", "Art"]))
//!     .with_eligibility(EligibilityMap::new().with("Math", ["P1"]).with("Art", ["P2"]))
//!     .with_rooms(["R1", "R2"])
//!     .with_time_slots(["T1", "T2"]);
//!
//! let timetable = TimetableScheduler::new(GaConfig::default().with_seed(1))
//!     .schedule(&input)
//!     .unwrap();
//! assert!(timetable.is_conflict_free());
//! ```
//!
//! # Logging
//!
//! Progress is reported through the `log` facade. The crate never installs
//! a logger.
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod error;
pub mod ga;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::TimetableError;
pub use ga::{CancellationToken, GaConfig, InfeasibilityPolicy};
pub use scheduler::{TimetableKpi, TimetableScheduler};
