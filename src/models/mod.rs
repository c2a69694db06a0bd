//! Timetabling domain models.
//!
//! Plain records plus an explicit eligibility relation. Units, courses,
//! and instructors form a flat composition, not a type hierarchy.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | University | Training Center |
//! |-------------|--------|------------|-----------------|
//! | Unit | Class/Stream | Department | Cohort |
//! | Course | Subject | Course | Module |
//! | Instructor | Teacher | Professor | Trainer |
//! | Room | Classroom | Lecture Hall/Lab | Studio |
//! | Time slot | Period | Lecture Slot | Session |

mod diagnostic;
mod eligibility;
mod input;
mod timetable;
mod unit;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use eligibility::EligibilityMap;
pub use input::TimetableInput;
pub use timetable::{
    Assignment, GenerationStats, Offering, SessionKind, Termination, Timetable,
};
pub use unit::Unit;
