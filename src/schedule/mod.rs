pub mod types;
pub mod table;
pub mod generator;

pub use types::{Assignment, ScheduleEntry, TaskKind};
pub use table::{day_name, today_name, ScheduleTable, DAY_NAMES};
pub use generator::{generate_assignment, generate_assignment_with_rng};
