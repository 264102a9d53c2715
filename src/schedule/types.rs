use serde::{Serialize, Deserialize};

/// One row of the weekly schedule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day_name: String,
    pub task_type: String,
    pub notional_times: Vec<u32>, // hour hints, nothing reads them
}

impl ScheduleEntry {
    pub fn new(day_name: &str, task_type: &str, notional_times: &[u32]) -> Self {
        Self {
            day_name: day_name.to_string(),
            task_type: task_type.to_string(),
            notional_times: notional_times.to_vec(),
        }
    }
}

/// Result of one generation: the task, the shuffled roster and the rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_type: String,
    pub assigned_members: Vec<String>,
    pub message: String,
}

/// Task identifiers the message formatter knows how to lay out.
///
/// Recognition is an exact, case-sensitive match on the lowercase identifier
/// used in the schedule table; anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// `jendela`: window cleaning, members paired per floor
    Windows,
    /// `tangga`: stairwells, members paired per stairwell
    Stairs,
    /// `makan`: dishes, split into morning and evening shifts
    Meals,
    /// `sampah`: taking out the trash
    Trash,
    /// `lantai 1` to `lantai 3`: sweeping a single floor
    Floor(u8),
    Other,
}

impl TaskKind {
    pub fn parse(task_type: &str) -> Self {
        match task_type {
            "jendela" => TaskKind::Windows,
            "tangga" => TaskKind::Stairs,
            "makan" => TaskKind::Meals,
            "sampah" => TaskKind::Trash,
            "lantai 1" => TaskKind::Floor(1),
            "lantai 2" => TaskKind::Floor(2),
            "lantai 3" => TaskKind::Floor(3),
            _ => TaskKind::Other,
        }
    }
}
