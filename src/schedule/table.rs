use chrono::{Datelike, Local, Weekday};
use super::types::ScheduleEntry;

/// Indonesian day names, Monday first
pub const DAY_NAMES: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];

/// Converts a calendar weekday to the Indonesian day name used as table key
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Day name for the local calendar date
pub fn today_name() -> &'static str {
    day_name(Local::now().weekday())
}

/// Fixed weekday -> task table. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct ScheduleTable {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleTable {
    /// Looks up the entry for a day name. Unknown names have no entry.
    pub fn lookup(&self, day_name: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.day_name == day_name)
    }

    /// All entries, Monday first
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }
}

impl Default for ScheduleTable {
    fn default() -> Self {
        Self {
            entries: vec![
                ScheduleEntry::new("Senin", "jendela", &[16]),
                ScheduleEntry::new("Selasa", "makan", &[3, 17]),
                ScheduleEntry::new("Rabu", "sampah", &[17]),
                ScheduleEntry::new("Kamis", "lantai 1", &[16]),
                ScheduleEntry::new("Jumat", "lantai 2", &[16]),
                ScheduleEntry::new("Sabtu", "lantai 3", &[16]),
                ScheduleEntry::new("Minggu", "tangga", &[16]),
            ],
        }
    }
}
