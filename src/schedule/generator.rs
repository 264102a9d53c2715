use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;
use crate::message::format_message;
use super::table::ScheduleTable;
use super::types::Assignment;

/// Generates an assignment for `day_name` from a roster snapshot.
///
/// Returns `None` when the day has no schedule entry; that is the
/// "nothing to do today" outcome, not an error.
pub fn generate_assignment(table: &ScheduleTable, day_name: &str, roster: &[String]) -> Option<Assignment> {
    generate_assignment_with_rng(table, day_name, roster, &mut rand::thread_rng())
}

/// Same as [`generate_assignment`] with a caller-supplied RNG
pub fn generate_assignment_with_rng<R: Rng + ?Sized>(
    table: &ScheduleTable,
    day_name: &str,
    roster: &[String],
    rng: &mut R,
) -> Option<Assignment> {
    let Some(entry) = table.lookup(day_name) else {
        debug!(day_name, "no schedule entry for day");
        return None;
    };

    // Fisher-Yates over an owned copy; later roster edits never reach it
    let mut assigned_members = roster.to_vec();
    assigned_members.shuffle(rng);

    let message = format_message(&entry.task_type, &assigned_members);
    debug!(day_name, task_type = %entry.task_type, members = assigned_members.len(), "generated assignment");

    Some(Assignment {
        task_type: entry.task_type.clone(),
        assigned_members,
        message,
    })
}
