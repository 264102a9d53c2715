use std::sync::LazyLock;
use regex::Regex;
use crate::schedule::{Assignment, ScheduleTable};

/// Shown wherever there is no assignment for today
pub const NO_TASK_TODAY: &str = "Tidak ada jadwal piket hari ini";

// *bold*, _italic_, ~strike~, `mono`; leftmost marker wins
static STYLE_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*(.*?)\*|_(.*?)_|~(.*?)~|`(.*?)`").expect("markup pattern is valid")
});

const STYLE_TAGS: [&str; 4] = ["b", "i", "s", "code"];

/// Renders chat markup as HTML, dropping the markers.
/// Text outside and inside the markers is escaped.
pub fn render_styled_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for caps in STYLE_MARKUP.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        html.push_str(&escape_html(&text[last..whole.start()]));

        let styled = STYLE_TAGS
            .iter()
            .enumerate()
            .find_map(|(i, tag)| caps.get(i + 1).map(|inner| (tag, inner.as_str())));
        if let Some((tag, inner)) = styled {
            html.push_str(&format!("<{}>{}</{}>", tag, escape_html(inner), tag));
        }
        last = whole.end();
    }

    html.push_str(&escape_html(&text[last..]));
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Prints today's assignment, or the empty state
pub fn print_assignment(day_name: &str, assignment: Option<&Assignment>) {
    println!("\n=== Hari Ini: {} ===", day_name);
    match assignment {
        Some(assignment) => {
            println!("Task: {} ({} members)\n", assignment.task_type, assignment.assigned_members.len());
            println!("{}", assignment.message);
        }
        None => println!("{}", NO_TASK_TODAY),
    }
}

/// Prints the weekly table, one day per line
pub fn print_schedule_table(table: &ScheduleTable) {
    println!("\n=== Jadwal Piket Mingguan ===");
    for entry in table.entries() {
        let hours: Vec<String> = entry.notional_times.iter().map(|h| format!("{:02}:00", h)).collect();
        println!("  {:<7} -> {:<9} ({})", entry.day_name, entry.task_type, hours.join(", "));
    }
}

/// Prints the roster with the indexes `roster remove` expects
pub fn print_roster(roster: &[String]) {
    println!("\n=== Anggota Piket ({}) ===", roster.len());
    for (i, name) in roster.iter().enumerate() {
        println!("  {}. {}", i, name);
    }
}
