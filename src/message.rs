//! Renders an assignment into the chat message posted to the group.

use std::fmt::{self, Write};
use tracing::warn;
use crate::schedule::TaskKind;

const CLOSING_LINES: &str = "Monggo setelah piket bisa di react jika sudah selesai piket.\nAlhamdulillah Jazakumullahukhoiro.";
const FALLBACK_LINE: &str = "Gagal menyusun pembagian piket.";
const EXTRA_SECTION: &str = "Sekat Besar";
const EMPTY_SLOT: &str = "-";

/// Section and slot labels for the tasks that pair members up
struct PairLayout {
    sections: [&'static str; 3],
    slots: [&'static str; 2],
}

const WINDOW_LAYOUT: PairLayout = PairLayout {
    sections: ["Lantai 1", "Lantai 2", "Lantai 3"],
    slots: ["Dalam", "Luar"],
};

const STAIRS_LAYOUT: PairLayout = PairLayout {
    sections: ["Laki-Laki", "Perempuan", "Belakang"],
    slots: ["Lantai 1 - 2", "Lantai 2 - 3"],
};

/// Formats the message for `task_type` with members in assignment order.
///
/// Never fails. Single-task days (`sampah`, `lantai N`) return a one-liner
/// without the `*JADWAL PIKET ...*` header; unknown task types get the header
/// only.
pub fn format_message(task_type: &str, members: &[String]) -> String {
    let kind = TaskKind::parse(task_type);
    if matches!(kind, TaskKind::Trash | TaskKind::Floor(_)) {
        return format!("Kuy, piket {}", task_type);
    }

    let mut body = String::new();
    let rendered = write_body(&mut body, kind, members).map(|()| body);
    with_header(task_type, rendered)
}

/// Writes the per-kind body; kinds without one write nothing
fn write_body<W: Write>(out: &mut W, kind: TaskKind, members: &[String]) -> fmt::Result {
    match kind {
        TaskKind::Windows => write_pairs(out, &WINDOW_LAYOUT, members),
        TaskKind::Stairs => write_pairs(out, &STAIRS_LAYOUT, members),
        TaskKind::Meals => write_shifts(out, members),
        TaskKind::Trash | TaskKind::Floor(_) | TaskKind::Other => Ok(()),
    }
}

/// Header followed by the rendered body, or by the fallback line when the
/// body could not be written
fn with_header(task_type: &str, body: Result<String, fmt::Error>) -> String {
    let mut message = format!("*JADWAL PIKET {}*\n\n", task_type.to_uppercase());
    match body {
        Ok(body) => message.push_str(&body),
        Err(_) => {
            warn!(task_type, "failed to render message body, using fallback");
            message.push_str(FALLBACK_LINE);
        }
    }
    message
}

/// Pairs members up, one pair per labeled section; a 4th pair contributes
/// only its first member. Sections without a pair are left out.
fn write_pairs<W: Write>(out: &mut W, layout: &PairLayout, members: &[String]) -> fmt::Result {
    let pairs: Vec<&[String]> = members.chunks(2).collect();

    for (label, pair) in layout.sections.iter().zip(&pairs) {
        let first = pair.first().map_or(EMPTY_SLOT, String::as_str);
        let second = pair.get(1).map_or(EMPTY_SLOT, String::as_str);
        writeln!(out, "{}", label)?;
        writeln!(out, "{}: {}", layout.slots[0], first)?;
        writeln!(out, "{}: {}", layout.slots[1], second)?;
        writeln!(out)?;
    }

    if let Some(first) = pairs.get(layout.sections.len()).and_then(|pair| pair.first()) {
        writeln!(out, "{}: {}", EXTRA_SECTION, first)?;
        writeln!(out)?;
    }

    out.write_str(CLOSING_LINES)
}

/// Morning shift takes the first half (rounded down), evening the rest
fn write_shifts<W: Write>(out: &mut W, members: &[String]) -> fmt::Result {
    let (morning, evening) = members.split_at(members.len() / 2);

    writeln!(out, "=== Pagi ===")?;
    for (i, name) in morning.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, name)?;
    }
    writeln!(out)?;
    writeln!(out, "=== Sore ===")?;
    for (i, name) in evening.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, name)?;
    }
    Ok(())
}
