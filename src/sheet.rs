use crate::song::{self, Section, SONG_TAGLINE, SONG_TITLE};
use serde::Serialize;
use std::fmt::Write;

const ACTIVE_MARKER: &str = "▶ ";
const IDLE_MARKER: &str = "  ";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    pub title: &'static str,
    pub tagline: &'static str,
    pub button_label: &'static str,
    pub active_section: Option<usize>,
    pub sections: &'static [Section],
}

impl SheetData {
    pub fn new(active_section: Option<usize>, button_label: &'static str) -> Self {
        SheetData {
            title: SONG_TITLE,
            tagline: SONG_TAGLINE,
            button_label,
            active_section,
            sections: song::sections(),
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Serialize error: {}", e))
    }
}

/// Render the lyric/chord sheet as plain text, marking the active section.
pub fn render_sheet(data: &SheetData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", data.title);
    let _ = writeln!(out, "{}", data.tagline);
    let _ = writeln!(out, "[ {} ]", data.button_label);

    for (index, section) in data.sections.iter().enumerate() {
        let marker = if data.active_section == Some(index) {
            ACTIVE_MARKER
        } else {
            IDLE_MARKER
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "{}{}    {}", marker, section.title, section.chords.join("  "));
        for line in section.lyrics {
            let _ = writeln!(out, "{}  {}", IDLE_MARKER, line);
        }
    }
    out
}

/// One-line summary of what is sounding, for the play loop.
pub fn now_playing_line(section_index: usize, chord: &str, bar: u64) -> String {
    let title = song::sections()
        .get(section_index)
        .map(|s| s.title)
        .unwrap_or("?");
    format!("{}{} — {} (bar {})", ACTIVE_MARKER, title, chord, bar + 1)
}
