use serde::Serialize;

pub const SONG_TITLE: &str = "Midnight Honey";
pub const SONG_TAGLINE: &str = "Freshly brewed jazz with lyrics that sway and interplay.";

/// Root used when a chord symbol has no entry in the root table (C3).
pub const DEFAULT_ROOT_HZ: f32 = 130.81;

/// One song section: a title, its lyric lines and the chords cycled under it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub lyrics: &'static [&'static str],
    pub chords: &'static [&'static str],
}

pub static SECTIONS: [Section; 3] = [
    Section {
        title: "Verse",
        lyrics: &[
            "Moonlight drips like honey down the avenue,",
            "Trumpets whisper secrets only night owls knew,",
            "Tiptoe bassline shivers through the midnight dew,",
            "Every note a neon sigh in indigo hues.",
        ],
        chords: &["Cm9", "F13", "Bbmaj7", "Eb9"],
    },
    Section {
        title: "Chorus",
        lyrics: &[
            "Swing me slow, let the rhythm glow,",
            "Pocket full of blue notes, ready to overflow,",
            "Satin shadows dancing in a syncopated show,",
            "Stay till the sunrise tells us to go.",
        ],
        chords: &["Abmaj9", "G7b9", "Cm9", "F13", "Bbmaj7"],
    },
    Section {
        title: "Bridge",
        lyrics: &[
            "Snap of the snare, velvet in the air,",
            "Walk that upright heartbeat, cool and rare,",
            "Sip of cymbal shimmer says we're almost there,",
            "Hold this chromatic kiss if you dare.",
        ],
        chords: &["Dm7b5", "G7b13", "Cm9", "Fm9", "Bb13"],
    },
];

/// Chord symbol → root frequency in Hz.
static CHORD_ROOTS: [(&str, f32); 10] = [
    ("Cm9", 130.81),
    ("F13", 174.61),
    ("Bbmaj7", 233.08),
    ("Eb9", 155.56),
    ("Abmaj9", 207.65),
    ("G7b9", 196.0),
    ("Dm7b5", 146.83),
    ("G7b13", 196.0),
    ("Fm9", 174.61),
    ("Bb13", 233.08),
];

/// All sections in playing order.
pub fn sections() -> &'static [Section] {
    &SECTIONS
}

/// Look up the root frequency of a chord symbol (exact match).
pub fn chord_root(name: &str) -> Option<f32> {
    CHORD_ROOTS
        .iter()
        .find(|(chord, _)| *chord == name)
        .map(|(_, hz)| *hz)
}

/// Root frequency of a chord, falling back to [`DEFAULT_ROOT_HZ`].
pub fn root_or_default(name: &str) -> f32 {
    chord_root(name).unwrap_or(DEFAULT_ROOT_HZ)
}

/// Index of the section that plays during `bar` (0-based).
pub fn section_for_bar(bar: u64) -> usize {
    (bar % SECTIONS.len() as u64) as usize
}

/// Chord symbol that plays during `bar`.
///
/// The chord index cycles with the global bar count, not the bar within the
/// section, so short and long sections both walk their progression.
pub fn chord_for_bar(bar: u64) -> &'static str {
    let section = &SECTIONS[section_for_bar(bar)];
    if section.chords.is_empty() {
        return "";
    }
    let idx = (bar % section.chords.len() as u64) as usize;
    section.chords.get(idx).copied().unwrap_or(section.chords[0])
}
