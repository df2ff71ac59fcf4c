/// ANSI SGR sequences used by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Neutral,
    Grey,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Title,
    Selected,
    Highlighted,
}

impl Color {
    /// Colors handed out to tracks. The first entry is never assigned.
    pub const TRACKS: [Color; 9] = [
        Color::Neutral,
        Color::Grey,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Color::Neutral => "\x1b[m",
            Color::Grey => "\x1b[1;30m",
            Color::Red => "\x1b[1;31m",
            Color::Green => "\x1b[1;32m",
            Color::Yellow => "\x1b[1;33m",
            Color::Blue => "\x1b[1;34m",
            Color::Magenta => "\x1b[1;35m",
            Color::Cyan => "\x1b[1;36m",
            Color::White => "\x1b[1;37m",
            Color::Title => "\x1b[37m",
            Color::Selected => "\x1b[7;33m",
            Color::Highlighted => "\x1b[7;38m",
        }
    }
}

/// Maps tracks and styles to escape sequences, or to nothing at all when
/// colors are disabled.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    tracks: Vec<String>,
    enabled: bool,
}

impl Palette {
    /// A colored palette over `tracks`, which get sorted and de-duplicated.
    pub fn new<I, S>(tracks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracks: Vec<String> = tracks.into_iter().map(Into::into).collect();
        tracks.sort();
        tracks.dedup();

        Self {
            tracks,
            enabled: true,
        }
    }

    /// A palette that renders every color as an empty string.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn code(&self, color: Color) -> &'static str {
        if self.enabled {
            color.code()
        } else {
            ""
        }
    }

    pub fn reset(&self) -> &'static str {
        self.code(Color::Neutral)
    }

    pub fn track_color(&self, track: &str) -> Color {
        match self.tracks.binary_search_by(|known| known.as_str().cmp(track)) {
            Ok(index) => Color::TRACKS[index % (Color::TRACKS.len() - 1) + 1],
            Err(_) => Color::Neutral,
        }
    }

    pub fn track(&self, track: &str) -> &'static str {
        self.code(self.track_color(track))
    }

    /// Style of an event title, depending on whether it was selected.
    pub fn title(&self, selected: bool) -> &'static str {
        self.code(if selected {
            Color::Selected
        } else {
            Color::Title
        })
    }
}
