//! Line building with color escapes kept apart from the visible width.

use scraper::Html;
use unicode_width::UnicodeWidthChar;

/// Display width of `s`, ignoring ANSI escape sequences.
pub fn visible_width(s: &str) -> usize {
    textwrap::core::display_width(s)
}

/// Word-wraps `text` at `width` columns, breaking words that do not fit.
///
/// Blank text produces no lines at all.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Cuts `text` down to at most `width` display columns.
pub fn truncate(text: &str, width: usize) -> &str {
    let mut used = 0;

    for (idx, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[..idx];
        }
    }

    text
}

/// Text content of an HTML fragment, with tags dropped and entities decoded.
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }

    Html::parse_fragment(text)
        .root_element()
        .text()
        .collect::<String>()
}

/// A single output line that knows how much of it is visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    raw: String,
    visible: usize,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) -> &mut Self {
        self.raw.push_str(text);
        self.visible += visible_width(text);
        self
    }

    /// Appends `text` wrapped in `style` and `reset`, which take up no columns.
    pub fn push_styled(&mut self, style: &str, text: &str, reset: &str) -> &mut Self {
        self.raw.push_str(style);
        self.push(text);
        self.raw.push_str(reset);
        self
    }

    /// Appends `text` styled and padded to exactly `width` visible columns.
    pub fn push_cell(&mut self, style: &str, text: &str, reset: &str, width: usize) -> &mut Self {
        let start = self.visible;
        self.push_styled(style, text, reset);
        self.pad_to(start + width)
    }

    /// Fills with spaces until `width` visible columns are taken.
    pub fn pad_to(&mut self, width: usize) -> &mut Self {
        if self.visible < width {
            let missing = width - self.visible;
            self.raw.extend(std::iter::repeat(' ').take(missing));
            self.visible = width;
        }
        self
    }

    pub fn visible_width(&self) -> usize {
        self.visible
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

/// Pads an already styled `cell` to `width` visible columns.
pub fn pad_cell(cell: &str, width: usize) -> String {
    let mut line = StyledLine::new();
    line.push(cell).pad_to(width);
    line.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_skips_escape_sequences() {
        assert_eq!(visible_width("\x1b[1;31mred\x1b[m"), 3);
        assert_eq!(visible_width("Saal 1"), 6);
    }

    #[test]
    fn padding_counts_visible_columns() {
        let mut line = StyledLine::new();
        line.push_styled("\x1b[7;33m", "abc", "\x1b[m").pad_to(6);

        assert_eq!(line.visible_width(), 6);
        assert_eq!(line.as_str(), "\x1b[7;33mabc\x1b[m   ");
        assert_eq!(pad_cell("\x1b[37mab\x1b[m", 3), "\x1b[37mab\x1b[m ");
    }

    #[test]
    fn padding_never_shrinks() {
        assert_eq!(pad_cell("overlong", 4), "overlong");
    }

    #[test]
    fn cells_are_padded_relative_to_their_start() {
        let mut line = StyledLine::new();
        line.push("|").push_cell("", "ab", "", 4).push("|");

        assert_eq!(line.as_str(), "|ab  |");
    }

    #[test]
    fn wraps_words() {
        assert_eq!(wrap("Hello wide world", 10), ["Hello wide", "world"]);
        assert_eq!(wrap("abcdefgh", 3), ["abc", "def", "gh"]);
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate("Security", 3), "Sec");
        assert_eq!(truncate("Art", 10), "Art");
        assert_eq!(truncate("日本語", 4), "日本");
    }

    #[test]
    fn strips_markup() {
        assert_eq!(strip_markup("<p>Hello <b>you</b> &amp; me</p>"), "Hello you & me");
        assert_eq!(strip_markup("plain text"), "plain text");
    }
}
