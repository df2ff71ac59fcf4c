use chrono::Duration;

use crate::text::{strip_markup, wrap, StyledLine};
use crate::{Color, Event, Palette, RenderContext};

/// Renders single events as bordered boxes.
pub struct CardRenderer<'a> {
    context: &'a RenderContext,
    palette: &'a Palette,
}

impl<'a> CardRenderer<'a> {
    pub fn new(context: &'a RenderContext, palette: &'a Palette) -> Self {
        Self { context, palette }
    }

    /// Inner width of a card, between the two borders.
    pub fn width(&self) -> usize {
        self.context.width.saturating_sub(2)
    }

    /// Renders `event`, leaving out abstract and description when `short`.
    pub fn render(&self, event: &Event, short: bool) -> String {
        let width = self.width();
        let reset = self.palette.reset();
        let glyphs = &self.context.glyphs;

        let mut lines = self.summary(event, width);

        if !short {
            lines.push(StyledLine::new());
            lines.extend(self.section("ABSTRACT", &event.abstract_text, width));
            lines.push(StyledLine::new());
            lines.extend(self.section("DESCRIPTION", &event.description, width));
        }

        let mut out = String::new();
        let mut emit = |line: &str| {
            out.push_str(line);
            out.push_str(reset);
            out.push('\n');
        };

        emit(&format!(
            "{}{}{}",
            glyphs.top_left,
            glyphs.rule(width),
            glyphs.top_right
        ));

        for mut line in lines {
            line.pad_to(width);
            emit(&format!("{}{}{}", glyphs.vertical, line.as_str(), glyphs.vertical));
        }

        emit(&format!(
            "{}{}{}",
            glyphs.bottom_left,
            glyphs.rule(width),
            glyphs.bottom_right
        ));

        out
    }

    fn summary(&self, event: &Event, width: usize) -> Vec<StyledLine> {
        let reset = self.palette.reset();
        let mut lines = Vec::new();

        let id = format!(" ({})", event.id);
        let mut title = StyledLine::new();
        title
            .push_styled(
                self.palette.title(self.context.is_selected(event.id)),
                &event.title,
                reset,
            )
            .push(&id);
        lines.extend(fit(title, &format!("{}{id}", event.title), width));

        let subtitle = format!("--- {}", event.subtitle);
        lines.extend(fit(plain(&subtitle), &subtitle, width));

        let place = format!(" // {} // {}", event.room, event.language);
        let mut origin = StyledLine::new();
        origin
            .push_styled(self.palette.track(&event.track), &event.track, reset)
            .push(&place);
        lines.extend(fit(origin, &format!("{}{place}", event.track), width));

        let when = format!(
            "{} [{} <{}> {}]",
            event.start.format("%a %Y-%m-%d"),
            event.start.format("%H:%M"),
            format_duration(event.duration),
            event.end().format("%H:%M"),
        );
        lines.extend(fit(plain(&when), &when, width));

        let persons = event.persons.join(", ");
        lines.extend(fit(plain(&persons), &persons, width));

        lines
    }

    fn section(&self, label: &str, body: &str, width: usize) -> Vec<StyledLine> {
        let text = format!(
            "{}{label}{} {}",
            self.palette.code(Color::Grey),
            self.palette.reset(),
            strip_markup(body)
        );

        text.split('\n')
            .flat_map(|paragraph| wrap(paragraph, width))
            .map(|wrapped| plain(&wrapped))
            .collect()
    }
}

fn plain(text: &str) -> StyledLine {
    let mut line = StyledLine::new();
    line.push(text);
    line
}

/// Keeps `line` if it fits into `width`, otherwise wraps its unstyled `text`.
fn fit(line: StyledLine, text: &str, width: usize) -> Vec<StyledLine> {
    if line.visible_width() <= width {
        return vec![line];
    }

    wrap(text, width).iter().map(|wrapped| plain(wrapped)).collect()
}

/// `HH:MM` rendering of a span.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
