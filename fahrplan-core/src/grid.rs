use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, Timelike};

use crate::text::{pad_cell, truncate, wrap, StyledLine};
use crate::{default_step, Event, Palette, RenderContext};

/// Columns taken by the time label in front of every row, bar included.
pub const PREFIX_WIDTH: usize = 6;

type Rows = BTreeMap<DateTime<FixedOffset>, Vec<Option<String>>>;

/// Lays out events of several rooms side by side on one shared timeline.
pub struct GridRenderer<'a> {
    context: &'a RenderContext,
    palette: &'a Palette,
}

impl<'a> GridRenderer<'a> {
    pub fn new(context: &'a RenderContext, palette: &'a Palette) -> Self {
        Self { context, palette }
    }

    /// Grid granularity. Steps that would not advance fall back to the default.
    fn step(&self) -> Duration {
        if self.context.step > Duration::zero() {
            self.context.step
        } else {
            default_step()
        }
    }

    /// Width of every room column; left over columns stay unused.
    pub fn column_width(&self, room_count: usize) -> usize {
        if room_count == 0 {
            return 0;
        }

        self.context.width.saturating_sub(PREFIX_WIDTH + 1) / room_count
    }

    /// Renders `events` into one column per entry of `rooms`.
    ///
    /// Events in rooms that are not listed are ignored, but still stretch
    /// the time range of the grid.
    pub fn render<S: AsRef<str>>(&self, events: &[&Event], rooms: &[S]) -> String {
        if rooms.is_empty() {
            return String::new();
        }

        let width = self.column_width(rooms.len());
        let mut lines = vec![self.header(rooms, width), self.separator(rooms.len(), width)];

        let mut rows = Rows::new();

        for (column, room) in rooms.iter().enumerate() {
            self.place_room(&mut rows, events, room.as_ref(), column, rooms.len(), width);
        }

        self.add_ticks(&mut rows, events, rooms.len());

        log::trace!("grid with {} rows over {} rooms", rows.len(), rooms.len());

        for (timestamp, cells) in rows {
            lines.push(self.row(timestamp, cells, width));
        }

        let reset = self.palette.reset();
        lines
            .into_iter()
            .map(|line| format!("{line}{reset}\n"))
            .collect()
    }

    fn place_room(
        &self,
        rows: &mut Rows,
        events: &[&Event],
        room: &str,
        column: usize,
        columns: usize,
        width: usize,
    ) {
        let step = self.step();

        let mut room_events: Vec<&Event> = events
            .iter()
            .copied()
            .filter(|event| event.room == room)
            .collect();
        room_events.sort_by_key(|event| event.start);

        for (idx, event) in room_events.iter().enumerate() {
            let upcoming = room_events.get(idx + 1).map(|upcoming| upcoming.start);
            let mut end = event.end();

            // keep the rule line from running into the next title
            if upcoming == Some(end) {
                end = end - step;
            }

            let mut block = self.display_block(event, width).into_iter();
            let mut current = event.start;

            while current <= end {
                let cell = block.next().unwrap_or_default();
                rows.entry(current).or_insert_with(|| vec![None; columns])[column] = Some(cell);
                current = current + step;
            }

            // lines beyond the duration spill over until the next event begins
            for cell in block {
                if upcoming.is_some_and(|next| current >= next) {
                    break;
                }
                rows.entry(current).or_insert_with(|| vec![None; columns])[column] = Some(cell);
                current = current + step;
            }
        }
    }

    fn add_ticks(&self, rows: &mut Rows, events: &[&Event], columns: usize) {
        let first = events.iter().map(|event| event.start).min();
        let last = events.iter().map(|event| event.end()).max();

        let (Some(mut current), Some(last)) = (first, last) else {
            return;
        };

        while current <= last {
            rows.entry(current).or_insert_with(|| vec![None; columns]);
            current = current + self.step();
        }
    }

    /// Lines shown for one event, top to bottom.
    pub fn display_block(&self, event: &Event, width: usize) -> Vec<String> {
        let reset = self.palette.reset();
        let title_style = self.palette.title(self.context.is_selected(event.id));

        let mut block: Vec<String> = wrap(&format!("{} ({})", event.title, event.id), width)
            .iter()
            .map(|line| styled_cell(title_style, line, reset, width))
            .collect();

        block.push(styled_cell(
            self.palette.track(&event.track),
            truncate(&event.track, width),
            reset,
            width,
        ));

        block.extend(wrap(&event.persons.join(", "), width));

        let rows = rows_spanned(event.duration, self.step());
        if block.len() < rows {
            block.resize(rows, String::new());
        }

        block.push(self.context.glyphs.rule(width));
        block
    }

    fn header<S: AsRef<str>>(&self, rooms: &[S], width: usize) -> String {
        let vertical = self.context.glyphs.vertical;
        let mut line = format!("{:>5}{vertical}", "");

        for room in rooms {
            line.push_str(&center(truncate(room.as_ref(), width), width));
            line.push(vertical);
        }

        line
    }

    fn separator(&self, columns: usize, width: usize) -> String {
        let glyphs = &self.context.glyphs;
        let mut line = format!("{}{}", glyphs.rule(PREFIX_WIDTH - 1), glyphs.vertical);

        for _ in 0..columns {
            line.push_str(&glyphs.rule(width));
            line.push(glyphs.vertical);
        }

        line
    }

    fn row(&self, timestamp: DateTime<FixedOffset>, cells: Vec<Option<String>>, width: usize) -> String {
        let vertical = self.context.glyphs.vertical;
        let mut line = format!("{:>5}{vertical}", time_label(timestamp, self.step()));

        for cell in cells {
            line.push_str(&pad_cell(cell.as_deref().unwrap_or_default(), width));
            line.push(vertical);
        }

        line
    }
}

fn styled_cell(style: &str, text: &str, reset: &str, width: usize) -> String {
    let mut line = StyledLine::new();
    line.push_cell(style, text, reset, width);
    line.into_string()
}

fn center(text: &str, width: usize) -> String {
    let mut line = StyledLine::new();
    let left = width.saturating_sub(crate::text::visible_width(text)) / 2;
    line.pad_to(left).push(text).pad_to(width);
    line.into_string()
}

/// Number of grid rows an event of `duration` covers.
pub fn rows_spanned(duration: Duration, step: Duration) -> usize {
    let step = step.num_seconds();
    if step <= 0 {
        return 0;
    }

    usize::try_from(duration.num_seconds() / step).unwrap_or(0)
}

/// Full hours, plus a few quarter marks depending on how dense the grid is.
pub fn time_label(timestamp: DateTime<FixedOffset>, step: Duration) -> String {
    let visible: &[u32] = if step >= Duration::minutes(15) {
        &[30]
    } else {
        &[15, 30, 45]
    };

    match timestamp.minute() {
        0 => timestamp.format("%H:%M").to_string(),
        minute if visible.contains(&minute) => timestamp.format(":%M").to_string(),
        _ => String::new(),
    }
}
