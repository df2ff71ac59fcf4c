use std::collections::BTreeSet;

use chrono::Duration;

/// Characters used for rules and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl Glyphs {
    pub const UNICODE: Glyphs = Glyphs {
        horizontal: '\u{2500}',
        vertical: '\u{2502}',
        top_left: '\u{250C}',
        top_right: '\u{2510}',
        bottom_left: '\u{2514}',
        bottom_right: '\u{2518}',
    };

    pub const ASCII: Glyphs = Glyphs {
        horizontal: '-',
        vertical: '|',
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
    };

    pub fn rule(&self, width: usize) -> String {
        std::iter::repeat(self.horizontal).take(width).collect()
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Glyphs::UNICODE
    }
}

/// Per-invocation rendering settings. Renderers only ever read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub width: usize,
    pub step: Duration,
    pub glyphs: Glyphs,
    pub selected: BTreeSet<u32>,
}

impl RenderContext {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            step: default_step(),
            glyphs: Glyphs::default(),
            selected: BTreeSet::new(),
        }
    }

    /// Sets the grid granularity. Non-positive steps keep the default.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = if step > Duration::zero() {
            step
        } else {
            default_step()
        };
        self
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn with_selected(mut self, selected: BTreeSet<u32>) -> Self {
        self.selected = selected;
        self
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }
}

pub fn default_step() -> Duration {
    Duration::minutes(15)
}
