//! Conference schedule indexing and fixed-width terminal rendering.
//!
//! A [`ScheduleIndex`] is built once from a JSON feed and answers time-based
//! queries. Results are rendered either as a grid with one column per room
//! ([`GridRenderer`]) or as one bordered card per event ([`CardRenderer`]).

mod card;
mod context;
mod error;
mod grid;
mod index;
mod palette;
mod parser;
mod query;
mod structs;
pub mod text;

#[cfg(feature = "ics")]
mod ics;

#[cfg(test)]
mod testing;

pub use card::{format_duration, CardRenderer};
pub use context::{default_step, Glyphs, RenderContext};
pub use error::{Error, Result};
pub use grid::{rows_spanned, time_label, GridRenderer, PREFIX_WIDTH};
pub use index::ScheduleIndex;
pub use palette::{Color, Palette};
pub use parser::{parse_duration, parse_feed, Feed};
pub use query::{lookahead, Filter};
pub use structs::{Conference, Event};

#[cfg(feature = "ics")]
pub use crate::ics::to_ics;
