use std::env;

pub const FALLBACK_WIDTH: u16 = 80;

/// Columns of the attached terminal, falling back to `$COLUMNS` and then
/// to a fixed width.
pub fn width() -> u16 {
    match crossterm::terminal::size() {
        Ok((columns, _)) if columns > 0 => columns,
        Ok(_) => fallback_width(env::var("COLUMNS").ok()),
        Err(err) => {
            log::debug!("Terminal size unavailable: {err}");
            fallback_width(env::var("COLUMNS").ok())
        }
    }
}

fn fallback_width(columns: Option<String>) -> u16 {
    columns
        .and_then(|columns| columns.trim().parse::<u16>().ok())
        .filter(|&columns| columns > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Width available for output, keeping the last column free so lines
/// never wrap on terminals that break at the edge.
pub fn usable_width() -> usize {
    usize::from(width().saturating_sub(1))
}
