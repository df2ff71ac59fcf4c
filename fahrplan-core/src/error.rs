use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning a feed into a [`ScheduleIndex`](crate::ScheduleIndex).
#[derive(Debug, Error)]
pub enum Error {
    /// The document is not valid JSON or misses required fields.
    #[error("failed to decode schedule feed: {0}")]
    Feed(#[from] serde_json::Error),

    /// A date, time or duration field of an event could not be used.
    #[error("event {id} has malformed {field} `{value}`")]
    MalformedEvent {
        id: u32,
        field: &'static str,
        value: String,
    },

    /// Two events share an id; the index refuses to pick one of them.
    #[error("event id {0} appears more than once")]
    DuplicateId(u32),
}
