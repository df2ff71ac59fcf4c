use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::Serialize;

/// Conference-wide metadata carried alongside the indexed events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conference {
    pub title: String,
    pub acronym: String,
    pub version: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// One scheduled talk.
///
/// `abstract_text` and `description` keep the markup of the feed, it is only
/// stripped when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    pub room: String,
    pub track: String,
    pub language: String,
    pub slug: String,
    pub start: DateTime<FixedOffset>,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    pub persons: Vec<String>,
    pub abstract_text: String,
    pub description: String,
}

fn serialize_duration<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let minutes = duration.num_minutes();
    let formatted = format!("{:02}:{:02}", minutes / 60, minutes % 60);
    serializer.serialize_str(&formatted)
}

impl Event {
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.start + self.duration
    }

    /// Calendar date of the start, in the offset of the feed.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn has_speaker(&self, name: &str) -> bool {
        self.persons.iter().any(|person| person == name)
    }
}
