//! Event fixtures shared by the unit tests.

use chrono::{DateTime, Duration, FixedOffset};

use crate::Event;

pub const DAY: &str = "2016-12-27";

pub fn at(date: &str, time: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(&format!("{date}T{time}:00+01:00")).unwrap()
}

pub fn time(time: &str) -> DateTime<FixedOffset> {
    at(DAY, time)
}

pub fn event(id: u32, room: &str, start: &str, minutes: i64) -> Event {
    event_on(id, room, DAY, start, minutes)
}

pub fn event_on(id: u32, room: &str, date: &str, start: &str, minutes: i64) -> Event {
    Event {
        id,
        title: format!("Talk {id}"),
        subtitle: String::new(),
        room: room.to_string(),
        track: String::new(),
        language: "en".to_string(),
        slug: format!("talk-{id}"),
        start: at(date, start),
        duration: Duration::minutes(minutes),
        persons: Vec::new(),
        abstract_text: String::new(),
        description: String::new(),
    }
}

impl Event {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_track(mut self, track: &str) -> Self {
        self.track = track.to_string();
        self
    }

    pub fn with_persons(mut self, persons: &[&str]) -> Self {
        self.persons = persons.iter().map(|person| person.to_string()).collect();
        self
    }
}
