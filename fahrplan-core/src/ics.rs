use chrono::{DateTime, FixedOffset, Utc};
use ics::{
    escape_text,
    properties::{Categories, Description, DtEnd, DtStart, Location, Summary},
};

use crate::text::strip_markup;
use crate::Event;

fn utc_stamp(time: DateTime<FixedOffset>) -> String {
    time.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Calendar named after the conference `acronym`, one entry per event and
/// timestamps in UTC.
#[must_use]
pub fn to_ics<'a>(acronym: &str, events: &[&'a Event]) -> ics::ICalendar<'a> {
    let mut icalendar = ics::ICalendar::new("2.0", acronym.to_string());

    for &event in events {
        icalendar.add_event(event.to_ics(acronym));
    }

    icalendar
}

impl Event {
    /// Entry identified by the slug, or by `acronym` for events without one.
    #[must_use]
    pub fn to_ics(&self, acronym: &str) -> ics::Event<'_> {
        let start = utc_stamp(self.start);
        let end = utc_stamp(self.end());

        let id = if self.slug.is_empty() {
            format!("{}@{acronym}", self.id)
        } else {
            format!("{}@{}", self.id, self.slug)
        };

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(escape_text(self.title.as_str())));
        ics_event.push(Location::new(escape_text(self.room.as_str())));

        if !self.track.is_empty() {
            ics_event.push(Categories::new(escape_text(self.track.as_str())));
        }

        let mut description = self.persons.join(", ");
        let summary = strip_markup(&self.abstract_text);
        if !summary.trim().is_empty() {
            if !description.is_empty() {
                description.push_str("\n\n");
            }
            description.push_str(summary.trim());
        }

        if !description.is_empty() {
            ics_event.push(Description::new(escape_text(description)));
        }

        ics_event
    }
}
