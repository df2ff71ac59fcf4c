use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::{Conference, Error, Event, Result};

/// Top level of the JSON schedule document.
#[derive(Debug, Deserialize)]
pub struct Feed {
    pub schedule: ScheduleRecord,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRecord {
    #[serde(default, deserialize_with = "string_or_null")]
    pub version: String,
    pub conference: ConferenceRecord,
}

#[derive(Debug, Deserialize)]
pub struct ConferenceRecord {
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub acronym: String,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub days: Vec<DayRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub rooms: Rooms,
}

/// Rooms of one day, in the order the feed lists them.
#[derive(Debug, Default)]
pub struct Rooms(pub Vec<(String, Vec<EventRecord>)>);

#[derive(Debug, Deserialize)]
pub struct EventRecord {
    pub id: u32,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub track: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub language: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub slug: String,
    pub date: String,
    pub start: String,
    pub duration: String,
    #[serde(default)]
    pub persons: Vec<PersonRecord>,
    #[serde(default, rename = "abstract", deserialize_with = "string_or_null")]
    pub abstract_text: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct PersonRecord {
    #[serde(alias = "name")]
    pub public_name: String,
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl<'de> Deserialize<'de> for Rooms {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RoomsVisitor;

        impl<'de> Visitor<'de> for RoomsVisitor {
            type Value = Rooms;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of room names to event lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Rooms, A::Error> {
                let mut rooms = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((room, events)) = map.next_entry::<String, Vec<EventRecord>>()? {
                    rooms.push((room, events));
                }
                Ok(Rooms(rooms))
            }
        }

        deserializer.deserialize_map(RoomsVisitor)
    }
}

/// Decodes a feed document and flattens it into events, in feed order.
pub fn parse_feed<S: AsRef<str>>(s: S) -> Result<(Conference, Vec<Event>)> {
    let feed: Feed = serde_json::from_str(s.as_ref())?;
    flatten_feed(feed)
}

pub fn flatten_feed(feed: Feed) -> Result<(Conference, Vec<Event>)> {
    let ScheduleRecord {
        version,
        conference,
    } = feed.schedule;

    let mut events = Vec::new();

    for day in conference.days {
        let mut day_events = parse_day(day)?;
        events.append(&mut day_events);
    }

    let conference = Conference {
        title: conference.title,
        acronym: conference.acronym,
        version,
        start: conference.start,
        end: conference.end,
    };

    Ok((conference, events))
}

fn parse_day(day: DayRecord) -> Result<Vec<Event>> {
    let mut events = Vec::new();

    for (room, records) in day.rooms.0 {
        for record in records {
            events.push(parse_event_details(record, &room)?);
        }
    }

    Ok(events)
}

fn parse_event_details(record: EventRecord, room: &str) -> Result<Event> {
    let id = record.id;
    let malformed = |field: &'static str, value: &str| Error::MalformedEvent {
        id,
        field,
        value: value.to_string(),
    };

    let start = DateTime::parse_from_rfc3339(&record.date)
        .map_err(|_| malformed("date", &record.date))?;

    NaiveTime::parse_from_str(&record.start, "%H:%M")
        .map_err(|_| malformed("start", &record.start))?;

    let duration =
        parse_duration(&record.duration).ok_or_else(|| malformed("duration", &record.duration))?;

    // the end has to be a point in time as well
    start
        .checked_add_signed(duration)
        .ok_or_else(|| malformed("duration", &record.duration))?;

    Ok(Event {
        id,
        title: record.title,
        subtitle: record.subtitle,
        room: room.to_string(),
        track: record.track,
        language: record.language,
        slug: record.slug,
        start,
        duration,
        persons: record
            .persons
            .into_iter()
            .map(|person| person.public_name)
            .collect(),
        abstract_text: record.abstract_text,
        description: record.description,
    })
}

/// Parses `HH:MM` into a span. Hours may exceed a day, signs are rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let (hours, minutes) = raw.trim().split_once(':')?;

    if !is_digits(hours) || !is_digits(minutes) {
        return None;
    }

    let hours = hours.parse::<i64>().ok()?;
    let minutes = minutes.parse::<i64>().ok()?;

    if minutes >= 60 {
        return None;
    }

    Duration::try_minutes(hours.checked_mul(60)?.checked_add(minutes)?)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "schedule": {
            "version": "1.0",
            "conference": {
                "title": "Test Congress",
                "acronym": "tc",
                "start": "2016-12-27",
                "end": "2016-12-27",
                "days": [{
                    "date": "2016-12-27",
                    "rooms": {
                        "Saal 2": [{
                            "id": 7, "title": "Second", "subtitle": null, "track": "Art",
                            "language": "de", "slug": "second",
                            "date": "2016-12-27T12:00:00+01:00", "start": "12:00",
                            "duration": "00:30", "persons": [{"public_name": "Bob"}],
                            "abstract": null, "description": "<p>text</p>"
                        }],
                        "Saal 1": [{
                            "id": 3, "title": "First", "subtitle": "sub", "track": "Security",
                            "language": "en", "slug": "first",
                            "date": "2016-12-27T11:00:00+01:00", "start": "11:00",
                            "duration": "01:00",
                            "persons": [{"public_name": "Alice"}, {"public_name": "Bob"}],
                            "abstract": "abs", "description": ""
                        }]
                    }
                }]
            }
        }
    }"#;

    #[test]
    fn keeps_room_order_of_feed() {
        let (conference, events) = parse_feed(FEED).unwrap();

        assert_eq!(conference.acronym, "tc");
        assert_eq!(conference.version, "1.0");

        let rooms: Vec<_> = events.iter().map(|event| event.room.as_str()).collect();
        assert_eq!(rooms, ["Saal 2", "Saal 1"]);
    }

    #[test]
    fn decodes_event_fields() {
        let (_, events) = parse_feed(FEED).unwrap();
        let first = &events[1];

        assert_eq!(first.id, 3);
        assert_eq!(first.persons, ["Alice", "Bob"]);
        assert_eq!(first.duration, Duration::minutes(60));
        assert_eq!(first.end().format("%H:%M").to_string(), "12:00");
        assert_eq!(events[0].subtitle, "");
        assert_eq!(events[0].description, "<p>text</p>");
    }

    #[test]
    fn rejects_malformed_date() {
        let feed = FEED.replace("2016-12-27T12:00:00+01:00", "tomorrow");

        assert!(matches!(
            parse_feed(feed),
            Err(Error::MalformedEvent { id: 7, field: "date", .. })
        ));
    }

    #[test]
    fn rejects_negative_duration() {
        let feed = FEED.replace("\"00:30\"", "\"-00:30\"");

        assert!(matches!(
            parse_feed(feed),
            Err(Error::MalformedEvent { id: 7, field: "duration", .. })
        ));
    }

    #[test]
    fn rejects_duration_past_the_calendar() {
        let feed = FEED.replace("\"00:30\"", "\"9999999999:00\"");

        assert!(parse_duration("9999999999:00").is_some());
        assert!(matches!(
            parse_feed(feed),
            Err(Error::MalformedEvent { id: 7, field: "duration", .. })
        ));
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("00:45"), Some(Duration::minutes(45)));
        assert_eq!(parse_duration("26:00"), Some(Duration::hours(26)));
        assert_eq!(parse_duration("1:75"), None);
        assert_eq!(parse_duration("-1:00"), None);
        assert_eq!(parse_duration("ab"), None);
    }
}
