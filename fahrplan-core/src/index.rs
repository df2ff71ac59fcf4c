use std::collections::{BTreeMap, HashMap};

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

use crate::parser::{flatten_feed, Feed};
use crate::{Conference, Error, Event, Result};

/// Read-only lookup structures over every event of a conference.
///
/// All secondary indices hold positions into `events`, which is sorted by
/// start time, so every lookup yields events in chronological order with
/// ties kept in feed order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    conference: Conference,
    offset: Option<FixedOffset>,
    events: Vec<Event>,
    by_id: HashMap<u32, usize>,
    by_day: BTreeMap<NaiveDate, Vec<usize>>,
    by_room: BTreeMap<String, Vec<usize>>,
    by_track: BTreeMap<String, Vec<usize>>,
    by_speaker: BTreeMap<String, Vec<usize>>,
    room_order: Vec<String>,
}

impl ScheduleIndex {
    pub fn from_json<S: AsRef<str>>(s: S) -> Result<Self> {
        let feed: Feed = serde_json::from_str(s.as_ref())?;
        Self::from_feed(feed)
    }

    pub fn from_feed(feed: Feed) -> Result<Self> {
        let (conference, events) = flatten_feed(feed)?;
        Self::from_events(conference, events)
    }

    /// Builds the index from events in feed order.
    ///
    /// Duplicate ids are rejected, as are negative durations.
    pub fn from_events(conference: Conference, mut events: Vec<Event>) -> Result<Self> {
        let mut room_order: Vec<String> = Vec::new();

        for event in &events {
            let ends = event.start.checked_add_signed(event.duration).is_some();
            if event.duration < chrono::Duration::zero() || !ends {
                return Err(Error::MalformedEvent {
                    id: event.id,
                    field: "duration",
                    value: event.duration.to_string(),
                });
            }

            if !room_order.contains(&event.room) {
                room_order.push(event.room.clone());
            }
        }

        // stable, ties stay in feed order
        events.sort_by_key(|event| event.start);

        let mut index = ScheduleIndex {
            conference,
            offset: events.first().map(|event| *event.start.offset()),
            room_order,
            ..Default::default()
        };

        for (position, event) in events.iter().enumerate() {
            if index.by_id.insert(event.id, position).is_some() {
                return Err(Error::DuplicateId(event.id));
            }

            index.by_day.entry(event.date()).or_default().push(position);
            index
                .by_room
                .entry(event.room.clone())
                .or_default()
                .push(position);
            index
                .by_track
                .entry(event.track.clone())
                .or_default()
                .push(position);

            for person in &event.persons {
                let positions = index.by_speaker.entry(person.clone()).or_default();
                if positions.last() != Some(&position) {
                    positions.push(position);
                }
            }
        }

        index.events = events;

        log::debug!(
            "indexed {} events over {} days in {} rooms",
            index.events.len(),
            index.by_day.len(),
            index.by_room.len()
        );

        Ok(index)
    }

    pub fn conference(&self) -> &Conference {
        &self.conference
    }

    /// Offset of the feed's timestamps, UTC+1 when the schedule is empty.
    pub fn offset(&self) -> FixedOffset {
        self.offset
            .or_else(|| FixedOffset::east_opt(3600))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Event> {
        self.by_id.get(&id).map(|&position| &self.events[position])
    }

    pub fn day(&self, date: NaiveDate) -> Vec<&Event> {
        self.resolve(self.by_day.get(&date))
    }

    pub fn room(&self, name: &str) -> Vec<&Event> {
        self.resolve(self.by_room.get(name))
    }

    pub fn track(&self, name: &str) -> Vec<&Event> {
        self.resolve(self.by_track.get(name))
    }

    pub fn speaker(&self, name: &str) -> Vec<&Event> {
        self.resolve(self.by_speaker.get(name))
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.by_day.keys().copied().collect()
    }

    pub fn rooms(&self) -> Vec<&str> {
        self.by_room.keys().map(String::as_str).collect()
    }

    /// Rooms in the order the feed first mentions them.
    pub fn room_order(&self) -> &[String] {
        &self.room_order
    }

    pub fn tracks(&self) -> Vec<&str> {
        self.by_track.keys().map(String::as_str).collect()
    }

    pub fn speakers(&self) -> Vec<&str> {
        self.by_speaker.keys().map(String::as_str).collect()
    }

    pub(crate) fn day_positions(&self, date: NaiveDate) -> &[usize] {
        self.by_day.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn speaker_positions(&self, name: &str) -> &[usize] {
        self.by_speaker
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&Event> {
        positions
            .map(|positions| positions.iter().map(|&p| &self.events[p]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Duration;

    use super::*;
    use crate::testing::{event, event_on};

    fn sample() -> ScheduleIndex {
        let events = vec![
            event(1, "Saal 2", "11:00", 60).with_track("Art").with_persons(&["Bob"]),
            event(2, "Saal 1", "10:00", 30).with_track("Security").with_persons(&["Alice", "Bob"]),
            event(3, "Saal 1", "11:00", 30).with_track("Art").with_persons(&["Carol", "Carol"]),
            event_on(4, "Saal G", "2016-12-28", "10:00", 30),
        ];
        ScheduleIndex::from_events(Conference::default(), events).unwrap()
    }

    #[test]
    fn sorts_events_stably_by_start() {
        let index = sample();
        let ids: Vec<_> = index.events().iter().map(|event| event.id).collect();

        assert_eq!(ids, [2, 1, 3, 4]);
        assert!(index
            .events()
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start));
    }

    #[test]
    fn every_event_ends_after_it_starts() {
        assert!(sample().events().iter().all(|event| event.start <= event.end()));
    }

    #[test]
    fn id_lookup_matches_event_list() {
        let index = sample();
        let listed: HashSet<_> = index.events().iter().map(|event| event.id).collect();
        let looked_up: HashSet<_> = listed
            .iter()
            .filter_map(|&id| index.get(id))
            .map(|event| event.id)
            .collect();

        assert_eq!(listed, looked_up);
        assert!(index.get(99).is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let events = vec![event(5, "Saal 1", "10:00", 30), event(5, "Saal 2", "11:00", 30)];

        assert!(matches!(
            ScheduleIndex::from_events(Conference::default(), events),
            Err(Error::DuplicateId(5))
        ));
    }

    #[test]
    fn rejects_negative_duration() {
        let mut broken = event(6, "Saal 1", "10:00", 30);
        broken.duration = Duration::minutes(-5);

        assert!(matches!(
            ScheduleIndex::from_events(Conference::default(), vec![broken]),
            Err(Error::MalformedEvent { id: 6, .. })
        ));
    }

    #[test]
    fn rejects_end_out_of_range() {
        let mut endless = event(7, "Saal 1", "10:00", 30);
        endless.duration = Duration::MAX;

        assert!(matches!(
            ScheduleIndex::from_events(Conference::default(), vec![endless]),
            Err(Error::MalformedEvent { id: 7, field: "duration", .. })
        ));
    }

    #[test]
    fn key_listings_are_sorted_and_unique() {
        let index = sample();

        assert_eq!(index.rooms(), ["Saal 1", "Saal 2", "Saal G"]);
        assert_eq!(index.room_order(), ["Saal 2", "Saal 1", "Saal G"]);
        assert_eq!(index.tracks(), ["", "Art", "Security"]);
        assert_eq!(index.speakers(), ["Alice", "Bob", "Carol"]);
        assert_eq!(index.days().len(), 2);
        assert_eq!(index.rooms(), index.rooms());
    }

    #[test]
    fn speakers_index_every_event_once() {
        let index = sample();

        let bob: Vec<_> = index.speaker("Bob").iter().map(|event| event.id).collect();
        assert_eq!(bob, [2, 1]);

        let carol: Vec<_> = index.speaker("Carol").iter().map(|event| event.id).collect();
        assert_eq!(carol, [3]);
        assert_eq!(index.get(3).unwrap().persons.len(), 2);
    }

    #[test]
    fn unknown_keys_yield_nothing() {
        let index = sample();

        assert!(index.room("Saal 9").is_empty());
        assert!(index.track("Cooking").is_empty());
        assert!(index.speaker("Nobody").is_empty());
    }

    #[test]
    fn empty_index_is_valid() {
        let index = ScheduleIndex::default();

        assert!(index.is_empty());
        assert!(index.days().is_empty());
        assert_eq!(index.offset(), FixedOffset::east_opt(3600).unwrap());
    }
}
