use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::{Event, ScheduleIndex};

/// Restricts query results to a set of rooms and tracks.
///
/// An empty list does not restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub rooms: Vec<String>,
    pub tracks: Vec<String>,
}

impl Filter {
    pub fn new(rooms: Vec<String>, tracks: Vec<String>) -> Self {
        Self { rooms, tracks }
    }

    pub fn matches(&self, event: &Event) -> bool {
        (self.rooms.is_empty() || self.rooms.contains(&event.room))
            && (self.tracks.is_empty() || self.tracks.contains(&event.track))
    }
}

/// Distance past the earliest ending event at which [`ScheduleIndex::next`] looks.
pub fn lookahead() -> Duration {
    Duration::minutes(15)
}

impl ScheduleIndex {
    /// Events running at `time`, only looking at the calendar day of `time`.
    pub fn at(&self, time: DateTime<FixedOffset>, filter: &Filter) -> Vec<&Event> {
        let date = time.with_timezone(&self.offset()).date_naive();

        self.day_positions(date)
            .iter()
            .map(|&position| &self.events()[position])
            .filter(|event| event.start <= time && time <= event.end())
            .filter(|event| filter.matches(event))
            .collect()
    }

    /// Events coming up once the earliest currently running event is over.
    ///
    /// Events starting before that point are left out, even if they are
    /// still running there.
    pub fn next(&self, time: DateTime<FixedOffset>, filter: &Filter) -> Vec<&Event> {
        let Some(endpoint) = self
            .at(time, &Filter::default())
            .iter()
            .map(|event| event.end())
            .min()
        else {
            return Vec::new();
        };

        let probe = endpoint + lookahead();

        self.at(probe, filter)
            .into_iter()
            .filter(|event| event.start >= probe)
            .collect()
    }

    /// Events overlapping the half-open interval `[start, end)`.
    pub fn between(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        filter: &Filter,
    ) -> Vec<&Event> {
        self.events()
            .iter()
            .filter(|event| event.start < end && event.end() > start)
            .filter(|event| filter.matches(event))
            .collect()
    }

    /// Events featuring every one of `names`.
    pub fn by_speakers_all<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Event> {
        let Some((first, rest)) = names.split_first() else {
            return self.events().iter().collect();
        };

        self.speaker_positions(first.as_ref())
            .iter()
            .map(|&position| &self.events()[position])
            .filter(|event| rest.iter().all(|name| event.has_speaker(name.as_ref())))
            .collect()
    }

    pub fn day_filtered(&self, date: NaiveDate, filter: &Filter) -> Vec<&Event> {
        self.day(date)
            .into_iter()
            .filter(|event| filter.matches(event))
            .collect()
    }
}
