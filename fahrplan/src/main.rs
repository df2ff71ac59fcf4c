mod cli;
mod fetch;
mod selection;
mod terminal;

use std::env;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use fahrplan_core::{
    to_ics, CardRenderer, Event, Filter, Glyphs, GridRenderer, Palette, RenderContext,
    ScheduleIndex,
};

use cli::{Args, Mode, Output};

fn setup_logging() {
    let filters = env::var("LOG").unwrap_or_else(|_| "fahrplan=info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    if !args.select.is_empty() {
        if let Err(err) = selection::append(&args.select_file, &args.select).await {
            log::warn!(
                "Failed to store selection in {}: {err}",
                args.select_file.display()
            );
        }
    }

    let selected = selection::read(&args.select_file).await;
    let index = fetch::load_schedule(&args.source).await;

    if args.verbose {
        print!("{}", summary(&index));
    }

    let now = Utc::now().with_timezone(&index.offset());
    let time = cli::query_time(now, &args.date).context("The given date does not exist")?;

    let mut events = select_events(&index, &args, time);
    if args.selected_only {
        events.retain(|event| selected.contains(&event.id));
    }

    log::debug!("Showing {} events for {time}", events.len());

    let context = RenderContext::new(terminal::usable_width())
        .with_step(args.interval)
        .with_glyphs(if args.ascii {
            Glyphs::ASCII
        } else {
            Glyphs::UNICODE
        })
        .with_selected(selected);

    let palette = if args.color {
        Palette::new(index.tracks())
    } else {
        Palette::plain()
    };

    match args.output {
        Output::Grid => {
            let rooms = if args.rooms.is_empty() {
                index.room_order().to_vec()
            } else {
                args.rooms.clone()
            };
            print!("{}", GridRenderer::new(&context, &palette).render(&events, &rooms));
        }
        Output::Cards { short } => {
            let cards = CardRenderer::new(&context, &palette);
            for event in &events {
                print!("{}", cards.render(event, short));
            }
        }
        Output::Ics => {
            print!("{}", to_ics(&index.conference().acronym, &events));
        }
        Output::Json => {
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }

    Ok(())
}

/// Picks events by the first of: id, speakers, mode, time window.
fn select_events<'a>(
    index: &'a ScheduleIndex,
    args: &Args,
    time: DateTime<FixedOffset>,
) -> Vec<&'a Event> {
    let filter = Filter::new(args.rooms.clone(), args.tracks.clone());

    if let Mode::One(id) = args.mode {
        let event = index.get(id);
        if event.is_none() {
            log::warn!("There is no event with id {id}");
        }
        return event.into_iter().collect();
    }

    if !args.speakers.is_empty() {
        return index
            .by_speakers_all(&args.speakers)
            .into_iter()
            .filter(|event| filter.matches(event))
            .collect();
    }

    match args.mode {
        Mode::Next => index.next(time, &filter),
        Mode::Day => index.day_filtered(time.date_naive(), &filter),
        Mode::All => index
            .events()
            .iter()
            .filter(|event| filter.matches(event))
            .collect(),
        Mode::Now | Mode::One(_) => match args.window {
            Some(window) => {
                let until = time.checked_add_signed(window).unwrap_or(time);
                index.between(time, until, &filter)
            }
            None => index.at(time, &filter),
        },
    }
}

fn summary(index: &ScheduleIndex) -> String {
    let conference = index.conference();
    let days: Vec<String> = index
        .days()
        .iter()
        .map(|day| day.format("%a %Y-%m-%d").to_string())
        .collect();

    format!(
        "[{}] {} ({})\n days: {}\n rooms: {}\n tracks: {}\n {:3} events\n {:3} speakers\n",
        conference.acronym,
        conference.title,
        conference.version,
        days.join(", "),
        index.room_order().join(", "),
        index.tracks().join(", "),
        index.len(),
        index.speakers().len(),
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Duration;

    use super::*;
    use cli::Source;

    const FEED: &str = r#"{"schedule": {"version": "v1", "conference": {"title": "Test", "acronym": "tc",
        "days": [{"date": "2016-12-27", "rooms": {
            "Saal 1": [
                {"id": 1, "title": "One", "track": "Art", "date": "2016-12-27T11:00:00+01:00",
                 "start": "11:00", "duration": "00:30", "persons": [{"public_name": "Alice"}]},
                {"id": 2, "title": "Two", "track": "Art", "date": "2016-12-27T11:45:00+01:00",
                 "start": "11:45", "duration": "00:30", "persons": [{"public_name": "Bob"}]}
            ],
            "Saal 2": [
                {"id": 3, "title": "Three", "track": "CCC", "date": "2016-12-27T11:00:00+01:00",
                 "start": "11:00", "duration": "01:00",
                 "persons": [{"public_name": "Alice"}, {"public_name": "Bob"}]}
            ]}}]}}}"#;

    fn args() -> Args {
        Args {
            ascii: false,
            color: true,
            verbose: false,
            interval: Duration::minutes(15),
            output: Output::Grid,
            select: Vec::new(),
            select_file: PathBuf::from(cli::SELECTED),
            selected_only: false,
            rooms: Vec::new(),
            tracks: Vec::new(),
            speakers: Vec::new(),
            date: Vec::new(),
            window: None,
            mode: Mode::Now,
            source: Source {
                url: String::new(),
                cache: PathBuf::new(),
                offline: true,
            },
        }
    }

    fn ids(events: Vec<&Event>) -> Vec<u32> {
        events.iter().map(|event| event.id).collect()
    }

    fn time(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("2016-12-27T{s}:00+01:00")).unwrap()
    }

    #[test]
    fn selects_by_mode() {
        let index = ScheduleIndex::from_json(FEED).unwrap();

        assert_eq!(ids(select_events(&index, &args(), time("11:10"))), [1, 3]);

        let next = Args { mode: Mode::Next, ..args() };
        assert_eq!(ids(select_events(&index, &next, time("11:10"))), [2]);

        let day = Args { mode: Mode::Day, tracks: vec!["Art".into()], ..args() };
        assert_eq!(ids(select_events(&index, &day, time("08:00"))), [1, 2]);

        let window = Args { window: Some(Duration::minutes(30)), ..args() };
        assert_eq!(ids(select_events(&index, &window, time("11:30"))), [3, 2]);
    }

    #[test]
    fn one_ignores_filters() {
        let index = ScheduleIndex::from_json(FEED).unwrap();
        let one = Args {
            mode: Mode::One(2),
            rooms: vec!["Saal 2".into()],
            ..args()
        };

        assert_eq!(ids(select_events(&index, &one, time("08:00"))), [2]);
        assert!(select_events(&index, &Args { mode: Mode::One(9), ..args() }, time("08:00")).is_empty());
    }

    #[test]
    fn speakers_are_matched_together() {
        let index = ScheduleIndex::from_json(FEED).unwrap();
        let both = Args {
            speakers: vec!["Alice".into(), "Bob".into()],
            ..args()
        };

        assert_eq!(ids(select_events(&index, &both, time("08:00"))), [3]);
    }

    #[test]
    fn summarizes_the_schedule() {
        let index = ScheduleIndex::from_json(FEED).unwrap();
        let text = summary(&index);

        assert!(text.starts_with("[tc] Test (v1)\n"));
        assert!(text.contains(" days: Tue 2016-12-27\n"));
        assert!(text.contains(" rooms: Saal 1, Saal 2\n"));
        assert!(text.contains("   3 events\n"));
        assert!(text.contains("   2 speakers\n"));
    }

    #[test]
    fn empty_selection_renders_header_only() {
        let index = ScheduleIndex::default();
        let context = RenderContext::new(40);
        let palette = Palette::plain();
        let events = select_events(&index, &args(), time("11:00"));

        let grid = GridRenderer::new(&context, &palette).render(&events, &["Saal 1"]);

        assert_eq!(grid.lines().count(), 2);
    }
}
