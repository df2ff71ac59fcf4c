use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::process;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike};
use fahrplan_core::default_step;
use getopts::{Matches, Options};

pub const REMOTE: &str = "https://fahrplan.events.ccc.de/congress/2016/Fahrplan/schedule.json";
pub const LOCAL: &str = "schedule.json";
pub const SELECTED: &str = "selected.lst";

/// Grid steps from one minute up to a day.
const INTERVAL: RangeInclusive<i64> = 1..=24 * 60;
/// Windows of up to a year.
const WINDOW: RangeInclusive<i64> = 0..=366 * 24 * 60;

/// Which events to show, regardless of filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Now,
    Next,
    Day,
    All,
    One(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Grid,
    Cards { short: bool },
    Ics,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub cache: PathBuf,
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub ascii: bool,
    pub color: bool,
    pub verbose: bool,
    pub interval: Duration,
    pub output: Output,
    pub select: Vec<u32>,
    pub select_file: PathBuf,
    pub selected_only: bool,
    pub rooms: Vec<String>,
    pub tracks: Vec<String>,
    pub speakers: Vec<String>,
    pub date: Vec<u32>,
    pub window: Option<Duration>,
    pub mode: Mode,
    pub source: Source,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optflag("a", "ascii", "Print ascii symbols instead of UTF-8 ones");
    opts.optflag("n", "nocolor", "Print no colors");
    opts.optflag("o", "offline", "Do not try to pull the schedule from the internet");
    opts.optflag("v", "verbose", "Print additional info about the schedule");
    opts.optopt(
        "i",
        "interval",
        "Interval between the lines of the timetable [Default: 15]",
        "MINUTES",
    );
    opts.optopt(
        "e",
        "events",
        "Print events individually instead of a timetable",
        "short|full",
    );
    opts.optflag("", "ics", "Print the events as an iCalendar document");
    opts.optflag("", "json", "Print the events as JSON");
    opts.optmulti("s", "select", "Store the given id as selected", "ID");
    opts.optopt(
        "",
        "selectfile",
        "The file to store the selected events in [Default: selected.lst]",
        "PATH",
    );
    opts.optflag("S", "selected", "Show only selected events");
    opts.optmulti("r", "room", "Room to filter for", "ROOM");
    opts.optmulti("t", "track", "Track (category) to filter for", "TRACK");
    opts.optmulti("p", "speaker", "Show events with all of the given speakers", "NAME");
    opts.optopt(
        "d",
        "date",
        "The time to filter for [Default: now]",
        "[[[[YEAR] MONTH] DAY] HOUR] MINUTE",
    );
    opts.optopt(
        "w",
        "window",
        "Show everything within the given minutes from the time",
        "MINUTES",
    );
    opts.optflag("N", "next", "Show upcoming events instead of currently running");
    opts.optflag("D", "day", "Show the complete day instead of only a time slot");
    opts.optflag("A", "all", "Show all events, other filters still apply");
    opts.optopt("O", "one", "Show only the given event, ignoring filters", "ID");
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    match Args::from_matches(&matches) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

impl Args {
    fn from_matches(matches: &Matches) -> Result<Args, String> {
        let interval = minutes(matches, "interval", INTERVAL)?.unwrap_or_else(default_step);
        let window = minutes(matches, "window", WINDOW)?;

        let output = if matches.opt_present("ics") {
            Output::Ics
        } else if matches.opt_present("json") {
            Output::Json
        } else {
            match matches.opt_str("events").as_deref() {
                None => Output::Grid,
                Some("short") => Output::Cards { short: true },
                Some("full") => Output::Cards { short: false },
                Some(other) => {
                    return Err(format!(
                        "Provided value for option 'events' is invalid: {other} (short or full)"
                    ))
                }
            }
        };

        let select = matches
            .opt_strs("select")
            .iter()
            .map(|id| {
                id.parse::<u32>()
                    .map_err(|err| format!("Provided value for option 'select' is invalid: {err}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let date = match matches.opt_str("date") {
            Some(raw) => parse_date_parts(&raw)
                .ok_or_else(|| format!("Provided value for option 'date' is invalid: {raw}"))?,
            None => Vec::new(),
        };

        let modes = ["next", "day", "all", "one"]
            .iter()
            .filter(|name| matches.opt_present(name))
            .count();
        if modes > 1 {
            return Err("Options 'next', 'day', 'all' and 'one' exclude each other".into());
        }

        let mode = if matches.opt_present("next") {
            Mode::Next
        } else if matches.opt_present("day") {
            Mode::Day
        } else if matches.opt_present("all") {
            Mode::All
        } else {
            match matches.opt_get::<u32>("one") {
                Ok(Some(id)) => Mode::One(id),
                Ok(None) => Mode::Now,
                Err(err) => return Err(format!("Provided value for option 'one' is invalid: {err}")),
            }
        };

        let source = Source {
            url: env::var("FAHRPLAN_URL").unwrap_or_else(|_| REMOTE.to_string()),
            cache: env::var("FAHRPLAN_CACHE")
                .unwrap_or_else(|_| LOCAL.to_string())
                .into(),
            offline: matches.opt_present("offline"),
        };

        Ok(Args {
            ascii: matches.opt_present("ascii"),
            color: !matches.opt_present("nocolor"),
            verbose: matches.opt_present("verbose"),
            interval,
            output,
            select,
            select_file: matches
                .opt_str("selectfile")
                .unwrap_or_else(|| SELECTED.to_string())
                .into(),
            selected_only: matches.opt_present("selected"),
            rooms: matches.opt_strs("room"),
            tracks: matches.opt_strs("track"),
            speakers: matches.opt_strs("speaker"),
            date,
            window,
            mode,
            source,
        })
    }
}

/// Reads option `name` as a number of minutes within `range`.
fn minutes(
    matches: &Matches,
    name: &str,
    range: RangeInclusive<i64>,
) -> Result<Option<Duration>, String> {
    let invalid = |reason: String| format!("Provided value for option '{name}' is invalid: {reason}");

    match matches.opt_get::<i64>(name) {
        Ok(None) => Ok(None),
        Ok(Some(value)) if range.contains(&value) => Duration::try_minutes(value)
            .map(Some)
            .ok_or_else(|| invalid(value.to_string())),
        Ok(Some(value)) => Err(invalid(format!(
            "{value} (allowed are {} to {} minutes)",
            range.start(),
            range.end()
        ))),
        Err(err) => Err(invalid(err.to_string())),
    }
}

/// Splits `2016 12 27 11 30`, `27 11:30` and the like into numbers.
fn parse_date_parts(raw: &str) -> Option<Vec<u32>> {
    let parts = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    (!parts.is_empty() && parts.len() <= 5).then_some(parts)
}

/// Replaces the trailing components of `now` with `parts`, the last of
/// which is the minute. Seconds are dropped.
pub fn query_time(now: DateTime<FixedOffset>, parts: &[u32]) -> Option<DateTime<FixedOffset>> {
    let mut values = [
        i64::from(now.year()),
        i64::from(now.month()),
        i64::from(now.day()),
        i64::from(now.hour()),
        i64::from(now.minute()),
    ];

    let skip = values.len().checked_sub(parts.len())?;
    for (value, part) in values.iter_mut().skip(skip).zip(parts) {
        *value = i64::from(*part);
    }

    let [year, month, day, hour, minute] = values;
    let naive = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?
    .and_hms_opt(u32::try_from(hour).ok()?, u32::try_from(minute).ok()?, 0)?;

    now.offset().from_local_datetime(&naive).single()
}
