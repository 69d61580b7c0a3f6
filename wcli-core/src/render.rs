//! Plain-text output for the `current` and `daily` commands.

use std::{fmt::Display, io::Write};

use chrono::{DateTime, Local, TimeZone};

use crate::{
    error::{Error, Result},
    model::WeatherResponse,
};

/// Print the current temperature and today's summary.
///
/// The summary comes from `daily[0]`; an empty daily sequence is reported as
/// [`Error::NoDailyForecast`] rather than printing a partial result.
pub fn render_today<W: Write>(resp: &WeatherResponse, out: &mut W) -> Result<()> {
    let today = resp.today().ok_or(Error::NoDailyForecast)?;

    writeln!(out, "Current Temp: {:.1}°F", resp.current.temp)?;
    writeln!(out, "Weather: {}", today.summary)?;
    Ok(())
}

/// Print one `<Weekday> <temp>°F` line per daily entry, in local time.
pub fn render_daily<W: Write>(resp: &WeatherResponse, out: &mut W) -> Result<()> {
    render_daily_in(resp, &Local, out)
}

pub fn render_daily_in<Tz, W>(resp: &WeatherResponse, tz: &Tz, out: &mut W) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    for day in &resp.daily {
        match DateTime::from_timestamp(day.dt, 0) {
            Some(utc) => write!(out, "{}", utc.with_timezone(tz).format("%A"))?,
            None => write!(out, "Unknown")?,
        }
        writeln!(out, " {:.1}°F", day.temp.day)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyForecast, tests::SAMPLE};
    use chrono::{FixedOffset, Utc};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn today_shows_temperature_and_summary() {
        let resp = WeatherResponse::from_json(SAMPLE).unwrap();

        let text = render(|out| render_today(&resp, out));

        assert_eq!(text, "Current Temp: 72.3°F\nWeather: Clear skies\n");
    }

    #[test]
    fn today_without_daily_entries_is_an_error() {
        let resp = WeatherResponse::default();
        let mut out = Vec::new();

        let err = render_today(&resp, &mut out).unwrap_err();

        assert!(matches!(err, Error::NoDailyForecast));
        assert!(out.is_empty());
    }

    #[test]
    fn daily_lists_weekday_and_temperature_in_order() {
        let resp = WeatherResponse::from_json(SAMPLE).unwrap();

        let text = render(|out| render_daily_in(&resp, &Utc, out));

        assert_eq!(text, "Monday 50.0°F\nTuesday 55.2°F\n");
    }

    #[test]
    fn daily_weekday_follows_time_zone() {
        // 2024-01-01 02:00 UTC is still Sunday evening in New York.
        let resp = WeatherResponse {
            daily: vec![DailyForecast { dt: 1_704_074_400, ..Default::default() }],
            ..Default::default()
        };
        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(render(|out| render_daily_in(&resp, &Utc, out)), "Monday 0.0°F\n");
        assert_eq!(render(|out| render_daily_in(&resp, &new_york, out)), "Sunday 0.0°F\n");
    }

    #[test]
    fn daily_with_empty_sequence_prints_nothing() {
        let text = render(|out| render_daily(&WeatherResponse::default(), out));
        assert!(text.is_empty());
    }

    #[test]
    fn daily_prints_one_line_per_entry() {
        let resp = WeatherResponse {
            daily: (0..8)
                .map(|i| DailyForecast { dt: 1_704_110_400 + i * 86_400, ..Default::default() })
                .collect(),
            ..Default::default()
        };

        let text = render(|out| render_daily(&resp, out));

        assert_eq!(text.lines().count(), 8);
        assert!(text.lines().all(|line| line.ends_with("°F")));
    }
}
