use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, Utc};
use whattowear_core::{
    AppState, CurrentConditions, DailySummary, IntervalSample,
    display::{Backdrop, clothing_advice, format_clock, format_day, format_degrees, icon_url},
    forecast::round_half_up,
    samples_for_day,
};

/// Render the state as terminal text.
pub fn render(state: &AppState, day: u32, now: DateTime<Utc>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_state(&mut out, state, day, now)?;
    Ok(out)
}

fn write_state(out: &mut String, state: &AppState, day: u32, now: DateTime<Utc>) -> fmt::Result {
    if let Some(err) = state.error {
        writeln!(out, "\x1b[31m{err}\x1b[0m")?;
    }

    let Some(snapshot) = &state.snapshot else {
        if state.error.is_none() {
            writeln!(out, "Lütfen bir şehir adı girin")?;
        }
        return Ok(());
    };

    let weather = &snapshot.weather;
    let tz = weather.offset();
    let backdrop = Backdrop::for_conditions(Some(weather), now);

    current_block(out, weather, backdrop, &tz)?;

    if let Some(forecast) = &snapshot.forecast {
        if !snapshot.daily.is_empty() {
            writeln!(out, "\nTahmin: {}", forecast.location_name)?;
            for summary in &snapshot.daily {
                daily_line(out, summary, &tz)?;
            }
        }

        let today = now.with_timezone(&tz);
        let hours = samples_for_day(&forecast.samples, &today, day);
        if !hours.is_empty() {
            writeln!(out, "\nSaatlik (+{day} gün)")?;
            for sample in hours {
                hourly_line(out, sample, &tz)?;
            }
        }
    }

    Ok(())
}

fn current_block(
    out: &mut String,
    weather: &CurrentConditions,
    backdrop: Backdrop,
    tz: &FixedOffset,
) -> fmt::Result {
    let (icon, description) = match &weather.condition {
        Some(c) => (Some(c.icon.as_str()), c.description.as_str()),
        None => (None, ""),
    };

    let place = match &weather.country {
        Some(country) => format!("{}, {country}", weather.location_name),
        None => weather.location_name.clone(),
    };

    writeln!(out, "\x1b[1;38;5;{}m{place}\x1b[0m", backdrop.ansi_color())?;
    writeln!(out, "{}  {description}", format_degrees(weather.temperature_c))?;
    writeln!(out, "  Hissedilen: {}C", format_degrees(weather.feels_like_c))?;
    writeln!(out, "  Nem:        {}%", weather.humidity_pct)?;
    writeln!(out, "  Rüzgar:     {} km/s", round_half_up(weather.wind_speed))?;

    if let (Some(rise), Some(set)) = (weather.sunrise, weather.sunset) {
        writeln!(out, "  Gün:        {} - {}", format_clock(rise, tz), format_clock(set, tz))?;
    }

    writeln!(out, "  İkon:       {}", icon_url(icon))?;
    writeln!(out, "\n🧥 {}", clothing_advice(weather.temperature_c))
}

fn daily_line(out: &mut String, day: &DailySummary, tz: &FixedOffset) -> fmt::Result {
    let description = day.condition.as_ref().map(|c| c.description.as_str()).unwrap_or("");
    writeln!(
        out,
        "  {:<11} {:>4} ({} / {})  nem {}%  rüzgar {}  {description}",
        format_day(day.day_epoch, tz),
        format_degrees(day.temperature.mean),
        format_degrees(day.temperature.min),
        format_degrees(day.temperature.max),
        day.humidity_mean,
        day.wind_speed_mean,
    )
}

fn hourly_line(out: &mut String, sample: &IntervalSample, tz: &FixedOffset) -> fmt::Result {
    let Some(at) = DateTime::from_timestamp(sample.timestamp, 0) else {
        return Ok(());
    };
    let description = sample.condition.as_ref().map(|c| c.description.as_str()).unwrap_or("");
    writeln!(
        out,
        "  {}  {:>4}  {description}",
        format_clock(at, tz),
        format_degrees(sample.temperature_c),
    )
}
