//! Grouping of 3-hour forecast samples into daily summaries.
//!
//! The time zone is always passed in explicitly; nothing here reads the
//! local clock or the process time zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

use crate::model::{DailySummary, IntervalSample, TemperatureStats};

/// Group `samples` by calendar date in `tz` and summarize each day.
///
/// Days appear in the order their first sample is encountered. Input is
/// expected to be in ascending timestamp order already and is not resorted.
pub fn aggregate<Tz: TimeZone>(samples: &[IntervalSample], tz: &Tz) -> Vec<DailySummary> {
    let mut buckets: Vec<(NaiveDate, Vec<&IntervalSample>)> = Vec::new();

    for sample in samples {
        let Some(day) = local_date(sample.timestamp, tz) else {
            tracing::debug!(timestamp = sample.timestamp, "skipping sample with invalid timestamp");
            continue;
        };

        match buckets.iter_mut().find(|(key, _)| *key == day) {
            Some((_, bucket)) => bucket.push(sample),
            None => buckets.push((day, vec![sample])),
        }
    }

    buckets
        .into_iter()
        .filter_map(|(day, bucket)| summarize(day, &bucket, tz))
        .collect()
}

fn summarize<Tz: TimeZone>(
    day: NaiveDate,
    bucket: &[&IntervalSample],
    tz: &Tz,
) -> Option<DailySummary> {
    let first = bucket.first()?;

    let temps = bucket.iter().map(|s| s.temperature_c);
    let min = temps.clone().fold(f64::INFINITY, f64::min);
    let max = temps.clone().fold(f64::NEG_INFINITY, f64::max);

    Some(DailySummary {
        day_key: day,
        day_epoch: start_of_day(day, tz),
        temperature: TemperatureStats { mean: rounded_mean(temps), min, max },
        feels_like_mean: rounded_mean(bucket.iter().map(|s| s.feels_like_c)),
        humidity_mean: rounded_mean(bucket.iter().map(|s| f64::from(s.humidity_pct))),
        wind_speed_mean: rounded_mean(bucket.iter().map(|s| s.wind_speed)),
        condition: first.condition.clone(),
    })
}

/// Samples whose local date is `today + offset` days.
///
/// Returns the first contiguous run of matching samples; the slice is empty
/// when the forecast has nothing for that day.
pub fn samples_for_day<'a, Tz: TimeZone>(
    samples: &'a [IntervalSample],
    today: &DateTime<Tz>,
    offset: u32,
) -> &'a [IntervalSample] {
    let tz = today.timezone();
    let Some(target) = today.date_naive().checked_add_days(chrono::Days::new(offset.into()))
    else {
        return &[];
    };
    let on_target = |s: &IntervalSample| local_date(s.timestamp, &tz) == Some(target);

    let Some(start) = samples.iter().position(|s| on_target(s)) else {
        return &[];
    };
    let len = samples[start..].iter().take_while(|s| on_target(s)).count();

    &samples[start..start + len]
}

/// Calendar date of an epoch timestamp in `tz`.
pub fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

/// Epoch seconds of the first instant of `day` in `tz`.
///
/// Where midnight is skipped by a DST transition the first hour that exists
/// is used instead.
pub fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> i64 {
    let midnight = day.and_time(NaiveTime::MIN);

    (0..24)
        .map(|h| midnight + Duration::hours(h))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

/// Mean rounded to the nearest integer, halves toward positive infinity.
fn rounded_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        return 0.0;
    }
    round_half_up(sum / count as f64)
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const DAY: i64 = 86_400;
    // 2026-10-19T00:00:00Z
    const MONDAY: i64 = 1_792_368_000;

    fn sample(timestamp: i64, temp: f64) -> IntervalSample {
        IntervalSample {
            timestamp,
            temperature_c: temp,
            feels_like_c: temp - 1.0,
            humidity_pct: 60,
            wind_speed: 3.0,
            condition: Some(crate::model::Condition {
                icon: format!("{}d", timestamp % 7),
                description: format!("cond-{timestamp}"),
            }),
            formatted: None,
        }
    }

    fn three_hourly(start: i64, temps: &[f64]) -> Vec<IntervalSample> {
        temps.iter().enumerate().map(|(i, t)| sample(start + i as i64 * 10_800, *t)).collect()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate(&[], &Utc).is_empty());
    }

    #[test]
    fn two_days_in_encounter_order() {
        let samples = vec![
            sample(MONDAY + 3_600, 10.0),
            sample(MONDAY + 4 * 3_600, 20.0),
            sample(MONDAY + DAY + 3_600, 5.0),
        ];

        let days = aggregate(&samples, &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_key, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(days[0].temperature, TemperatureStats { mean: 15.0, min: 10.0, max: 20.0 });
        assert_eq!(days[1].day_key, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(days[1].temperature, TemperatureStats { mean: 5.0, min: 5.0, max: 5.0 });
    }

    #[test]
    fn out_of_order_input_keeps_encounter_order() {
        let samples = vec![sample(MONDAY + DAY, 1.0), sample(MONDAY, 2.0), sample(MONDAY + DAY, 3.0)];

        let keys: Vec<_> = aggregate(&samples, &Utc).into_iter().map(|d| d.day_key).collect();

        assert_eq!(
            keys,
            vec![
                NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            ]
        );
    }

    #[test]
    fn one_summary_per_distinct_day() {
        let samples = three_hourly(MONDAY, &[1.0; 40]);
        let days = aggregate(&samples, &Utc);

        // 40 samples * 3h = 5 days exactly
        assert_eq!(days.len(), 5);
        assert!(days.iter().all(|d| d.temperature.mean == 1.0));
    }

    #[test]
    fn constant_temperature_collapses_stats() {
        let samples = three_hourly(MONDAY, &[7.0; 8]);
        let days = aggregate(&samples, &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].temperature, TemperatureStats { mean: 7.0, min: 7.0, max: 7.0 });
    }

    #[test]
    fn mean_is_bounded_by_rounded_extremes() {
        let samples = three_hourly(MONDAY, &[10.4, 10.4, -3.6, 22.5, 8.49, 0.5, -0.5, 13.0, 13.2]);

        for day in aggregate(&samples, &Utc) {
            let t = day.temperature;
            assert!(t.min <= t.max);
            assert!(round_half_up(t.min) <= t.mean && t.mean <= round_half_up(t.max));
        }
    }

    #[test]
    fn means_round_halves_up() {
        let samples = vec![sample(MONDAY, -2.0), sample(MONDAY + 3_600, -3.0)];
        let day = &aggregate(&samples, &Utc)[0];

        assert_eq!(day.temperature.mean, -2.0);
        assert_eq!(day.feels_like_mean, -3.0);
        assert_eq!(day.humidity_mean, 60.0);
        assert_eq!(day.wind_speed_mean, 3.0);
    }

    #[test]
    fn min_max_are_exact() {
        let samples = vec![sample(MONDAY, 10.4), sample(MONDAY + 3_600, 12.6)];
        let t = aggregate(&samples, &Utc)[0].temperature;

        assert_eq!(t.min, 10.4);
        assert_eq!(t.max, 12.6);
        assert_eq!(t.mean, 12.0);
    }

    #[test]
    fn condition_comes_from_first_sample_of_day() {
        let samples = three_hourly(MONDAY, &[1.0, 2.0, 3.0]);
        let day = &aggregate(&samples, &Utc)[0];

        assert_eq!(day.condition, samples[0].condition);
    }

    #[test]
    fn day_epoch_is_local_midnight() {
        let istanbul = FixedOffset::east_opt(3 * 3_600).unwrap();
        // 22:00Z on Oct 19 is 01:00 on Oct 20 in UTC+3.
        let samples = vec![sample(MONDAY + 22 * 3_600, 9.0)];

        let day = &aggregate(&samples, &istanbul)[0];

        assert_eq!(day.day_key, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(day.day_epoch, MONDAY + DAY - 3 * 3_600);
    }

    #[test]
    fn bucketing_depends_on_time_zone() {
        let samples = three_hourly(MONDAY + 18 * 3_600, &[1.0, 2.0, 3.0]);

        assert_eq!(aggregate(&samples, &Utc).len(), 2);

        let minus_six = FixedOffset::west_opt(6 * 3_600).unwrap();
        assert_eq!(aggregate(&samples, &minus_six).len(), 1);
    }

    #[test]
    fn gaps_are_not_filled() {
        let samples = vec![sample(MONDAY, 1.0), sample(MONDAY + 3 * DAY, 2.0)];
        assert_eq!(aggregate(&samples, &Utc).len(), 2);
    }

    #[test]
    fn aggregate_is_deterministic() {
        let samples = three_hourly(MONDAY, &[4.0, 8.0, 15.0, 16.0, 23.0, 42.0, 1.0, 2.0, 3.0]);
        assert_eq!(aggregate(&samples, &Utc), aggregate(&samples, &Utc));
    }

    #[test]
    fn samples_for_today_and_tomorrow() {
        let samples = three_hourly(MONDAY, &[0.0; 16]);
        let now = Utc.timestamp_opt(MONDAY + 5 * 3_600, 0).unwrap();

        let today = samples_for_day(&samples, &now, 0);
        assert_eq!(today.len(), 8);
        assert_eq!(today[0].timestamp, MONDAY);

        let tomorrow = samples_for_day(&samples, &now, 1);
        assert_eq!(tomorrow.len(), 8);
        assert_eq!(tomorrow[0].timestamp, MONDAY + DAY);
    }

    #[test]
    fn samples_beyond_horizon_are_empty() {
        let samples = three_hourly(MONDAY, &[0.0; 16]);
        let now = Utc.timestamp_opt(MONDAY, 0).unwrap();

        assert!(samples_for_day(&samples, &now, 5).is_empty());
        assert!(samples_for_day(&[], &now, 0).is_empty());
    }

    #[test]
    fn samples_for_day_uses_the_given_zone() {
        let samples = three_hourly(MONDAY, &[0.0; 16]);
        let tz = FixedOffset::east_opt(3 * 3_600).unwrap();
        let now = tz.timestamp_opt(MONDAY, 0).unwrap();

        // Local Oct 19 runs 21:00Z Oct 18 .. 21:00Z Oct 19.
        let today = samples_for_day(&samples, &now, 0);
        assert_eq!(today.len(), 7);
        assert_eq!(today.last().map(|s| s.timestamp), Some(MONDAY + 18 * 3_600));
    }
}
