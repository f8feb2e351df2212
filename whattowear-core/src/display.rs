//! Values derived purely for presentation.

use chrono::{DateTime, TimeZone, Utc};

use crate::forecast::round_half_up;
use crate::model::CurrentConditions;

/// Icon code used when no condition data is available.
pub const FALLBACK_ICON: &str = "10d";

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Clothing advice for a temperature in °C.
pub fn clothing_advice(temp_c: f64) -> &'static str {
    if temp_c >= 30.0 {
        "Çok sıcak! İnce ve açık renkli giysiler giyin."
    } else if temp_c >= 20.0 {
        "Ilık bir hava, tişört ve hafif ceket yeterli olur."
    } else if temp_c >= 10.0 {
        "Serin hava, kazak veya mont tercih edin."
    } else if temp_c >= 0.0 {
        "Soğuk! Kalın ceket, atkı ve bere önerilir."
    } else {
        "Dondurucu soğuk! Kat kat giyinin ve mümkünse dışarı çıkmayın."
    }
}

/// URL of the 4x icon image for a condition code.
pub fn icon_url(code: Option<&str>) -> String {
    let code = code.map(str::trim).filter(|c| !c.is_empty()).unwrap_or(FALLBACK_ICON);
    format!("{ICON_BASE_URL}/{code}@4x.png")
}

/// Background theme picked from temperature and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backdrop {
    /// No weather loaded yet.
    Default,
    DayHot,
    DayMild,
    DayCool,
    DayCold,
    NightWarm,
    NightMild,
    NightCold,
}

impl Backdrop {
    /// Pick a backdrop. Without sunset data it is assumed to be daytime.
    pub fn for_conditions(weather: Option<&CurrentConditions>, now: DateTime<Utc>) -> Self {
        let Some(weather) = weather else {
            return Backdrop::Default;
        };

        let is_day = weather.sunset.is_none_or(|sunset| now < sunset);
        let temp = weather.temperature_c;

        if is_day {
            match temp {
                t if t >= 25.0 => Backdrop::DayHot,
                t if t >= 15.0 => Backdrop::DayMild,
                t if t >= 5.0 => Backdrop::DayCool,
                _ => Backdrop::DayCold,
            }
        } else {
            match temp {
                t if t >= 20.0 => Backdrop::NightWarm,
                t if t >= 10.0 => Backdrop::NightMild,
                _ => Backdrop::NightCold,
            }
        }
    }

    /// Tailwind gradient classes for web front ends.
    pub fn gradient_class(&self) -> &'static str {
        match self {
            Backdrop::Default => "from-blue-400 to-blue-600",
            Backdrop::DayHot => "from-orange-300 to-orange-600",
            Backdrop::DayMild => "from-blue-300 to-blue-500",
            Backdrop::DayCool => "from-blue-200 to-blue-400",
            Backdrop::DayCold => "from-blue-100 to-blue-300",
            Backdrop::NightWarm => "from-purple-700 to-purple-900",
            Backdrop::NightMild => "from-blue-800 to-blue-950",
            Backdrop::NightCold => "from-indigo-900 to-blue-950",
        }
    }

    /// 256-color ANSI code approximating the gradient.
    pub fn ansi_color(&self) -> u8 {
        match self {
            Backdrop::Default => 33,
            Backdrop::DayHot => 208,
            Backdrop::DayMild => 75,
            Backdrop::DayCool => 117,
            Backdrop::DayCold => 153,
            Backdrop::NightWarm => 91,
            Backdrop::NightMild => 18,
            Backdrop::NightCold => 17,
        }
    }
}

/// Whole-degree rendering, e.g. `"-3°"`.
pub fn format_degrees(value: f64) -> String {
    format!("{}°", round_half_up(value) as i64)
}

/// Short weekday and date, e.g. `"Mon 19 Oct"`.
pub fn format_day<Tz: TimeZone>(epoch: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(epoch, 0) {
        Some(utc) => utc.with_timezone(tz).format("%a %d %b").to_string(),
        None => "-".to_string(),
    }
}

/// Local wall-clock time, e.g. `"06:42"`.
pub fn format_clock<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}
