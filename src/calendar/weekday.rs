use chrono::{Datelike, Locale, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// Portuguese weekday names carry this suffix ("segunda-feira"); the day
/// headers only show the first word.
const FEIRA_SUFFIX: &str = "-feira";

/// Names the weekday of a calendar date for day headers.
///
/// Output is the raw locale name; capitalisation is left to the renderer.
pub trait WeekdayFormatter: Send + Sync {
    fn weekday_name(&self, date: NaiveDate) -> String;
}

/// Weekday names from chrono's bundled locale tables.
#[derive(Debug, Clone, Copy)]
pub struct LocaleWeekdays {
    locale: Locale,
}

impl LocaleWeekdays {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl WeekdayFormatter for LocaleWeekdays {
    fn weekday_name(&self, date: NaiveDate) -> String {
        let name = format_localized_date(date, "%A", self.locale);
        strip_weekday_suffix(&name).to_string()
    }
}

/// Lowercase English names without any locale data.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishWeekdays;

impl WeekdayFormatter for EnglishWeekdays {
    fn weekday_name(&self, date: NaiveDate) -> String {
        let name = match date.weekday() {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        };
        name.to_string()
    }
}

pub fn strip_weekday_suffix(name: &str) -> &str {
    name.strip_suffix(FEIRA_SUFFIX).unwrap_or(name)
}

/// Formats a calendar date with a strftime pattern in the given locale.
pub fn format_localized_date(date: NaiveDate, pattern: &str, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized(pattern, locale)
        .to_string()
}
