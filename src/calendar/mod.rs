//! Date-range selection and day-by-day activity scheduling.
//!
//! Everything in here is pure: no I/O, no clocks. Callers pass "now" and
//! whatever records they loaded from the store.

pub mod schedule;
pub mod selection;
pub mod weekday;

pub use schedule::{build_schedule, DaySchedule, ItemOrder, ScheduleBuilder, ScheduledActivity, TripRange};
pub use selection::{
    format_range_label, marked_dates_for_range, select_day, select_days, DateSelection, DayPosition, MarkedDate,
};
pub use weekday::{EnglishWeekdays, LocaleWeekdays, WeekdayFormatter};
