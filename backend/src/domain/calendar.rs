//! Calendar domain logic for the chore board.
//!
//! Builds the month grid the UI renders and overlays one indicator per task
//! due on each day. Months are 1-based (1 = January) throughout.

use chrono::{Datelike, NaiveDate};
use shared::{CalendarDay, CalendarDayType, CalendarMonth, CurrentDateResponse, MonthYear, TaskIndicator};

use crate::domain::task_board::TaskBoard;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CalendarError {
    #[error("Invalid month: {0}. Must be between 1 and 12")]
    InvalidMonth(u32),
    #[error("Year out of range: {0}")]
    InvalidYear(i32),
}

/// One cell of a month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before day 1
    Blank,
    Day(u32),
}

/// Calendar service that handles all calendar-related business logic
#[derive(Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Grid cells for a month: one blank per weekday before day 1, then
    /// every day of the month. Trailing cells are not padded.
    pub fn build_grid(&self, year: i32, month: u32) -> Result<Vec<CalendarCell>, CalendarError> {
        let first = Self::first_of_month(year, month)?;
        let leading = first.weekday().num_days_from_sunday();
        let days = self.days_in_month(year, month);

        let cells = (0..leading)
            .map(|_| CalendarCell::Blank)
            .chain((1..=days).map(CalendarCell::Day))
            .collect();
        Ok(cells)
    }

    /// Month grid with an indicator per task due on each day.
    ///
    /// Indicators are not deduplicated: N tasks on a day give N indicators.
    pub fn generate_calendar_month(
        &self,
        year: i32,
        month: u32,
        board: &TaskBoard,
        today: NaiveDate,
    ) -> Result<CalendarMonth, CalendarError> {
        let cells = self.build_grid(year, month)?;
        let first_day_of_week = self.first_day_of_month(year, month)?;

        let days = cells
            .into_iter()
            .map(|cell| match cell {
                CalendarCell::Blank => CalendarDay {
                    day: 0,
                    day_type: CalendarDayType::PaddingBefore,
                    indicators: Vec::new(),
                    is_today: false,
                },
                CalendarCell::Day(day) => {
                    let date = NaiveDate::from_ymd_opt(year, month, day);
                    let indicators = date
                        .map(|date| {
                            board
                                .tasks_for_date(date)
                                .into_iter()
                                .map(|task| TaskIndicator {
                                    task_id: task.id,
                                    color: task.color,
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    CalendarDay {
                        day,
                        day_type: CalendarDayType::MonthDay,
                        indicators,
                        is_today: date.is_some_and(|date| self.is_current_day(date, today)),
                    }
                }
            })
            .collect();

        let (previous_month, previous_year) = self.previous_month(month, year);
        let (next_month, next_year) = self.next_month(month, year);

        Ok(CalendarMonth {
            month,
            year,
            month_name: self.month_name(month).to_string(),
            days,
            first_day_of_week,
            previous: MonthYear {
                month: previous_month,
                year: previous_year,
            },
            next: MonthYear {
                month: next_month,
                year: next_year,
            },
        })
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, year: i32, month: u32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Weekday of day 1 (0 = Sunday, 1 = Monday, etc.)
    pub fn first_day_of_month(&self, year: i32, month: u32) -> Result<u32, CalendarError> {
        Ok(Self::first_of_month(year, month)?.weekday().num_days_from_sunday())
    }

    /// First and last date of a month, inclusive
    pub fn month_bounds(&self, year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CalendarError> {
        let first = Self::first_of_month(year, month)?;
        let last = NaiveDate::from_ymd_opt(year, month, self.days_in_month(year, month))
            .ok_or(CalendarError::InvalidYear(year))?;
        Ok((first, last))
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January", 2 => "February", 3 => "March", 4 => "April",
            5 => "May", 6 => "June", 7 => "July", 8 => "August",
            9 => "September", 10 => "October", 11 => "November", 12 => "December",
            _ => "Invalid Month",
        }
    }

    pub fn previous_month(&self, month: u32, year: i32) -> (u32, i32) {
        if month == 1 {
            (12, year - 1)
        } else {
            (month - 1, year)
        }
    }

    pub fn next_month(&self, month: u32, year: i32) -> (u32, i32) {
        if month == 12 {
            (1, year + 1)
        } else {
            (month + 1, year)
        }
    }

    pub fn is_current_day(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date == today
    }

    /// Date information for `today`
    pub fn get_current_date(&self, today: NaiveDate) -> CurrentDateResponse {
        let month = today.month();
        let day = today.day();
        let year = today.year();

        CurrentDateResponse {
            month,
            year,
            day,
            formatted_date: format!("{} {}, {}", self.month_name(month), day, year),
            iso_date: today.format("%Y-%m-%d").to_string(),
        }
    }

    fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidYear(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::display_task::{default_due_time, DisplayTask};

    fn setup_test() -> CalendarService {
        CalendarService::new()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, on: NaiveDate, color: &str) -> DisplayTask {
        DisplayTask {
            id,
            text: format!("Chore {}", id),
            assigned_to: "Jerry Smith".to_string(),
            assignee_phone: None,
            due_date: on,
            due_time: default_due_time(),
            color: color.to_string(),
            completed: false,
            kid_id: 1,
            chore_id: id,
        }
    }

    #[test]
    fn test_build_grid_leap_february() {
        let service = setup_test();
        let cells = service.build_grid(2024, 2).unwrap();

        // Feb 1 2024 is a Thursday
        assert_eq!(cells.len(), 4 + 29);
        assert!(cells[..4].iter().all(|c| *c == CalendarCell::Blank));
        assert_eq!(cells[4], CalendarCell::Day(1));
        assert_eq!(cells.last(), Some(&CalendarCell::Day(29)));
    }

    #[test]
    fn test_build_grid_month_starting_sunday_has_no_blanks() {
        let service = setup_test();
        // September 2024 starts on a Sunday
        let cells = service.build_grid(2024, 9).unwrap();
        assert_eq!(cells.len(), 30);
        assert_eq!(cells[0], CalendarCell::Day(1));
    }

    #[test]
    fn test_build_grid_rejects_invalid_month() {
        let service = setup_test();
        assert_eq!(service.build_grid(2024, 0), Err(CalendarError::InvalidMonth(0)));
        assert_eq!(service.build_grid(2024, 13), Err(CalendarError::InvalidMonth(13)));
    }

    #[test]
    fn test_days_in_month() {
        let service = setup_test();
        assert_eq!(service.days_in_month(2024, 2), 29);
        assert_eq!(service.days_in_month(2023, 2), 28);
        assert_eq!(service.days_in_month(1900, 2), 28);
        assert_eq!(service.days_in_month(2000, 2), 29);
        assert_eq!(service.days_in_month(2024, 4), 30);
        assert_eq!(service.days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_generate_calendar_month_overlays_one_indicator_per_task() {
        let service = setup_test();
        let board = TaskBoard::empty().with_tasks(&[
            task(1, date(2024, 6, 3), "#FF6B6B"),
            task(2, date(2024, 6, 3), "#FF6B6B"),
            task(3, date(2024, 6, 10), "#4ECDC4"),
            task(4, date(2024, 7, 1), "#4ECDC4"),
        ]);

        let month = service
            .generate_calendar_month(2024, 6, &board, date(2024, 6, 10))
            .unwrap();

        // June 1 2024 is a Saturday
        assert_eq!(month.first_day_of_week, 6);
        assert_eq!(month.month_name, "June");
        assert_eq!(month.days.len(), 6 + 30);

        let day = |n: u32| month.days.iter().find(|d| d.day == n && d.day_type == CalendarDayType::MonthDay).unwrap();
        assert_eq!(day(3).indicators.len(), 2);
        assert_eq!(day(10).indicators[0].color, "#4ECDC4");
        assert!(day(10).is_today);
        assert!(!day(3).is_today);
        assert_eq!(month.days.iter().map(|d| d.indicators.len()).sum::<usize>(), 3);
        assert_eq!(month.previous, MonthYear { month: 5, year: 2024 });
        assert_eq!(month.next, MonthYear { month: 7, year: 2024 });
    }

    #[test]
    fn test_generate_calendar_month_links_across_years() {
        let service = setup_test();
        let month = service
            .generate_calendar_month(2024, 12, &TaskBoard::empty(), date(2024, 6, 10))
            .unwrap();

        assert_eq!(month.previous, MonthYear { month: 11, year: 2024 });
        assert_eq!(month.next, MonthYear { month: 1, year: 2025 });
        assert!(month.days.iter().all(|d| !d.is_today));
    }

    #[test]
    fn test_month_navigation() {
        let service = setup_test();
        assert_eq!(service.previous_month(1, 2024), (12, 2023));
        assert_eq!(service.previous_month(6, 2024), (5, 2024));
        assert_eq!(service.next_month(12, 2024), (1, 2025));
        assert_eq!(service.next_month(6, 2024), (7, 2024));
    }

    #[test]
    fn test_month_bounds() {
        let service = setup_test();
        assert_eq!(
            service.month_bounds(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
    }

    #[test]
    fn test_get_current_date() {
        let service = setup_test();
        let response = service.get_current_date(date(2024, 6, 3));
        assert_eq!(response.formatted_date, "June 3, 2024");
        assert_eq!(response.iso_date, "2024-06-03");
        assert_eq!(response.month, 6);
        assert_eq!(response.year, 2024);
    }
}
