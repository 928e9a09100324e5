use chrono::{Datelike, NaiveDate};

use crate::utils::percentage::Percentage;

use super::{
    config::TrackerConfig,
    entities::{MonthKey, MonthRecord, Status},
};

/// State of today's entry, only meaningful when the report is for the current month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodayBanner {
    NotSet,
    Set,
    /// Today is not a tracked day of this month.
    CannotSet,
    NotCurrentMonth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Day key as stored.
    pub day: String,
    pub status: Status,
    pub is_today: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
}

impl Completion {
    pub fn count<'a>(statuses: impl Iterator<Item = &'a Status>, complete: &[Status]) -> Self {
        let mut completion = Completion {
            completed: 0,
            total: 0,
        };
        for status in statuses {
            completion.total += 1;
            if complete.contains(status) {
                completion.completed += 1;
            }
        }
        completion
    }

    pub fn percentage(&self) -> Percentage {
        Percentage::of(self.completed, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthReport {
    pub month: MonthKey,
    pub banner: TodayBanner,
    /// Ordered by day of month.
    pub rows: Vec<ReportRow>,
    pub fair: Completion,
    pub unfair: Option<Completion>,
}

impl MonthReport {
    pub fn build(
        month: MonthKey,
        record: &MonthRecord,
        today: NaiveDate,
        config: &TrackerConfig,
    ) -> Self {
        let is_current_month = month.contains(today);

        let banner = if !is_current_month {
            TodayBanner::NotCurrentMonth
        } else {
            match record.get(today.day()) {
                Some(status) if status.is_unset() => TodayBanner::NotSet,
                Some(_) => TodayBanner::Set,
                None => TodayBanner::CannotSet,
            }
        };

        let today_key = today.day().to_string();
        let rows = record
            .by_day()
            .into_iter()
            .map(|(day, status)| ReportRow {
                day: day.to_string(),
                status: status.clone(),
                is_today: is_current_month && day == today_key,
            })
            .collect();

        let fair = Completion::count(record.values(), &config.fair_values);
        let unfair = config
            .unfair_values
            .as_ref()
            .map(|values| Completion::count(record.values(), values));

        Self {
            month,
            banner,
            rows,
            fair,
            unfair,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::Result;
    use chrono::NaiveDate;

    use crate::tracker::{
        config::{Preset, TrackerConfig},
        entities::{MonthKey, MonthRecord, Status},
    };

    use super::{MonthReport, TodayBanner};

    fn config(preset: Preset) -> TrackerConfig {
        TrackerConfig::from_preset(preset, Path::new("/tmp"))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_banner_states() -> Result<()> {
        let month = MonthKey::new(6, 2024)?;
        let mut record = MonthRecord::unset([3, 4]);
        record.insert(4, Status::Yes);
        let config = config(Preset::Extended);

        let report = |today| MonthReport::build(month, &record, today, &config).banner;
        assert_eq!(report(date(2024, 6, 3)), TodayBanner::NotSet);
        assert_eq!(report(date(2024, 6, 4)), TodayBanner::Set);
        assert_eq!(report(date(2024, 6, 9)), TodayBanner::CannotSet);
        assert_eq!(report(date(2024, 7, 3)), TodayBanner::NotCurrentMonth);
        assert_eq!(report(date(2023, 6, 3)), TodayBanner::NotCurrentMonth);
        Ok(())
    }

    #[test]
    fn test_rows_are_numeric_and_mark_today() -> Result<()> {
        let month = MonthKey::new(6, 2024)?;
        let record = MonthRecord::unset([10, 2, 1, 21]);
        let report = MonthReport::build(month, &record, date(2024, 6, 10), &config(Preset::Extended));

        let days = report.rows.iter().map(|r| r.day.as_str()).collect::<Vec<_>>();
        assert_eq!(days, vec!["1", "2", "10", "21"]);
        let marked = report
            .rows
            .iter()
            .filter(|r| r.is_today)
            .map(|r| r.day.as_str())
            .collect::<Vec<_>>();
        assert_eq!(marked, vec!["10"]);
        Ok(())
    }

    #[test]
    fn test_fair_and_unfair_completion() -> Result<()> {
        let month = MonthKey::new(6, 2024)?;
        let mut record = MonthRecord::unset(1..=6);
        record.insert(1, Status::Yes);
        record.insert(2, Status::No);
        record.insert(3, Status::Cancel);
        record.insert(4, Status::Break);
        record.insert(5, Status::Other("vacation".into()));
        // day 6 stays none

        let extended = MonthReport::build(month, &record, date(2024, 7, 1), &config(Preset::Extended));
        assert_eq!(extended.fair.completed, 4);
        assert_eq!(extended.fair.total, 6);
        let unfair = extended.unfair.unwrap();
        assert_eq!(unfair.completed, 2);

        let classic = MonthReport::build(month, &record, date(2024, 7, 1), &config(Preset::Classic));
        assert_eq!(classic.fair.completed, 3);
        assert!(classic.unfair.is_none());
        Ok(())
    }

    #[test]
    fn test_empty_month_has_zero_completion() -> Result<()> {
        let month = MonthKey::new(6, 2024)?;
        let report = MonthReport::build(
            month,
            &MonthRecord::default(),
            date(2024, 6, 3),
            &config(Preset::Extended),
        );
        assert_eq!(*report.fair.percentage(), 0.);
        assert_eq!(*report.unfair.unwrap().percentage(), 0.);
        assert_eq!(report.banner, TodayBanner::CannotSet);
        Ok(())
    }
}
