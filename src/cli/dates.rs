use chrono::{Datelike, NaiveDate};

use crate::tracker::{entities::MonthKey, error::TrackerError};

/// Month selection from flags. Missing parts are taken from today.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct MonthArgs {
    #[arg(short, long, help = "Month to use, 1 to 12. Defaults to the current month")]
    pub month: Option<u32>,
    #[arg(short, long, help = "Year to use. Defaults to the current year")]
    pub year: Option<i32>,
}

impl MonthArgs {
    pub fn resolve(&self, today: NaiveDate) -> Result<MonthKey, TrackerError> {
        MonthKey::new(
            self.month.unwrap_or(today.month()),
            self.year.unwrap_or(today.year()),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct DateArgs {
    #[arg(short, long, help = "Day of month to use. Defaults to today")]
    pub day: Option<u32>,
    #[command(flatten)]
    pub month: MonthArgs,
}

impl DateArgs {
    /// Resolves the month and, if `--day` was given, the full date it points to.
    pub fn resolve(
        &self,
        today: NaiveDate,
    ) -> Result<(MonthKey, Option<NaiveDate>), TrackerError> {
        let month = self.month.resolve(today)?;
        let date = self
            .day
            .map(|day| {
                NaiveDate::from_ymd_opt(month.year, month.month, day)
                    .ok_or_else(|| TrackerError::InvalidDate(format!("{day}.{month}")))
            })
            .transpose()?;
        Ok((month, date))
    }
}
