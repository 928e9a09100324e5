//! Tracker is organized around a single JSON document, [entities::TrackedStore].
//! The basic idea is:
//!  - Every month gets a record once, with an entry for each tracked weekday.
//!  - Entries start as `none` and are set one day at a time.
//!  - Every operation loads the whole document and, if it changed, writes the whole document.
//!
//! [Tracker] binds a [store::TrackedStoreAccess] to a [config::TrackerConfig] and a
//! [Clock] and exposes the operations the CLI needs.

pub mod calendar;
pub mod config;
pub mod entities;
pub mod error;
pub mod report;
pub mod store;

use chrono::{Datelike, NaiveDate};
use config::TrackerConfig;
use entities::{MonthKey, MonthRecord, Status};
use error::TrackerError;
use report::{Completion, MonthReport};
use store::TrackedStoreAccess;
use tracing::{debug, info, instrument, warn};

use crate::utils::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created { tracked_days: usize },
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

pub struct Tracker<S: TrackedStoreAccess> {
    store: S,
    config: TrackerConfig,
    date_provider: Box<dyn Clock>,
}

impl<S: TrackedStoreAccess> Tracker<S> {
    pub fn new(store: S, config: TrackerConfig, date_provider: Box<dyn Clock>) -> Self {
        Self {
            store,
            config,
            date_provider,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.date_provider.today()
    }

    /// Creates the record for `month` unless one already exists. Existing records are never
    /// overwritten, and nothing is written in that case.
    #[instrument(skip_all, fields(month = %month))]
    pub async fn init_month(&self, month: MonthKey) -> Result<InitOutcome, TrackerError> {
        let mut data = self.store.load_or_default().await?;
        let key = month.to_string();

        if data.contains(&key) {
            debug!("Data for {key} already exists. No changes made");
            return Ok(InitOutcome::AlreadyExists);
        }

        let days = calendar::tracked_days(month, &self.config.tracked_weekdays)?;
        let tracked_days = days.len();
        data.insert(key, MonthRecord::unset(days));
        if self.config.sort_after_init {
            data.sort_chronologically();
        }
        self.store.save(&data).await?;

        info!("Added month with {tracked_days} tracked days");
        Ok(InitOutcome::Created { tracked_days })
    }

    /// Same as [Tracker::init_month] for the month of today.
    pub async fn init_current_month(&self) -> Result<InitOutcome, TrackerError> {
        self.init_month(MonthKey::of(self.today())).await
    }

    /// Writes `value` for `day` of `month`. When `day` is [None] the day of month of today is
    /// used.
    #[instrument(skip_all, fields(month = %month, value = %value))]
    pub async fn set_day(
        &self,
        month: MonthKey,
        day: Option<u32>,
        value: Status,
    ) -> Result<(), TrackerError> {
        let day = day.unwrap_or_else(|| self.today().day());
        let key = month.to_string();

        let mut data = self.store.load().await?;
        let record = data
            .get_mut(&key)
            .ok_or_else(|| TrackerError::MonthNotInitialized(key.clone()))?;

        let current = record.get_mut(day).ok_or_else(|| TrackerError::DayNotTracked {
            month: key.clone(),
            day,
        })?;

        if !self.config.is_allowed(&value) {
            return Err(TrackerError::ValueNotAllowed(value.to_string()));
        }

        if self.config.one_set_per_day && !current.is_unset() {
            return Err(TrackerError::AlreadySet {
                month: key,
                day,
                current: current.to_string(),
            });
        }

        *current = value;
        self.store.save(&data).await?;
        info!("Set day {day}");
        Ok(())
    }

    pub async fn get_month(&self, month: MonthKey) -> Result<MonthRecord, TrackerError> {
        let key = month.to_string();
        let mut data = self.store.load().await?;
        data.remove(&key)
            .ok_or(TrackerError::MonthNotInitialized(key))
    }

    /// Builds the report for `month`. `reference` is the day treated as "today", which is the
    /// real date unless the caller overrides it.
    pub async fn month_report(
        &self,
        month: MonthKey,
        reference: Option<NaiveDate>,
    ) -> Result<MonthReport, TrackerError> {
        let record = self.get_month(month).await?;
        let reference = reference.unwrap_or_else(|| self.today());
        Ok(MonthReport::build(month, &record, reference, &self.config))
    }

    /// Reorders the store chronologically and writes it back.
    #[instrument(skip(self))]
    pub async fn sort(&self) -> Result<(), TrackerError> {
        let mut data = self.store.load().await?;
        data.sort_chronologically();
        self.store.save(&data).await?;
        debug!("Sorted {} months", data.len());
        Ok(())
    }

    #[instrument(skip_all, fields(month = %month))]
    pub async fn remove_month(&self, month: MonthKey) -> Result<RemoveOutcome, TrackerError> {
        let key = month.to_string();
        let mut data = self.store.load().await?;

        if data.remove(&key).is_none() {
            warn!("{key} not found, nothing removed");
            return Ok(RemoveOutcome::NotFound);
        }

        self.store.save(&data).await?;
        info!("Removed month {key}");
        Ok(RemoveOutcome::Removed)
    }

    /// Every stored month in store order with its primary completion. Keys that aren't valid
    /// month keys are listed too.
    pub async fn list_months(&self) -> Result<Vec<(String, Completion)>, TrackerError> {
        let data = self.store.load().await?;
        Ok(data
            .iter()
            .map(|(key, record)| {
                (
                    key.to_string(),
                    Completion::count(record.values(), &self.config.fair_values),
                )
            })
            .collect())
    }
}
