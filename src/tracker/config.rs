use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::anyhow;
use chrono::Weekday;

use super::entities::Status;

/// Set of weekdays that require a status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        (0..7u8)
            .filter_map(|i| Weekday::try_from(i).ok())
            .filter(|day| self.contains(*day))
    }
}

/// Monday to Saturday.
impl Default for WeekdaySet {
    fn default() -> Self {
        WeekdaySet::from_iter([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ])
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .iter()
            .map(|d| d.to_string().to_lowercase())
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(","))
    }
}

impl FromStr for WeekdaySet {
    type Err = anyhow::Error;

    /// Accepts comma separated names (`mon,tue`) or indices where 0 is Monday (`0,1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| match v.parse::<u8>() {
                Ok(index) => Weekday::try_from(index)
                    .map_err(|_| anyhow!("Weekday index {index} is out of range 0..=6")),
                Err(_) => v
                    .parse::<Weekday>()
                    .map_err(|_| anyhow!("Can't parse {v} into a weekday")),
            })
            .collect()
    }
}

/// Two behaviours the tracker historically shipped with. Each keeps its own store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Includes `break`, reports both fair and unfair completion, keeps the store sorted.
    #[default]
    Extended,
    /// Older value set without `break` and with a single completion metric.
    Classic,
}

impl Preset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Preset::Extended => "trackedDataSimple.json",
            Preset::Classic => "trackedData.json",
        }
    }
}

/// Everything that changes how the tracker behaves. Passed into
/// [Tracker](super::Tracker) on construction.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub store_path: PathBuf,
    pub tracked_weekdays: WeekdaySet,
    /// Values `set` accepts.
    pub allowed_values: Vec<Status>,
    /// Allows writing the `none` sentinel explicitly, which effectively clears a day.
    pub allow_none_write: bool,
    /// Rejects writes to a day that already holds a value other than `none`.
    pub one_set_per_day: bool,
    /// Values counted as complete for the primary metric.
    pub fair_values: Vec<Status>,
    /// Values counted as complete for the strict metric. [None] disables it.
    pub unfair_values: Option<Vec<Status>>,
    pub sort_after_init: bool,
}

impl TrackerConfig {
    /// Defaults of `preset` with the store file placed in `store_dir`.
    pub fn from_preset(preset: Preset, store_dir: &Path) -> Self {
        let store_path = store_dir.join(preset.file_name());
        match preset {
            Preset::Extended => Self {
                store_path,
                tracked_weekdays: WeekdaySet::default(),
                allowed_values: vec![
                    Status::No,
                    Status::Yes,
                    Status::Sick,
                    Status::Cancel,
                    Status::Break,
                ],
                allow_none_write: false,
                one_set_per_day: false,
                fair_values: vec![Status::Yes, Status::Cancel, Status::None, Status::Break],
                unfair_values: Some(vec![Status::Yes, Status::None]),
                sort_after_init: true,
            },
            Preset::Classic => Self {
                store_path,
                tracked_weekdays: WeekdaySet::default(),
                allowed_values: vec![Status::No, Status::Yes, Status::Sick, Status::Cancel],
                allow_none_write: false,
                one_set_per_day: false,
                fair_values: vec![Status::Yes, Status::Cancel, Status::None],
                unfair_values: None,
                sort_after_init: false,
            },
        }
    }

    pub fn is_allowed(&self, value: &Status) -> bool {
        (self.allow_none_write && value.is_unset()) || self.allowed_values.contains(value)
    }
}
