use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::TrackerError;

/// Identifies a tracked month. Serialized as an unpadded `month.year` string, for example
/// `3.2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub month: u32,
    pub year: i32,
}

impl MonthKey {
    pub fn new(month: u32, year: i32) -> Result<Self, TrackerError> {
        if (1..=12).contains(&month) {
            Ok(Self { month, year })
        } else {
            Err(TrackerError::InvalidMonthKey(format!("{month}.{year}")))
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.month, self.year)
    }
}

impl FromStr for MonthKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, year) =
            split_month_key(s).ok_or_else(|| TrackerError::InvalidMonthKey(s.to_string()))?;
        let month = u32::try_from(month).map_err(|_| TrackerError::InvalidMonthKey(s.to_string()))?;
        MonthKey::new(month, year).map_err(|_| TrackerError::InvalidMonthKey(s.to_string()))
    }
}

/// Splits a raw store key on `.` into `(month, year)`. Only checks that both halves are
/// integers, so keys with out of range months still get an order.
fn split_month_key(key: &str) -> Option<(i64, i32)> {
    let (month, year) = key.split_once('.')?;
    let month = month.trim().parse::<i64>().ok()?;
    let year = year.trim().parse::<i32>().ok()?;
    Some((month, year))
}

/// Month selection as typed by a user: either an explicit key or `t` for the month of today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthTarget {
    Current,
    Key(MonthKey),
}

impl MonthTarget {
    pub fn resolve(self, today: NaiveDate) -> MonthKey {
        match self {
            MonthTarget::Current => MonthKey::of(today),
            MonthTarget::Key(key) => key,
        }
    }
}

impl FromStr for MonthTarget {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("t") || s.eq_ignore_ascii_case("today") {
            Ok(MonthTarget::Current)
        } else {
            s.parse().map(MonthTarget::Key)
        }
    }
}

/// Outcome of a single tracked day.
///
/// Values read from the store are classified exactly, so a hand edited `YES` stays
/// [Status::Other] and is written back untouched. Values typed by a user are parsed with
/// `From<&str>`, which ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Status {
    /// Unset sentinel every tracked day starts with.
    None,
    Yes,
    No,
    Sick,
    Cancel,
    Break,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::None => "none",
            Status::Yes => "yes",
            Status::No => "no",
            Status::Sick => "sick",
            Status::Cancel => "cancel",
            Status::Break => "break",
            Status::Other(v) => v,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Status::None)
    }

    fn from_stored(value: String) -> Self {
        match value.as_str() {
            "none" => Status::None,
            "yes" => Status::Yes,
            "no" => Status::No,
            "sick" => Status::Sick,
            "cancel" => Status::Cancel,
            "break" => Status::Break,
            _ => Status::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Status::from_stored)
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match Status::from_stored(value.trim().to_lowercase()) {
            Status::Other(_) => Status::Other(value.to_string()),
            known => known,
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::from(value.as_str())
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        match value {
            Status::Other(v) => v,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statuses of one month keyed by day of month. Only tracked days are present.
///
/// Day keys are kept as written and in document order, so a key like `01` survives a save.
/// [MonthRecord::by_day] gives the calendar order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthRecord {
    days: Vec<(String, Status)>,
}

impl Serialize for MonthRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ordered_entries::serialize(&self.days, serializer)
    }
}

impl<'de> Deserialize<'de> for MonthRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ordered_entries::deserialize(deserializer).map(|days| MonthRecord { days })
    }
}

impl MonthRecord {
    /// Record with every given day set to [Status::None].
    pub fn unset(days: impl IntoIterator<Item = u32>) -> Self {
        days.into_iter()
            .map(|day| (day.to_string(), Status::None))
            .collect()
    }

    pub fn get(&self, day: u32) -> Option<&Status> {
        let key = day.to_string();
        self.days.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, day: u32) -> Option<&mut Status> {
        let key = day.to_string();
        self.days
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Replaces the status in place if the day exists, otherwise appends it.
    pub fn insert(&mut self, day: u32, status: Status) {
        match self.get_mut(day) {
            Some(existing) => *existing = status,
            None => self.days.push((day.to_string(), status)),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &Status> {
        self.days.iter().map(|(_, v)| v)
    }

    /// Entries ordered by day number. Keys that aren't numbers go last in document order.
    pub fn by_day(&self) -> Vec<(&str, &Status)> {
        let mut days = self
            .days
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect::<Vec<_>>();
        days.sort_by_key(|(key, _)| match key.trim().parse::<u32>() {
            Ok(day) => (false, day),
            Err(_) => (true, 0),
        });
        days
    }
}

impl FromIterator<(String, Status)> for MonthRecord {
    fn from_iter<T: IntoIterator<Item = (String, Status)>>(iter: T) -> Self {
        let mut record = MonthRecord::default();
        for (key, status) in iter {
            match record.days.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = status,
                None => record.days.push((key, status)),
            }
        }
        record
    }
}

/// Whole persisted document. Keys are kept as raw strings in the order they were loaded or
/// inserted, because the on-disk order is only changed by [TrackedStore::sort_chronologically].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedStore {
    months: Vec<(String, MonthRecord)>,
}

impl Serialize for TrackedStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ordered_entries::serialize(&self.months, serializer)
    }
}

impl<'de> Deserialize<'de> for TrackedStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        ordered_entries::deserialize(deserializer).map(|months| TrackedStore { months })
    }
}

impl TrackedStore {
    pub fn get(&self, key: &str) -> Option<&MonthRecord> {
        self.months.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut MonthRecord> {
        self.months
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replaces the record in place if the key exists, otherwise appends it.
    pub fn insert(&mut self, key: String, record: MonthRecord) {
        match self.get_mut(&key) {
            Some(existing) => *existing = record,
            None => self.months.push((key, record)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<MonthRecord> {
        let index = self.months.iter().position(|(k, _)| k == key)?;
        Some(self.months.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.months.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MonthRecord)> {
        self.months.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Orders months by (year, month). Keys that aren't two integers go last, keeping their
    /// relative order.
    pub fn sort_chronologically(&mut self) {
        self.months.sort_by_key(|(key, _)| match split_month_key(key) {
            Some((month, year)) => (false, year, month),
            None => (true, 0, 0),
        });
    }
}

impl FromIterator<(String, MonthRecord)> for TrackedStore {
    fn from_iter<T: IntoIterator<Item = (String, MonthRecord)>>(iter: T) -> Self {
        let mut store = TrackedStore::default();
        for (key, record) in iter {
            store.insert(key, record);
        }
        store
    }
}

/// Serializes a list of keyed entries as a JSON object while keeping its order.
mod ordered_entries {
    use std::{fmt, marker::PhantomData};

    use serde::{
        de::{MapAccess, Visitor},
        ser::SerializeMap,
        Deserialize, Deserializer, Serialize, Serializer,
    };

    pub fn serialize<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Vec<(String, V)>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // Later duplicates win, same as any JSON object reader.
                    match entries.iter_mut().find(|(k, _)| *k == key) {
                        Some(existing) => existing.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use super::{MonthKey, MonthRecord, MonthTarget, Status, TrackedStore};

    fn store_with(keys: &[&str]) -> TrackedStore {
        keys.iter()
            .map(|k| (k.to_string(), MonthRecord::unset([1, 2])))
            .collect()
    }

    #[test]
    fn test_month_key_parse_and_display() -> Result<()> {
        let key: MonthKey = "3.2024".parse()?;
        assert_eq!(key, MonthKey { month: 3, year: 2024 });
        assert_eq!(key.to_string(), "3.2024");
        assert!("13.2024".parse::<MonthKey>().is_err());
        assert!("march.2024".parse::<MonthKey>().is_err());
        assert!("2024".parse::<MonthKey>().is_err());
        Ok(())
    }

    #[test]
    fn test_month_target_today_sentinel() -> Result<()> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!("t".parse::<MonthTarget>()?, MonthTarget::Current);
        assert_eq!(
            "t".parse::<MonthTarget>()?.resolve(today),
            MonthKey { month: 6, year: 2024 }
        );
        assert_eq!(
            "1.2023".parse::<MonthTarget>()?.resolve(today),
            MonthKey { month: 1, year: 2023 }
        );
        Ok(())
    }

    #[test]
    fn test_status_parsing_keeps_unknown_values() {
        assert_eq!(Status::from("YES"), Status::Yes);
        assert_eq!(Status::from("None"), Status::None);
        assert_eq!(Status::from("vacation"), Status::Other("vacation".into()));
        assert_eq!(String::from(Status::Other("vacation".into())), "vacation");
    }

    #[test]
    fn test_stored_status_is_kept_as_written() -> Result<()> {
        let record: MonthRecord = serde_json::from_str(r#"{"1": "YES", "2": "yes", "3": "No"}"#)?;
        assert_eq!(record.get(1), Some(&Status::Other("YES".into())));
        assert_eq!(record.get(2), Some(&Status::Yes));
        assert_eq!(
            serde_json::to_string(&record)?,
            r#"{"1":"YES","2":"yes","3":"No"}"#
        );
        Ok(())
    }

    #[test]
    fn test_day_keys_are_kept_as_written() -> Result<()> {
        let record: MonthRecord = serde_json::from_str(r#"{"10": "no", "x": "yes", "01": "none", "2": "yes"}"#)?;
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(10), Some(&Status::No));
        assert_eq!(
            record.by_day().iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec!["01", "2", "10", "x"]
        );
        assert_eq!(
            serde_json::to_string(&record)?,
            r#"{"10":"no","x":"yes","01":"none","2":"yes"}"#
        );
        Ok(())
    }

    #[test]
    fn test_store_keeps_document_order() -> Result<()> {
        let json = r#"{"3.2024": {"1": "yes"}, "1.2023": {"2": "none", "10": "no"}}"#;
        let store: TrackedStore = serde_json::from_str(json)?;
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["3.2024", "1.2023"]);

        let days = store
            .get("1.2023")
            .unwrap()
            .by_day()
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>();
        assert_eq!(days, vec!["2", "10"]);

        let written = serde_json::to_string(&store)?;
        assert_eq!(
            written,
            r#"{"3.2024":{"1":"yes"},"1.2023":{"2":"none","10":"no"}}"#
        );
        Ok(())
    }

    #[test]
    fn test_sort_chronologically() {
        let mut store = store_with(&["3.2024", "1.2023", "12.2023"]);
        store.sort_chronologically();
        assert_eq!(
            store.keys().collect::<Vec<_>>(),
            vec!["1.2023", "12.2023", "3.2024"]
        );

        let once = store.clone();
        store.sort_chronologically();
        assert_eq!(store, once);
    }

    #[test]
    fn test_sort_puts_invalid_keys_last_in_stable_order() {
        let mut store = store_with(&["zeta", "5.2024", "alpha", "1.2024", "x.y"]);
        store.sort_chronologically();
        assert_eq!(
            store.keys().collect::<Vec<_>>(),
            vec!["1.2024", "5.2024", "zeta", "alpha", "x.y"]
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut store = store_with(&["1.2024", "2.2024"]);
        store.insert("1.2024".into(), MonthRecord::unset([5]));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["1.2024", "2.2024"]);
        assert_eq!(store.get("1.2024"), Some(&MonthRecord::unset([5])));
    }
}
