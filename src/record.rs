//! Saved charts.
//!
//! A [`HistoryRecord`] pairs a finished chart with whatever narrative text
//! was produced for it. Storage itself lives behind [`HistoryStore`];
//! [`MemoryStore`] keeps records in process.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bazi::{Chart, Gender};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub name: String,
    pub gender: Gender,
    /// `YYYY-MM-DD HH:MM` as entered, before any correction.
    pub birth: String,
    pub chart: Chart,
    /// Narrative text keyed by report section key.
    #[serde(default)]
    pub report: BTreeMap<String, String>,
}

impl HistoryRecord {
    /// A record for `chart`, keyed by the chart id and stamped now.
    pub fn new(chart: Chart, report: BTreeMap<String, String>) -> Self {
        Self {
            id: chart.id.clone(),
            saved_at: Utc::now(),
            name: chart.name.clone(),
            gender: chart.gender,
            birth: chart.birth.to_string(),
            chart,
            report,
        }
    }
}

pub trait HistoryStore {
    /// Inserts or replaces the record with the same id.
    fn put(&mut self, record: HistoryRecord) -> Result<()>;
    /// All records, most recently saved first.
    fn list(&self) -> Result<Vec<HistoryRecord>>;
    /// Removes a record; `Ok(false)` if there was none.
    fn delete(&mut self, id: &str) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, HistoryRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for MemoryStore {
    fn put(&mut self, record: HistoryRecord) -> Result<()> {
        debug!(id = %record.id, name = %record.name, "saving chart");
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryRecord>> {
        let mut all: Vec<_> = self.records.values().cloned().collect();
        all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::bazi::{BirthTime, ChartRequest, generate_chart};
    use chrono::Duration;

    fn record(name: &str, age_minutes: i64) -> HistoryRecord {
        let request = ChartRequest::new(name, Gender::Male, BirthTime::new(1988, 3, 12, 9, 30));
        let chart = generate_chart(&request, &Config::default()).unwrap();
        let mut r = HistoryRecord::new(chart, BTreeMap::new());
        r.saved_at -= Duration::minutes(age_minutes);
        r
    }

    #[test]
    fn record_shape() {
        let r = record("王五", 0);
        assert_eq!(r.chart.id, r.id);
        assert_eq!("1988-03-12 09:30", r.birth);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!("male", json["gender"]);
        assert!(json["report"].as_object().unwrap().is_empty());
    }

    #[test]
    fn newest_first() {
        let mut store = MemoryStore::new();
        store.put(record("旧", 30)).unwrap();
        store.put(record("新", 1)).unwrap();
        store.put(record("中", 10)).unwrap();
        let names: Vec<_> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(vec!["新", "中", "旧"], names);
    }

    #[test]
    fn put_replaces_and_delete_removes() {
        let mut store = MemoryStore::new();
        let mut r = record("赵六", 0);
        store.put(r.clone()).unwrap();
        r.report.insert("summary".into(), "命局总评".into());
        store.put(r.clone()).unwrap();
        assert_eq!(1, store.len());
        assert_eq!(r.report, store.list().unwrap()[0].report);

        assert!(store.delete(&r.id).unwrap());
        assert!(!store.delete(&r.id).unwrap());
        assert!(store.is_empty());
    }
}
