//! Day-keyed merit/demerit entries and the daily summaries derived from them.
//!
//! Summaries are never adjusted incrementally: every mutation of a date's
//! entry list ends with [`Ledger::recompute_summary`] for that date, which
//! sums the list from scratch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Polarity of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Point-earning entry.
    Merit,
    /// Point-losing entry.
    Demerit,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merit => "merit",
            Self::Demerit => "demerit",
        }
    }
}

impl FromStr for EntryKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "merit" => Ok(Self::Merit),
            "demerit" => Ok(Self::Demerit),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

/// A single point transaction recorded against a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub title: String,
    /// Always > 0; polarity comes from `kind`.
    pub points: u32,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        kind: EntryKind,
        title: impl Into<String>,
        points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind,
            title: title.into(),
            points,
            created_at: Utc::now(),
        }
    }

    pub fn signed_points(&self) -> i64 {
        match self.kind {
            EntryKind::Merit => i64::from(self.points),
            EntryKind::Demerit => -i64::from(self.points),
        }
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.points == 0 {
            return Err(LedgerError::InvalidPoints(self.points));
        }
        if self.title.trim().is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        Ok(())
    }
}

/// Totals for one date, partitioned by polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub merit: u64,
    pub demerit: u64,
}

impl DailySummary {
    pub fn net(&self) -> i64 {
        self.merit as i64 - self.demerit as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    InvalidPoints(u32),
    EmptyTitle,
    DuplicateId(String),
    InvalidKind(String),
    InvalidDate(String),
    InvalidMonth(String),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPoints(points) => {
                write!(f, "points must be a positive integer, got {points}")
            }
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::DuplicateId(id) => write!(f, "entry id already exists: {id}"),
            Self::InvalidKind(value) => {
                write!(f, "kind must be 'merit' or 'demerit', got '{value}'")
            }
            Self::InvalidDate(value) => write!(f, "invalid date '{value}' (expected YYYY-MM-DD)"),
            Self::InvalidMonth(value) => write!(f, "invalid month '{value}' (expected YYYY-MM)"),
        }
    }
}

impl Error for LedgerError {}

/// Owns every entry and keeps the per-date summaries in step with them.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: BTreeMap<NaiveDate, Vec<Entry>>,
    summaries: BTreeMap<NaiveDate, DailySummary>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` to its date and returns the date's refreshed summary.
    ///
    /// Rejected entries (zero points, blank title, id already present) leave
    /// the ledger untouched.
    pub fn add_entry(&mut self, entry: Entry) -> Result<Option<&DailySummary>, LedgerError> {
        entry.validate()?;
        if self.find_entry(&entry.id).is_some() {
            return Err(LedgerError::DuplicateId(entry.id));
        }

        let date = entry.date;
        debug!(id = %entry.id, %date, kind = entry.kind.as_str(), points = entry.points, "adding entry");
        self.entries.entry(date).or_default().push(entry);
        Ok(self.recompute_summary(date))
    }

    /// Removes the entry `id` from `date`. Returns `None` if no such entry
    /// exists there; that is not an error.
    pub fn remove_entry(&mut self, id: &str, date: NaiveDate) -> Option<Entry> {
        let mut removed = None;
        let mut emptied = false;
        if let Some(list) = self.entries.get_mut(&date) {
            if let Some(index) = list.iter().position(|entry| entry.id == id) {
                removed = Some(list.remove(index));
            }
            emptied = list.is_empty();
        }
        if emptied {
            self.entries.remove(&date);
        }

        if removed.is_some() {
            debug!(%id, %date, "removed entry");
        }
        self.recompute_summary(date);
        removed
    }

    /// Rebuilds the summary for `date` from its current entries.
    ///
    /// Drops the summary when both totals are zero.
    pub fn recompute_summary(&mut self, date: NaiveDate) -> Option<&DailySummary> {
        let (merit, demerit) = self
            .entries
            .get(&date)
            .map(|list| tally(list))
            .unwrap_or((0, 0));

        if merit == 0 && demerit == 0 {
            self.summaries.remove(&date);
            return None;
        }

        self.summaries.insert(
            date,
            DailySummary {
                date,
                merit,
                demerit,
            },
        );
        self.summaries.get(&date)
    }

    /// Snapshot of the entries recorded on `date`, in insertion order.
    pub fn entries_for_date(&self, date: NaiveDate) -> Vec<Entry> {
        self.entries.get(&date).cloned().unwrap_or_default()
    }

    pub fn summary_for(&self, date: NaiveDate) -> Option<&DailySummary> {
        self.summaries.get(&date)
    }

    pub fn find_entry(&self, id: &str) -> Option<&Entry> {
        self.entries.values().flatten().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn tally(entries: &[Entry]) -> (u64, u64) {
    entries
        .iter()
        .fold((0u64, 0u64), |(merit, demerit), entry| match entry.kind {
            EntryKind::Merit => (merit.saturating_add(u64::from(entry.points)), demerit),
            EntryKind::Demerit => (merit, demerit.saturating_add(u64::from(entry.points))),
        })
}
