use crate::calendar::{date_key, CalendarCell};
use crate::ledger::{DailySummary, Entry, EntryKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NewEntryRequest {
    /// Defaults to today when omitted.
    pub date: Option<String>,
    pub kind: String,
    pub title: String,
    pub points: u32,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailySummaryResponse {
    pub date: String,
    pub merit: u64,
    pub demerit: u64,
    pub net: i64,
}

impl DailySummaryResponse {
    /// Zero totals when `summary` is absent.
    pub fn for_date(date: NaiveDate, summary: Option<&DailySummary>) -> Self {
        let (merit, demerit) = summary
            .map(|summary| (summary.merit, summary.demerit))
            .unwrap_or((0, 0));
        Self {
            date: date_key(date),
            merit,
            demerit,
            net: merit as i64 - demerit as i64,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: String,
    pub date: String,
    pub kind: EntryKind,
    pub title: String,
    pub points: u32,
    pub signed_points: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Entry> for EntryResponse {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            date: date_key(entry.date),
            kind: entry.kind,
            title: entry.title.clone(),
            points: entry.points,
            signed_points: entry.signed_points(),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub date: String,
    pub entries: Vec<EntryResponse>,
    pub summary: DailySummaryResponse,
}

#[derive(Debug, Serialize)]
pub struct CreatedEntryResponse {
    pub entry: EntryResponse,
    pub summary: DailySummaryResponse,
}

#[derive(Debug, Serialize)]
pub struct DeletedEntryResponse {
    pub deleted: EntryResponse,
    pub summary: DailySummaryResponse,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarCellResponse {
    Blank,
    Day {
        day: u32,
        date: String,
        is_today: bool,
        is_selected: bool,
        summary: Option<DailySummaryResponse>,
    },
}

impl From<&CalendarCell<'_>> for CalendarCellResponse {
    fn from(cell: &CalendarCell<'_>) -> Self {
        match cell {
            CalendarCell::Blank => Self::Blank,
            CalendarCell::Day(day) => Self::Day {
                day: day.day,
                date: date_key(day.date),
                is_today: day.is_today,
                is_selected: day.is_selected,
                summary: day
                    .summary
                    .map(|summary| DailySummaryResponse::for_date(day.date, Some(summary))),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub prev_month: String,
    pub next_month: String,
    pub today: String,
    pub selected: String,
    pub cells: Vec<CalendarCellResponse>,
}
