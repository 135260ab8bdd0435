use crate::calendar::{build_month_grid, date_key, day_of, parse_date, YearMonth};
use crate::errors::AppError;
use crate::ledger::{Entry, EntryKind};
use crate::models::{
    CalendarCellResponse, CalendarQuery, CalendarResponse, CreatedEntryResponse,
    DailySummaryResponse, DeletedEntryResponse, EntriesQuery, EntriesResponse, EntryResponse,
    NewEntryRequest,
};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::info;
use uuid::Uuid;

pub async fn get_today(State(state): State<AppState>) -> Result<Json<DailySummaryResponse>, AppError> {
    let date = today();
    let ledger = state.ledger.lock().await;
    Ok(Json(DailySummaryResponse::for_date(date, ledger.summary_for(date))))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = today();
    let month = match query.month.as_deref() {
        Some(value) => value.parse::<YearMonth>()?,
        None => YearMonth::containing(today),
    };
    let selected = optional_date(query.selected.as_deref(), today)?;

    let ledger = state.ledger.lock().await;
    let cells = build_month_grid(&ledger, month, selected, today);

    Ok(Json(CalendarResponse {
        month: month.to_string(),
        prev_month: month.prev().to_string(),
        next_month: month.next().to_string(),
        today: date_key(today),
        selected: date_key(selected),
        cells: cells.iter().map(CalendarCellResponse::from).collect(),
    }))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<EntriesResponse>, AppError> {
    let date = optional_date(query.date.as_deref(), today())?;
    let ledger = state.ledger.lock().await;

    Ok(Json(EntriesResponse {
        date: date_key(date),
        entries: ledger
            .entries_for_date(date)
            .iter()
            .map(EntryResponse::from)
            .collect(),
        summary: DailySummaryResponse::for_date(date, ledger.summary_for(date)),
    }))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<CreatedEntryResponse>), AppError> {
    let kind = payload.kind.trim().parse::<EntryKind>()?;
    let date = optional_date(payload.date.as_deref(), today())?;
    let entry = Entry::new(
        Uuid::new_v4().to_string(),
        date,
        kind,
        payload.title.trim(),
        payload.points,
    );
    let created = EntryResponse::from(&entry);

    let mut ledger = state.ledger.lock().await;
    let summary = DailySummaryResponse::for_date(date, ledger.add_entry(entry)?);
    info!(id = %created.id, %date, kind = kind.as_str(), points = created.points, "entry added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedEntryResponse {
            entry: created,
            summary,
        }),
    ))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedEntryResponse>, AppError> {
    let mut ledger = state.ledger.lock().await;
    let not_found = || AppError::not_found(format!("entry not found: {id}"));

    let date = ledger.find_entry(&id).map(|entry| entry.date).ok_or_else(not_found)?;
    let removed = ledger.remove_entry(&id, date).ok_or_else(not_found)?;
    info!(%id, %date, "entry deleted");

    Ok(Json(DeletedEntryResponse {
        deleted: EntryResponse::from(&removed),
        summary: DailySummaryResponse::for_date(date, ledger.summary_for(date)),
    }))
}

fn optional_date(value: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate, AppError> {
    match value {
        Some(value) => Ok(parse_date(value)?),
        None => Ok(fallback),
    }
}

fn today() -> NaiveDate {
    day_of(&Local::now())
}
