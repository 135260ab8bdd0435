pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod sample;
pub mod state;

pub use app::router;
pub use calendar::{build_month_grid, CalendarCell, CalendarDay, YearMonth};
pub use config::AppConfig;
pub use ledger::{DailySummary, Entry, EntryKind, Ledger, LedgerError};
pub use state::AppState;
