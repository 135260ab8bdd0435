use crate::ledger::Ledger;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the one ledger; every mutation goes through this lock.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }
}
