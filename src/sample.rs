use crate::ledger::{Entry, EntryKind, Ledger, LedgerError};
use chrono::{Duration, NaiveDate};

/// Starter records spread over the three days ending at `today`.
pub fn sample_entries(today: NaiveDate) -> Vec<Entry> {
    let yesterday = today - Duration::days(1);
    let day_before = today - Duration::days(2);

    vec![
        Entry::new("1", today, EntryKind::Merit, "Early morning workout", 5),
        Entry::new("2", today, EntryKind::Merit, "Read for 30 minutes", 3),
        Entry::new("3", today, EntryKind::Demerit, "Up late scrolling the phone", 2),
        Entry::new("4", yesterday, EntryKind::Merit, "Helped someone out", 10),
        Entry::new("5", day_before, EntryKind::Demerit, "Lost my temper", 5),
    ]
}

pub fn seed_ledger(today: NaiveDate) -> Result<Ledger, LedgerError> {
    let mut ledger = Ledger::new();
    for entry in sample_entries(today) {
        ledger.add_entry(entry)?;
    }
    Ok(ledger)
}
