use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::models::LedgerEntry;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only booking ledger kept as one pretty-printed JSON array.
/// Small enough for a demo shop that rewriting the whole file per
/// booking is fine.
#[derive(Debug, Clone)]
pub struct BookingLedger {
    path: PathBuf,
}

impl BookingLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file is an empty ledger. A corrupt file is logged and
    /// treated as empty so one bad write never bricks the shop.
    pub fn read_all(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                log::warn!("Booking ledger at {:?} is unreadable, starting over: {err}", self.path);
                Ok(Vec::new())
            }
        }
    }

    pub fn append(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.push(entry.clone());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerItem;

    fn entry(id: &str, price: u32) -> LedgerEntry {
        LedgerEntry {
            id: id.to_string(),
            services: vec![LedgerItem {
                id: "3".to_string(),
                name: "Corte".to_string(),
                duration_min: 30,
                price,
            }],
            professional_id: "p1".to_string(),
            professional_name: "Iwlys".to_string(),
            date: "2026-08-21".to_string(),
            time: "09:00".to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: "(73) 99999-1234".to_string(),
            total_duration_min: 30,
            total_price: price,
            created_at: "2026-08-20T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_appends_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = BookingLedger::new(dir.path().join("bookings.json"));
        ledger.append(&entry("a", 35)).unwrap();
        ledger.append(&entry("b", 55)).unwrap();
        let entries = ledger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "a");
        assert_eq!(entries[1].id, "b");
        assert_eq!(entries[1].total_price, 55);
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = BookingLedger::new(dir.path().join("nope").join("bookings.json"));
        assert!(ledger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");
        fs::write(&path, "{ not json").unwrap();
        let ledger = BookingLedger::new(&path);
        assert!(ledger.read_all().unwrap().is_empty());
        ledger.append(&entry("fresh", 40)).unwrap();
        assert_eq!(ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
