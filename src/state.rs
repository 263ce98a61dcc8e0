use std::collections::HashMap;
use std::sync::atomic::AtomicU32;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::assistant::Assistant;
use crate::catalog::Catalog;
use crate::models::BookingRecord;
use crate::store::BookingLedger;
use crate::wizard::Wizard;

/// Sessions untouched for this long are dropped on the next sweep.
pub const SESSION_IDLE_LIMIT: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub reports: Arc<Vec<BookingRecord>>,
    pub visits: Arc<AtomicU32>,
    pub sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
    pub ledger: BookingLedger,
    pub assistant: Assistant,
}

/// One visitor's booking flow, keyed by the session cookie.
pub struct Session {
    pub wizard: Wizard,
    pub touched_at: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self {
            wizard: Wizard::new(),
            touched_at: Instant::now(),
        }
    }

    pub fn idle(&self) -> bool {
        self.touched_at.elapsed() > SESSION_IDLE_LIMIT
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
