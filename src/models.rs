use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COMMISSION_RATE: f64 = 0.5;

pub const WEEKDAY_LABELS: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sab", "Dom"];

#[derive(Debug, Clone)]
pub struct Provider {
    pub name: &'static str,
    pub handle: &'static str,
    pub avatar_url: &'static str,
    pub rating: f64,
    pub review_count: u32,
    pub location: &'static str,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub duration_min: u32,
    pub price: u32,
    pub category: &'static str,
    pub image_url: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Professional {
    pub id: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub avatar_url: &'static str,
}

#[derive(Debug, Clone)]
pub struct LoyaltyProgram {
    pub enabled: bool,
    pub threshold: u32,
    pub reward_description: &'static str,
}

#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub id: String,
    pub professional_id: String,
    pub service_name: String,
    pub price: u32,
    pub weekday: usize, // index into WEEKDAY_LABELS
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub services: Vec<LedgerItem>,
    pub professional_id: String,
    pub professional_name: String,
    pub date: String,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_duration_min: u32,
    pub total_price: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerItem {
    pub id: String,
    pub name: String,
    pub duration_min: u32,
    pub price: u32,
}
