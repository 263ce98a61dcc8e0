use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Catalog;
use crate::models::{BookingRecord, WEEKDAY_LABELS};

pub const DEFAULT_SEED: u64 = 1704067200;
pub const DEMO_BOOKINGS: usize = 150;

/// The returning customer the home page greets.
pub const SEED_VISITS: u32 = 9;

/// Synthetic week of finished bookings for the dashboard. Deterministic
/// for a given seed so restarts show the same numbers.
pub fn seeded_bookings(catalog: &Catalog, seed: u64, count: usize) -> Vec<BookingRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let now = Utc::now();
    (0..count)
        .map(|i| {
            let professional = &catalog.professionals[rng.gen_range(0..catalog.professionals.len())];
            let weekday = rng.gen_range(0..WEEKDAY_LABELS.len());
            let price = rng.gen_range(30u32..=150);
            let service_name = if price > 80 { "Combo Completo" } else { "Corte/Barba" };
            let minutes_ago = rng.gen_range(0..10_080);
            BookingRecord {
                id: format!("demo-{i}"),
                professional_id: professional.id.to_string(),
                service_name: service_name.to_string(),
                price,
                weekday,
                created_at: now - Duration::minutes(minutes_ago),
            }
        })
        .collect()
}
