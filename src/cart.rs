use crate::models::Service;

/// Selected services, kept in insertion order with ids unique. Totals are
/// recomputed on demand, which is fine at catalog scale.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<Service>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the service when it is already selected, appends it
    /// otherwise. Removal keeps the remaining items in order.
    pub fn toggle(&mut self, service: &Service) {
        if let Some(position) = self.items.iter().position(|item| item.id == service.id) {
            self.items.remove(position);
        } else {
            self.items.push(service.clone());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn items(&self) -> &[Service] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_duration_min(&self) -> u32 {
        self.items.iter().map(|item| item.duration_min).sum()
    }

    pub fn total_price(&self) -> u32 {
        self.items.iter().map(|item| item.price).sum()
    }

    /// "45 min", "1h" or "1h 30min".
    pub fn duration_label(&self) -> String {
        let total = self.total_duration_min();
        let hours = total / 60;
        let minutes = total % 60;
        if hours == 0 {
            format!("{minutes} min")
        } else if minutes == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {minutes}min")
        }
    }
}
