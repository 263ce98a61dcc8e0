use crate::catalog::Catalog;
use crate::models::{BookingRecord, Professional, COMMISSION_RATE, WEEKDAY_LABELS};

/// Who the dashboard is rendered for. Owners see the whole shop,
/// professionals only their own bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleView {
    Owner,
    Professional(String),
}

impl RoleView {
    /// Parses the `view` query value. Unknown professional ids are
    /// rejected rather than silently shown an empty dashboard.
    pub fn parse(value: &str, catalog: &Catalog) -> Option<Self> {
        if value.is_empty() || value == "owner" {
            return Some(RoleView::Owner);
        }
        catalog
            .professional(value)
            .map(|p| RoleView::Professional(p.id.to_string()))
    }

    pub fn filter<'a>(&self, records: &'a [BookingRecord]) -> Vec<&'a BookingRecord> {
        match self {
            RoleView::Owner => records.iter().collect(),
            RoleView::Professional(id) => records
                .iter()
                .filter(|r| r.professional_id == *id)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub revenue: u32,
    pub count: usize,
    pub average_ticket: f64,
    pub commission: f64,
}

pub fn summarize(records: &[&BookingRecord]) -> Summary {
    let revenue: u32 = records.iter().map(|r| r.price).sum();
    let count = records.len();
    let average_ticket = if count == 0 {
        0.0
    } else {
        f64::from(revenue) / count as f64
    };
    Summary {
        revenue,
        count,
        average_ticket,
        commission: f64::from(revenue) * COMMISSION_RATE,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayRevenue {
    pub label: &'static str,
    pub revenue: u32,
    pub count: usize,
}

/// Revenue per weekday, Monday through Sunday. Always seven buckets so
/// the chart keeps its shape on quiet weeks.
pub fn weekday_breakdown(records: &[&BookingRecord]) -> Vec<WeekdayRevenue> {
    let mut buckets: Vec<WeekdayRevenue> = WEEKDAY_LABELS
        .iter()
        .map(|label| WeekdayRevenue {
            label,
            revenue: 0,
            count: 0,
        })
        .collect();
    for record in records {
        if let Some(bucket) = buckets.get_mut(record.weekday) {
            bucket.revenue += record.price;
            bucket.count += 1;
        }
    }
    buckets
}

#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub professional_id: String,
    pub name: String,
    pub revenue: u32,
    pub count: usize,
    pub share_percent: f64,
}

/// Professionals ranked by revenue, highest first. Shares sum to 100
/// except on an empty ledger, where everyone sits at zero.
pub fn team_ranking(records: &[BookingRecord], professionals: &[Professional]) -> Vec<TeamEntry> {
    let total: u32 = records.iter().map(|r| r.price).sum();
    let mut entries: Vec<TeamEntry> = professionals
        .iter()
        .map(|p| {
            let mine: Vec<&BookingRecord> =
                records.iter().filter(|r| r.professional_id == p.id).collect();
            let revenue: u32 = mine.iter().map(|r| r.price).sum();
            let share_percent = if total == 0 {
                0.0
            } else {
                f64::from(revenue) * 100.0 / f64::from(total)
            };
            TeamEntry {
                professional_id: p.id.to_string(),
                name: p.name.to_string(),
                revenue,
                count: mine.len(),
                share_percent,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    entries
}

/// Latest bookings first.
pub fn recent<'a>(records: &[&'a BookingRecord], limit: usize) -> Vec<&'a BookingRecord> {
    let mut sorted: Vec<&BookingRecord> = records.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(id: &str, professional_id: &str, price: u32, weekday: usize) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            professional_id: professional_id.to_string(),
            service_name: "Corte/Barba".to_string(),
            price,
            weekday,
            created_at: Utc::now() - Duration::minutes(price.into()),
        }
    }

    fn professional(id: &'static str, name: &'static str) -> Professional {
        Professional {
            id,
            name,
            role: "Barbeiro",
            avatar_url: "",
        }
    }

    #[test]
    fn test_summary_totals_and_average() {
        let records = vec![record("a", "p1", 30, 0), record("b", "p2", 80, 2)];
        let refs: Vec<&BookingRecord> = records.iter().collect();
        let summary = summarize(&refs);
        assert_eq!(summary.revenue, 110);
        assert_eq!(summary.count, 2);
        assert!((summary.average_ticket - 55.0).abs() < f64::EPSILON);
        assert!((summary.commission - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary_has_zero_average() {
        let summary = summarize(&[]);
        assert_eq!(summary.revenue, 0);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_ticket, 0.0);
        assert_eq!(summary.commission, 0.0);
    }

    #[test]
    fn test_weekday_breakdown_always_covers_the_week() {
        let records = vec![
            record("a", "p1", 30, 0),
            record("b", "p1", 40, 0),
            record("c", "p2", 50, 5),
        ];
        let refs: Vec<&BookingRecord> = records.iter().collect();
        let buckets = weekday_breakdown(&refs);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Seg");
        assert_eq!(buckets[0].revenue, 70);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[5].revenue, 50);
        assert_eq!(buckets[6].revenue, 0);
    }

    #[test]
    fn test_team_ranking_sorts_by_revenue_desc() {
        let records = vec![
            record("a", "p1", 30, 0),
            record("b", "p2", 80, 1),
            record("c", "p2", 20, 2),
        ];
        let professionals = vec![professional("p1", "Iwlys"), professional("p2", "Rodrigo")];
        let ranking = team_ranking(&records, &professionals);
        assert_eq!(ranking[0].name, "Rodrigo");
        assert_eq!(ranking[0].revenue, 100);
        assert_eq!(ranking[0].count, 2);
        assert!((ranking[0].share_percent - 100.0 * 100.0 / 130.0).abs() < 1e-9);
        assert_eq!(ranking[1].name, "Iwlys");
    }

    #[test]
    fn test_team_ranking_on_empty_ledger_has_zero_shares() {
        let professionals = vec![professional("p1", "Iwlys"), professional("p2", "Rodrigo")];
        let ranking = team_ranking(&[], &professionals);
        assert_eq!(ranking.len(), 2);
        assert!(ranking.iter().all(|e| e.share_percent == 0.0));
        assert!(ranking.iter().all(|e| e.revenue == 0));
    }

    #[test]
    fn test_role_view_parses_known_values_only() {
        let catalog = Catalog::zero_um();
        assert_eq!(RoleView::parse("", &catalog), Some(RoleView::Owner));
        assert_eq!(RoleView::parse("owner", &catalog), Some(RoleView::Owner));
        assert_eq!(
            RoleView::parse("p1", &catalog),
            Some(RoleView::Professional("p1".to_string()))
        );
        assert_eq!(RoleView::parse("p9", &catalog), None);
    }

    #[test]
    fn test_role_view_filters_records() {
        let records = vec![
            record("a", "p1", 30, 0),
            record("b", "p2", 80, 1),
            record("c", "p1", 20, 2),
        ];
        let mine = RoleView::Professional("p1".to_string()).filter(&records);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.professional_id == "p1"));
        assert_eq!(RoleView::Owner.filter(&records).len(), 3);
    }

    #[test]
    fn test_recent_returns_latest_first() {
        let records = vec![
            record("slow", "p1", 90, 0),
            record("fresh", "p1", 10, 1),
            record("mid", "p1", 50, 2),
        ];
        let refs: Vec<&BookingRecord> = records.iter().collect();
        let latest = recent(&refs, 2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].id, "fresh");
        assert_eq!(latest[1].id, "mid");
    }
}
