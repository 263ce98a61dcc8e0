use actix_web::{http::header, web, HttpResponse, Result};
use askama::Template;
use serde::Deserialize;

use crate::{
    filters,
    models::{BookingRecord, COMMISSION_RATE, WEEKDAY_LABELS},
    reports::{
        recent, summarize, team_ranking, weekday_breakdown, RoleView, Summary, TeamEntry,
        WeekdayRevenue,
    },
    state::AppState,
    templates::render,
};

const RECENT_LIMIT: usize = 5;

#[derive(Clone, Debug)]
struct StatCard {
    label: String,
    value: String,
    note: String,
}

struct ViewOption {
    value: String,
    label: String,
    selected: bool,
}

struct WeekdayBar {
    label: &'static str,
    revenue: u32,
    height_percent: u32,
}

struct TeamRow {
    name: String,
    revenue: u32,
    count_label: String,
    share_label: String,
}

struct RecentRow {
    weekday_label: &'static str,
    service_name: String,
    price: u32,
    commission_label: String,
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct DashboardTemplate {
    user_name: String,
    user_role: String,
    commission_badge: String,
    is_owner: bool,
    view_label: String,
    view_options: Vec<ViewOption>,
    stats: Vec<StatCard>,
    chart_title: String,
    bars: Vec<WeekdayBar>,
    team: Vec<TeamRow>,
    recent: Vec<RecentRow>,
}

#[derive(Deserialize)]
struct DashboardQuery {
    #[serde(default)]
    view: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/admin").route(web::get().to(index)))
        .service(web::resource("/admin/dashboard").route(web::get().to(dashboard)));
}

async fn index() -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, "/admin/dashboard"))
        .finish()
}

async fn dashboard(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse> {
    let (view, professional) = match RoleView::parse(&query.view, &state.catalog) {
        Some(RoleView::Owner) => (RoleView::Owner, None),
        Some(RoleView::Professional(id)) => {
            let professional = state.catalog.professional(&id).cloned();
            (RoleView::Professional(id), professional)
        }
        None => return Ok(HttpResponse::NotFound().body("Unknown dashboard view")),
    };

    let records = view.filter(&state.reports);
    let summary = summarize(&records);
    let stats = stat_cards(professional.is_some(), &summary);
    let bars = weekday_bars(&weekday_breakdown(&records));
    let team = match professional {
        Some(_) => Vec::new(),
        None => team_rows(&team_ranking(&state.reports, &state.catalog.professionals)),
    };
    let history = recent_rows(&recent(&records, RECENT_LIMIT));
    let options = view_options(&state, &view);

    let template = match &professional {
        Some(p) => DashboardTemplate {
            user_name: p.name.to_string(),
            user_role: p.role.to_string(),
            commission_badge: "Comissão: 50%".to_string(),
            is_owner: false,
            view_label: format!("Visão: {}", p.name),
            view_options: options,
            stats,
            chart_title: "Seu Desempenho".to_string(),
            bars,
            team,
            recent: history,
        },
        None => DashboardTemplate {
            user_name: "Dono / Gerente".to_string(),
            user_role: "Administrador".to_string(),
            commission_badge: String::new(),
            is_owner: true,
            view_label: "Visão: Dono (Geral)".to_string(),
            view_options: options,
            stats,
            chart_title: "Desempenho da Loja".to_string(),
            bars,
            team,
            recent: history,
        },
    };
    Ok(render(template))
}

fn view_options(state: &AppState, view: &RoleView) -> Vec<ViewOption> {
    let mut options = vec![ViewOption {
        value: "owner".to_string(),
        label: "Dono (Geral)".to_string(),
        selected: *view == RoleView::Owner,
    }];
    for p in &state.catalog.professionals {
        options.push(ViewOption {
            value: p.id.to_string(),
            label: p.name.to_string(),
            selected: *view == RoleView::Professional(p.id.to_string()),
        });
    }
    options
}

fn stat_cards(for_professional: bool, summary: &Summary) -> Vec<StatCard> {
    let revenue_label = if for_professional {
        "Sua Produção"
    } else {
        "Faturamento Total"
    };
    let mut cards = vec![StatCard {
        label: revenue_label.to_string(),
        value: filters::format_brl(summary.revenue),
        note: "Últimos 7 dias".to_string(),
    }];
    if for_professional {
        cards.push(StatCard {
            label: "Sua Comissão".to_string(),
            value: brl_decimal(summary.commission),
            note: "Disponível para saque".to_string(),
        });
    }
    cards.push(StatCard {
        label: "Ticket Médio".to_string(),
        value: brl_decimal(summary.average_ticket),
        note: "Por agendamento".to_string(),
    });
    cards.push(StatCard {
        label: "Agendamentos".to_string(),
        value: summary.count.to_string(),
        note: "Nesta semana".to_string(),
    });
    cards
}

fn weekday_bars(buckets: &[WeekdayRevenue]) -> Vec<WeekdayBar> {
    let max = buckets.iter().map(|b| b.revenue).max().unwrap_or(0).max(1);
    buckets
        .iter()
        .map(|bucket| WeekdayBar {
            label: bucket.label,
            revenue: bucket.revenue,
            height_percent: bucket.revenue * 100 / max,
        })
        .collect()
}

fn team_rows(entries: &[TeamEntry]) -> Vec<TeamRow> {
    entries
        .iter()
        .map(|entry| TeamRow {
            name: entry.name.clone(),
            revenue: entry.revenue,
            count_label: format!("{} atendimentos", entry.count),
            share_label: format!("{:.0}% do total", entry.share_percent),
        })
        .collect()
}

fn recent_rows(records: &[&BookingRecord]) -> Vec<RecentRow> {
    records
        .iter()
        .map(|record| RecentRow {
            weekday_label: WEEKDAY_LABELS.get(record.weekday).copied().unwrap_or(""),
            service_name: record.service_name.clone(),
            price: record.price,
            commission_label: format!(
                "+{} (Com.)",
                brl_decimal(f64::from(record.price) * COMMISSION_RATE)
            ),
        })
        .collect()
}

/// "R$ 6.750,00" style amount, for the figures that carry cents.
fn brl_decimal(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = (cents / 100) as u32;
    format!("{},{:02}", filters::format_brl(whole), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Assistant;
    use crate::catalog::Catalog;
    use crate::demo::seeded_bookings;
    use crate::store::BookingLedger;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicU32;
    use std::sync::{Arc, Mutex};

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let catalog = Arc::new(Catalog::zero_um());
        let assistant = Assistant::with_base_url(&catalog, None, "http://127.0.0.1:9").unwrap();
        AppState {
            reports: Arc::new(seeded_bookings(&catalog, 7, 40)),
            visits: Arc::new(AtomicU32::new(0)),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ledger: BookingLedger::new(dir.path().join("bookings.json")),
            assistant,
            catalog,
        }
    }

    #[actix_web::test]
    async fn test_owner_dashboard_shows_shop_totals() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&dir)))
                .configure(configure),
        )
        .await;

        let body = test::call_and_read_body(
            &app,
            test::TestRequest::get().uri("/admin/dashboard").to_request(),
        )
        .await;
        let page = String::from_utf8_lossy(&body).to_string();
        assert!(page.contains("Painel de Controle"));
        assert!(page.contains("Faturamento Total"));
        assert!(page.contains("Top Profissionais"));
        assert!(page.contains("Histórico Recente"));
        assert!(!page.contains("Sua Comissão"));
    }

    #[actix_web::test]
    async fn test_professional_view_shows_commission() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&dir)))
                .configure(configure),
        )
        .await;

        let body = test::call_and_read_body(
            &app,
            test::TestRequest::get()
                .uri("/admin/dashboard?view=p1")
                .to_request(),
        )
        .await;
        let page = String::from_utf8_lossy(&body).to_string();
        assert!(page.contains("Sua Produção"));
        assert!(page.contains("Sua Comissão"));
        assert!(page.contains("Comissão: 50%"));
        assert!(page.contains("Iwlys"));
        assert!(!page.contains("Top Profissionais"));
    }

    #[actix_web::test]
    async fn test_unknown_view_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&dir)))
                .configure(configure),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin/dashboard?view=zz")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_admin_root_redirects_to_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(&dir)))
                .configure(configure),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/admin/dashboard"
        );
    }

    #[actix_web::test]
    async fn test_decimal_amounts_use_comma_cents() {
        assert_eq!(brl_decimal(6750.0), "R$ 6.750,00");
        assert_eq!(brl_decimal(17.5), "R$ 17,50");
        assert_eq!(brl_decimal(0.0), "R$ 0,00");
    }
}
