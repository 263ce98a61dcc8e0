use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::MutexGuard;
use std::time::{Duration, Instant};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{http::header, web, HttpRequest, HttpResponse, Result};
use askama::Template;
use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    cart::Cart,
    catalog::Catalog,
    filters,
    loyalty::LoyaltyStatus,
    models::{LedgerEntry, LedgerItem, LoyaltyProgram, Service},
    schedule::{day_label, generate_time_slots, is_date_available, upcoming_days},
    state::{AppState, Session},
    store::new_id,
    templates::render,
    wizard::{phone_complete, Confirmation, StepKind, Wizard},
};

const WIZARD_COOKIE: &str = "wiz";
const PROCESSING_DELAY: Duration = Duration::from_millis(800);
const DAY_STRIP_LEN: usize = 14;

#[derive(Clone, Debug)]
struct ServiceCardView {
    id: String,
    name: String,
    description: String,
    duration_label: String,
    price: u32,
    image_url: String,
    has_image: bool,
    in_cart: bool,
}

struct CategorySection {
    name: String,
    services: Vec<ServiceCardView>,
}

struct LoyaltyView {
    enabled: bool,
    visits_label: String,
    status_line: String,
    reward_ready: bool,
    reward_description: String,
    stamps: Vec<StampView>,
}

struct StampView {
    filled: bool,
}

#[derive(Clone, Debug)]
struct SummaryItem {
    id: String,
    name: String,
    duration_label: String,
    price: u32,
}

struct CartBarView {
    has_items: bool,
    count_label: String,
    duration_label: String,
    total_price: u32,
    items: Vec<SummaryItem>,
}

#[derive(Clone, Debug)]
struct ProfessionalCardView {
    id: String,
    name: String,
    role: String,
    avatar_url: String,
    selected: bool,
}

struct DayView {
    value: String,
    label: String,
    available: bool,
    selected: bool,
}

struct SlotView {
    time: String,
    available: bool,
    selected: bool,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    provider_name: String,
    provider_handle: String,
    provider_location: String,
    provider_avatar_url: String,
    loyalty: LoyaltyView,
    highlights: Vec<ServiceCardView>,
    sections: Vec<CategorySection>,
    cart: CartBarView,
}

#[derive(Template)]
#[template(path = "professional.html")]
struct ProfessionalTemplate {
    professionals: Vec<ProfessionalCardView>,
    cart: CartBarView,
    can_continue: bool,
}

#[derive(Template)]
#[template(path = "schedule.html")]
struct ScheduleTemplate {
    professional_name: String,
    days: Vec<DayView>,
    has_date: bool,
    slots: Vec<SlotView>,
    items: Vec<SummaryItem>,
    duration_label: String,
    total_price: u32,
    can_continue: bool,
    continue_label: String,
}

#[derive(Template)]
#[template(path = "identify.html")]
struct IdentifyTemplate {
    customer_name: String,
    customer_phone: String,
    errors: Vec<String>,
    has_errors: bool,
}

#[derive(Template)]
#[template(path = "success.html")]
struct SuccessTemplate {
    first_name: String,
    date_label: String,
    time: String,
    professional_name: String,
    reward_unlocked: bool,
    visits: u32,
    reward_description: String,
    customer_phone: String,
}

#[derive(Deserialize)]
struct ToggleForm {
    service_id: String,
}

#[derive(Deserialize)]
struct ProfessionalForm {
    professional_id: String,
}

#[derive(Deserialize)]
struct DateForm {
    date: String,
}

#[derive(Deserialize)]
struct SlotForm {
    time: String,
}

#[derive(Deserialize)]
struct ConfirmForm {
    customer_name: String,
    customer_phone: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/cart/toggle").route(web::post().to(toggle_service)))
        .service(web::resource("/book").route(web::get().to(show_wizard)))
        .service(web::resource("/book/continue").route(web::post().to(advance_step)))
        .service(web::resource("/book/back").route(web::post().to(retreat_step)))
        .service(web::resource("/book/professional").route(web::post().to(choose_professional)))
        .service(web::resource("/book/date").route(web::post().to(choose_date)))
        .service(web::resource("/book/slot").route(web::post().to(choose_slot)))
        .service(web::resource("/book/confirm").route(web::post().to(confirm_booking)))
        .service(web::resource("/book/restart").route(web::get().to(restart)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn home(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let cart = current_cart(&state, &req)?;
    let catalog = &state.catalog;
    let visits = state.visits.load(Ordering::SeqCst);
    let status = LoyaltyStatus::for_visits(&catalog.loyalty, visits);

    let sections = catalog
        .categories()
        .into_iter()
        .map(|category| CategorySection {
            name: category.to_string(),
            services: service_cards(&catalog.services_in(category), &cart),
        })
        .collect();

    Ok(render(HomeTemplate {
        provider_name: catalog.provider.name.to_string(),
        provider_handle: catalog.provider.handle.to_string(),
        provider_location: catalog.provider.location.to_string(),
        provider_avatar_url: catalog.provider.avatar_url.to_string(),
        loyalty: loyalty_view(&status, &catalog.loyalty),
        highlights: service_cards(&catalog.highlights(), &cart),
        sections,
        cart: cart_bar(&cart),
    }))
}

async fn toggle_service(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ToggleForm>,
) -> Result<HttpResponse> {
    let service = match state.catalog.service(&form.service_id) {
        Some(service) => service.clone(),
        None => return Ok(HttpResponse::NotFound().body("Service not found")),
    };

    let mut sessions = lock_sessions(&state)?;
    prune_idle(&mut sessions);
    let id = session_id(&req).unwrap_or_else(Uuid::new_v4);
    let session = sessions.entry(id).or_insert_with(Session::new);
    session.touched_at = Instant::now();
    if session.wizard.toggle_service(&service).is_err() {
        return Ok(see_other("/book"));
    }
    let location = step_path(&session.wizard);
    drop(sessions);

    let mut response = HttpResponse::SeeOther();
    response.append_header((header::LOCATION, location));
    Ok(response.cookie(session_cookie(&req, id)).finish())
}

/// The wizard page. Which step renders depends entirely on the session;
/// the URL never encodes a step, so refresh and back-button land on the
/// machine's real state.
async fn show_wizard(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let mut sessions = lock_sessions(&state)?;
    let session = match find_session(&mut sessions, &req) {
        Some(session) => session,
        None => return Ok(see_other("/")),
    };
    let wizard = &session.wizard;

    let response = match wizard.step_kind() {
        StepKind::Services => see_other("/"),
        StepKind::Professional => render(professional_template(&state.catalog, wizard)),
        StepKind::Schedule => render(schedule_template(wizard)),
        StepKind::Identify => render(identify_template(wizard, Vec::new())),
        StepKind::Success => match wizard.confirmation() {
            Some(confirmation) => {
                let visits = state.visits.load(Ordering::SeqCst);
                let status = LoyaltyStatus::for_visits(&state.catalog.loyalty, visits);
                render(success_template(confirmation, &status, &state.catalog.loyalty))
            }
            None => see_other("/"),
        },
    };
    Ok(response)
}

async fn advance_step(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let mut sessions = lock_sessions(&state)?;
    let session = match find_session(&mut sessions, &req) {
        Some(session) => session,
        None => return Ok(see_other("/")),
    };
    // The button only shows once the step's guard holds; a failing guard
    // here just re-shows the step.
    let _ = session.wizard.advance();
    Ok(see_other(step_path(&session.wizard)))
}

async fn retreat_step(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let mut sessions = lock_sessions(&state)?;
    let session = match find_session(&mut sessions, &req) {
        Some(session) => session,
        None => return Ok(see_other("/")),
    };
    let _ = session.wizard.retreat();
    Ok(see_other(step_path(&session.wizard)))
}

async fn choose_professional(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ProfessionalForm>,
) -> Result<HttpResponse> {
    let professional = match state.catalog.professional(&form.professional_id) {
        Some(professional) => professional.clone(),
        None => return Ok(HttpResponse::NotFound().body("Professional not found")),
    };

    let mut sessions = lock_sessions(&state)?;
    let session = match find_session(&mut sessions, &req) {
        Some(session) => session,
        None => return Ok(see_other("/")),
    };
    let _ = session.wizard.choose_professional(&professional);
    Ok(see_other("/book"))
}

async fn choose_date(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<DateForm>,
) -> Result<HttpResponse> {
    let date = match NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => return Ok(see_other("/book")),
    };
    if !is_date_available(date, Local::now().date_naive()) {
        return Ok(see_other("/book"));
    }

    let mut sessions = lock_sessions(&state)?;
    let session = match find_session(&mut sessions, &req) {
        Some(session) => session,
        None => return Ok(see_other("/")),
    };
    let _ = session.wizard.choose_date(date);
    Ok(see_other("/book"))
}

async fn choose_slot(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<SlotForm>,
) -> Result<HttpResponse> {
    let mut sessions = lock_sessions(&state)?;
    let session = match find_session(&mut sessions, &req) {
        Some(session) => session,
        None => return Ok(see_other("/")),
    };
    let date = match session.wizard.chosen_date() {
        Some(date) => date,
        None => return Ok(see_other("/book")),
    };
    let valid = generate_time_slots(date)
        .iter()
        .any(|slot| slot.available && slot.time == form.time);
    if !valid {
        return Ok(see_other("/book"));
    }
    let _ = session.wizard.choose_time(&form.time);
    Ok(see_other("/book"))
}

async fn confirm_booking(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ConfirmForm>,
) -> Result<HttpResponse> {
    let session_key = match session_id(&req) {
        Some(id) => id,
        None => return Ok(see_other("/")),
    };

    {
        let mut sessions = lock_sessions(&state)?;
        let session = match sessions.get_mut(&session_key) {
            Some(session) => session,
            None => return Ok(see_other("/")),
        };
        session.touched_at = Instant::now();
        if session
            .wizard
            .set_contact(&form.customer_name, &form.customer_phone)
            .is_err()
        {
            return Ok(see_other("/book"));
        }

        let mut errors = Vec::new();
        let (name, phone) = session.wizard.contact().unwrap_or(("", ""));
        if name.is_empty() {
            errors.push("Informe seu nome.".to_string());
        }
        if !phone_complete(phone) {
            errors.push("Informe um WhatsApp válido.".to_string());
        }
        if !errors.is_empty() {
            return Ok(render(identify_template(&session.wizard, errors)));
        }
    }

    // Nothing is recorded yet; closing the page during the delay abandons
    // the booking.
    actix_web::rt::time::sleep(PROCESSING_DELAY).await;

    let confirmation = {
        let mut sessions = lock_sessions(&state)?;
        let session = match sessions.get_mut(&session_key) {
            Some(session) => session,
            None => return Ok(see_other("/")),
        };
        match session.wizard.confirm() {
            Ok(confirmation) => confirmation,
            Err(_) => return Ok(see_other("/book")),
        }
    };

    let visits = state.visits.fetch_add(1, Ordering::SeqCst) + 1;
    let status = LoyaltyStatus::for_visits(&state.catalog.loyalty, visits);

    if let Err(err) = state.ledger.append(&ledger_entry(&confirmation)) {
        log::warn!("Failed to record booking: {err}");
    }
    log::info!(
        "Booking confirmed for {} with {} at {} {}",
        confirmation.customer_name,
        confirmation.professional.name,
        confirmation.date,
        confirmation.time
    );

    Ok(render(success_template(
        &confirmation,
        &status,
        &state.catalog.loyalty,
    )))
}

async fn restart(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let mut sessions = lock_sessions(&state)?;
    if let Some(session) = find_session(&mut sessions, &req) {
        session.wizard.reset();
    }
    Ok(see_other("/"))
}

fn professional_template(catalog: &Catalog, wizard: &Wizard) -> ProfessionalTemplate {
    let selected = wizard.selected_professional().map(|p| p.id);
    let professionals = catalog
        .professionals
        .iter()
        .map(|p| ProfessionalCardView {
            id: p.id.to_string(),
            name: p.name.to_string(),
            role: p.role.to_string(),
            avatar_url: p.avatar_url.to_string(),
            selected: selected == Some(p.id),
        })
        .collect();

    ProfessionalTemplate {
        professionals,
        cart: cart_bar(wizard.cart()),
        can_continue: selected.is_some(),
    }
}

fn schedule_template(wizard: &Wizard) -> ScheduleTemplate {
    let today = Local::now().date_naive();
    let chosen_date = wizard.chosen_date();
    let chosen_time = wizard.chosen_time();

    let days = upcoming_days(today, DAY_STRIP_LEN)
        .into_iter()
        .map(|day| DayView {
            value: day.date.format("%Y-%m-%d").to_string(),
            label: day.label,
            available: day.available,
            selected: chosen_date == Some(day.date),
        })
        .collect();

    let slots = match chosen_date {
        Some(date) => generate_time_slots(date)
            .into_iter()
            .map(|slot| SlotView {
                selected: slot.available && chosen_time == Some(slot.time.as_str()),
                available: slot.available,
                time: slot.time,
            })
            .collect(),
        None => Vec::new(),
    };

    let cart = wizard.cart();
    ScheduleTemplate {
        professional_name: wizard
            .selected_professional()
            .map(|p| p.name.to_string())
            .unwrap_or_default(),
        days,
        has_date: chosen_date.is_some(),
        slots,
        items: summary_items(cart),
        duration_label: cart.duration_label(),
        total_price: cart.total_price(),
        can_continue: chosen_time.is_some(),
        continue_label: match chosen_time {
            Some(time) => format!("Agendar às {time}"),
            None => String::new(),
        },
    }
}

fn identify_template(wizard: &Wizard, errors: Vec<String>) -> IdentifyTemplate {
    let (name, phone) = wizard.contact().unwrap_or(("", ""));
    IdentifyTemplate {
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        has_errors: !errors.is_empty(),
        errors,
    }
}

fn success_template(
    confirmation: &Confirmation,
    status: &LoyaltyStatus,
    program: &LoyaltyProgram,
) -> SuccessTemplate {
    let today = Local::now().date_naive();
    SuccessTemplate {
        first_name: confirmation
            .customer_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
        date_label: day_label(confirmation.date, today),
        time: confirmation.time.clone(),
        professional_name: confirmation.professional.name.to_string(),
        reward_unlocked: status.reward_ready,
        visits: status.visits,
        reward_description: program.reward_description.to_string(),
        customer_phone: confirmation.customer_phone.clone(),
    }
}

fn loyalty_view(status: &LoyaltyStatus, program: &LoyaltyProgram) -> LoyaltyView {
    let status_line = if status.reward_ready {
        "Recompensa Liberada!".to_string()
    } else if status.remaining == 1 {
        "1 visita para ganhar".to_string()
    } else {
        format!("{} visitas para ganhar", status.remaining)
    };

    LoyaltyView {
        enabled: program.enabled,
        visits_label: format!("{} Visitas", status.visits),
        status_line,
        reward_ready: status.reward_ready,
        reward_description: program.reward_description.to_string(),
        stamps: status
            .stamps()
            .into_iter()
            .map(|filled| StampView { filled })
            .collect(),
    }
}

fn service_cards(services: &[&Service], cart: &Cart) -> Vec<ServiceCardView> {
    services
        .iter()
        .map(|service| ServiceCardView {
            id: service.id.to_string(),
            name: service.name.to_string(),
            description: service.description.to_string(),
            duration_label: format!("{} min", service.duration_min),
            price: service.price,
            image_url: service.image_url.unwrap_or_default().to_string(),
            has_image: service.image_url.is_some(),
            in_cart: cart.contains(service.id),
        })
        .collect()
}

fn cart_bar(cart: &Cart) -> CartBarView {
    let count = cart.len();
    CartBarView {
        has_items: !cart.is_empty(),
        count_label: if count == 1 {
            "1 Serviço".to_string()
        } else {
            format!("{count} Serviços")
        },
        duration_label: cart.duration_label(),
        total_price: cart.total_price(),
        items: summary_items(cart),
    }
}

fn summary_items(cart: &Cart) -> Vec<SummaryItem> {
    cart.items()
        .iter()
        .map(|service| SummaryItem {
            id: service.id.to_string(),
            name: service.name.to_string(),
            duration_label: format!("{} min", service.duration_min),
            price: service.price,
        })
        .collect()
}

fn ledger_entry(confirmation: &Confirmation) -> LedgerEntry {
    LedgerEntry {
        id: new_id(),
        services: confirmation
            .services
            .iter()
            .map(|service| LedgerItem {
                id: service.id.to_string(),
                name: service.name.to_string(),
                duration_min: service.duration_min,
                price: service.price,
            })
            .collect(),
        professional_id: confirmation.professional.id.to_string(),
        professional_name: confirmation.professional.name.to_string(),
        date: confirmation.date.format("%Y-%m-%d").to_string(),
        time: confirmation.time.clone(),
        customer_name: confirmation.customer_name.clone(),
        customer_phone: confirmation.customer_phone.clone(),
        total_duration_min: confirmation.total_duration_min,
        total_price: confirmation.total_price,
        created_at: Utc::now().to_rfc3339(),
    }
}

fn current_cart(state: &AppState, req: &HttpRequest) -> Result<Cart> {
    let mut sessions = lock_sessions(state)?;
    Ok(find_session(&mut sessions, req)
        .map(|session| session.wizard.cart().clone())
        .unwrap_or_default())
}

fn lock_sessions(state: &AppState) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>> {
    state
        .sessions
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("session store poisoned"))
}

fn session_id(req: &HttpRequest) -> Option<Uuid> {
    req.cookie(WIZARD_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

fn find_session<'a>(
    sessions: &'a mut HashMap<Uuid, Session>,
    req: &HttpRequest,
) -> Option<&'a mut Session> {
    let id = session_id(req)?;
    let session = sessions.get_mut(&id)?;
    session.touched_at = Instant::now();
    Some(session)
}

fn prune_idle(sessions: &mut HashMap<Uuid, Session>) {
    sessions.retain(|_, session| !session.idle());
}

fn session_cookie(req: &HttpRequest, id: Uuid) -> Cookie<'static> {
    let mut builder = Cookie::build(WIZARD_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    if req.connection_info().scheme() == "https" {
        builder = builder.secure(true);
    }
    builder.finish()
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location.to_string()))
        .finish()
}

fn step_path(wizard: &Wizard) -> &'static str {
    match wizard.step_kind() {
        StepKind::Services => "/",
        _ => "/book",
    }
}
