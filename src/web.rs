use std::sync::{Mutex, MutexGuard, PoisonError};
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::config::AppConfig;
use crate::display::{render_styled_html, NO_TASK_TODAY};
use crate::error::PiketError;
use crate::relay::{deliver, share_link, status_line, TelegramClient, TelegramRelay, WhatsappRelay};
use crate::schedule::{today_name, Assignment, ScheduleTable};
use crate::session::Session;
use crate::settings::SettingsStore;

/// Everything the handlers share. The session owns the current assignment.
pub struct AppState {
    pub table: ScheduleTable,
    pub session: Session,
    pub settings: Mutex<SettingsStore>,
    pub telegram: TelegramClient,
    pub whatsapp: WhatsappRelay,
}

impl AppState {
    pub fn new(settings: SettingsStore, config: &AppConfig) -> Self {
        Self {
            table: ScheduleTable::default(),
            session: Session::new(),
            settings: Mutex::new(settings),
            telegram: TelegramClient::new(config.telegram_api.clone()),
            whatsapp: WhatsappRelay::new(config.share_opener.clone()),
        }
    }

    fn settings(&self) -> MutexGuard<'_, SettingsStore> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn roster(&self) -> Vec<String> {
        self.settings().roster()
    }
}

#[derive(Deserialize)]
pub struct DayQuery {
    day: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TodayResponse {
    day_name: String,
    assignment: Option<Assignment>,
    html: Option<String>,
    empty_text: Option<String>,
}

impl TodayResponse {
    fn new(day_name: &str, assignment: Option<&Assignment>) -> Self {
        Self {
            day_name: day_name.to_string(),
            html: assignment.map(|a| render_styled_html(&a.message)),
            empty_text: assignment.is_none().then(|| NO_TASK_TODAY.to_string()),
            assignment: assignment.cloned(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SettingsResponse {
    roster: Vec<String>,
    bot_token: String,
    target_chat_id: String,
}

#[derive(Deserialize)]
pub struct SettingsUpdate {
    roster: Option<Vec<String>>,
    bot_token: Option<String>,
    target_chat_id: Option<String>,
}

#[derive(Deserialize)]
pub struct MemberRequest {
    name: String,
}

#[derive(Deserialize)]
pub struct LookupRequest {
    username: String,
}

#[derive(Serialize, Deserialize)]
pub struct RelayResponse {
    success: bool,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct LookupResponse {
    success: bool,
    status: String,
    chat_id: Option<String>,
}

fn settings_error(e: PiketError) -> HttpResponse {
    let status = e.to_string();
    match e {
        PiketError::InvalidInput(_) => HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": status})),
        _ => {
            warn!(error = %status, "settings update failed");
            HttpResponse::InternalServerError().json(serde_json::json!({"success": false, "error": status}))
        }
    }
}

fn settings_snapshot(settings: &SettingsStore) -> SettingsResponse {
    SettingsResponse {
        roster: settings.roster(),
        bot_token: settings.bot_token(),
        target_chat_id: settings.target_chat_id(),
    }
}

// Today's assignment, as shown on the home page. An assignment held for
// another day (a preview, or yesterday's) is replaced by a fresh one.
async fn get_today(state: web::Data<AppState>) -> Result<HttpResponse> {
    let day_name = today_name();
    let roster = state.roster();
    let current = state.session.current_for(&state.table, day_name, &roster);
    Ok(HttpResponse::Ok().json(TodayResponse::new(day_name, current.as_deref())))
}

// Regenerate from the stored roster; `?day=` previews another weekday
async fn generate(query: web::Query<DayQuery>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let day_name = query.day.clone().unwrap_or_else(|| today_name().to_string());
    let roster = state.roster();
    let fresh = state.session.regenerate(&state.table, &day_name, &roster);
    Ok(HttpResponse::Ok().json(TodayResponse::new(&day_name, fresh.as_deref())))
}

async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.table.entries()))
}

async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(settings_snapshot(&state.settings())))
}

fn apply_settings(settings: &mut SettingsStore, update: &SettingsUpdate) -> crate::error::Result<()> {
    if let Some(roster) = &update.roster {
        settings.set_roster(roster)?;
    }
    if let Some(token) = &update.bot_token {
        settings.set_bot_token(token)?;
    }
    if let Some(chat_id) = &update.target_chat_id {
        settings.set_target_chat_id(chat_id)?;
    }
    Ok(())
}

async fn put_settings(update: web::Json<SettingsUpdate>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut settings = state.settings();
    match apply_settings(&mut settings, &update) {
        Ok(()) => {
            info!("settings updated");
            Ok(HttpResponse::Ok().json(settings_snapshot(&settings)))
        }
        Err(e) => Ok(settings_error(e)),
    }
}

async fn add_member(req: web::Json<MemberRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.settings().add_member(&req.name) {
        Ok(roster) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "roster": roster}))),
        Err(e) => Ok(settings_error(e)),
    }
}

async fn remove_member(index: web::Path<usize>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut settings = state.settings();
    match settings.remove_member(index.into_inner()) {
        Ok(removed) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "removed": removed,
            "roster": settings.roster()
        }))),
        Err(e) => Ok(settings_error(e)),
    }
}

fn nothing_to_send() -> HttpResponse {
    HttpResponse::Ok().json(RelayResponse {
        success: false,
        status: NO_TASK_TODAY.to_string(),
        link: None,
    })
}

async fn relay_telegram(state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(assignment) = state.session.current() else {
        return Ok(nothing_to_send());
    };

    let relay = TelegramRelay::from_settings(state.telegram.clone(), &state.settings());
    let outcome = match relay {
        Ok(relay) => deliver(&relay, &assignment.message).await,
        Err(e) => Err(e),
    };

    Ok(HttpResponse::Ok().json(RelayResponse {
        success: outcome.is_ok(),
        status: status_line(&outcome),
        link: None,
    }))
}

async fn relay_whatsapp(state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(assignment) = state.session.current() else {
        return Ok(nothing_to_send());
    };

    let outcome = deliver(&state.whatsapp, &assignment.message).await;
    Ok(HttpResponse::Ok().json(RelayResponse {
        success: outcome.is_ok(),
        status: status_line(&outcome),
        link: Some(share_link(&assignment.message)),
    }))
}

// Finds the chat id of a user who messaged the bot and stores it as the target
async fn telegram_lookup(req: web::Json<LookupRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let token = state.settings().bot_token();
    if token.trim().is_empty() {
        return Ok(lookup_response(false, "Please enter bot token first".to_string(), None));
    }
    if req.username.trim().is_empty() {
        return Ok(lookup_response(false, "Please enter a username".to_string(), None));
    }

    match state.telegram.lookup_chat_id(&token, req.username.trim()).await {
        Ok(Some(chat_id)) => {
            if let Err(e) = state.settings().set_target_chat_id(&chat_id) {
                return Ok(settings_error(e));
            }
            Ok(lookup_response(true, format!("Found! Chat ID is {}", chat_id), Some(chat_id)))
        }
        Ok(None) => Ok(lookup_response(
            false,
            "Username not found. Ensure the user has messaged your bot.".to_string(),
            None,
        )),
        Err(e) => Ok(lookup_response(false, format!("Error: {}", e), None)),
    }
}

fn lookup_response(success: bool, status: String, chat_id: Option<String>) -> HttpResponse {
    HttpResponse::Ok().json(LookupResponse { success, status, chat_id })
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Registers every route; shared by the server and the handler tests
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/today", web::get().to(get_today))
        .route("/api/assignment/generate", web::post().to(generate))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/settings", web::get().to(get_settings))
        .route("/api/settings", web::put().to(put_settings))
        .route("/api/roster", web::post().to(add_member))
        .service(web::resource("/api/roster/{index}").route(web::delete().to(remove_member)))
        .route("/api/relay/telegram", web::post().to(relay_telegram))
        .route("/api/relay/whatsapp", web::post().to(relay_whatsapp))
        .route("/api/telegram/lookup", web::post().to(telegram_lookup));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    // Home screen opens with today's assignment already generated
    let roster = app_state.roster();
    app_state.session.regenerate(&app_state.table, today_name(), &roster);

    info!(port, "starting web server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
