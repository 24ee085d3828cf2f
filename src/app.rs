use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::course::CourseId;
use crate::downloader;
use crate::lookup::{DataStore, LookupError};

pub struct AppState {
    store: DataStore,
}

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Missing reference data is the one fatal condition; fail before
    // binding the listener.
    config.validate()?;

    let app_state = Arc::new(AppState {
        store: DataStore::new(config),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/api/schedule/:roll_no", get(get_schedule))
        .route("/api/export/:roll_no", get(export_schedule))
        .route("/api/reload", post(reload_data))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    log::info!("listening on http://127.0.0.1:3000");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn get_schedule(
    Path(roll_no): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let today = Local::now().date_naive();

    match state.store.lookup(roll_no.trim()) {
        Ok(schedule) => {
            let entries: Vec<_> = schedule
                .entries
                .iter()
                .map(|entry| {
                    json!({
                        "date": entry.date,
                        "display_date": entry.display_date(),
                        "day": entry.day,
                        "session": entry.session,
                        "subject": entry.subject,
                        "div": entry.division,
                        "faculty": entry.faculty,
                        "venue": entry.venue,
                        "start_time": entry.start_time,
                        "is_today": entry.is_on(today),
                    })
                })
                .collect();

            Json(json!({
                "status": "ok",
                "roll_no": schedule.roll_no,
                "courses": course_names(&schedule.courses),
                "schedule": entries,
            }))
            .into_response()
        }
        Err(err) => lookup_error_response(err),
    }
}

async fn export_schedule(
    Path(roll_no): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let schedule = match state.store.lookup(roll_no.trim()) {
        Ok(schedule) => schedule,
        Err(err) => return lookup_error_response(err),
    };

    match downloader::to_xlsx(&schedule.entries) {
        Ok(buffer) => {
            // Return the workbook as a downloadable file
            Response::builder()
                .status(StatusCode::OK)
                .header(
                    header::CONTENT_TYPE,
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                )
                .header(
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        downloader::export_filename(&schedule.roll_no)
                    ),
                )
                .body(axum::body::Body::from(buffer))
                .unwrap()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": e.to_string() })),
        )
            .into_response(),
    }
}

/// Explicit cache invalidation hook for the hosting process; the next
/// lookup re-reads the spreadsheets.
async fn reload_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.store.reload();
    Json(json!({ "status": "ok" }))
}

fn course_names(courses: &[CourseId]) -> Vec<String> {
    courses.iter().map(|c| c.to_string()).collect()
}

fn lookup_error_response(err: LookupError) -> Response {
    match &err {
        LookupError::NotEnrolled(_) => Json(json!({
            "status": "not_enrolled",
            "message": err.to_string(),
        }))
        .into_response(),
        LookupError::NoScheduleMatch { courses, .. } => Json(json!({
            "status": "no_matches",
            "courses": course_names(courses),
            "message": err.to_string(),
        }))
        .into_response(),
        LookupError::Data(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": err.to_string() })),
        )
            .into_response(),
    }
}
