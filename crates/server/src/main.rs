// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDateTime;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use campus_sched_api::ApiError;
use campus_sched_api::handlers;
use campus_sched_api::request_response::{
    AddParticipantsRequest, AssignInstructorRequest, AssignInstructorResponse, AttendanceRequest,
    BulkParticipantResponse, CancelDayRequest, CancelSessionRequest, CancelSessionResponse,
    CheckConflictsRequest, CheckConflictsResponse, ConfirmInstructorRequest, CreateSessionRequest,
    CreateSessionResponse, FromCourseRequest, FromCourseResponse, ListSessionsQuery, ProgramScoped,
    RemoveInstructorRequest, RemoveParticipantsRequest, SessionDetailResponse, SessionSummary,
    SyncCourseRequest, SyncCourseResponse, UpdateTimeRequest, UpdateTimeResponse, UtilizationQuery,
    UtilizationResponse,
};
use campus_sched_persistence::Persistence;

/// Campus Sched Server - HTTP server for the campus scheduling engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex for safe concurrent
/// access; each request takes the lock for the duration of its
/// transaction.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
}

/// The wall clock used for every time-dependent decision.
fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Machine-readable reason code.
    reason: String,
    /// Error message.
    message: String,
}

/// Response for operations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusResponse {
    /// Success indicator.
    success: bool,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable reason code.
    reason: String,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            reason: self.reason,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status = match &err {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StateError { .. } => StatusCode::CONFLICT,
            ApiError::Conflict { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            reason: err.reason_code(),
            message: err.to_string(),
        }
    }
}

/// Handler for POST /sessions endpoint.
///
/// Creates a single or recurring session.
async fn handle_create_session(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, HttpError> {
    info!(
        program_id = req.program_id,
        facility_id = req.facility_id,
        title = %req.title,
        "Handling create_session request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::create_session(&mut persistence, &req, now())?;
    Ok(Json(resp))
}

/// Handler for GET /sessions/facility/{facility_id} endpoint.
async fn handle_list_sessions(
    AxumState(app_state): AxumState<AppState>,
    Path(facility_id): Path<i64>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<SessionSummary>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::list_sessions(&mut persistence, facility_id, &query)?;
    Ok(Json(resp))
}

/// Handler for GET /sessions/{session_id} endpoint.
async fn handle_get_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Query(scope): Query<ProgramScoped>,
) -> Result<Json<SessionDetailResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::get_session_detail(&mut persistence, scope.program_id, session_id)?;
    Ok(Json(resp))
}

/// Handler for PUT /sessions/{session_id}/time endpoint.
async fn handle_update_time(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<UpdateTimeRequest>,
) -> Result<Json<UpdateTimeResponse>, HttpError> {
    info!(
        session_id = session_id,
        apply_to_all_recurring = req.apply_to_all_recurring,
        "Handling update_time request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::update_session_time(&mut persistence, session_id, &req)?;
    Ok(Json(resp))
}

/// Handler for PUT /sessions/{session_id}/cancel endpoint.
async fn handle_cancel_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<CancelSessionRequest>,
) -> Result<Json<CancelSessionResponse>, HttpError> {
    info!(
        session_id = session_id,
        cancel_all_recurring = req.cancel_all_recurring,
        "Handling cancel_session request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::cancel_session(&mut persistence, session_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for PUT /sessions/{session_id}/start endpoint.
async fn handle_start_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(scope): Json<ProgramScoped>,
) -> Result<Json<StatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::start_session(&mut persistence, scope.program_id, session_id)?;
    Ok(Json(StatusResponse { success: true }))
}

/// Handler for PUT /sessions/{session_id}/complete endpoint.
async fn handle_complete_session(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(scope): Json<ProgramScoped>,
) -> Result<Json<StatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::complete_session(&mut persistence, scope.program_id, session_id)?;
    Ok(Json(StatusResponse { success: true }))
}

/// Handler for PUT /sessions/facility/{facility_id}/cancel-day endpoint.
async fn handle_cancel_day(
    AxumState(app_state): AxumState<AppState>,
    Path(facility_id): Path<i64>,
    Json(req): Json<CancelDayRequest>,
) -> Result<Json<CancelSessionResponse>, HttpError> {
    info!(
        facility_id = facility_id,
        date = %req.date,
        "Handling cancel_day request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::cancel_facility_day(&mut persistence, facility_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for POST /sessions/{session_id}/participants endpoint.
async fn handle_add_participants(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<AddParticipantsRequest>,
) -> Result<Json<BulkParticipantResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::add_participants(&mut persistence, session_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for DELETE /sessions/{session_id}/participants endpoint.
async fn handle_remove_participants(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<RemoveParticipantsRequest>,
) -> Result<Json<BulkParticipantResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::remove_participants(&mut persistence, session_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for POST /sessions/{session_id}/participants/attendance endpoint.
async fn handle_mark_attendance(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<AttendanceRequest>,
) -> Result<Json<BulkParticipantResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::mark_attendance(&mut persistence, session_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for POST /sessions/{session_id}/instructors endpoint.
async fn handle_assign_instructor(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<AssignInstructorRequest>,
) -> Result<Json<AssignInstructorResponse>, HttpError> {
    info!(
        session_id = session_id,
        instructor_id = req.instructor_id,
        force = req.force,
        "Handling assign_instructor request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::assign_instructor(&mut persistence, session_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for DELETE /sessions/{session_id}/instructors endpoint.
async fn handle_remove_instructor(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<RemoveInstructorRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::remove_instructor(&mut persistence, session_id, &req, now())?;
    Ok(Json(StatusResponse { success: true }))
}

/// Handler for POST /sessions/{session_id}/instructors/confirm endpoint.
async fn handle_confirm_instructor(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<ConfirmInstructorRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    handlers::confirm_instructor(&mut persistence, session_id, &req, now())?;
    Ok(Json(StatusResponse { success: true }))
}

/// Handler for POST /sessions/check-conflicts endpoint.
async fn handle_check_conflicts(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CheckConflictsRequest>,
) -> Result<Json<CheckConflictsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::check_conflicts(&mut persistence, &req, now())?;
    Ok(Json(resp))
}

/// Handler for POST /sessions/from-course endpoint.
async fn handle_from_course(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<FromCourseRequest>,
) -> Result<Json<FromCourseResponse>, HttpError> {
    info!(course_id = req.course_id, "Handling from_course request");
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::create_from_course(&mut persistence, &req, now())?;
    Ok(Json(resp))
}

/// Handler for POST /sessions/{session_id}/sync-course endpoint.
async fn handle_sync_course(
    AxumState(app_state): AxumState<AppState>,
    Path(session_id): Path<i64>,
    Json(req): Json<SyncCourseRequest>,
) -> Result<Json<SyncCourseResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::sync_course(&mut persistence, session_id, &req, now())?;
    Ok(Json(resp))
}

/// Handler for GET /facilities/{facility_id}/utilization endpoint.
async fn handle_utilization(
    AxumState(app_state): AxumState<AppState>,
    Path(facility_id): Path<i64>,
    Query(query): Query<UtilizationQuery>,
) -> Result<Json<UtilizationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let resp = handlers::facility_utilization(&mut persistence, facility_id, &query)?;
    Ok(Json(resp))
}

/// Builds the application router with all routes.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(handle_create_session))
        .route("/sessions/facility/{facility_id}", get(handle_list_sessions))
        .route(
            "/sessions/facility/{facility_id}/cancel-day",
            put(handle_cancel_day),
        )
        .route("/sessions/check-conflicts", post(handle_check_conflicts))
        .route("/sessions/from-course", post(handle_from_course))
        .route("/sessions/{session_id}", get(handle_get_session))
        .route("/sessions/{session_id}/time", put(handle_update_time))
        .route("/sessions/{session_id}/cancel", put(handle_cancel_session))
        .route("/sessions/{session_id}/start", put(handle_start_session))
        .route(
            "/sessions/{session_id}/complete",
            put(handle_complete_session),
        )
        .route(
            "/sessions/{session_id}/participants",
            post(handle_add_participants).delete(handle_remove_participants),
        )
        .route(
            "/sessions/{session_id}/participants/attendance",
            post(handle_mark_attendance),
        )
        .route(
            "/sessions/{session_id}/instructors",
            post(handle_assign_instructor).delete(handle_remove_instructor),
        )
        .route(
            "/sessions/{session_id}/instructors/confirm",
            post(handle_confirm_instructor),
        )
        .route("/sessions/{session_id}/sync-course", post(handle_sync_course))
        .route(
            "/facilities/{facility_id}/utilization",
            get(handle_utilization),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Campus Sched Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use campus_sched::PromotionPolicy;
    use campus_sched_domain::{DayHours, FacilityScheduleSettings, SessionKind};
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use std::collections::BTreeSet;
    use tower::ServiceExt;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// Seeded app state: one program with one configured facility and
    /// two students. Returns the state plus program, facility, and
    /// student IDs.
    async fn create_test_app_state() -> (AppState, i64, i64, Vec<i64>) {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let program_id = persistence.create_program("Harborview Aquatics").unwrap();
        let facility_id = persistence.create_facility(program_id, "Main Pool").unwrap();
        let hours = DayHours::new(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        )
        .unwrap();
        persistence
            .upsert_facility_settings(&FacilityScheduleSettings {
                facility_id,
                program_id,
                weekly_hours: [Some(hours); 7],
                booking_advance_days: 36500,
                booking_cutoff_hours: 0,
                cancellation_cutoff_hours: 0,
                max_concurrent_sessions: 1,
                setup_buffer_minutes: 0,
                cleanup_buffer_minutes: 0,
                default_max_participants: None,
                kind_max_participants: Vec::new(),
                requires_equipment_setup: false,
                equipment_setup_minutes: 0,
                closure_dates: BTreeSet::new(),
            })
            .unwrap();
        let students = vec![
            persistence.create_student(program_id, "Ada Marsh").unwrap(),
            persistence.create_student(program_id, "Ben Okafor").unwrap(),
        ];
        let app_state = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        };
        (app_state, program_id, facility_id, students)
    }

    fn create_request_body(
        program_id: i64,
        facility_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> CreateSessionRequest {
        CreateSessionRequest {
            program_id,
            facility_id,
            course_id: None,
            title: String::from("Evening lap swim"),
            description: None,
            kind: SessionKind::Group,
            start_at: start,
            end_at: end,
            max_participants: Some(1),
            skill_level: None,
            recurrence: None,
            atomic: false,
        }
    }

    async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (app_state, program_id, facility_id, _) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        let body = create_request_body(
            program_id,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 11),
        );
        let response = post_json(app.clone(), "/sessions", &body).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: CreateSessionResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(created.created.len(), 1);
        let session_id = created.created[0].session_id;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/sessions/{session_id}?program_id={program_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let detail: SessionDetailResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(detail.session.session_id, session_id);
    }

    #[tokio::test]
    async fn test_conflicting_creation_returns_422() {
        let (app_state, program_id, facility_id, _) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        let body = create_request_body(
            program_id,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 11),
        );
        post_json(app.clone(), "/sessions", &body).await;

        let overlapping = create_request_body(
            program_id,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 12),
        );
        let response = post_json(app, "/sessions", &overlapping).await;
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let err: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(err.error);
        assert_eq!(err.reason, "facility_overlap");
    }

    #[tokio::test]
    async fn test_program_mismatch_returns_404() {
        let (app_state, program_id, facility_id, _) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        let body = create_request_body(
            program_id + 1,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 11),
        );
        let response = post_json(app, "/sessions", &body).await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enroll_waitlist_and_promote_over_http() {
        let (app_state, program_id, facility_id, students) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        // One-seat session.
        let body = create_request_body(
            program_id,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 11),
        );
        let response = post_json(app.clone(), "/sessions", &body).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: CreateSessionResponse = serde_json::from_slice(&bytes).unwrap();
        let session_id = created.created[0].session_id;

        let add = AddParticipantsRequest {
            program_id,
            student_ids: students.clone(),
        };
        let response = post_json(
            app.clone(),
            &format!("/sessions/{session_id}/participants"),
            &add,
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let bulk: BulkParticipantResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(bulk.succeeded.len(), 2);
        assert_eq!(bulk.succeeded[1].waitlist_position, Some(1));

        // Removing the enrolled student promotes the waitlisted one.
        let remove = RemoveParticipantsRequest {
            program_id,
            student_ids: vec![students[0]],
            reason: String::from("family request"),
            cancelled_by: String::from("front desk"),
            promotion_policy: PromotionPolicy::default(),
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/sessions/{session_id}/participants"))
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&remove).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let bulk: BulkParticipantResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(bulk.promoted.len(), 1);
    }

    #[tokio::test]
    async fn test_double_cancel_returns_409() {
        let (app_state, program_id, facility_id, _) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        let body = create_request_body(
            program_id,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 11),
        );
        let response = post_json(app.clone(), "/sessions", &body).await;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let created: CreateSessionResponse = serde_json::from_slice(&bytes).unwrap();
        let session_id = created.created[0].session_id;

        let cancel = CancelSessionRequest {
            program_id,
            reason: String::from("pool maintenance"),
            cancelled_by: String::from("ops"),
            cancel_all_recurring: false,
        };
        for expected in [HttpStatusCode::OK, HttpStatusCode::CONFLICT] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("PUT")
                        .uri(format!("/sessions/{session_id}/cancel"))
                        .header("content-type", "application/json")
                        .body(Body::from(serde_json::to_string(&cancel).unwrap()))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_check_conflicts_round_trip() {
        let (app_state, program_id, facility_id, _) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        let req = CheckConflictsRequest {
            program_id,
            facility_id,
            start_at: at(2040, 6, 1, 10),
            end_at: at(2040, 6, 1, 11),
            instructor_ids: Vec::new(),
            exclude_session_id: None,
        };
        let response = post_json(app, "/sessions/check-conflicts", &req).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let check: CheckConflictsResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(check.available);
    }

    #[tokio::test]
    async fn test_utilization_over_http() {
        let (app_state, program_id, facility_id, _) = create_test_app_state().await;
        let app: Router = build_router(app_state);

        let body = create_request_body(
            program_id,
            facility_id,
            at(2040, 6, 1, 10),
            at(2040, 6, 1, 11),
        );
        post_json(app.clone(), "/sessions", &body).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!(
                        "/facilities/{facility_id}/utilization?program_id={program_id}&from=2040-06-01&to=2040-06-01"
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let report: UtilizationResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report.total_sessions, 1);
        assert!((report.booked_hours - 1.0).abs() < f64::EPSILON);
    }
}
