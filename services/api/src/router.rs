use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use techteam_core::health::{database_ready, healthz};
use techteam_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{login, logout, logout_all, me},
    catalog::{
        create_achievement, create_certification, create_challenge, create_resource,
        list_achievements, list_certifications, list_challenges, update_challenge,
        update_resource,
    },
    school::{create_admin, create_school, get_school, list_schools, update_school},
    student::{
        adjust_points, award_achievement, create_student, learning_progress, list_students,
        reset_password, start_certification, student_details, update_certification,
        update_student,
    },
    student_portal,
    ticket::{
        add_ticket_note, create_ticket, delete_ticket, get_ticket, list_ticket_notes,
        list_tickets, ticket_counts, update_ticket,
    },
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/logout-all", post(logout_all))
        .route("/api/auth/me", get(me))
        // Schools
        .route("/api/schools", get(list_schools).post(create_school))
        .route("/api/schools/{school_id}", get(get_school).patch(update_school))
        .route("/api/schools/{school_id}/admins", post(create_admin))
        // Students
        .route(
            "/api/schools/{school_id}/students",
            get(list_students).post(create_student),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}",
            patch(update_student),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}/details",
            get(student_details),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}/reset-password",
            post(reset_password),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}/points",
            post(adjust_points),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}/achievements",
            post(award_achievement),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}/certifications",
            post(start_certification),
        )
        .route(
            "/api/schools/{school_id}/students/{student_id}/certifications/{id}",
            patch(update_certification),
        )
        .route(
            "/api/schools/{school_id}/learning-progress",
            get(learning_progress),
        )
        // Tickets
        .route(
            "/api/schools/{school_id}/tickets",
            get(list_tickets).post(create_ticket),
        )
        .route("/api/schools/{school_id}/tickets/counts", get(ticket_counts))
        .route(
            "/api/schools/{school_id}/tickets/{ticket_id}",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
        .route(
            "/api/schools/{school_id}/tickets/{ticket_id}/notes",
            get(list_ticket_notes).post(add_ticket_note),
        )
        // Student self-service
        .route("/api/student/challenges", get(student_portal::list_challenges))
        .route(
            "/api/student/challenges/active",
            get(student_portal::active_challenges),
        )
        .route(
            "/api/student/challenges/recommended",
            get(student_portal::recommended_challenges),
        )
        .route(
            "/api/student/challenges/{challenge_id}/complete",
            post(student_portal::complete_challenge),
        )
        .route("/api/student/rankings", get(student_portal::rankings))
        .route("/api/student/resources", get(student_portal::list_resources))
        .route(
            "/api/student/resources/{resource_id}/view",
            post(student_portal::record_resource_view),
        )
        .route("/api/student/repairs", get(student_portal::repairs))
        .route(
            "/api/student/work-logs",
            get(student_portal::list_work_logs).post(student_portal::create_work_log),
        )
        .route(
            "/api/student/work-logs/{id}",
            patch(student_portal::update_work_log).delete(student_portal::delete_work_log),
        )
        .route("/api/student/achievements", get(student_portal::achievements))
        .route(
            "/api/student/certifications",
            get(student_portal::certifications),
        )
        .route("/api/student/avatar", patch(student_portal::set_avatar))
        // Global catalogue
        .route("/api/challenges", get(list_challenges).post(create_challenge))
        .route("/api/challenges/{id}", patch(update_challenge))
        .route("/api/resources", post(create_resource))
        .route("/api/resources/{id}", patch(update_resource))
        .route(
            "/api/achievements",
            get(list_achievements).post(create_achievement),
        )
        .route(
            "/api/certifications",
            get(list_certifications).post(create_certification),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
