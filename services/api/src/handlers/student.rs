use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techteam_domain::learning::CertificationStatus;
use techteam_domain::user::UserRole;

use crate::access::{Authenticated, STAFF};
use crate::domain::types::{
    CompletionSummary, User, UserAchievement, UserCertification, UserPatch, WorkLog,
};
use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::handlers::auth::UserResponse;
use crate::handlers::school::CreateAccountRequest;
use crate::state::AppState;
use crate::usecase::account::{CreateAccountUseCase, ResetPasswordUseCase};
use crate::usecase::student::{
    AdjustPointsUseCase, AwardAchievementUseCase, LearningProgressUseCase, ListStudentsUseCase,
    StartCertificationUseCase, StudentDetailsUseCase, UpdateCertificationInput,
    UpdateCertificationUseCase, UpdateStudentUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub challenge_title: String,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub completed_at: DateTime<Utc>,
    pub points_earned: i32,
}

impl From<CompletionSummary> for CompletionResponse {
    fn from(summary: CompletionSummary) -> Self {
        Self {
            id: summary.completion.id,
            challenge_id: summary.completion.challenge_id,
            challenge_title: summary.challenge_title,
            completed_at: summary.completion.completed_at,
            points_earned: summary.completion.points_earned,
        }
    }
}

/// `hoursWorked` carries minutes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub hours_worked: i32,
    pub category: Option<String>,
    pub description: String,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<WorkLog> for WorkLogResponse {
    fn from(log: WorkLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            log_date: log.log_date,
            hours_worked: log.minutes_worked,
            category: log.category,
            description: log.description,
            created_at: log.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievementResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub earned_at: DateTime<Utc>,
}

impl From<UserAchievement> for UserAchievementResponse {
    fn from(award: UserAchievement) -> Self {
        Self {
            id: award.id,
            user_id: award.user_id,
            achievement_id: award.achievement_id,
            earned_at: award.earned_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCertificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub certification_id: Uuid,
    pub status: CertificationStatus,
    pub progress: i32,
    #[serde(serialize_with = "techteam_core::serde::opt_to_rfc3339_ms")]
    pub earned_at: Option<DateTime<Utc>>,
}

impl From<UserCertification> for UserCertificationResponse {
    fn from(progress: UserCertification) -> Self {
        Self {
            id: progress.id,
            user_id: progress.user_id,
            certification_id: progress.certification_id,
            status: progress.status,
            progress: progress.progress,
            earned_at: progress.earned_at,
        }
    }
}

// ── GET /api/schools/{school_id}/students ────────────────────────────────────

pub async fn list_students(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = ListStudentsUseCase {
        users: state.user_repo(),
    };
    let students = usecase.execute(school_id).await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

// ── POST /api/schools/{school_id}/students ───────────────────────────────────

pub async fn create_student(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = CreateAccountUseCase {
        users: state.user_repo(),
        schools: state.school_repo(),
        hasher: state.hasher(),
    };
    let student = usecase
        .execute(school_id, UserRole::Student, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

// ── PATCH /api/schools/{school_id}/students/{student_id} ─────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update_student(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = UpdateStudentUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
    };
    let student = usecase
        .execute(
            school_id,
            student_id,
            UserPatch {
                username: body.username,
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(student.into()))
}

// ── GET /api/schools/{school_id}/students/{student_id}/details ───────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetailsResponse {
    pub student: UserResponse,
    pub completions: Vec<CompletionResponse>,
    pub work_logs: Vec<WorkLogResponse>,
}

pub async fn student_details(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StudentDetailsResponse>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = StudentDetailsUseCase {
        users: state.user_repo(),
        challenges: state.challenge_repo(),
        work_logs: state.work_log_repo(),
    };
    let details = usecase.execute(school_id, student_id).await?;
    Ok(Json(StudentDetailsResponse {
        student: details.student.into(),
        completions: details.completions.into_iter().map(Into::into).collect(),
        work_logs: details.work_logs.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /api/schools/{school_id}/students/{student_id}/reset-password ───────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        hasher: state.hasher(),
    };
    usecase
        .execute(school_id, student_id, &body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/schools/{school_id}/students/{student_id}/points ───────────────

#[derive(Deserialize)]
pub struct AdjustPointsRequest {
    pub delta: i32,
}

#[derive(Serialize)]
pub struct PointsResponse {
    pub points: i32,
}

pub async fn adjust_points(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AdjustPointsRequest>,
) -> Result<Json<PointsResponse>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = AdjustPointsUseCase {
        users: state.user_repo(),
    };
    let points = usecase.execute(school_id, student_id, body.delta).await?;
    Ok(Json(PointsResponse { points }))
}

// ── POST /api/schools/{school_id}/students/{student_id}/achievements ─────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardAchievementRequest {
    pub achievement_id: Uuid,
}

pub async fn award_achievement(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AwardAchievementRequest>,
) -> Result<(StatusCode, Json<UserAchievementResponse>), ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = AwardAchievementUseCase {
        users: state.user_repo(),
        achievements: state.achievement_repo(),
    };
    let award = usecase
        .execute(school_id, student_id, body.achievement_id)
        .await?;
    Ok((StatusCode::CREATED, Json(award.into())))
}

// ── POST /api/schools/{school_id}/students/{student_id}/certifications ───────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCertificationRequest {
    pub certification_id: Uuid,
}

pub async fn start_certification(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<StartCertificationRequest>,
) -> Result<(StatusCode, Json<UserCertificationResponse>), ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = StartCertificationUseCase {
        users: state.user_repo(),
        certifications: state.certification_repo(),
    };
    let progress = usecase
        .execute(school_id, student_id, body.certification_id)
        .await?;
    Ok((StatusCode::CREATED, Json(progress.into())))
}

// ── PATCH /api/schools/{school_id}/students/{student_id}/certifications/{id} ─

#[derive(Deserialize)]
pub struct UpdateCertificationRequest {
    pub status: Option<CertificationStatus>,
    pub progress: Option<i32>,
}

pub async fn update_certification(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, student_id, id)): Path<(Uuid, Uuid, Uuid)>,
    Json(body): Json<UpdateCertificationRequest>,
) -> Result<Json<UserCertificationResponse>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = UpdateCertificationUseCase {
        certifications: state.certification_repo(),
    };
    let progress = usecase
        .execute(
            school_id,
            student_id,
            id,
            UpdateCertificationInput {
                status: body.status,
                progress: body.progress,
            },
        )
        .await?;
    Ok(Json(progress.into()))
}

// ── GET /api/schools/{school_id}/learning-progress ───────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl From<User> for StudentSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgressResponse {
    pub student: StudentSummary,
    pub challenges_completed: usize,
    pub completions: Vec<CompletionResponse>,
}

pub async fn learning_progress(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
) -> Result<Json<Vec<LearningProgressResponse>>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = LearningProgressUseCase {
        users: state.user_repo(),
        challenges: state.challenge_repo(),
    };
    let progress = usecase.execute(school_id).await?;
    let items = progress
        .into_iter()
        .map(|p| LearningProgressResponse {
            challenges_completed: p.challenges_completed(),
            student: p.student.into(),
            completions: p.completions.into_iter().map(Into::into).collect(),
        })
        .collect();
    Ok(Json(items))
}
