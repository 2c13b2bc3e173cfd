//! `/api/student/*`: the caller acting on their own account and school.

use axum::{extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techteam_domain::learning::{Category, ContentType};
use techteam_domain::user::Avatar;

use crate::access::Authenticated;
use crate::domain::types::{
    CertificationProgress, ChallengeProgress, CompletionSummary, EarnedAchievement, RankedUser,
    ResourceFilter, WorkLogPatch,
};
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::handlers::catalog::{
    AchievementResponse, CertificationResponse, ChallengeResponse, ResourceResponse,
};
use crate::handlers::parse_param;
use crate::handlers::student::{
    CompletionResponse, UserAchievementResponse, UserCertificationResponse, WorkLogResponse,
};
use crate::handlers::ticket::TicketResponse;
use crate::state::AppState;
use crate::usecase::account::SetAvatarUseCase;
use crate::usecase::catalog::{
    CertificationProgressUseCase, EarnedAchievementsUseCase, ListResourcesUseCase,
    RecordResourceViewUseCase,
};
use crate::usecase::challenge::{
    ActiveChallengesUseCase, CompleteChallengeUseCase, DEFAULT_RECOMMENDED_LIMIT,
    RecommendedChallengesUseCase, StudentChallengesUseCase,
};
use crate::usecase::ranking::RankingsUseCase;
use crate::usecase::ticket::AssignedTicketsUseCase;
use crate::usecase::work_log::{
    CreateWorkLogInput, CreateWorkLogUseCase, DeleteWorkLogUseCase, ListWorkLogsUseCase,
    UpdateWorkLogUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StudentChallengeResponse {
    #[serde(flatten)]
    pub challenge: ChallengeResponse,
    pub completed: bool,
    pub progress: u8,
}

impl From<ChallengeProgress> for StudentChallengeResponse {
    fn from(p: ChallengeProgress) -> Self {
        Self {
            challenge: p.challenge.into(),
            completed: p.completed,
            progress: p.progress,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub rank: u32,
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub points: i32,
    pub streak: i32,
    pub selected_avatar: Avatar,
    pub is_current_user: bool,
}

impl RankingResponse {
    fn new(ranked: RankedUser, caller: Uuid) -> Self {
        Self {
            rank: ranked.rank,
            name: ranked.user.display_name(),
            is_current_user: ranked.user.id == caller,
            id: ranked.user.id,
            username: ranked.user.username,
            points: ranked.user.points,
            streak: ranked.user.streak,
            selected_avatar: ranked.user.selected_avatar,
        }
    }
}

#[derive(Serialize)]
pub struct EarnedAchievementResponse {
    #[serde(flatten)]
    pub award: UserAchievementResponse,
    pub achievement: AchievementResponse,
}

impl From<EarnedAchievement> for EarnedAchievementResponse {
    fn from(earned: EarnedAchievement) -> Self {
        Self {
            award: earned.award.into(),
            achievement: earned.achievement.into(),
        }
    }
}

#[derive(Serialize)]
pub struct CertificationProgressResponse {
    #[serde(flatten)]
    pub progress: UserCertificationResponse,
    pub certification: CertificationResponse,
}

impl From<CertificationProgress> for CertificationProgressResponse {
    fn from(p: CertificationProgress) -> Self {
        Self {
            progress: p.progress.into(),
            certification: p.certification.into(),
        }
    }
}

// ── GET /api/student/challenges ──────────────────────────────────────────────

pub async fn list_challenges(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<StudentChallengeResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = StudentChallengesUseCase {
        repo: state.challenge_repo(),
    };
    let challenges = usecase.execute(auth.ctx.user_id, school_id).await?;
    Ok(Json(challenges.into_iter().map(Into::into).collect()))
}

// ── GET /api/student/challenges/active ───────────────────────────────────────

pub async fn active_challenges(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<StudentChallengeResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = ActiveChallengesUseCase {
        repo: state.challenge_repo(),
    };
    let challenges = usecase.execute(auth.ctx.user_id, school_id).await?;
    Ok(Json(challenges.into_iter().map(Into::into).collect()))
}

// ── GET /api/student/challenges/recommended ──────────────────────────────────

#[derive(Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

pub async fn recommended_challenges(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<StudentChallengeResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let limit = query.limit.map_or(DEFAULT_RECOMMENDED_LIMIT, |l| {
        usize::try_from(l).unwrap_or(usize::MAX)
    });
    let usecase = RecommendedChallengesUseCase {
        repo: state.challenge_repo(),
    };
    let challenges = usecase.execute(auth.ctx.user_id, school_id, limit).await?;
    Ok(Json(challenges.into_iter().map(Into::into).collect()))
}

// ── POST /api/student/challenges/{challenge_id}/complete ─────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteChallengeResponse {
    pub completion: CompletionResponse,
    pub total_points: i32,
}

pub async fn complete_challenge(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(challenge_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CompleteChallengeResponse>), ApiError> {
    let school_id = auth.own_school()?;
    let usecase = CompleteChallengeUseCase {
        repo: state.challenge_repo(),
    };
    let out = usecase
        .execute(auth.ctx.user_id, school_id, challenge_id, Utc::now())
        .await?;
    let completion = CompletionSummary {
        completion: out.completion,
        challenge_title: out.challenge_title,
    };
    Ok((
        StatusCode::CREATED,
        Json(CompleteChallengeResponse {
            completion: completion.into(),
            total_points: out.total_points,
        }),
    ))
}

// ── GET /api/student/rankings ────────────────────────────────────────────────

pub async fn rankings(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<RankingResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = RankingsUseCase {
        users: state.user_repo(),
    };
    let ranked = usecase
        .execute(school_id, query.limit.unwrap_or(state.rankings_limit))
        .await?;
    let caller = auth.ctx.user_id;
    Ok(Json(
        ranked
            .into_iter()
            .map(|r| RankingResponse::new(r, caller))
            .collect(),
    ))
}

// ── GET /api/student/resources ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListQuery {
    pub category: Option<String>,
    pub content_type: Option<String>,
    pub search: Option<String>,
}

pub async fn list_resources(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<ResourceListQuery>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    auth.own_school()?;
    let filter = ResourceFilter {
        category: parse_param(query.category.as_deref(), Category::parse, "category")?,
        content_type: parse_param(
            query.content_type.as_deref(),
            ContentType::parse,
            "contentType",
        )?,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let usecase = ListResourcesUseCase {
        repo: state.resource_repo(),
    };
    let resources = usecase.execute(&filter).await?;
    Ok(Json(resources.into_iter().map(Into::into).collect()))
}

// ── POST /api/student/resources/{resource_id}/view ───────────────────────────

pub async fn record_resource_view(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(resource_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.own_school()?;
    let usecase = RecordResourceViewUseCase {
        repo: state.resource_repo(),
    };
    usecase.execute(resource_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/student/repairs ─────────────────────────────────────────────────

pub async fn repairs(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = AssignedTicketsUseCase {
        tickets: state.ticket_repo(),
    };
    let tickets = usecase.execute(school_id, auth.ctx.user_id).await?;
    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

// ── GET /api/student/work-logs ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn list_work_logs(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<WorkLogQuery>,
) -> Result<Json<Vec<WorkLogResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = ListWorkLogsUseCase {
        repo: state.work_log_repo(),
    };
    let logs = usecase
        .execute(auth.ctx.user_id, school_id, query.start_date, query.end_date)
        .await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

// ── POST /api/student/work-logs ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkLogRequest {
    pub log_date: NaiveDate,
    /// Minutes, despite the name.
    pub hours_worked: i32,
    pub category: Option<String>,
    pub description: String,
}

pub async fn create_work_log(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateWorkLogRequest>,
) -> Result<(StatusCode, Json<WorkLogResponse>), ApiError> {
    let school_id = auth.own_school()?;
    let usecase = CreateWorkLogUseCase {
        repo: state.work_log_repo(),
    };
    let log = usecase
        .execute(
            auth.ctx.user_id,
            school_id,
            CreateWorkLogInput {
                log_date: body.log_date,
                minutes_worked: body.hours_worked,
                category: body.category,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(log.into())))
}

// ── PATCH /api/student/work-logs/{id} ────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkLogRequest {
    pub log_date: Option<NaiveDate>,
    pub hours_worked: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
}

pub async fn update_work_log(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateWorkLogRequest>,
) -> Result<Json<WorkLogResponse>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = UpdateWorkLogUseCase {
        repo: state.work_log_repo(),
    };
    let log = usecase
        .execute(
            auth.ctx.user_id,
            school_id,
            id,
            WorkLogPatch {
                log_date: body.log_date,
                minutes_worked: body.hours_worked,
                category: body.category,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(log.into()))
}

// ── DELETE /api/student/work-logs/{id} ───────────────────────────────────────

pub async fn delete_work_log(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = DeleteWorkLogUseCase {
        repo: state.work_log_repo(),
    };
    usecase.execute(auth.ctx.user_id, school_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/student/achievements ────────────────────────────────────────────

pub async fn achievements(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<EarnedAchievementResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = EarnedAchievementsUseCase {
        repo: state.achievement_repo(),
    };
    let earned = usecase.execute(auth.ctx.user_id, school_id).await?;
    Ok(Json(earned.into_iter().map(Into::into).collect()))
}

// ── GET /api/student/certifications ──────────────────────────────────────────

pub async fn certifications(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<CertificationProgressResponse>>, ApiError> {
    let school_id = auth.own_school()?;
    let usecase = CertificationProgressUseCase {
        repo: state.certification_repo(),
    };
    let progress = usecase.execute(auth.ctx.user_id, school_id).await?;
    Ok(Json(progress.into_iter().map(Into::into).collect()))
}

// ── PATCH /api/student/avatar ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvatarRequest {
    pub selected_avatar: Avatar,
}

pub async fn set_avatar(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<SetAvatarRequest>,
) -> Result<StatusCode, ApiError> {
    auth.own_school()?;
    let usecase = SetAvatarUseCase {
        users: state.user_repo(),
    };
    usecase.execute(auth.ctx.user_id, body.selected_avatar).await?;
    Ok(StatusCode::NO_CONTENT)
}
