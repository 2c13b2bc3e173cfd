use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techteam_domain::learning::{AchievementIcon, Category, ContentType, Difficulty};

use crate::access::{Authenticated, SUPER_ADMIN};
use crate::domain::types::{
    Achievement, Certification, Challenge, ChallengePatch, Resource, ResourcePatch,
};
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::state::AppState;
use crate::usecase::catalog::{
    CreateAchievementInput, CreateAchievementUseCase, CreateCertificationInput,
    CreateCertificationUseCase, CreateResourceInput, CreateResourceUseCase,
    ListAchievementsUseCase, ListCertificationsUseCase, UpdateResourceUseCase,
};
use crate::usecase::challenge::{
    CreateChallengeInput, CreateChallengeUseCase, ListChallengesUseCase, UpdateChallengeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub points: i32,
    pub category: Category,
    pub days_to_complete: Option<i32>,
    pub participants: i32,
    pub is_active: bool,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Challenge> for ChallengeResponse {
    fn from(c: Challenge) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            difficulty: c.difficulty,
            points: c.points,
            category: c.category,
            days_to_complete: c.days_to_complete,
            participants: c.participants,
            is_active: c.is_active,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub content_type: ContentType,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub views: i32,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponse {
    fn from(r: Resource) -> Self {
        Self {
            id: r.id,
            title: r.title,
            category: r.category,
            content_type: r.content_type,
            url: r.url,
            description: r.description,
            thumbnail_url: r.thumbnail_url,
            duration: r.duration,
            views: r.views,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: AchievementIcon,
    pub points_required: Option<i32>,
    pub category: Option<String>,
}

impl From<Achievement> for AchievementResponse {
    fn from(a: Achievement) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            icon: a.icon,
            points_required: a.points_required,
            category: a.category,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
}

impl From<Certification> for CertificationResponse {
    fn from(c: Certification) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            total_steps: c.total_steps,
        }
    }
}

// ── GET /api/challenges ──────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeListQuery {
    pub active_only: Option<bool>,
}

pub async fn list_challenges(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<ChallengeListQuery>,
) -> Result<Json<Vec<ChallengeResponse>>, ApiError> {
    let usecase = ListChallengesUseCase {
        repo: state.challenge_repo(),
    };
    let challenges = usecase.execute(query.active_only.unwrap_or(true)).await?;
    Ok(Json(challenges.into_iter().map(Into::into).collect()))
}

// ── POST /api/challenges ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub points: i32,
    pub category: Category,
    pub days_to_complete: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn create_challenge(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateChallengeRequest>,
) -> Result<(StatusCode, Json<ChallengeResponse>), ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = CreateChallengeUseCase {
        repo: state.challenge_repo(),
    };
    let challenge = usecase
        .execute(CreateChallengeInput {
            title: body.title,
            description: body.description,
            difficulty: body.difficulty,
            points: body.points,
            category: body.category,
            days_to_complete: body.days_to_complete,
            is_active: body.is_active,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(challenge.into())))
}

// ── PATCH /api/challenges/{id} ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChallengeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub points: Option<i32>,
    pub category: Option<Category>,
    pub days_to_complete: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn update_challenge(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateChallengeRequest>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = UpdateChallengeUseCase {
        repo: state.challenge_repo(),
    };
    let challenge = usecase
        .execute(
            id,
            ChallengePatch {
                title: body.title,
                description: body.description,
                difficulty: body.difficulty,
                points: body.points,
                category: body.category,
                days_to_complete: body.days_to_complete,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(challenge.into()))
}

// ── POST /api/resources ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    pub title: String,
    pub category: Category,
    pub content_type: ContentType,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
}

pub async fn create_resource(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = CreateResourceUseCase {
        repo: state.resource_repo(),
    };
    let resource = usecase
        .execute(CreateResourceInput {
            title: body.title,
            category: body.category,
            content_type: body.content_type,
            url: body.url,
            description: body.description,
            thumbnail_url: body.thumbnail_url,
            duration: body.duration,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(resource.into())))
}

// ── PATCH /api/resources/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub content_type: Option<ContentType>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
}

pub async fn update_resource(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = UpdateResourceUseCase {
        repo: state.resource_repo(),
    };
    let resource = usecase
        .execute(
            id,
            ResourcePatch {
                title: body.title,
                category: body.category,
                content_type: body.content_type,
                url: body.url,
                description: body.description,
                thumbnail_url: body.thumbnail_url,
                duration: body.duration,
            },
        )
        .await?;
    Ok(Json(resource.into()))
}

// ── GET /api/achievements ────────────────────────────────────────────────────

pub async fn list_achievements(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<Json<Vec<AchievementResponse>>, ApiError> {
    let usecase = ListAchievementsUseCase {
        repo: state.achievement_repo(),
    };
    let achievements = usecase.execute().await?;
    Ok(Json(achievements.into_iter().map(Into::into).collect()))
}

// ── POST /api/achievements ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAchievementRequest {
    pub name: String,
    pub description: Option<String>,
    pub icon: AchievementIcon,
    pub points_required: Option<i32>,
    pub category: Option<String>,
}

pub async fn create_achievement(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateAchievementRequest>,
) -> Result<(StatusCode, Json<AchievementResponse>), ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = CreateAchievementUseCase {
        repo: state.achievement_repo(),
    };
    let achievement = usecase
        .execute(CreateAchievementInput {
            name: body.name,
            description: body.description,
            icon: body.icon,
            points_required: body.points_required,
            category: body.category,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(achievement.into())))
}

// ── GET /api/certifications ──────────────────────────────────────────────────

pub async fn list_certifications(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Result<Json<Vec<CertificationResponse>>, ApiError> {
    let usecase = ListCertificationsUseCase {
        repo: state.certification_repo(),
    };
    let certifications = usecase.execute().await?;
    Ok(Json(certifications.into_iter().map(Into::into).collect()))
}

// ── POST /api/certifications ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificationRequest {
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
}

pub async fn create_certification(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateCertificationRequest>,
) -> Result<(StatusCode, Json<CertificationResponse>), ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = CreateCertificationUseCase {
        repo: state.certification_repo(),
    };
    let certification = usecase
        .execute(CreateCertificationInput {
            name: body.name,
            description: body.description,
            total_steps: body.total_steps,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(certification.into())))
}
