use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techteam_domain::user::UserRole;

use crate::access::{Authenticated, SUPER_ADMIN};
use crate::domain::types::{School, SchoolPatch};
use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::handlers::auth::UserResponse;
use crate::state::AppState;
use crate::usecase::account::{CreateAccountInput, CreateAccountUseCase};
use crate::usecase::school::{
    CreateSchoolInput, CreateSchoolUseCase, GetSchoolUseCase, ListSchoolsUseCase,
    UpdateSchoolUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolResponse {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub admin_name: Option<String>,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<School> for SchoolResponse {
    fn from(school: School) -> Self {
        Self {
            id: school.id,
            name: school.name,
            address: school.address,
            contact_email: school.contact_email,
            admin_name: school.admin_name,
            created_at: school.created_at,
            updated_at: school.updated_at,
        }
    }
}

// ── POST /api/schools ────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolRequest {
    pub name: String,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub admin_name: Option<String>,
}

pub async fn create_school(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateSchoolRequest>,
) -> Result<(StatusCode, Json<SchoolResponse>), ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = CreateSchoolUseCase {
        repo: state.school_repo(),
    };
    let school = usecase
        .execute(CreateSchoolInput {
            name: body.name,
            address: body.address,
            contact_email: body.contact_email,
            admin_name: body.admin_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(school.into())))
}

// ── GET /api/schools ─────────────────────────────────────────────────────────

pub async fn list_schools(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<SchoolResponse>>, ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = ListSchoolsUseCase {
        repo: state.school_repo(),
    };
    let schools = usecase.execute().await?;
    Ok(Json(schools.into_iter().map(Into::into).collect()))
}

// ── GET /api/schools/{school_id} ─────────────────────────────────────────────

pub async fn get_school(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
) -> Result<Json<SchoolResponse>, ApiError> {
    let school_id = auth.school(school_id)?;
    let usecase = GetSchoolUseCase {
        repo: state.school_repo(),
    };
    Ok(Json(usecase.execute(school_id).await?.into()))
}

// ── PATCH /api/schools/{school_id} ───────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub admin_name: Option<String>,
}

pub async fn update_school(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
    Json(body): Json<UpdateSchoolRequest>,
) -> Result<Json<SchoolResponse>, ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = UpdateSchoolUseCase {
        repo: state.school_repo(),
    };
    let school = usecase
        .execute(
            school_id,
            SchoolPatch {
                name: body.name,
                address: body.address,
                contact_email: body.contact_email,
                admin_name: body.admin_name,
            },
        )
        .await?;
    Ok(Json(school.into()))
}

// ── POST /api/schools/{school_id}/admins ─────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<CreateAccountRequest> for CreateAccountInput {
    fn from(body: CreateAccountRequest) -> Self {
        Self {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
        }
    }
}

pub async fn create_admin(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    auth.require_role(SUPER_ADMIN)?;
    let usecase = CreateAccountUseCase {
        users: state.user_repo(),
        schools: state.school_repo(),
        hasher: state.hasher(),
    };
    let admin = usecase
        .execute(school_id, UserRole::Admin, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(admin.into())))
}
