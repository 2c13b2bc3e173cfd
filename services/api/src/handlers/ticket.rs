use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techteam_domain::sort::{Sort, TicketSortBy};
use techteam_domain::ticket::{DeviceType, IssueType, TicketPriority, TicketStatus};

use crate::access::{Authenticated, STAFF};
use crate::domain::types::{
    CheckDetails, CheckPatch, RepairDetails, Ticket, TicketCounts, TicketFilter, TicketKind,
    TicketNote, TicketPatch,
};
use crate::error::ApiError;
use crate::extract::{Json, Path, Query};
use crate::handlers::{double_option, parse_param};
use crate::state::AppState;
use crate::usecase::ticket::{
    AddTicketNoteUseCase, CreateTicketInput, CreateTicketUseCase, DeleteTicketUseCase,
    GetTicketUseCase, ListTicketNotesUseCase, ListTicketsUseCase, TicketCountsUseCase,
    UpdateTicketUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Flat ticket view. `priority` is null on checks; the check fields are
/// null on repairs.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: Uuid,
    pub school_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub student_name: String,
    pub student_grade: Option<String>,
    pub device_type: DeviceType,
    pub device_number: Option<String>,
    pub issue_description: String,
    pub status: TicketStatus,
    pub issue_type: IssueType,
    pub priority: Option<TicketPriority>,
    pub teacher: Option<String>,
    pub room_number: Option<String>,
    pub all_present: Option<bool>,
    pub missing_students: Option<Vec<String>>,
    pub all_charged: Option<bool>,
    pub not_charged_students: Option<Vec<String>>,
    pub any_missing: Option<bool>,
    pub missing_device_students: Option<Vec<String>>,
    pub any_broken: Option<bool>,
    pub broken_asset_tag: Option<String>,
    pub lte_working: Option<bool>,
    pub lte_broken_asset_tag: Option<String>,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        let issue_type = ticket.kind.issue_type();
        let (priority, check) = match ticket.kind {
            TicketKind::Check(details) => (None, Some(details)),
            TicketKind::Repair(details) => (Some(details.priority), None),
        };
        let check = check.map_or_else(CheckResponseFields::default, CheckResponseFields::from);
        Self {
            id: ticket.id,
            school_id: ticket.school_id,
            assigned_to: ticket.assigned_to,
            student_name: ticket.student_name,
            student_grade: ticket.student_grade,
            device_type: ticket.device_type,
            device_number: ticket.device_number,
            issue_description: ticket.issue_description,
            status: ticket.status,
            issue_type,
            priority,
            teacher: check.teacher,
            room_number: check.room_number,
            all_present: check.all_present,
            missing_students: check.missing_students,
            all_charged: check.all_charged,
            not_charged_students: check.not_charged_students,
            any_missing: check.any_missing,
            missing_device_students: check.missing_device_students,
            any_broken: check.any_broken,
            broken_asset_tag: check.broken_asset_tag,
            lte_working: check.lte_working,
            lte_broken_asset_tag: check.lte_broken_asset_tag,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

#[derive(Default)]
struct CheckResponseFields {
    teacher: Option<String>,
    room_number: Option<String>,
    all_present: Option<bool>,
    missing_students: Option<Vec<String>>,
    all_charged: Option<bool>,
    not_charged_students: Option<Vec<String>>,
    any_missing: Option<bool>,
    missing_device_students: Option<Vec<String>>,
    any_broken: Option<bool>,
    broken_asset_tag: Option<String>,
    lte_working: Option<bool>,
    lte_broken_asset_tag: Option<String>,
}

impl From<CheckDetails> for CheckResponseFields {
    fn from(d: CheckDetails) -> Self {
        Self {
            teacher: d.teacher,
            room_number: d.room_number,
            all_present: d.all_present,
            missing_students: Some(d.missing_students),
            all_charged: d.all_charged,
            not_charged_students: Some(d.not_charged_students),
            any_missing: d.any_missing,
            missing_device_students: Some(d.missing_device_students),
            any_broken: d.any_broken,
            broken_asset_tag: d.broken_asset_tag,
            lte_working: d.lte_working,
            lte_broken_asset_tag: d.lte_broken_asset_tag,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketNoteResponse {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub note_text: String,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<TicketNote> for TicketNoteResponse {
    fn from(note: TicketNote) -> Self {
        Self {
            id: note.id,
            ticket_id: note.ticket_id,
            user_id: note.user_id,
            note_text: note.note_text,
            created_at: note.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCountsResponse {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub issue: u64,
    pub total: u64,
}

impl From<TicketCounts> for TicketCountsResponse {
    fn from(counts: TicketCounts) -> Self {
        Self {
            pending: counts.pending,
            in_progress: counts.in_progress,
            completed: counts.completed,
            issue: counts.issue,
            total: counts.total(),
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TicketListQuery {
    pub status: Option<String>,
    pub device_type: Option<String>,
    pub issue_type: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl TicketListQuery {
    fn into_filter(self) -> Result<TicketFilter, ApiError> {
        Ok(TicketFilter {
            status: parse_param(self.status.as_deref(), TicketStatus::parse, "status")?,
            device_type: parse_param(self.device_type.as_deref(), DeviceType::parse, "deviceType")?,
            issue_type: parse_param(self.issue_type.as_deref(), IssueType::parse, "issueType")?,
            assigned_to: self.assigned_to,
            search: self.search.filter(|s| !s.trim().is_empty()),
            sort_by: parse_param(self.sort_by.as_deref(), TicketSortBy::parse, "sortBy")?
                .unwrap_or_default(),
            sort: parse_param(self.sort_order.as_deref(), Sort::parse, "sortOrder")?
                .unwrap_or_default(),
        })
    }
}

// ── GET /api/schools/{school_id}/tickets ─────────────────────────────────────

pub async fn list_tickets(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
    Query(query): Query<TicketListQuery>,
) -> Result<Json<Vec<TicketResponse>>, ApiError> {
    let school_id = auth.school(school_id)?;
    let filter = query.into_filter()?;
    let usecase = ListTicketsUseCase {
        tickets: state.ticket_repo(),
    };
    let tickets = usecase.execute(school_id, &filter).await?;
    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

// ── POST /api/schools/{school_id}/tickets ────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckDetailsRequest {
    pub teacher: Option<String>,
    pub room_number: Option<String>,
    pub all_present: Option<bool>,
    #[serde(default)]
    pub missing_students: Vec<String>,
    pub all_charged: Option<bool>,
    #[serde(default)]
    pub not_charged_students: Vec<String>,
    pub any_missing: Option<bool>,
    #[serde(default)]
    pub missing_device_students: Vec<String>,
    pub any_broken: Option<bool>,
    pub broken_asset_tag: Option<String>,
    pub lte_working: Option<bool>,
    pub lte_broken_asset_tag: Option<String>,
}

impl From<CheckDetailsRequest> for CheckDetails {
    fn from(d: CheckDetailsRequest) -> Self {
        Self {
            teacher: d.teacher,
            room_number: d.room_number,
            all_present: d.all_present,
            missing_students: d.missing_students,
            all_charged: d.all_charged,
            not_charged_students: d.not_charged_students,
            any_missing: d.any_missing,
            missing_device_students: d.missing_device_students,
            any_broken: d.any_broken,
            broken_asset_tag: d.broken_asset_tag,
            lte_working: d.lte_working,
            lte_broken_asset_tag: d.lte_broken_asset_tag,
        }
    }
}

/// The ticket form, selected by `issueType`.
#[derive(Deserialize)]
#[serde(tag = "issueType", rename_all = "snake_case")]
pub enum TicketKindRequest {
    Check(CheckDetailsRequest),
    Repair { priority: Option<TicketPriority> },
}

impl From<TicketKindRequest> for TicketKind {
    fn from(kind: TicketKindRequest) -> Self {
        match kind {
            TicketKindRequest::Check(details) => Self::Check(details.into()),
            TicketKindRequest::Repair { priority } => Self::Repair(RepairDetails {
                priority: priority.unwrap_or_default(),
            }),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub assigned_to: Option<Uuid>,
    pub student_name: String,
    pub student_grade: Option<String>,
    pub device_type: DeviceType,
    pub device_number: Option<String>,
    pub issue_description: String,
    pub status: Option<TicketStatus>,
    #[serde(flatten)]
    pub kind: TicketKindRequest,
}

pub async fn create_ticket(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
    Json(body): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    let school_id = auth.school(school_id)?;
    let usecase = CreateTicketUseCase {
        tickets: state.ticket_repo(),
        users: state.user_repo(),
    };
    let ticket = usecase
        .execute(
            &auth.ctx,
            school_id,
            CreateTicketInput {
                assigned_to: body.assigned_to,
                student_name: body.student_name,
                student_grade: body.student_grade,
                device_type: body.device_type,
                device_number: body.device_number,
                issue_description: body.issue_description,
                status: body.status,
                kind: body.kind.into(),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

// ── GET /api/schools/{school_id}/tickets/counts ──────────────────────────────

pub async fn ticket_counts(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(school_id): Path<Uuid>,
) -> Result<Json<TicketCountsResponse>, ApiError> {
    let school_id = auth.school(school_id)?;
    let usecase = TicketCountsUseCase {
        tickets: state.ticket_repo(),
    };
    Ok(Json(usecase.execute(school_id).await?.into()))
}

// ── GET /api/schools/{school_id}/tickets/{ticket_id} ─────────────────────────

pub async fn get_ticket(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, ticket_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TicketResponse>, ApiError> {
    let school_id = auth.school(school_id)?;
    let usecase = GetTicketUseCase {
        tickets: state.ticket_repo(),
    };
    Ok(Json(usecase.execute(school_id, ticket_id).await?.into()))
}

// ── PATCH /api/schools/{school_id}/tickets/{ticket_id} ───────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,
    pub student_name: Option<String>,
    pub student_grade: Option<String>,
    pub device_type: Option<DeviceType>,
    pub device_number: Option<String>,
    pub issue_description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub teacher: Option<String>,
    pub room_number: Option<String>,
    pub all_present: Option<bool>,
    pub missing_students: Option<Vec<String>>,
    pub all_charged: Option<bool>,
    pub not_charged_students: Option<Vec<String>>,
    pub any_missing: Option<bool>,
    pub missing_device_students: Option<Vec<String>>,
    pub any_broken: Option<bool>,
    pub broken_asset_tag: Option<String>,
    pub lte_working: Option<bool>,
    pub lte_broken_asset_tag: Option<String>,
}

impl From<UpdateTicketRequest> for TicketPatch {
    fn from(body: UpdateTicketRequest) -> Self {
        Self {
            assigned_to: body.assigned_to,
            student_name: body.student_name,
            student_grade: body.student_grade,
            device_type: body.device_type,
            device_number: body.device_number,
            issue_description: body.issue_description,
            status: body.status,
            priority: body.priority,
            check: CheckPatch {
                teacher: body.teacher,
                room_number: body.room_number,
                all_present: body.all_present,
                missing_students: body.missing_students,
                all_charged: body.all_charged,
                not_charged_students: body.not_charged_students,
                any_missing: body.any_missing,
                missing_device_students: body.missing_device_students,
                any_broken: body.any_broken,
                broken_asset_tag: body.broken_asset_tag,
                lte_working: body.lte_working,
                lte_broken_asset_tag: body.lte_broken_asset_tag,
            },
        }
    }
}

pub async fn update_ticket(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, ticket_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateTicketRequest>,
) -> Result<Json<TicketResponse>, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = UpdateTicketUseCase {
        tickets: state.ticket_repo(),
        users: state.user_repo(),
    };
    let ticket = usecase.execute(school_id, ticket_id, body.into()).await?;
    Ok(Json(ticket.into()))
}

// ── DELETE /api/schools/{school_id}/tickets/{ticket_id} ──────────────────────

pub async fn delete_ticket(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, ticket_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let school_id = auth.school_as(STAFF, school_id)?;
    let usecase = DeleteTicketUseCase {
        tickets: state.ticket_repo(),
    };
    usecase.execute(school_id, ticket_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/schools/{school_id}/tickets/{ticket_id}/notes ───────────────────

pub async fn list_ticket_notes(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, ticket_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<TicketNoteResponse>>, ApiError> {
    let school_id = auth.school(school_id)?;
    let usecase = ListTicketNotesUseCase {
        tickets: state.ticket_repo(),
        notes: state.ticket_note_repo(),
    };
    let notes = usecase.execute(school_id, ticket_id).await?;
    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

// ── POST /api/schools/{school_id}/tickets/{ticket_id}/notes ──────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTicketNoteRequest {
    pub note_text: String,
}

pub async fn add_ticket_note(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((school_id, ticket_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AddTicketNoteRequest>,
) -> Result<(StatusCode, Json<TicketNoteResponse>), ApiError> {
    let school_id = auth.school(school_id)?;
    let usecase = AddTicketNoteUseCase {
        tickets: state.ticket_repo(),
        notes: state.ticket_note_repo(),
    };
    let note = usecase
        .execute(&auth.ctx, school_id, ticket_id, body.note_text)
        .await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}
