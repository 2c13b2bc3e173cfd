use chrono::Utc;
use uuid::Uuid;

use techteam_auth_types::context::AuthContext;
use techteam_domain::ticket::{DeviceType, TicketStatus};
use techteam_domain::user::UserRole;

use crate::domain::repository::{TicketNoteRepository, TicketRepository, UserRepository};
use crate::domain::types::{
    Ticket, TicketCounts, TicketFilter, TicketKind, TicketNote, TicketPatch, require_text,
};
use crate::error::ApiError;

/// An assignee must be a user of the ticket's school.
async fn ensure_assignee<U: UserRepository>(
    users: &U,
    school_id: Uuid,
    assignee: Uuid,
) -> Result<(), ApiError> {
    let member = users
        .find_by_id(assignee)
        .await?
        .is_some_and(|u| u.school_id == Some(school_id));
    if !member {
        return Err(ApiError::validation("assignedTo must be a user of this school"));
    }
    Ok(())
}

// ── CreateTicket ─────────────────────────────────────────────────────────────

pub struct CreateTicketInput {
    pub assigned_to: Option<Uuid>,
    pub student_name: String,
    pub student_grade: Option<String>,
    pub device_type: DeviceType,
    pub device_number: Option<String>,
    pub issue_description: String,
    pub status: Option<TicketStatus>,
    pub kind: TicketKind,
}

pub struct CreateTicketUseCase<T: TicketRepository, U: UserRepository> {
    pub tickets: T,
    pub users: U,
}

impl<T: TicketRepository, U: UserRepository> CreateTicketUseCase<T, U> {
    /// A student who leaves `assigned_to` empty is assigned their own ticket.
    pub async fn execute(
        &self,
        ctx: &AuthContext,
        school_id: Uuid,
        input: CreateTicketInput,
    ) -> Result<Ticket, ApiError> {
        require_text("studentName", &input.student_name)?;
        require_text("issueDescription", &input.issue_description)?;

        let assigned_to = match input.assigned_to {
            Some(assignee) => {
                ensure_assignee(&self.users, school_id, assignee).await?;
                Some(assignee)
            }
            None if ctx.role == UserRole::Student => Some(ctx.user_id),
            None => None,
        };

        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::now_v7(),
            school_id,
            assigned_to,
            student_name: input.student_name,
            student_grade: input.student_grade,
            device_type: input.device_type,
            device_number: input.device_number,
            issue_description: input.issue_description,
            status: input.status.unwrap_or_default(),
            kind: input.kind,
            created_at: now,
            updated_at: now,
        };
        self.tickets.create(&ticket).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            school_id = %school_id,
            issue_type = %ticket.kind.issue_type(),
            "ticket created"
        );
        Ok(ticket)
    }
}

// ── ListTickets ──────────────────────────────────────────────────────────────

pub struct ListTicketsUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> ListTicketsUseCase<T> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        filter: &TicketFilter,
    ) -> Result<Vec<Ticket>, ApiError> {
        self.tickets.list(school_id, filter).await
    }
}

// ── GetTicket ────────────────────────────────────────────────────────────────

pub struct GetTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> GetTicketUseCase<T> {
    pub async fn execute(&self, school_id: Uuid, ticket_id: Uuid) -> Result<Ticket, ApiError> {
        self.tickets
            .find(ticket_id, school_id)
            .await?
            .ok_or(ApiError::NotFound("ticket"))
    }
}

// ── UpdateTicket ─────────────────────────────────────────────────────────────

pub struct UpdateTicketUseCase<T: TicketRepository, U: UserRepository> {
    pub tickets: T,
    pub users: U,
}

impl<T: TicketRepository, U: UserRepository> UpdateTicketUseCase<T, U> {
    /// Last write wins; the (id, school) key is re-checked on write.
    pub async fn execute(
        &self,
        school_id: Uuid,
        ticket_id: Uuid,
        patch: TicketPatch,
    ) -> Result<Ticket, ApiError> {
        if let Some(Some(assignee)) = patch.assigned_to {
            ensure_assignee(&self.users, school_id, assignee).await?;
        }

        let mut ticket = self
            .tickets
            .find(ticket_id, school_id)
            .await?
            .ok_or(ApiError::NotFound("ticket"))?;
        apply_ticket_patch(&mut ticket, patch)?;
        ticket.updated_at = Utc::now();

        if !self.tickets.update(&ticket).await? {
            return Err(ApiError::NotFound("ticket"));
        }
        tracing::info!(ticket_id = %ticket.id, status = %ticket.status, "ticket updated");
        Ok(ticket)
    }
}

/// Merge a patch into a ticket. Priority only applies to repairs and check
/// fields only to checks.
pub fn apply_ticket_patch(ticket: &mut Ticket, patch: TicketPatch) -> Result<(), ApiError> {
    if let Some(name) = &patch.student_name {
        require_text("studentName", name)?;
    }
    if let Some(description) = &patch.issue_description {
        require_text("issueDescription", description)?;
    }

    match &mut ticket.kind {
        TicketKind::Check(_) if patch.priority.is_some() => {
            return Err(ApiError::validation("priority applies to repair tickets only"));
        }
        TicketKind::Repair(_) if !patch.check.is_empty() => {
            return Err(ApiError::validation("check fields apply to check tickets only"));
        }
        TicketKind::Check(details) => patch.check.apply(details),
        TicketKind::Repair(repair) => {
            if let Some(priority) = patch.priority {
                repair.priority = priority;
            }
        }
    }

    if let Some(assigned_to) = patch.assigned_to {
        ticket.assigned_to = assigned_to;
    }
    if let Some(name) = patch.student_name {
        ticket.student_name = name;
    }
    if let Some(grade) = patch.student_grade {
        ticket.student_grade = Some(grade);
    }
    if let Some(device_type) = patch.device_type {
        ticket.device_type = device_type;
    }
    if let Some(number) = patch.device_number {
        ticket.device_number = Some(number);
    }
    if let Some(description) = patch.issue_description {
        ticket.issue_description = description;
    }
    if let Some(status) = patch.status {
        ticket.status = status;
    }
    Ok(())
}

// ── DeleteTicket ─────────────────────────────────────────────────────────────

pub struct DeleteTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> DeleteTicketUseCase<T> {
    pub async fn execute(&self, school_id: Uuid, ticket_id: Uuid) -> Result<(), ApiError> {
        if !self.tickets.delete(ticket_id, school_id).await? {
            return Err(ApiError::NotFound("ticket"));
        }
        tracing::info!(ticket_id = %ticket_id, school_id = %school_id, "ticket deleted");
        Ok(())
    }
}

// ── TicketCounts ─────────────────────────────────────────────────────────────

pub struct TicketCountsUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> TicketCountsUseCase<T> {
    pub async fn execute(&self, school_id: Uuid) -> Result<TicketCounts, ApiError> {
        self.tickets.counts(school_id).await
    }
}

// ── AssignedTickets ──────────────────────────────────────────────────────────

pub struct AssignedTicketsUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> AssignedTicketsUseCase<T> {
    /// Tickets assigned to a user within their school, newest first.
    pub async fn execute(&self, school_id: Uuid, user_id: Uuid) -> Result<Vec<Ticket>, ApiError> {
        let filter = TicketFilter {
            assigned_to: Some(user_id),
            ..Default::default()
        };
        self.tickets.list(school_id, &filter).await
    }
}

// ── Ticket notes ─────────────────────────────────────────────────────────────

pub struct AddTicketNoteUseCase<T: TicketRepository, N: TicketNoteRepository> {
    pub tickets: T,
    pub notes: N,
}

impl<T: TicketRepository, N: TicketNoteRepository> AddTicketNoteUseCase<T, N> {
    pub async fn execute(
        &self,
        ctx: &AuthContext,
        school_id: Uuid,
        ticket_id: Uuid,
        note_text: String,
    ) -> Result<TicketNote, ApiError> {
        require_text("noteText", &note_text)?;
        if self.tickets.find(ticket_id, school_id).await?.is_none() {
            return Err(ApiError::NotFound("ticket"));
        }
        let note = TicketNote {
            id: Uuid::now_v7(),
            school_id,
            ticket_id,
            user_id: ctx.user_id,
            note_text,
            created_at: Utc::now(),
        };
        self.notes.create(&note).await?;
        Ok(note)
    }
}

pub struct ListTicketNotesUseCase<T: TicketRepository, N: TicketNoteRepository> {
    pub tickets: T,
    pub notes: N,
}

impl<T: TicketRepository, N: TicketNoteRepository> ListTicketNotesUseCase<T, N> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        ticket_id: Uuid,
    ) -> Result<Vec<TicketNote>, ApiError> {
        if self.tickets.find(ticket_id, school_id).await?.is_none() {
            return Err(ApiError::NotFound("ticket"));
        }
        self.notes.list(ticket_id, school_id).await
    }
}
