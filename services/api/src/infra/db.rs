use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, Order, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionError, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use techteam_api_schema::{
    achievements, certifications, challenge_completions, challenges, resources, schools, sessions,
    ticket_notes, tickets, user_achievements, user_certifications, users, work_logs,
};
use techteam_core::sea_ext::contains_ci;
use techteam_domain::learning::{
    AchievementIcon, Category, CertificationStatus, ContentType, Difficulty,
};
use techteam_domain::sort::{Sort, TicketSortBy};
use techteam_domain::ticket::{DeviceType, IssueType, TicketPriority, TicketStatus};
use techteam_domain::user::{Avatar, UserRole};

use crate::domain::repository::{
    AchievementRepository, CertificationRepository, ChallengeRepository, ResourceRepository,
    SchoolRepository, SessionRepository, TicketNoteRepository, TicketRepository, UserRepository,
    WorkLogRepository,
};
use crate::domain::types::{
    Achievement, Certification, CertificationProgress, Challenge, ChallengeCompletion,
    CheckDetails, CompletionSummary, EarnedAchievement, RepairDetails, Resource, ResourceFilter,
    School, Session, Ticket, TicketCounts, TicketFilter, TicketKind, TicketNote, User,
    UserAchievement, UserCertification, UserPatch, WorkLog, WorkLogFilter,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Map an insert error: unique violations become `Conflict(what)`.
fn insert_error(err: DbErr, what: &'static str) -> ApiError {
    if is_unique_violation(&err) {
        return ApiError::Conflict(what);
    }
    ApiError::Internal(anyhow::Error::new(err).context(format!("insert {what}")))
}

/// Decode a stored enum name, treating unknown values as corrupt data.
fn decode<T>(value: &str, parse: fn(&str) -> Option<T>, column: &str) -> Result<T, ApiError> {
    parse(value).ok_or_else(|| ApiError::Internal(anyhow!("unexpected {column} value {value:?}")))
}

fn collect<M, T>(models: Vec<M>, map: fn(M) -> Result<T, ApiError>) -> Result<Vec<T>, ApiError> {
    models.into_iter().map(map).collect()
}

// ── School repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSchoolRepository {
    pub db: DatabaseConnection,
}

impl SchoolRepository for DbSchoolRepository {
    async fn create(&self, school: &School) -> Result<(), ApiError> {
        school_active_model(school)
            .insert(&self.db)
            .await
            .context("create school")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, ApiError> {
        let model = schools::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find school by id")?;
        Ok(model.map(school_from_model))
    }

    async fn list(&self) -> Result<Vec<School>, ApiError> {
        let models = schools::Entity::find()
            .order_by_asc(schools::Column::Name)
            .all(&self.db)
            .await
            .context("list schools")?;
        Ok(models.into_iter().map(school_from_model).collect())
    }

    async fn update(&self, school: &School) -> Result<bool, ApiError> {
        let result = schools::Entity::update_many()
            .set(school_active_model(school))
            .filter(schools::Column::Id.eq(school.id))
            .exec(&self.db)
            .await
            .context("update school")?;
        Ok(result.rows_affected > 0)
    }
}

fn school_active_model(school: &School) -> schools::ActiveModel {
    schools::ActiveModel {
        id: Set(school.id),
        name: Set(school.name.clone()),
        address: Set(school.address.clone()),
        contact_email: Set(school.contact_email.clone()),
        admin_name: Set(school.admin_name.clone()),
        created_at: Set(school.created_at),
        updated_at: Set(school.updated_at),
    }
}

fn school_from_model(model: schools::Model) -> School {
    School {
        id: model.id,
        name: model.name,
        address: model.address,
        contact_email: model.contact_email,
        admin_name: model.admin_name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── User repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            school_id: Set(user.school_id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            role: Set(user.role.as_str().to_owned()),
            points: Set(user.points),
            streak: Set(user.streak),
            selected_avatar: Set(user.selected_avatar.as_str().to_owned()),
            is_active: Set(user.is_active),
            password_reset_token: Set(None),
            password_reset_expires: Set(None),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| insert_error(e, "user"))?;
        Ok(())
    }

    async fn list_by_school(
        &self,
        school_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .filter(users::Column::SchoolId.eq(school_id))
            .filter(users::Column::Role.eq(role.as_str()))
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
            .context("list users by school")?;
        collect(models, user_from_model)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        school_id: Uuid,
        role: UserRole,
        patch: &UserPatch,
    ) -> Result<Option<User>, ApiError> {
        let Some(model) = users::Entity::find()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::SchoolId.eq(school_id))
            .filter(users::Column::Role.eq(role.as_str()))
            .one(&self.db)
            .await
            .context("find user for update")?
        else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        if let Some(username) = &patch.username {
            active.username = Set(username.clone());
        }
        if let Some(email) = &patch.email {
            active.email = Set(email.clone());
        }
        if let Some(first_name) = &patch.first_name {
            active.first_name = Set(Some(first_name.clone()));
        }
        if let Some(last_name) = &patch.last_name {
            active.last_name = Set(Some(last_name.clone()));
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("user")
            } else {
                ApiError::Internal(anyhow::Error::new(e).context("update user profile"))
            }
        })?;
        user_from_model(updated).map(Some)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update user password")?;
        Ok(result.rows_affected > 0)
    }

    async fn update_avatar(&self, id: Uuid, avatar: Avatar) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::SelectedAvatar, Expr::value(avatar.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update user avatar")?;
        Ok(result.rows_affected > 0)
    }

    async fn add_points(&self, id: Uuid, delta: i32) -> Result<Option<i32>, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Points,
                Expr::col(users::Column::Points).add(delta),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(Expr::expr(Expr::col(users::Column::Points).add(delta)).gte(0))
            .exec(&self.db)
            .await
            .context("add user points")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("read user points")?;
        Ok(model.map(|m| m.points))
    }

    async fn top_by_points(&self, school_id: Uuid, limit: u64) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .filter(users::Column::SchoolId.eq(school_id))
            .order_by_desc(users::Column::Points)
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("rank users by points")?;
        collect(models, user_from_model)
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    Ok(User {
        id: model.id,
        school_id: model.school_id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        role: decode(&model.role, UserRole::parse, "users.role")?,
        points: model.points,
        streak: model.streak,
        selected_avatar: decode(&model.selected_avatar, Avatar::parse, "users.selected_avatar")?,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Session repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), ApiError> {
        sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            token: Set(session.token.clone()),
            ip_address: Set(session.ip_address.clone()),
            user_agent: Set(session.user_agent.clone()),
            created_at: Set(session.created_at),
            expires_at: Set(session.expires_at),
            revoked_at: Set(session.revoked_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&self.db)
            .await
            .context("find session by token")?;
        Ok(model.map(session_from_model))
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(at))
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .context("revoke session")?;
        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, ApiError> {
        let result = sessions::Entity::update_many()
            .col_expr(sessions::Column::RevokedAt, Expr::value(at))
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await
            .context("revoke all user sessions")?;
        Ok(result.rows_affected)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .context("delete expired sessions")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        user_id: model.user_id,
        token: model.token,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        created_at: model.created_at,
        expires_at: model.expires_at,
        revoked_at: model.revoked_at,
    }
}

// ── Ticket repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTicketRepository {
    pub db: DatabaseConnection,
}

impl TicketRepository for DbTicketRepository {
    async fn create(&self, ticket: &Ticket) -> Result<(), ApiError> {
        ticket_active_model(ticket)
            .insert(&self.db)
            .await
            .context("create ticket")?;
        Ok(())
    }

    async fn find(&self, id: Uuid, school_id: Uuid) -> Result<Option<Ticket>, ApiError> {
        let model = tickets::Entity::find()
            .filter(tickets::Column::Id.eq(id))
            .filter(tickets::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .context("find ticket")?;
        model.map(ticket_from_model).transpose()
    }

    async fn list(&self, school_id: Uuid, filter: &TicketFilter) -> Result<Vec<Ticket>, ApiError> {
        let mut query = tickets::Entity::find().filter(tickets::Column::SchoolId.eq(school_id));
        if let Some(status) = filter.status {
            query = query.filter(tickets::Column::Status.eq(status.as_str()));
        }
        if let Some(device_type) = filter.device_type {
            query = query.filter(tickets::Column::DeviceType.eq(device_type.as_str()));
        }
        if let Some(issue_type) = filter.issue_type {
            query = query.filter(tickets::Column::IssueType.eq(issue_type.as_str()));
        }
        if let Some(assigned_to) = filter.assigned_to {
            query = query.filter(tickets::Column::AssignedTo.eq(assigned_to));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(tickets::Column::StudentName, search))
                    .add(contains_ci(tickets::Column::IssueDescription, search)),
            );
        }

        let order = match filter.sort {
            Sort::Asc => Order::Asc,
            Sort::Desc => Order::Desc,
        };
        query = match filter.sort_by {
            TicketSortBy::Date => query
                .order_by(tickets::Column::CreatedAt, order.clone())
                .order_by(tickets::Column::Id, order),
            TicketSortBy::Student => query
                .order_by(tickets::Column::StudentName, order)
                .order_by_desc(tickets::Column::CreatedAt),
        };

        let models = query.all(&self.db).await.context("list tickets")?;
        collect(models, ticket_from_model)
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool, ApiError> {
        let result = tickets::Entity::update_many()
            .set(ticket_active_model(ticket))
            .filter(tickets::Column::Id.eq(ticket.id))
            .filter(tickets::Column::SchoolId.eq(ticket.school_id))
            .exec(&self.db)
            .await
            .context("update ticket")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<bool, ApiError> {
        let result = tickets::Entity::delete_many()
            .filter(tickets::Column::Id.eq(id))
            .filter(tickets::Column::SchoolId.eq(school_id))
            .exec(&self.db)
            .await
            .context("delete ticket")?;
        Ok(result.rows_affected > 0)
    }

    async fn counts(&self, school_id: Uuid) -> Result<TicketCounts, ApiError> {
        let rows: Vec<(String, i64)> = tickets::Entity::find()
            .select_only()
            .column(tickets::Column::Status)
            .column_as(Expr::col(tickets::Column::Id).count(), "count")
            .filter(tickets::Column::SchoolId.eq(school_id))
            .group_by(tickets::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count tickets by status")?;

        let mut counts = TicketCounts::default();
        for (status, count) in rows {
            let count = u64::try_from(count).unwrap_or_default();
            match decode(&status, TicketStatus::parse, "tickets.status")? {
                TicketStatus::Pending => counts.pending = count,
                TicketStatus::InProgress => counts.in_progress = count,
                TicketStatus::Completed => counts.completed = count,
                TicketStatus::Issue => counts.issue = count,
            }
        }
        Ok(counts)
    }
}

fn names_to_json(names: &[String]) -> Option<sea_orm::JsonValue> {
    Some(serde_json::Value::from(names.to_vec()))
}

fn names_from_json(value: Option<sea_orm::JsonValue>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Flatten a ticket into its row. Check columns stay null on repairs and
/// priority stays null on checks.
fn ticket_active_model(ticket: &Ticket) -> tickets::ActiveModel {
    let mut model = tickets::ActiveModel {
        id: Set(ticket.id),
        school_id: Set(ticket.school_id),
        assigned_to: Set(ticket.assigned_to),
        student_name: Set(ticket.student_name.clone()),
        student_grade: Set(ticket.student_grade.clone()),
        device_type: Set(ticket.device_type.as_str().to_owned()),
        device_number: Set(ticket.device_number.clone()),
        issue_type: Set(ticket.kind.issue_type().as_str().to_owned()),
        issue_description: Set(ticket.issue_description.clone()),
        status: Set(ticket.status.as_str().to_owned()),
        priority: Set(None),
        teacher: Set(None),
        room_number: Set(None),
        all_present: Set(None),
        missing_students: Set(None),
        all_charged: Set(None),
        not_charged_students: Set(None),
        any_missing: Set(None),
        missing_device_students: Set(None),
        any_broken: Set(None),
        broken_asset_tag: Set(None),
        lte_working: Set(None),
        lte_broken_asset_tag: Set(None),
        created_at: Set(ticket.created_at),
        updated_at: Set(ticket.updated_at),
    };
    match &ticket.kind {
        TicketKind::Repair(repair) => {
            model.priority = Set(Some(repair.priority.as_str().to_owned()));
        }
        TicketKind::Check(check) => {
            model.teacher = Set(check.teacher.clone());
            model.room_number = Set(check.room_number.clone());
            model.all_present = Set(check.all_present);
            model.missing_students = Set(names_to_json(&check.missing_students));
            model.all_charged = Set(check.all_charged);
            model.not_charged_students = Set(names_to_json(&check.not_charged_students));
            model.any_missing = Set(check.any_missing);
            model.missing_device_students = Set(names_to_json(&check.missing_device_students));
            model.any_broken = Set(check.any_broken);
            model.broken_asset_tag = Set(check.broken_asset_tag.clone());
            model.lte_working = Set(check.lte_working);
            model.lte_broken_asset_tag = Set(check.lte_broken_asset_tag.clone());
        }
    }
    model
}

fn ticket_from_model(model: tickets::Model) -> Result<Ticket, ApiError> {
    let kind = match decode(&model.issue_type, IssueType::parse, "tickets.issue_type")? {
        IssueType::Repair => TicketKind::Repair(RepairDetails {
            priority: match model.priority.as_deref() {
                Some(p) => decode(p, TicketPriority::parse, "tickets.priority")?,
                None => TicketPriority::default(),
            },
        }),
        IssueType::Check => TicketKind::Check(CheckDetails {
            teacher: model.teacher,
            room_number: model.room_number,
            all_present: model.all_present,
            missing_students: names_from_json(model.missing_students),
            all_charged: model.all_charged,
            not_charged_students: names_from_json(model.not_charged_students),
            any_missing: model.any_missing,
            missing_device_students: names_from_json(model.missing_device_students),
            any_broken: model.any_broken,
            broken_asset_tag: model.broken_asset_tag,
            lte_working: model.lte_working,
            lte_broken_asset_tag: model.lte_broken_asset_tag,
        }),
    };
    Ok(Ticket {
        id: model.id,
        school_id: model.school_id,
        assigned_to: model.assigned_to,
        student_name: model.student_name,
        student_grade: model.student_grade,
        device_type: decode(&model.device_type, DeviceType::parse, "tickets.device_type")?,
        device_number: model.device_number,
        issue_description: model.issue_description,
        status: decode(&model.status, TicketStatus::parse, "tickets.status")?,
        kind,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Ticket note repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTicketNoteRepository {
    pub db: DatabaseConnection,
}

impl TicketNoteRepository for DbTicketNoteRepository {
    async fn create(&self, note: &TicketNote) -> Result<(), ApiError> {
        ticket_notes::ActiveModel {
            id: Set(note.id),
            school_id: Set(note.school_id),
            ticket_id: Set(note.ticket_id),
            user_id: Set(note.user_id),
            note_text: Set(note.note_text.clone()),
            created_at: Set(note.created_at),
        }
        .insert(&self.db)
        .await
        .context("create ticket note")?;
        Ok(())
    }

    async fn list(&self, ticket_id: Uuid, school_id: Uuid) -> Result<Vec<TicketNote>, ApiError> {
        let models = ticket_notes::Entity::find()
            .filter(ticket_notes::Column::TicketId.eq(ticket_id))
            .filter(ticket_notes::Column::SchoolId.eq(school_id))
            .order_by_asc(ticket_notes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list ticket notes")?;
        Ok(models
            .into_iter()
            .map(|m| TicketNote {
                id: m.id,
                school_id: m.school_id,
                ticket_id: m.ticket_id,
                user_id: m.user_id,
                note_text: m.note_text,
                created_at: m.created_at,
            })
            .collect())
    }
}

// ── Challenge repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChallengeRepository {
    pub db: DatabaseConnection,
}

impl ChallengeRepository for DbChallengeRepository {
    async fn list(&self, active_only: bool) -> Result<Vec<Challenge>, ApiError> {
        let mut query = challenges::Entity::find();
        if active_only {
            query = query.filter(challenges::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(challenges::Column::CreatedAt)
            .order_by_asc(challenges::Column::Id)
            .all(&self.db)
            .await
            .context("list challenges")?;
        collect(models, challenge_from_model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Challenge>, ApiError> {
        let model = challenges::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find challenge by id")?;
        model.map(challenge_from_model).transpose()
    }

    async fn create(&self, challenge: &Challenge) -> Result<(), ApiError> {
        challenge_active_model(challenge)
            .insert(&self.db)
            .await
            .context("create challenge")?;
        Ok(())
    }

    async fn update(&self, challenge: &Challenge) -> Result<bool, ApiError> {
        let result = challenges::Entity::update_many()
            .set(challenge_active_model(challenge))
            .filter(challenges::Column::Id.eq(challenge.id))
            .exec(&self.db)
            .await
            .context("update challenge")?;
        Ok(result.rows_affected > 0)
    }

    async fn completed_ids(&self, user_id: Uuid, school_id: Uuid) -> Result<Vec<Uuid>, ApiError> {
        let ids: Vec<Uuid> = challenge_completions::Entity::find()
            .select_only()
            .column(challenge_completions::Column::ChallengeId)
            .filter(challenge_completions::Column::UserId.eq(user_id))
            .filter(challenge_completions::Column::SchoolId.eq(school_id))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list completed challenge ids")?;
        Ok(ids)
    }

    async fn complete(&self, completion: &ChallengeCompletion) -> Result<i32, ApiError> {
        let result = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                let completion = completion.clone();
                Box::pin(async move {
                    challenge_completions::ActiveModel {
                        id: Set(completion.id),
                        school_id: Set(completion.school_id),
                        user_id: Set(completion.user_id),
                        challenge_id: Set(completion.challenge_id),
                        completed_at: Set(completion.completed_at),
                        points_earned: Set(completion.points_earned),
                    }
                    .insert(txn)
                    .await?;

                    users::Entity::update_many()
                        .col_expr(
                            users::Column::Points,
                            Expr::col(users::Column::Points).add(completion.points_earned),
                        )
                        .col_expr(users::Column::UpdatedAt, Expr::value(completion.completed_at))
                        .filter(users::Column::Id.eq(completion.user_id))
                        .exec(txn)
                        .await?;

                    challenges::Entity::update_many()
                        .col_expr(
                            challenges::Column::Participants,
                            Expr::col(challenges::Column::Participants).add(1),
                        )
                        .filter(challenges::Column::Id.eq(completion.challenge_id))
                        .exec(txn)
                        .await?;

                    let user = users::Entity::find_by_id(completion.user_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| DbErr::RecordNotFound("user".into()))?;
                    Ok(user.points)
                })
            })
            .await;

        match result {
            Ok(points) => Ok(points),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(ApiError::Conflict("challenge completion"))
            }
            Err(e) => Err(anyhow::Error::new(e).context("complete challenge").into()),
        }
    }

    async fn completions(
        &self,
        school_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<Vec<CompletionSummary>, ApiError> {
        let mut query = challenge_completions::Entity::find()
            .find_also_related(challenges::Entity)
            .filter(challenge_completions::Column::SchoolId.eq(school_id));
        if let Some(user_id) = user_id {
            query = query.filter(challenge_completions::Column::UserId.eq(user_id));
        }
        let rows = query
            .order_by_desc(challenge_completions::Column::CompletedAt)
            .all(&self.db)
            .await
            .context("list challenge completions")?;
        Ok(rows
            .into_iter()
            .map(|(completion, challenge)| CompletionSummary {
                completion: ChallengeCompletion {
                    id: completion.id,
                    school_id: completion.school_id,
                    user_id: completion.user_id,
                    challenge_id: completion.challenge_id,
                    completed_at: completion.completed_at,
                    points_earned: completion.points_earned,
                },
                challenge_title: challenge.map(|c| c.title).unwrap_or_default(),
            })
            .collect())
    }
}

fn challenge_active_model(challenge: &Challenge) -> challenges::ActiveModel {
    challenges::ActiveModel {
        id: Set(challenge.id),
        title: Set(challenge.title.clone()),
        description: Set(challenge.description.clone()),
        difficulty: Set(challenge.difficulty.as_str().to_owned()),
        points: Set(challenge.points),
        category: Set(challenge.category.as_str().to_owned()),
        days_to_complete: Set(challenge.days_to_complete),
        participants: Set(challenge.participants),
        is_active: Set(challenge.is_active),
        created_at: Set(challenge.created_at),
    }
}

fn challenge_from_model(model: challenges::Model) -> Result<Challenge, ApiError> {
    Ok(Challenge {
        id: model.id,
        title: model.title,
        description: model.description,
        difficulty: decode(&model.difficulty, Difficulty::parse, "challenges.difficulty")?,
        points: model.points,
        category: decode(&model.category, Category::parse, "challenges.category")?,
        days_to_complete: model.days_to_complete,
        participants: model.participants,
        is_active: model.is_active,
        created_at: model.created_at,
    })
}

// ── Work log repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWorkLogRepository {
    pub db: DatabaseConnection,
}

impl WorkLogRepository for DbWorkLogRepository {
    async fn create(&self, log: &WorkLog) -> Result<(), ApiError> {
        work_log_active_model(log)
            .insert(&self.db)
            .await
            .context("create work log")?;
        Ok(())
    }

    async fn find(&self, id: Uuid, school_id: Uuid) -> Result<Option<WorkLog>, ApiError> {
        let model = work_logs::Entity::find()
            .filter(work_logs::Column::Id.eq(id))
            .filter(work_logs::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .context("find work log")?;
        Ok(model.map(work_log_from_model))
    }

    async fn list(&self, school_id: Uuid, filter: &WorkLogFilter) -> Result<Vec<WorkLog>, ApiError> {
        let mut query = work_logs::Entity::find().filter(work_logs::Column::SchoolId.eq(school_id));
        if let Some(user_id) = filter.user_id {
            query = query.filter(work_logs::Column::UserId.eq(user_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(work_logs::Column::LogDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(work_logs::Column::LogDate.lte(end));
        }
        let models = query
            .order_by_desc(work_logs::Column::LogDate)
            .order_by_desc(work_logs::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list work logs")?;
        Ok(models.into_iter().map(work_log_from_model).collect())
    }

    async fn update(&self, log: &WorkLog) -> Result<bool, ApiError> {
        let result = work_logs::Entity::update_many()
            .set(work_log_active_model(log))
            .filter(work_logs::Column::Id.eq(log.id))
            .filter(work_logs::Column::SchoolId.eq(log.school_id))
            .exec(&self.db)
            .await
            .context("update work log")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid, school_id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        let result = work_logs::Entity::delete_many()
            .filter(work_logs::Column::Id.eq(id))
            .filter(work_logs::Column::SchoolId.eq(school_id))
            .filter(work_logs::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete work log")?;
        Ok(result.rows_affected > 0)
    }
}

fn work_log_active_model(log: &WorkLog) -> work_logs::ActiveModel {
    work_logs::ActiveModel {
        id: Set(log.id),
        school_id: Set(log.school_id),
        user_id: Set(log.user_id),
        log_date: Set(log.log_date),
        minutes_worked: Set(log.minutes_worked),
        category: Set(log.category.clone()),
        description: Set(log.description.clone()),
        created_at: Set(log.created_at),
    }
}

fn work_log_from_model(model: work_logs::Model) -> WorkLog {
    WorkLog {
        id: model.id,
        school_id: model.school_id,
        user_id: model.user_id,
        log_date: model.log_date,
        minutes_worked: model.minutes_worked,
        category: model.category,
        description: model.description,
        created_at: model.created_at,
    }
}

// ── Resource repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbResourceRepository {
    pub db: DatabaseConnection,
}

impl ResourceRepository for DbResourceRepository {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, ApiError> {
        let mut query = resources::Entity::find();
        if let Some(category) = filter.category {
            query = query.filter(resources::Column::Category.eq(category.as_str()));
        }
        if let Some(content_type) = filter.content_type {
            query = query.filter(resources::Column::ContentType.eq(content_type.as_str()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(resources::Column::Title, search))
                    .add(contains_ci(resources::Column::Description, search)),
            );
        }
        let models = query
            .order_by_desc(resources::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list resources")?;
        collect(models, resource_from_model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>, ApiError> {
        let model = resources::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find resource by id")?;
        model.map(resource_from_model).transpose()
    }

    async fn create(&self, resource: &Resource) -> Result<(), ApiError> {
        resource_active_model(resource)
            .insert(&self.db)
            .await
            .context("create resource")?;
        Ok(())
    }

    async fn update(&self, resource: &Resource) -> Result<bool, ApiError> {
        let mut model = resource_active_model(resource);
        // Views only move through record_view.
        model.views = sea_orm::ActiveValue::NotSet;
        let result = resources::Entity::update_many()
            .set(model)
            .filter(resources::Column::Id.eq(resource.id))
            .exec(&self.db)
            .await
            .context("update resource")?;
        Ok(result.rows_affected > 0)
    }

    async fn record_view(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = resources::Entity::update_many()
            .col_expr(
                resources::Column::Views,
                Expr::col(resources::Column::Views).add(1),
            )
            .filter(resources::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("record resource view")?;
        Ok(result.rows_affected > 0)
    }
}

fn resource_active_model(resource: &Resource) -> resources::ActiveModel {
    resources::ActiveModel {
        id: Set(resource.id),
        title: Set(resource.title.clone()),
        category: Set(resource.category.as_str().to_owned()),
        content_type: Set(resource.content_type.as_str().to_owned()),
        url: Set(resource.url.clone()),
        description: Set(resource.description.clone()),
        thumbnail_url: Set(resource.thumbnail_url.clone()),
        duration: Set(resource.duration.clone()),
        views: Set(resource.views),
        created_at: Set(resource.created_at),
    }
}

fn resource_from_model(model: resources::Model) -> Result<Resource, ApiError> {
    Ok(Resource {
        id: model.id,
        title: model.title,
        category: decode(&model.category, Category::parse, "resources.category")?,
        content_type: decode(&model.content_type, ContentType::parse, "resources.content_type")?,
        url: model.url,
        description: model.description,
        thumbnail_url: model.thumbnail_url,
        duration: model.duration,
        views: model.views,
        created_at: model.created_at,
    })
}

// ── Achievement repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAchievementRepository {
    pub db: DatabaseConnection,
}

impl AchievementRepository for DbAchievementRepository {
    async fn list(&self) -> Result<Vec<Achievement>, ApiError> {
        let models = achievements::Entity::find()
            .order_by_asc(achievements::Column::Name)
            .all(&self.db)
            .await
            .context("list achievements")?;
        collect(models, achievement_from_model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Achievement>, ApiError> {
        let model = achievements::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find achievement by id")?;
        model.map(achievement_from_model).transpose()
    }

    async fn create(&self, achievement: &Achievement) -> Result<(), ApiError> {
        achievements::ActiveModel {
            id: Set(achievement.id),
            name: Set(achievement.name.clone()),
            description: Set(achievement.description.clone()),
            icon: Set(achievement.icon.as_str().to_owned()),
            points_required: Set(achievement.points_required),
            category: Set(achievement.category.clone()),
        }
        .insert(&self.db)
        .await
        .context("create achievement")?;
        Ok(())
    }

    async fn award(&self, award: &UserAchievement) -> Result<(), ApiError> {
        user_achievements::ActiveModel {
            id: Set(award.id),
            school_id: Set(award.school_id),
            user_id: Set(award.user_id),
            achievement_id: Set(award.achievement_id),
            earned_at: Set(award.earned_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| insert_error(e, "achievement award"))?;
        Ok(())
    }

    async fn earned_by(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<EarnedAchievement>, ApiError> {
        let rows = user_achievements::Entity::find()
            .find_also_related(achievements::Entity)
            .filter(user_achievements::Column::UserId.eq(user_id))
            .filter(user_achievements::Column::SchoolId.eq(school_id))
            .order_by_desc(user_achievements::Column::EarnedAt)
            .all(&self.db)
            .await
            .context("list earned achievements")?;
        let mut earned = Vec::with_capacity(rows.len());
        for (award, achievement) in rows {
            let Some(achievement) = achievement else {
                continue;
            };
            earned.push(EarnedAchievement {
                award: UserAchievement {
                    id: award.id,
                    school_id: award.school_id,
                    user_id: award.user_id,
                    achievement_id: award.achievement_id,
                    earned_at: award.earned_at,
                },
                achievement: achievement_from_model(achievement)?,
            });
        }
        Ok(earned)
    }
}

fn achievement_from_model(model: achievements::Model) -> Result<Achievement, ApiError> {
    Ok(Achievement {
        id: model.id,
        name: model.name,
        description: model.description,
        icon: decode(&model.icon, AchievementIcon::parse, "achievements.icon")?,
        points_required: model.points_required,
        category: model.category,
    })
}

// ── Certification repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCertificationRepository {
    pub db: DatabaseConnection,
}

impl CertificationRepository for DbCertificationRepository {
    async fn list(&self) -> Result<Vec<Certification>, ApiError> {
        let models = certifications::Entity::find()
            .order_by_asc(certifications::Column::Name)
            .all(&self.db)
            .await
            .context("list certifications")?;
        Ok(models.into_iter().map(certification_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Certification>, ApiError> {
        let model = certifications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find certification by id")?;
        Ok(model.map(certification_from_model))
    }

    async fn create(&self, certification: &Certification) -> Result<(), ApiError> {
        certifications::ActiveModel {
            id: Set(certification.id),
            name: Set(certification.name.clone()),
            description: Set(certification.description.clone()),
            total_steps: Set(certification.total_steps),
        }
        .insert(&self.db)
        .await
        .context("create certification")?;
        Ok(())
    }

    async fn start(&self, progress: &UserCertification) -> Result<(), ApiError> {
        user_certification_active_model(progress)
            .insert(&self.db)
            .await
            .context("create user certification")?;
        Ok(())
    }

    async fn find_progress(
        &self,
        id: Uuid,
        school_id: Uuid,
    ) -> Result<Option<UserCertification>, ApiError> {
        let model = user_certifications::Entity::find()
            .filter(user_certifications::Column::Id.eq(id))
            .filter(user_certifications::Column::SchoolId.eq(school_id))
            .one(&self.db)
            .await
            .context("find user certification")?;
        model.map(user_certification_from_model).transpose()
    }

    async fn update_progress(&self, progress: &UserCertification) -> Result<bool, ApiError> {
        let result = user_certifications::Entity::update_many()
            .set(user_certification_active_model(progress))
            .filter(user_certifications::Column::Id.eq(progress.id))
            .filter(user_certifications::Column::SchoolId.eq(progress.school_id))
            .exec(&self.db)
            .await
            .context("update user certification")?;
        Ok(result.rows_affected > 0)
    }

    async fn progress_of(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<CertificationProgress>, ApiError> {
        let rows = user_certifications::Entity::find()
            .find_also_related(certifications::Entity)
            .filter(user_certifications::Column::UserId.eq(user_id))
            .filter(user_certifications::Column::SchoolId.eq(school_id))
            .all(&self.db)
            .await
            .context("list user certifications")?;
        let mut out = Vec::with_capacity(rows.len());
        for (progress, certification) in rows {
            let Some(certification) = certification else {
                continue;
            };
            out.push(CertificationProgress {
                progress: user_certification_from_model(progress)?,
                certification: certification_from_model(certification),
            });
        }
        Ok(out)
    }
}

fn certification_from_model(model: certifications::Model) -> Certification {
    Certification {
        id: model.id,
        name: model.name,
        description: model.description,
        total_steps: model.total_steps,
    }
}

fn user_certification_active_model(
    progress: &UserCertification,
) -> user_certifications::ActiveModel {
    user_certifications::ActiveModel {
        id: Set(progress.id),
        school_id: Set(progress.school_id),
        user_id: Set(progress.user_id),
        certification_id: Set(progress.certification_id),
        status: Set(progress.status.as_str().to_owned()),
        progress: Set(progress.progress),
        earned_at: Set(progress.earned_at),
    }
}

fn user_certification_from_model(
    model: user_certifications::Model,
) -> Result<UserCertification, ApiError> {
    Ok(UserCertification {
        id: model.id,
        school_id: model.school_id,
        user_id: model.user_id,
        certification_id: model.certification_id,
        status: decode(
            &model.status,
            CertificationStatus::parse,
            "user_certifications.status",
        )?,
        progress: model.progress,
        earned_at: model.earned_at,
    })
}
