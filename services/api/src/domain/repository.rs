#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use techteam_domain::user::{Avatar, UserRole};

use crate::domain::types::{
    Achievement, Certification, CertificationProgress, Challenge, ChallengeCompletion,
    CompletionSummary, EarnedAchievement, Resource, ResourceFilter, School, Session, Ticket,
    TicketCounts, TicketFilter, TicketNote, User, UserAchievement, UserCertification, UserPatch,
    WorkLog, WorkLogFilter,
};
use crate::error::ApiError;

/// Repository for schools (tenants).
pub trait SchoolRepository: Send + Sync {
    async fn create(&self, school: &School) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, ApiError>;

    /// All schools ordered by name.
    async fn list(&self) -> Result<Vec<School>, ApiError>;

    /// Overwrite a school row. Returns `false` if it does not exist.
    async fn update(&self, school: &School) -> Result<bool, ApiError>;
}

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Insert a user. Duplicate username or email is `Conflict`.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Users of a school with the given role, ordered by username.
    async fn list_by_school(&self, school_id: Uuid, role: UserRole)
    -> Result<Vec<User>, ApiError>;

    /// Apply a profile patch to the user matching (id, school, role), bumping
    /// `updated_at`. Returns `None` when no such user exists.
    async fn update_profile(
        &self,
        id: Uuid,
        school_id: Uuid,
        role: UserRole,
        patch: &UserPatch,
    ) -> Result<Option<User>, ApiError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, ApiError>;

    async fn update_avatar(&self, id: Uuid, avatar: Avatar) -> Result<bool, ApiError>;

    /// Atomically apply `points = points + delta`. Refuses (returns `None`)
    /// when the user is missing or the result would be negative.
    async fn add_points(&self, id: Uuid, delta: i32) -> Result<Option<i32>, ApiError>;

    /// Top `limit` members of a school by points, ties by creation order.
    async fn top_by_points(&self, school_id: Uuid, limit: u64) -> Result<Vec<User>, ApiError>;
}

/// Repository for login sessions.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), ApiError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError>;

    /// Set `revoked_at` if not already set. Idempotent.
    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError>;

    /// Revoke every unrevoked session of a user. Returns how many changed.
    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>)
    -> Result<u64, ApiError>;

    /// Delete sessions that expired before `now`. Returns how many were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError>;
}

/// Repository for tickets. Every lookup is keyed by (id, school).
pub trait TicketRepository: Send + Sync {
    async fn create(&self, ticket: &Ticket) -> Result<(), ApiError>;

    async fn find(&self, id: Uuid, school_id: Uuid) -> Result<Option<Ticket>, ApiError>;

    async fn list(&self, school_id: Uuid, filter: &TicketFilter) -> Result<Vec<Ticket>, ApiError>;

    /// Overwrite the ticket row matching (id, school). Returns `false` if none.
    async fn update(&self, ticket: &Ticket) -> Result<bool, ApiError>;

    /// Hard delete. Returns `false` if no row matched (id, school).
    async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<bool, ApiError>;

    async fn counts(&self, school_id: Uuid) -> Result<TicketCounts, ApiError>;
}

/// Repository for ticket notes (append-only).
pub trait TicketNoteRepository: Send + Sync {
    async fn create(&self, note: &TicketNote) -> Result<(), ApiError>;

    /// Notes of a ticket, oldest first.
    async fn list(&self, ticket_id: Uuid, school_id: Uuid) -> Result<Vec<TicketNote>, ApiError>;
}

/// Repository for challenges and their completions.
pub trait ChallengeRepository: Send + Sync {
    async fn list(&self, active_only: bool) -> Result<Vec<Challenge>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Challenge>, ApiError>;

    async fn create(&self, challenge: &Challenge) -> Result<(), ApiError>;

    async fn update(&self, challenge: &Challenge) -> Result<bool, ApiError>;

    /// Ids of challenges the user completed within a school.
    async fn completed_ids(&self, user_id: Uuid, school_id: Uuid) -> Result<Vec<Uuid>, ApiError>;

    /// Record a completion, credit its points to the user and bump the
    /// challenge's participant count, all in one transaction. A repeat
    /// completion is `Conflict`. Returns the user's new point total.
    async fn complete(&self, completion: &ChallengeCompletion) -> Result<i32, ApiError>;

    /// Completions in a school, newest first; narrowed to one user if given.
    async fn completions(
        &self,
        school_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<Vec<CompletionSummary>, ApiError>;
}

/// Repository for work logs. Every lookup is keyed by (id, school).
pub trait WorkLogRepository: Send + Sync {
    async fn create(&self, log: &WorkLog) -> Result<(), ApiError>;

    async fn find(&self, id: Uuid, school_id: Uuid) -> Result<Option<WorkLog>, ApiError>;

    /// Logs of a school, newest `log_date` first.
    async fn list(&self, school_id: Uuid, filter: &WorkLogFilter) -> Result<Vec<WorkLog>, ApiError>;

    async fn update(&self, log: &WorkLog) -> Result<bool, ApiError>;

    async fn delete(&self, id: Uuid, school_id: Uuid, user_id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for learning resources.
pub trait ResourceRepository: Send + Sync {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resource>, ApiError>;

    async fn create(&self, resource: &Resource) -> Result<(), ApiError>;

    async fn update(&self, resource: &Resource) -> Result<bool, ApiError>;

    /// Atomically increment `views`. Returns `false` if the resource is missing.
    async fn record_view(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for achievements and awards.
pub trait AchievementRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Achievement>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Achievement>, ApiError>;

    async fn create(&self, achievement: &Achievement) -> Result<(), ApiError>;

    /// Award an achievement. A repeat award is `Conflict`.
    async fn award(&self, award: &UserAchievement) -> Result<(), ApiError>;

    async fn earned_by(&self, user_id: Uuid, school_id: Uuid)
    -> Result<Vec<EarnedAchievement>, ApiError>;
}

/// Repository for certifications and per-student progress.
pub trait CertificationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Certification>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Certification>, ApiError>;

    async fn create(&self, certification: &Certification) -> Result<(), ApiError>;

    async fn start(&self, progress: &UserCertification) -> Result<(), ApiError>;

    async fn find_progress(
        &self,
        id: Uuid,
        school_id: Uuid,
    ) -> Result<Option<UserCertification>, ApiError>;

    async fn update_progress(&self, progress: &UserCertification) -> Result<bool, ApiError>;

    async fn progress_of(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<CertificationProgress>, ApiError>;
}

/// Port for the slow salted password hash.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, ApiError>;

    /// Compare using the hash library's own check. A malformed hash is `false`.
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, ApiError>;
}
