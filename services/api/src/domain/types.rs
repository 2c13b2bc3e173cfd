use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use techteam_domain::learning::{
    AchievementIcon, Category, CertificationStatus, ContentType, Difficulty,
};
use techteam_domain::sort::{Sort, TicketSortBy};
use techteam_domain::ticket::{DeviceType, IssueType, TicketPriority, TicketStatus};
use techteam_domain::user::{Avatar, UserRole};

use crate::error::ApiError;

// ── Schools & users ──────────────────────────────────────────────────────────

/// Tenant root.
#[derive(Debug, Clone)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub admin_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial school update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SchoolPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub admin_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub points: i32,
    pub streak: i32,
    pub selected_avatar: Avatar,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last" when both names are set, otherwise the username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self.username.clone(),
        }
    }
}

/// Profile fields an admin may change on a student.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
    }
}

/// A user with their 1-based position in a rankings page.
#[derive(Debug, Clone)]
pub struct RankedUser {
    pub rank: u32,
    pub user: User,
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Usable iff not revoked and `now` is strictly before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

// ── Tickets ──────────────────────────────────────────────────────────────────

/// Fields only a device check carries. Student lists are names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckDetails {
    pub teacher: Option<String>,
    pub room_number: Option<String>,
    pub all_present: Option<bool>,
    pub missing_students: Vec<String>,
    pub all_charged: Option<bool>,
    pub not_charged_students: Vec<String>,
    pub any_missing: Option<bool>,
    pub missing_device_students: Vec<String>,
    pub any_broken: Option<bool>,
    pub broken_asset_tag: Option<String>,
    pub lte_working: Option<bool>,
    pub lte_broken_asset_tag: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairDetails {
    pub priority: TicketPriority,
}

/// The two ticket forms. The store keeps them in one flat row keyed by
/// `issue_type`; only `infra` sees that layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketKind {
    Check(CheckDetails),
    Repair(RepairDetails),
}

impl TicketKind {
    pub fn issue_type(&self) -> IssueType {
        match self {
            Self::Check(_) => IssueType::Check,
            Self::Repair(_) => IssueType::Repair,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: Uuid,
    pub school_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub student_name: String,
    pub student_grade: Option<String>,
    pub device_type: DeviceType,
    pub device_number: Option<String>,
    pub issue_description: String,
    pub status: TicketStatus,
    pub kind: TicketKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List filters for a school's tickets. Defaults to newest first.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub device_type: Option<DeviceType>,
    pub issue_type: Option<IssueType>,
    pub assigned_to: Option<Uuid>,
    /// Case-insensitive substring of student name or issue description.
    pub search: Option<String>,
    pub sort_by: TicketSortBy,
    pub sort: Sort,
}

/// Partial ticket update. `assigned_to: Some(None)` unassigns.
#[derive(Debug, Clone, Default)]
pub struct TicketPatch {
    pub assigned_to: Option<Option<Uuid>>,
    pub student_name: Option<String>,
    pub student_grade: Option<String>,
    pub device_type: Option<DeviceType>,
    pub device_number: Option<String>,
    pub issue_description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub check: CheckPatch,
}

/// Per-field update of a check ticket's details.
#[derive(Debug, Clone, Default)]
pub struct CheckPatch {
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

impl CheckPatch {
    pub fn is_empty(&self) -> bool {
        self.teacher.is_none()
            && self.room_number.is_none()
            && self.all_present.is_none()
            && self.missing_students.is_none()
            && self.all_charged.is_none()
            && self.not_charged_students.is_none()
            && self.any_missing.is_none()
            && self.missing_device_students.is_none()
            && self.any_broken.is_none()
            && self.broken_asset_tag.is_none()
            && self.lte_working.is_none()
            && self.lte_broken_asset_tag.is_none()
    }

    pub fn apply(self, details: &mut CheckDetails) {
        if let Some(v) = self.teacher {
            details.teacher = Some(v);
        }
        if let Some(v) = self.room_number {
            details.room_number = Some(v);
        }
        if let Some(v) = self.all_present {
            details.all_present = Some(v);
        }
        if let Some(v) = self.missing_students {
            details.missing_students = v;
        }
        if let Some(v) = self.all_charged {
            details.all_charged = Some(v);
        }
        if let Some(v) = self.not_charged_students {
            details.not_charged_students = v;
        }
        if let Some(v) = self.any_missing {
            details.any_missing = Some(v);
        }
        if let Some(v) = self.missing_device_students {
            details.missing_device_students = v;
        }
        if let Some(v) = self.any_broken {
            details.any_broken = Some(v);
        }
        if let Some(v) = self.broken_asset_tag {
            details.broken_asset_tag = Some(v);
        }
        if let Some(v) = self.lte_working {
            details.lte_working = Some(v);
        }
        if let Some(v) = self.lte_broken_asset_tag {
            details.lte_broken_asset_tag = Some(v);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub issue: u64,
}

impl TicketCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.in_progress + self.completed + self.issue
    }
}

#[derive(Debug, Clone)]
pub struct TicketNote {
    pub id: Uuid,
    pub school_id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub note_text: String,
    pub created_at: DateTime<Utc>,
}

// ── Challenges ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Challenge {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub points: i32,
    pub category: Category,
    pub days_to_complete: Option<i32>,
    pub participants: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ChallengePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub points: Option<i32>,
    pub category: Option<Category>,
    pub days_to_complete: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ChallengeCompletion {
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub points_earned: i32,
}

/// A completion joined with its challenge title.
#[derive(Debug, Clone)]
pub struct CompletionSummary {
    pub completion: ChallengeCompletion,
    pub challenge_title: String,
}

/// A challenge as seen by one student.
#[derive(Debug, Clone)]
pub struct ChallengeProgress {
    pub challenge: Challenge,
    pub completed: bool,
    /// 100 when completed, 0 otherwise.
    pub progress: u8,
}

impl ChallengeProgress {
    pub fn new(challenge: Challenge, completed: bool) -> Self {
        Self {
            challenge,
            completed,
            progress: if completed { 100 } else { 0 },
        }
    }
}

// ── Work logs ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WorkLog {
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Uuid,
    pub log_date: NaiveDate,
    pub minutes_worked: i32,
    pub category: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkLogFilter {
    pub user_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkLogPatch {
    pub log_date: Option<NaiveDate>,
    pub minutes_worked: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
}

// ── Catalogue ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub content_type: ContentType,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub category: Option<Category>,
    pub content_type: Option<ContentType>,
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub content_type: Option<ContentType>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: AchievementIcon,
    pub points_required: Option<i32>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserAchievement {
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    pub earned_at: DateTime<Utc>,
}

/// An awarded achievement with its definition.
#[derive(Debug, Clone)]
pub struct EarnedAchievement {
    pub award: UserAchievement,
    pub achievement: Achievement,
}

#[derive(Debug, Clone)]
pub struct Certification {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
}

#[derive(Debug, Clone)]
pub struct UserCertification {
    pub id: Uuid,
    pub school_id: Uuid,
    pub user_id: Uuid,
    pub certification_id: Uuid,
    pub status: CertificationStatus,
    pub progress: i32,
    pub earned_at: Option<DateTime<Utc>>,
}

/// A student's certification progress with its definition.
#[derive(Debug, Clone)]
pub struct CertificationProgress {
    pub progress: UserCertification,
    pub certification: Certification,
}

// ── Validation ───────────────────────────────────────────────────────────────

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_POINTS_DELTA: i32 = 100_000;

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ApiError::validation(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::validation("username must not contain spaces"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ApiError::validation("email is invalid")),
    }
}

/// Reject blank required text fields.
pub fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_points_delta(delta: i32) -> Result<(), ApiError> {
    if !(-MAX_POINTS_DELTA..=MAX_POINTS_DELTA).contains(&delta) {
        return Err(ApiError::validation(format!(
            "delta must be between -{MAX_POINTS_DELTA} and {MAX_POINTS_DELTA}"
        )));
    }
    Ok(())
}

pub fn validate_progress(progress: i32) -> Result<(), ApiError> {
    if !(0..=100).contains(&progress) {
        return Err(ApiError::validation("progress must be between 0 and 100"));
    }
    Ok(())
}

pub fn validate_minutes_worked(minutes: i32) -> Result<(), ApiError> {
    if minutes <= 0 {
        return Err(ApiError::validation("hoursWorked must be a positive number of minutes"));
    }
    Ok(())
}
