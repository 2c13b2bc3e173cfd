use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use techteam_domain::learning::CertificationStatus;
use techteam_domain::user::UserRole;

use crate::domain::repository::{
    AchievementRepository, CertificationRepository, ChallengeRepository, SessionRepository,
    UserRepository, WorkLogRepository,
};
use crate::domain::types::{
    CompletionSummary, User, UserAchievement, UserCertification, UserPatch, WorkLog,
    WorkLogFilter, validate_email, validate_points_delta, validate_progress, validate_username,
};
use crate::error::ApiError;

/// Load a student by id, refusing users of another school or role.
pub(crate) async fn find_student<U: UserRepository>(
    users: &U,
    school_id: Uuid,
    student_id: Uuid,
) -> Result<User, ApiError> {
    users
        .find_by_id(student_id)
        .await?
        .filter(|u| u.school_id == Some(school_id) && u.role == UserRole::Student)
        .ok_or(ApiError::NotFound("student"))
}

// ── ListStudents ─────────────────────────────────────────────────────────────

pub struct ListStudentsUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListStudentsUseCase<U> {
    pub async fn execute(&self, school_id: Uuid) -> Result<Vec<User>, ApiError> {
        self.users
            .list_by_school(school_id, UserRole::Student)
            .await
    }
}

// ── UpdateStudent ────────────────────────────────────────────────────────────

pub struct UpdateStudentUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
}

impl<U: UserRepository, S: SessionRepository> UpdateStudentUseCase<U, S> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
        patch: UserPatch,
    ) -> Result<User, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::validation("no fields to update"));
        }
        if let Some(username) = &patch.username {
            validate_username(username)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }

        let student = self
            .users
            .update_profile(student_id, school_id, UserRole::Student, &patch)
            .await?
            .ok_or(ApiError::NotFound("student"))?;

        if patch.is_active == Some(false) {
            let revoked = self
                .sessions
                .revoke_all_for_user(student.id, Utc::now())
                .await?;
            tracing::info!(user_id = %student.id, revoked, "student deactivated");
        }
        Ok(student)
    }
}

// ── StudentDetails ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct StudentDetails {
    pub student: User,
    pub completions: Vec<CompletionSummary>,
    pub work_logs: Vec<WorkLog>,
}

pub struct StudentDetailsUseCase<U: UserRepository, C: ChallengeRepository, W: WorkLogRepository> {
    pub users: U,
    pub challenges: C,
    pub work_logs: W,
}

impl<U: UserRepository, C: ChallengeRepository, W: WorkLogRepository>
    StudentDetailsUseCase<U, C, W>
{
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
    ) -> Result<StudentDetails, ApiError> {
        let student = find_student(&self.users, school_id, student_id).await?;
        let completions = self
            .challenges
            .completions(school_id, Some(student.id))
            .await?;
        let filter = WorkLogFilter {
            user_id: Some(student.id),
            ..Default::default()
        };
        let work_logs = self.work_logs.list(school_id, &filter).await?;
        Ok(StudentDetails {
            student,
            completions,
            work_logs,
        })
    }
}

// ── LearningProgress ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct StudentProgress {
    pub student: User,
    pub completions: Vec<CompletionSummary>,
}

impl StudentProgress {
    pub fn challenges_completed(&self) -> usize {
        self.completions.len()
    }
}

pub struct LearningProgressUseCase<U: UserRepository, C: ChallengeRepository> {
    pub users: U,
    pub challenges: C,
}

impl<U: UserRepository, C: ChallengeRepository> LearningProgressUseCase<U, C> {
    /// Every student of the school with their completions, newest first.
    pub async fn execute(&self, school_id: Uuid) -> Result<Vec<StudentProgress>, ApiError> {
        let students = self
            .users
            .list_by_school(school_id, UserRole::Student)
            .await?;
        let mut by_user: HashMap<Uuid, Vec<CompletionSummary>> = HashMap::new();
        for summary in self.challenges.completions(school_id, None).await? {
            by_user
                .entry(summary.completion.user_id)
                .or_default()
                .push(summary);
        }
        Ok(students
            .into_iter()
            .map(|student| StudentProgress {
                completions: by_user.remove(&student.id).unwrap_or_default(),
                student,
            })
            .collect())
    }
}

// ── AdjustPoints ─────────────────────────────────────────────────────────────

pub struct AdjustPointsUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> AdjustPointsUseCase<U> {
    /// Apply `delta` atomically and return the new total.
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
        delta: i32,
    ) -> Result<i32, ApiError> {
        validate_points_delta(delta)?;
        let student = find_student(&self.users, school_id, student_id).await?;
        let points = self
            .users
            .add_points(student.id, delta)
            .await?
            .ok_or_else(|| ApiError::validation("points cannot go below zero"))?;
        tracing::info!(user_id = %student.id, delta, points, "points adjusted");
        Ok(points)
    }
}

// ── AwardAchievement ─────────────────────────────────────────────────────────

pub struct AwardAchievementUseCase<U: UserRepository, A: AchievementRepository> {
    pub users: U,
    pub achievements: A,
}

impl<U: UserRepository, A: AchievementRepository> AwardAchievementUseCase<U, A> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
        achievement_id: Uuid,
    ) -> Result<UserAchievement, ApiError> {
        let student = find_student(&self.users, school_id, student_id).await?;
        if self.achievements.find_by_id(achievement_id).await?.is_none() {
            return Err(ApiError::NotFound("achievement"));
        }
        let award = UserAchievement {
            id: Uuid::now_v7(),
            school_id,
            user_id: student.id,
            achievement_id,
            earned_at: Utc::now(),
        };
        self.achievements.award(&award).await?;
        Ok(award)
    }
}

// ── StartCertification ───────────────────────────────────────────────────────

pub struct StartCertificationUseCase<U: UserRepository, C: CertificationRepository> {
    pub users: U,
    pub certifications: C,
}

impl<U: UserRepository, C: CertificationRepository> StartCertificationUseCase<U, C> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
        certification_id: Uuid,
    ) -> Result<UserCertification, ApiError> {
        let student = find_student(&self.users, school_id, student_id).await?;
        if self
            .certifications
            .find_by_id(certification_id)
            .await?
            .is_none()
        {
            return Err(ApiError::NotFound("certification"));
        }
        let progress = UserCertification {
            id: Uuid::now_v7(),
            school_id,
            user_id: student.id,
            certification_id,
            status: CertificationStatus::NotStarted,
            progress: 0,
            earned_at: None,
        };
        self.certifications.start(&progress).await?;
        Ok(progress)
    }
}

// ── UpdateCertification ──────────────────────────────────────────────────────

pub struct UpdateCertificationInput {
    pub status: Option<CertificationStatus>,
    pub progress: Option<i32>,
}

pub struct UpdateCertificationUseCase<C: CertificationRepository> {
    pub certifications: C,
}

impl<C: CertificationRepository> UpdateCertificationUseCase<C> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
        id: Uuid,
        input: UpdateCertificationInput,
    ) -> Result<UserCertification, ApiError> {
        if input.status.is_none() && input.progress.is_none() {
            return Err(ApiError::validation("no fields to update"));
        }
        if let Some(progress) = input.progress {
            validate_progress(progress)?;
        }

        let mut record = self
            .certifications
            .find_progress(id, school_id)
            .await?
            .filter(|r| r.user_id == student_id)
            .ok_or(ApiError::NotFound("certification progress"))?;

        if let Some(progress) = input.progress {
            record.progress = progress;
        }
        if let Some(status) = input.status {
            record.status = status;
            if status == CertificationStatus::Earned && record.earned_at.is_none() {
                record.earned_at = Some(Utc::now());
            }
        }

        if !self.certifications.update_progress(&record).await? {
            return Err(ApiError::NotFound("certification progress"));
        }
        Ok(record)
    }
}
