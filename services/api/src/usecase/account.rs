use chrono::Utc;
use uuid::Uuid;

use techteam_domain::user::{Avatar, UserRole};

use crate::domain::repository::{
    PasswordHasher, SchoolRepository, SessionRepository, UserRepository,
};
use crate::domain::types::{User, validate_email, validate_password, validate_username};
use crate::error::ApiError;
use crate::usecase::student::find_student;

async fn ensure_unique<U: UserRepository>(
    users: &U,
    username: &str,
    email: &str,
) -> Result<(), ApiError> {
    if users.find_by_username(username).await?.is_some()
        || users.find_by_email(email).await?.is_some()
    {
        return Err(ApiError::Conflict("user"));
    }
    Ok(())
}

fn new_user(
    school_id: Option<Uuid>,
    role: UserRole,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        school_id,
        username,
        email,
        password_hash,
        first_name,
        last_name,
        role,
        points: 0,
        streak: 0,
        selected_avatar: Avatar::default(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// ── CreateAccount ────────────────────────────────────────────────────────────

pub struct CreateAccountInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Create a school-owned account (admin or student).
pub struct CreateAccountUseCase<U: UserRepository, S: SchoolRepository, P: PasswordHasher> {
    pub users: U,
    pub schools: S,
    pub hasher: P,
}

impl<U: UserRepository, S: SchoolRepository, P: PasswordHasher> CreateAccountUseCase<U, S, P> {
    pub async fn execute(
        &self,
        school_id: Uuid,
        role: UserRole,
        input: CreateAccountInput,
    ) -> Result<User, ApiError> {
        if role == UserRole::SuperAdmin {
            return Err(ApiError::validation("super admins are not created per school"));
        }
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if self.schools.find_by_id(school_id).await?.is_none() {
            return Err(ApiError::NotFound("school"));
        }
        ensure_unique(&self.users, &input.username, &input.email).await?;

        let password_hash = self.hasher.hash(&input.password).await?;
        let user = new_user(
            Some(school_id),
            role,
            input.username,
            input.email,
            password_hash,
            input.first_name,
            input.last_name,
        );
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, school_id = %school_id, role = %role, "account created");
        Ok(user)
    }
}

// ── SeedSuperAdmin ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum SeedOutcome {
    Created(User),
    AlreadyExists(User),
}

pub struct SeedSuperAdminInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct SeedSuperAdminUseCase<U: UserRepository, P: PasswordHasher> {
    pub users: U,
    pub hasher: P,
}

impl<U: UserRepository, P: PasswordHasher> SeedSuperAdminUseCase<U, P> {
    /// Idempotent: an existing super admin with the username is returned as is.
    pub async fn execute(&self, input: SeedSuperAdminInput) -> Result<SeedOutcome, ApiError> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if let Some(existing) = self.users.find_by_username(&input.username).await? {
            if existing.role != UserRole::SuperAdmin {
                return Err(ApiError::Conflict("user"));
            }
            tracing::info!(user_id = %existing.id, "super admin already present");
            return Ok(SeedOutcome::AlreadyExists(existing));
        }
        ensure_unique(&self.users, &input.username, &input.email).await?;

        let password_hash = self.hasher.hash(&input.password).await?;
        let user = new_user(
            None,
            UserRole::SuperAdmin,
            input.username,
            input.email,
            password_hash,
            None,
            None,
        );
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "super admin created");
        Ok(SeedOutcome::Created(user))
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordUseCase<U: UserRepository, S: SessionRepository, P: PasswordHasher> {
    pub users: U,
    pub sessions: S,
    pub hasher: P,
}

impl<U: UserRepository, S: SessionRepository, P: PasswordHasher> ResetPasswordUseCase<U, S, P> {
    /// Set a student's password and sign them out everywhere.
    pub async fn execute(
        &self,
        school_id: Uuid,
        student_id: Uuid,
        new_password: &str,
    ) -> Result<(), ApiError> {
        validate_password(new_password)?;
        let student = find_student(&self.users, school_id, student_id).await?;

        let password_hash = self.hasher.hash(new_password).await?;
        if !self.users.update_password(student.id, &password_hash).await? {
            return Err(ApiError::NotFound("student"));
        }
        let revoked = self
            .sessions
            .revoke_all_for_user(student.id, Utc::now())
            .await?;
        tracing::info!(user_id = %student.id, revoked, "password reset");
        Ok(())
    }
}

// ── SetAvatar ────────────────────────────────────────────────────────────────

pub struct SetAvatarUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetAvatarUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, avatar: Avatar) -> Result<(), ApiError> {
        if !self.users.update_avatar(user_id, avatar).await? {
            return Err(ApiError::NotFound("user"));
        }
        Ok(())
    }
}
