use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::SchoolRepository;
use crate::domain::types::{School, SchoolPatch, require_text, validate_email};
use crate::error::ApiError;

fn validate_contact(contact_email: Option<&str>) -> Result<(), ApiError> {
    match contact_email {
        Some(email) => validate_email(email),
        None => Ok(()),
    }
}

// ── CreateSchool ─────────────────────────────────────────────────────────────

pub struct CreateSchoolInput {
    pub name: String,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub admin_name: Option<String>,
}

pub struct CreateSchoolUseCase<R: SchoolRepository> {
    pub repo: R,
}

impl<R: SchoolRepository> CreateSchoolUseCase<R> {
    pub async fn execute(&self, input: CreateSchoolInput) -> Result<School, ApiError> {
        require_text("name", &input.name)?;
        validate_contact(input.contact_email.as_deref())?;

        let now = Utc::now();
        let school = School {
            id: Uuid::now_v7(),
            name: input.name,
            address: input.address,
            contact_email: input.contact_email,
            admin_name: input.admin_name,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&school).await?;
        tracing::info!(school_id = %school.id, "school created");
        Ok(school)
    }
}

// ── ListSchools ──────────────────────────────────────────────────────────────

pub struct ListSchoolsUseCase<R: SchoolRepository> {
    pub repo: R,
}

impl<R: SchoolRepository> ListSchoolsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<School>, ApiError> {
        self.repo.list().await
    }
}

// ── GetSchool ────────────────────────────────────────────────────────────────

pub struct GetSchoolUseCase<R: SchoolRepository> {
    pub repo: R,
}

impl<R: SchoolRepository> GetSchoolUseCase<R> {
    pub async fn execute(&self, school_id: Uuid) -> Result<School, ApiError> {
        self.repo
            .find_by_id(school_id)
            .await?
            .ok_or(ApiError::NotFound("school"))
    }
}

// ── UpdateSchool ─────────────────────────────────────────────────────────────

pub struct UpdateSchoolUseCase<R: SchoolRepository> {
    pub repo: R,
}

impl<R: SchoolRepository> UpdateSchoolUseCase<R> {
    pub async fn execute(&self, school_id: Uuid, patch: SchoolPatch) -> Result<School, ApiError> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        validate_contact(patch.contact_email.as_deref())?;

        let mut school = self
            .repo
            .find_by_id(school_id)
            .await?
            .ok_or(ApiError::NotFound("school"))?;
        apply_school_patch(&mut school, patch);
        school.updated_at = Utc::now();

        if !self.repo.update(&school).await? {
            return Err(ApiError::NotFound("school"));
        }
        Ok(school)
    }
}

fn apply_school_patch(school: &mut School, patch: SchoolPatch) {
    if let Some(name) = patch.name {
        school.name = name;
    }
    if let Some(address) = patch.address {
        school.address = Some(address);
    }
    if let Some(contact_email) = patch.contact_email {
        school.contact_email = Some(contact_email);
    }
    if let Some(admin_name) = patch.admin_name {
        school.admin_name = Some(admin_name);
    }
}
