use chrono::Utc;
use uuid::Uuid;

use techteam_domain::learning::{AchievementIcon, Category, ContentType};

use crate::domain::repository::{
    AchievementRepository, CertificationRepository, ResourceRepository,
};
use crate::domain::types::{
    Achievement, Certification, CertificationProgress, EarnedAchievement, Resource,
    ResourceFilter, ResourcePatch, require_text,
};
use crate::error::ApiError;

// ── ListResources ────────────────────────────────────────────────────────────

pub struct ListResourcesUseCase<R: ResourceRepository> {
    pub repo: R,
}

impl<R: ResourceRepository> ListResourcesUseCase<R> {
    pub async fn execute(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, ApiError> {
        self.repo.list(filter).await
    }
}

// ── CreateResource ───────────────────────────────────────────────────────────

pub struct CreateResourceInput {
    pub title: String,
    pub category: Category,
    pub content_type: ContentType,
    pub url: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
}

pub struct CreateResourceUseCase<R: ResourceRepository> {
    pub repo: R,
}

impl<R: ResourceRepository> CreateResourceUseCase<R> {
    pub async fn execute(&self, input: CreateResourceInput) -> Result<Resource, ApiError> {
        require_text("title", &input.title)?;
        let resource = Resource {
            id: Uuid::now_v7(),
            title: input.title,
            category: input.category,
            content_type: input.content_type,
            url: input.url,
            description: input.description,
            thumbnail_url: input.thumbnail_url,
            duration: input.duration,
            views: 0,
            created_at: Utc::now(),
        };
        self.repo.create(&resource).await?;
        Ok(resource)
    }
}

// ── UpdateResource ───────────────────────────────────────────────────────────

pub struct UpdateResourceUseCase<R: ResourceRepository> {
    pub repo: R,
}

impl<R: ResourceRepository> UpdateResourceUseCase<R> {
    pub async fn execute(&self, id: Uuid, patch: ResourcePatch) -> Result<Resource, ApiError> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        let mut resource = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("resource"))?;
        if let Some(title) = patch.title {
            resource.title = title;
        }
        if let Some(category) = patch.category {
            resource.category = category;
        }
        if let Some(content_type) = patch.content_type {
            resource.content_type = content_type;
        }
        if let Some(url) = patch.url {
            resource.url = Some(url);
        }
        if let Some(description) = patch.description {
            resource.description = Some(description);
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            resource.thumbnail_url = Some(thumbnail_url);
        }
        if let Some(duration) = patch.duration {
            resource.duration = Some(duration);
        }

        if !self.repo.update(&resource).await? {
            return Err(ApiError::NotFound("resource"));
        }
        Ok(resource)
    }
}

// ── RecordResourceView ───────────────────────────────────────────────────────

pub struct RecordResourceViewUseCase<R: ResourceRepository> {
    pub repo: R,
}

impl<R: ResourceRepository> RecordResourceViewUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.record_view(id).await? {
            return Err(ApiError::NotFound("resource"));
        }
        Ok(())
    }
}

// ── Achievements ─────────────────────────────────────────────────────────────

pub struct ListAchievementsUseCase<R: AchievementRepository> {
    pub repo: R,
}

impl<R: AchievementRepository> ListAchievementsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Achievement>, ApiError> {
        self.repo.list().await
    }
}

pub struct CreateAchievementInput {
    pub name: String,
    pub description: Option<String>,
    pub icon: AchievementIcon,
    pub points_required: Option<i32>,
    pub category: Option<String>,
}

pub struct CreateAchievementUseCase<R: AchievementRepository> {
    pub repo: R,
}

impl<R: AchievementRepository> CreateAchievementUseCase<R> {
    pub async fn execute(&self, input: CreateAchievementInput) -> Result<Achievement, ApiError> {
        require_text("name", &input.name)?;
        if input.points_required.is_some_and(|p| p < 0) {
            return Err(ApiError::validation("pointsRequired must not be negative"));
        }
        let achievement = Achievement {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            icon: input.icon,
            points_required: input.points_required,
            category: input.category,
        };
        self.repo.create(&achievement).await?;
        Ok(achievement)
    }
}

pub struct EarnedAchievementsUseCase<R: AchievementRepository> {
    pub repo: R,
}

impl<R: AchievementRepository> EarnedAchievementsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<EarnedAchievement>, ApiError> {
        self.repo.earned_by(user_id, school_id).await
    }
}

// ── Certifications ───────────────────────────────────────────────────────────

pub struct ListCertificationsUseCase<R: CertificationRepository> {
    pub repo: R,
}

impl<R: CertificationRepository> ListCertificationsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Certification>, ApiError> {
        self.repo.list().await
    }
}

pub struct CreateCertificationInput {
    pub name: String,
    pub description: Option<String>,
    pub total_steps: i32,
}

pub struct CreateCertificationUseCase<R: CertificationRepository> {
    pub repo: R,
}

impl<R: CertificationRepository> CreateCertificationUseCase<R> {
    pub async fn execute(
        &self,
        input: CreateCertificationInput,
    ) -> Result<Certification, ApiError> {
        require_text("name", &input.name)?;
        if input.total_steps <= 0 {
            return Err(ApiError::validation("totalSteps must be positive"));
        }
        let certification = Certification {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            total_steps: input.total_steps,
        };
        self.repo.create(&certification).await?;
        Ok(certification)
    }
}

pub struct CertificationProgressUseCase<R: CertificationRepository> {
    pub repo: R,
}

impl<R: CertificationRepository> CertificationProgressUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<CertificationProgress>, ApiError> {
        self.repo.progress_of(user_id, school_id).await
    }
}
