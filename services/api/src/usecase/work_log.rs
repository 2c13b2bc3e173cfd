use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::repository::WorkLogRepository;
use crate::domain::types::{
    WorkLog, WorkLogFilter, WorkLogPatch, require_text, validate_minutes_worked,
};
use crate::error::ApiError;

fn validate_range(filter: &WorkLogFilter) -> Result<(), ApiError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            return Err(ApiError::validation("startDate must not be after endDate"));
        }
    }
    Ok(())
}

// ── CreateWorkLog ────────────────────────────────────────────────────────────

pub struct CreateWorkLogInput {
    pub log_date: NaiveDate,
    pub minutes_worked: i32,
    pub category: Option<String>,
    pub description: String,
}

pub struct CreateWorkLogUseCase<R: WorkLogRepository> {
    pub repo: R,
}

impl<R: WorkLogRepository> CreateWorkLogUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
        input: CreateWorkLogInput,
    ) -> Result<WorkLog, ApiError> {
        validate_minutes_worked(input.minutes_worked)?;
        require_text("description", &input.description)?;

        let log = WorkLog {
            id: Uuid::now_v7(),
            school_id,
            user_id,
            log_date: input.log_date,
            minutes_worked: input.minutes_worked,
            category: input.category,
            description: input.description,
            created_at: Utc::now(),
        };
        self.repo.create(&log).await?;
        Ok(log)
    }
}

// ── ListWorkLogs ─────────────────────────────────────────────────────────────

pub struct ListWorkLogsUseCase<R: WorkLogRepository> {
    pub repo: R,
}

impl<R: WorkLogRepository> ListWorkLogsUseCase<R> {
    /// The caller's own logs, newest `log_date` first.
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<WorkLog>, ApiError> {
        let filter = WorkLogFilter {
            user_id: Some(user_id),
            start_date,
            end_date,
        };
        validate_range(&filter)?;
        self.repo.list(school_id, &filter).await
    }
}

// ── UpdateWorkLog ────────────────────────────────────────────────────────────

pub struct UpdateWorkLogUseCase<R: WorkLogRepository> {
    pub repo: R,
}

impl<R: WorkLogRepository> UpdateWorkLogUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
        id: Uuid,
        patch: WorkLogPatch,
    ) -> Result<WorkLog, ApiError> {
        if let Some(minutes) = patch.minutes_worked {
            validate_minutes_worked(minutes)?;
        }
        if let Some(description) = &patch.description {
            require_text("description", description)?;
        }

        let mut log = self
            .repo
            .find(id, school_id)
            .await?
            .filter(|l| l.user_id == user_id)
            .ok_or(ApiError::NotFound("work log"))?;
        if let Some(log_date) = patch.log_date {
            log.log_date = log_date;
        }
        if let Some(minutes) = patch.minutes_worked {
            log.minutes_worked = minutes;
        }
        if let Some(category) = patch.category {
            log.category = Some(category);
        }
        if let Some(description) = patch.description {
            log.description = description;
        }

        if !self.repo.update(&log).await? {
            return Err(ApiError::NotFound("work log"));
        }
        Ok(log)
    }
}

// ── DeleteWorkLog ────────────────────────────────────────────────────────────

pub struct DeleteWorkLogUseCase<R: WorkLogRepository> {
    pub repo: R,
}

impl<R: WorkLogRepository> DeleteWorkLogUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, school_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.delete(id, school_id, user_id).await? {
            return Err(ApiError::NotFound("work log"));
        }
        Ok(())
    }
}
