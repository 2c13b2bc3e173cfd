use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use techteam_domain::learning::{Category, Difficulty};

use crate::domain::repository::ChallengeRepository;
use crate::domain::types::{
    Challenge, ChallengeCompletion, ChallengePatch, ChallengeProgress, require_text,
};
use crate::error::ApiError;

pub const DEFAULT_RECOMMENDED_LIMIT: usize = 5;

fn validate_points(points: i32) -> Result<(), ApiError> {
    if points < 0 {
        return Err(ApiError::validation("points must not be negative"));
    }
    Ok(())
}

/// Active challenges annotated with whether the user completed each.
async fn annotated<R: ChallengeRepository>(
    repo: &R,
    user_id: Uuid,
    school_id: Uuid,
) -> Result<Vec<ChallengeProgress>, ApiError> {
    let completed: HashSet<Uuid> = repo
        .completed_ids(user_id, school_id)
        .await?
        .into_iter()
        .collect();
    Ok(repo
        .list(true)
        .await?
        .into_iter()
        .map(|c| {
            let done = completed.contains(&c.id);
            ChallengeProgress::new(c, done)
        })
        .collect())
}

// ── ListChallenges ───────────────────────────────────────────────────────────

pub struct ListChallengesUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> ListChallengesUseCase<R> {
    pub async fn execute(&self, active_only: bool) -> Result<Vec<Challenge>, ApiError> {
        self.repo.list(active_only).await
    }
}

// ── CreateChallenge ──────────────────────────────────────────────────────────

pub struct CreateChallengeInput {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub points: i32,
    pub category: Category,
    pub days_to_complete: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct CreateChallengeUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> CreateChallengeUseCase<R> {
    pub async fn execute(&self, input: CreateChallengeInput) -> Result<Challenge, ApiError> {
        require_text("title", &input.title)?;
        validate_points(input.points)?;

        let challenge = Challenge {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            difficulty: input.difficulty,
            points: input.points,
            category: input.category,
            days_to_complete: input.days_to_complete,
            participants: 0,
            is_active: input.is_active.unwrap_or(true),
            created_at: Utc::now(),
        };
        self.repo.create(&challenge).await?;
        Ok(challenge)
    }
}

// ── UpdateChallenge ──────────────────────────────────────────────────────────

pub struct UpdateChallengeUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> UpdateChallengeUseCase<R> {
    pub async fn execute(&self, id: Uuid, patch: ChallengePatch) -> Result<Challenge, ApiError> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        if let Some(points) = patch.points {
            validate_points(points)?;
        }

        let mut challenge = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("challenge"))?;
        if let Some(title) = patch.title {
            challenge.title = title;
        }
        if let Some(description) = patch.description {
            challenge.description = Some(description);
        }
        if let Some(difficulty) = patch.difficulty {
            challenge.difficulty = difficulty;
        }
        if let Some(points) = patch.points {
            challenge.points = points;
        }
        if let Some(category) = patch.category {
            challenge.category = category;
        }
        if let Some(days) = patch.days_to_complete {
            challenge.days_to_complete = Some(days);
        }
        if let Some(is_active) = patch.is_active {
            challenge.is_active = is_active;
        }

        if !self.repo.update(&challenge).await? {
            return Err(ApiError::NotFound("challenge"));
        }
        Ok(challenge)
    }
}

// ── StudentChallenges ────────────────────────────────────────────────────────

pub struct StudentChallengesUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> StudentChallengesUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<ChallengeProgress>, ApiError> {
        annotated(&self.repo, user_id, school_id).await
    }
}

// ── ActiveChallenges ─────────────────────────────────────────────────────────

pub struct ActiveChallengesUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> ActiveChallengesUseCase<R> {
    /// "Active" for a student means the challenges they have completed.
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<ChallengeProgress>, ApiError> {
        let mut challenges = annotated(&self.repo, user_id, school_id).await?;
        challenges.retain(|c| c.completed);
        Ok(challenges)
    }
}

// ── RecommendedChallenges ────────────────────────────────────────────────────

pub struct RecommendedChallengesUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> RecommendedChallengesUseCase<R> {
    /// Up to `limit` active challenges the student has not completed.
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ChallengeProgress>, ApiError> {
        let mut challenges = annotated(&self.repo, user_id, school_id).await?;
        challenges.retain(|c| !c.completed);
        challenges.truncate(limit);
        Ok(challenges)
    }
}

// ── CompleteChallenge ────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CompleteChallengeOutput {
    pub completion: ChallengeCompletion,
    pub challenge_title: String,
    pub total_points: i32,
}

pub struct CompleteChallengeUseCase<R: ChallengeRepository> {
    pub repo: R,
}

impl<R: ChallengeRepository> CompleteChallengeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        school_id: Uuid,
        challenge_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CompleteChallengeOutput, ApiError> {
        let challenge = self
            .repo
            .find_by_id(challenge_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(ApiError::NotFound("challenge"))?;

        let completion = ChallengeCompletion {
            id: Uuid::now_v7(),
            school_id,
            user_id,
            challenge_id: challenge.id,
            completed_at: now,
            points_earned: challenge.points,
        };
        let total_points = self.repo.complete(&completion).await?;
        tracing::info!(
            user_id = %user_id,
            challenge_id = %challenge.id,
            points_earned = completion.points_earned,
            total_points,
            "challenge completed"
        );
        Ok(CompleteChallengeOutput {
            completion,
            challenge_title: challenge.title,
            total_points,
        })
    }
}
