use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{RankedUser, User};
use crate::error::ApiError;

pub const MAX_RANKINGS_LIMIT: u64 = 100;

pub struct RankingsUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RankingsUseCase<U> {
    /// Top school members by points. Rank is the 1-based position within the
    /// returned page, not across the whole school.
    pub async fn execute(&self, school_id: Uuid, limit: u64) -> Result<Vec<RankedUser>, ApiError> {
        let limit = limit.clamp(1, MAX_RANKINGS_LIMIT);
        let users = self.users.top_by_points(school_id, limit).await?;
        Ok(rank_page(users))
    }
}

fn rank_page(users: Vec<User>) -> Vec<RankedUser> {
    users
        .into_iter()
        .zip(1u32..)
        .map(|(user, rank)| RankedUser { rank, user })
        .collect()
}
