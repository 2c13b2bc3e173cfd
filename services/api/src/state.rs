use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAchievementRepository, DbCertificationRepository, DbChallengeRepository,
    DbResourceRepository, DbSchoolRepository, DbSessionRepository, DbTicketNoteRepository,
    DbTicketRepository, DbUserRepository, DbWorkLogRepository,
};
use crate::infra::password::BcryptHasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
    pub rankings_limit: u64,
}

impl AppState {
    pub fn school_repo(&self) -> DbSchoolRepository {
        DbSchoolRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn ticket_repo(&self) -> DbTicketRepository {
        DbTicketRepository {
            db: self.db.clone(),
        }
    }

    pub fn ticket_note_repo(&self) -> DbTicketNoteRepository {
        DbTicketNoteRepository {
            db: self.db.clone(),
        }
    }

    pub fn challenge_repo(&self) -> DbChallengeRepository {
        DbChallengeRepository {
            db: self.db.clone(),
        }
    }

    pub fn work_log_repo(&self) -> DbWorkLogRepository {
        DbWorkLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn resource_repo(&self) -> DbResourceRepository {
        DbResourceRepository {
            db: self.db.clone(),
        }
    }

    pub fn achievement_repo(&self) -> DbAchievementRepository {
        DbAchievementRepository {
            db: self.db.clone(),
        }
    }

    pub fn certification_repo(&self) -> DbCertificationRepository {
        DbCertificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn hasher(&self) -> BcryptHasher {
        BcryptHasher {
            cost: self.bcrypt_cost,
        }
    }
}
