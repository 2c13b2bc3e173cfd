use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use techteam_api::domain::repository::{
    ChallengeRepository, PasswordHasher, SessionRepository, TicketRepository, UserRepository,
};
use techteam_api::domain::types::{
    Challenge, ChallengeCompletion, CompletionSummary, Session, Ticket, TicketCounts,
    TicketFilter, User, UserPatch,
};
use techteam_api::error::ApiError;
use techteam_domain::learning::{Category, Difficulty};
use techteam_domain::sort::{Sort, TicketSortBy};
use techteam_domain::ticket::TicketStatus;
use techteam_domain::user::{Avatar, UserRole};
use techteam_testing::fixture::fixture_id;

pub const PASSWORD: &str = "Secret123!";

// ── PlainHasher ──────────────────────────────────────────────────────────────

/// Stores passwords as `plain:<text>` so tests skip bcrypt's work factor.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, ApiError> {
        Ok(format!("plain:{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, ApiError> {
        Ok(hash.strip_prefix("plain:") == Some(plaintext))
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.get(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(ApiError::Conflict("user"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn list_by_school(&self, school_id: Uuid, role: UserRole) -> Result<Vec<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.school_id == Some(school_id) && u.role == role)
            .cloned()
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        school_id: Uuid,
        role: UserRole,
        patch: &UserPatch,
    ) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users
            .iter_mut()
            .find(|u| u.id == id && u.school_id == Some(school_id) && u.role == role)
        else {
            return Ok(None);
        };
        if let Some(v) = &patch.username {
            user.username = v.clone();
        }
        if let Some(v) = &patch.email {
            user.email = v.clone();
        }
        if let Some(v) = &patch.first_name {
            user.first_name = Some(v.clone());
        }
        if let Some(v) = &patch.last_name {
            user.last_name = Some(v.clone());
        }
        if let Some(v) = patch.is_active {
            user.is_active = v;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        Ok(match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_owned();
                true
            }
            None => false,
        })
    }

    async fn update_avatar(&self, id: Uuid, avatar: Avatar) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        Ok(match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.selected_avatar = avatar;
                true
            }
            None => false,
        })
    }

    async fn add_points(&self, id: Uuid, delta: i32) -> Result<Option<i32>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if user.points + delta < 0 {
            return Ok(None);
        }
        user.points += delta;
        Ok(Some(user.points))
    }

    async fn top_by_points(&self, school_id: Uuid, limit: u64) -> Result<Vec<User>, ApiError> {
        let mut members: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.school_id == Some(school_id))
            .cloned()
            .collect();
        members.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        members.truncate(limit as usize);
        Ok(members)
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSessionRepo {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    pub fn all(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().clone()
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), ApiError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(s) = sessions
            .iter_mut()
            .find(|s| s.id == id && s.revoked_at.is_none())
        {
            s.revoked_at = Some(at);
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let mut revoked = 0;
        for s in sessions
            .iter_mut()
            .filter(|s| s.user_id == user_id && s.revoked_at.is_none())
        {
            s.revoked_at = Some(at);
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }
}

// ── MockTicketRepo ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockTicketRepo {
    pub tickets: Arc<Mutex<Vec<Ticket>>>,
}

impl MockTicketRepo {
    pub fn all(&self) -> Vec<Ticket> {
        self.tickets.lock().unwrap().clone()
    }
}

impl TicketRepository for MockTicketRepo {
    async fn create(&self, ticket: &Ticket) -> Result<(), ApiError> {
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid, school_id: Uuid) -> Result<Option<Ticket>, ApiError> {
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.school_id == school_id)
            .cloned())
    }

    async fn list(&self, school_id: Uuid, filter: &TicketFilter) -> Result<Vec<Ticket>, ApiError> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.school_id == school_id)
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.device_type.is_none_or(|d| t.device_type == d))
            .filter(|t| filter.issue_type.is_none_or(|i| t.kind.issue_type() == i))
            .filter(|t| filter.assigned_to.is_none_or(|a| t.assigned_to == Some(a)))
            .filter(|t| {
                filter.search.as_deref().is_none_or(|needle| {
                    let needle = needle.to_lowercase();
                    t.student_name.to_lowercase().contains(&needle)
                        || t.issue_description.to_lowercase().contains(&needle)
                })
            })
            .cloned()
            .collect();
        tickets.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                TicketSortBy::Date => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
                TicketSortBy::Student => a.student_name.cmp(&b.student_name),
            };
            match filter.sort {
                Sort::Asc => ordering,
                Sort::Desc => ordering.reverse(),
            }
        });
        Ok(tickets)
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool, ApiError> {
        let mut tickets = self.tickets.lock().unwrap();
        Ok(
            match tickets
                .iter_mut()
                .find(|t| t.id == ticket.id && t.school_id == ticket.school_id)
            {
                Some(t) => {
                    *t = ticket.clone();
                    true
                }
                None => false,
            },
        )
    }

    async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<bool, ApiError> {
        let mut tickets = self.tickets.lock().unwrap();
        let before = tickets.len();
        tickets.retain(|t| !(t.id == id && t.school_id == school_id));
        Ok(tickets.len() < before)
    }

    async fn counts(&self, school_id: Uuid) -> Result<TicketCounts, ApiError> {
        let mut counts = TicketCounts::default();
        for t in self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.school_id == school_id)
        {
            match t.status {
                TicketStatus::Pending => counts.pending += 1,
                TicketStatus::InProgress => counts.in_progress += 1,
                TicketStatus::Completed => counts.completed += 1,
                TicketStatus::Issue => counts.issue += 1,
            }
        }
        Ok(counts)
    }
}

// ── MockChallengeRepo ────────────────────────────────────────────────────────

/// Challenge store that credits points through a shared [`MockUserRepo`].
#[derive(Clone)]
pub struct MockChallengeRepo {
    pub challenges: Arc<Mutex<Vec<Challenge>>>,
    pub completions: Arc<Mutex<Vec<ChallengeCompletion>>>,
    pub users: MockUserRepo,
}

impl MockChallengeRepo {
    pub fn new(challenges: Vec<Challenge>, users: MockUserRepo) -> Self {
        Self {
            challenges: Arc::new(Mutex::new(challenges)),
            completions: Arc::new(Mutex::new(vec![])),
            users,
        }
    }

    pub fn participants(&self, id: Uuid) -> i32 {
        self.challenges
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .map_or(0, |c| c.participants)
    }
}

impl ChallengeRepository for MockChallengeRepo {
    async fn list(&self, active_only: bool) -> Result<Vec<Challenge>, ApiError> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Challenge>, ApiError> {
        Ok(self
            .challenges
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, challenge: &Challenge) -> Result<(), ApiError> {
        self.challenges.lock().unwrap().push(challenge.clone());
        Ok(())
    }

    async fn update(&self, challenge: &Challenge) -> Result<bool, ApiError> {
        let mut challenges = self.challenges.lock().unwrap();
        Ok(match challenges.iter_mut().find(|c| c.id == challenge.id) {
            Some(c) => {
                *c = challenge.clone();
                true
            }
            None => false,
        })
    }

    async fn completed_ids(&self, user_id: Uuid, school_id: Uuid) -> Result<Vec<Uuid>, ApiError> {
        Ok(self
            .completions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.school_id == school_id)
            .map(|c| c.challenge_id)
            .collect())
    }

    async fn complete(&self, completion: &ChallengeCompletion) -> Result<i32, ApiError> {
        {
            let mut completions = self.completions.lock().unwrap();
            if completions.iter().any(|c| {
                c.user_id == completion.user_id
                    && c.challenge_id == completion.challenge_id
                    && c.school_id == completion.school_id
            }) {
                return Err(ApiError::Conflict("challenge completion"));
            }
            completions.push(completion.clone());
        }
        if let Some(c) = self
            .challenges
            .lock()
            .unwrap()
            .iter_mut()
            .find(|c| c.id == completion.challenge_id)
        {
            c.participants += 1;
        }
        self.users
            .add_points(completion.user_id, completion.points_earned)
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    async fn completions(
        &self,
        school_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<Vec<CompletionSummary>, ApiError> {
        let challenges = self.challenges.lock().unwrap().clone();
        Ok(self
            .completions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.school_id == school_id && user_id.is_none_or(|u| c.user_id == u))
            .map(|c| CompletionSummary {
                completion: c.clone(),
                challenge_title: challenges
                    .iter()
                    .find(|ch| ch.id == c.challenge_id)
                    .map(|ch| ch.title.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn school_a() -> Uuid {
    fixture_id(1)
}

pub fn school_b() -> Uuid {
    fixture_id(2)
}

pub fn test_user(n: u64, role: UserRole, school_id: Option<Uuid>) -> User {
    let now = Utc::now();
    User {
        id: fixture_id(100 + n),
        school_id,
        username: format!("user{n}"),
        email: format!("user{n}@hogwarts.edu"),
        password_hash: format!("plain:{PASSWORD}"),
        first_name: None,
        last_name: None,
        role,
        points: 0,
        streak: 0,
        selected_avatar: Avatar::Rocket,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_challenge(n: u64, points: i32, is_active: bool) -> Challenge {
    Challenge {
        id: fixture_id(200 + n),
        title: format!("Challenge {n}"),
        description: None,
        difficulty: Difficulty::Beginner,
        points,
        category: Category::Hardware,
        days_to_complete: None,
        participants: 0,
        is_active,
        created_at: Utc::now(),
    }
}
