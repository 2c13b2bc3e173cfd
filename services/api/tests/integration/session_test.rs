use chrono::{Duration, Utc};
use uuid::Uuid;

use techteam_api::domain::types::Session;
use techteam_api::error::ApiError;
use techteam_api::usecase::account::{
    ResetPasswordUseCase, SeedOutcome, SeedSuperAdminInput, SeedSuperAdminUseCase,
};
use techteam_api::usecase::session::{
    CleanupSessionsUseCase, LoginInput, LoginUseCase, LogoutUseCase, RevokeAllSessionsUseCase,
    ValidateSessionUseCase,
};
use techteam_domain::user::UserRole;

use crate::helpers::{MockSessionRepo, MockUserRepo, PASSWORD, PlainHasher, school_a, test_user};

fn login_input(username: &str, password: &str) -> LoginInput {
    LoginInput {
        username: username.to_owned(),
        password: password.to_owned(),
        ip_address: Some("203.0.113.7".to_owned()),
        user_agent: Some("test-agent".to_owned()),
    }
}

fn session_for(user_id: Uuid, token: &str, expires_in: Duration) -> Session {
    let now = Utc::now();
    Session {
        id: Uuid::now_v7(),
        user_id,
        token: token.to_owned(),
        ip_address: None,
        user_agent: None,
        created_at: now,
        expires_at: now + expires_in,
        revoked_at: None,
    }
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_session_on_valid_credentials() {
    let user = test_user(1, UserRole::Student, Some(school_a()));
    let sessions = MockSessionRepo::default();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        sessions: sessions.clone(),
        hasher: PlainHasher,
    };

    let out = usecase.execute(login_input("user1", PASSWORD)).await.unwrap();

    assert_eq!(out.user.id, user.id);
    assert_eq!(out.token.len(), 43);
    let stored = sessions.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].token, out.token);
    assert_eq!(stored[0].ip_address.as_deref(), Some("203.0.113.7"));
    assert_eq!(stored[0].expires_at - stored[0].created_at, Duration::hours(12));
}

#[tokio::test]
async fn should_reject_wrong_password_without_creating_session() {
    let sessions = MockSessionRepo::default();
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![test_user(1, UserRole::Student, Some(school_a()))]),
        sessions: sessions.clone(),
        hasher: PlainHasher,
    };

    let result = usecase.execute(login_input("user1", "WrongPass1!")).await;

    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert!(sessions.all().is_empty());
}

#[tokio::test]
async fn should_reject_unknown_and_inactive_users_alike() {
    let mut inactive = test_user(2, UserRole::Student, Some(school_a()));
    inactive.is_active = false;
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![inactive]),
        sessions: MockSessionRepo::default(),
        hasher: PlainHasher,
    };

    let unknown = usecase.execute(login_input("nobody", PASSWORD)).await;
    let disabled = usecase.execute(login_input("user2", PASSWORD)).await;

    assert!(matches!(unknown, Err(ApiError::Unauthorized)));
    assert!(matches!(disabled, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_short_credentials_as_validation() {
    let usecase = LoginUseCase {
        users: MockUserRepo::new(vec![]),
        sessions: MockSessionRepo::default(),
        hasher: PlainHasher,
    };

    let result = usecase.execute(login_input("ab", PASSWORD)).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));

    let result = usecase.execute(login_input("user1", "short")).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── ValidateSessionUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_resolve_valid_token_to_user() {
    let user = test_user(1, UserRole::Admin, Some(school_a()));
    let usecase = ValidateSessionUseCase {
        sessions: MockSessionRepo::new(vec![session_for(user.id, "tok", Duration::hours(1))]),
        users: MockUserRepo::new(vec![user.clone()]),
    };

    let (session, resolved) = usecase.execute("tok").await.unwrap();

    assert_eq!(session.user_id, user.id);
    assert_eq!(resolved.role, UserRole::Admin);
}

#[tokio::test]
async fn should_reject_expired_revoked_and_unknown_tokens() {
    let user = test_user(1, UserRole::Student, Some(school_a()));
    let mut revoked = session_for(user.id, "revoked", Duration::hours(1));
    revoked.revoked_at = Some(Utc::now());
    let usecase = ValidateSessionUseCase {
        sessions: MockSessionRepo::new(vec![
            session_for(user.id, "expired", Duration::seconds(-1)),
            revoked,
        ]),
        users: MockUserRepo::new(vec![user]),
    };

    for token in ["expired", "revoked", "missing"] {
        let result = usecase.execute(token).await;
        assert!(
            matches!(result, Err(ApiError::Unauthorized)),
            "token {token} should be rejected"
        );
    }
}

#[tokio::test]
async fn should_reject_session_of_deactivated_user() {
    let mut user = test_user(1, UserRole::Student, Some(school_a()));
    user.is_active = false;
    let usecase = ValidateSessionUseCase {
        sessions: MockSessionRepo::new(vec![session_for(user.id, "tok", Duration::hours(1))]),
        users: MockUserRepo::new(vec![user]),
    };

    assert!(matches!(
        usecase.execute("tok").await,
        Err(ApiError::Unauthorized)
    ));
}

// ── Logout / revoke / cleanup ────────────────────────────────────────────────

#[tokio::test]
async fn should_invalidate_token_after_logout() {
    let user = test_user(1, UserRole::Student, Some(school_a()));
    let session = session_for(user.id, "tok", Duration::hours(1));
    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let users = MockUserRepo::new(vec![user]);

    LogoutUseCase {
        sessions: sessions.clone(),
    }
    .execute(session.id)
    .await
    .unwrap();

    let validate = ValidateSessionUseCase { sessions, users };
    assert!(matches!(
        validate.execute("tok").await,
        Err(ApiError::Unauthorized)
    ));
}

#[tokio::test]
async fn should_revoke_every_session_of_user_only() {
    let alice = test_user(1, UserRole::Student, Some(school_a()));
    let bob = test_user(2, UserRole::Student, Some(school_a()));
    let sessions = MockSessionRepo::new(vec![
        session_for(alice.id, "a1", Duration::hours(1)),
        session_for(alice.id, "a2", Duration::hours(1)),
        session_for(bob.id, "b1", Duration::hours(1)),
    ]);

    let revoked = RevokeAllSessionsUseCase {
        sessions: sessions.clone(),
    }
    .execute(alice.id)
    .await
    .unwrap();

    assert_eq!(revoked, 2);
    let bob_session = sessions.all().into_iter().find(|s| s.token == "b1").unwrap();
    assert!(bob_session.revoked_at.is_none());
}

#[tokio::test]
async fn should_delete_only_expired_sessions() {
    let user = test_user(1, UserRole::Student, Some(school_a()));
    let sessions = MockSessionRepo::new(vec![
        session_for(user.id, "old", Duration::hours(-1)),
        session_for(user.id, "live", Duration::hours(1)),
    ]);

    let deleted = CleanupSessionsUseCase {
        sessions: sessions.clone(),
    }
    .execute(Utc::now())
    .await
    .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(sessions.all()[0].token, "live");
}

#[tokio::test]
async fn should_sign_student_out_everywhere_on_password_reset() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let sessions = MockSessionRepo::new(vec![session_for(student.id, "tok", Duration::hours(1))]);
    let users = MockUserRepo::new(vec![student.clone()]);

    ResetPasswordUseCase {
        users: users.clone(),
        sessions: sessions.clone(),
        hasher: PlainHasher,
    }
    .execute(school_a(), student.id, "NewSecret456!")
    .await
    .unwrap();

    assert_eq!(users.get(student.id).unwrap().password_hash, "plain:NewSecret456!");
    assert!(sessions.all()[0].revoked_at.is_some());
}

// ── SeedSuperAdminUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_seed_super_admin_once() {
    let users = MockUserRepo::new(vec![]);
    let usecase = SeedSuperAdminUseCase {
        users: users.clone(),
        hasher: PlainHasher,
    };
    let input = || SeedSuperAdminInput {
        username: "root".to_owned(),
        email: "root@techteam.dev".to_owned(),
        password: PASSWORD.to_owned(),
    };

    let first = usecase.execute(input()).await.unwrap();
    let second = usecase.execute(input()).await.unwrap();

    let SeedOutcome::Created(created) = first else {
        panic!("expected a new account");
    };
    assert_eq!(created.role, UserRole::SuperAdmin);
    assert_eq!(created.school_id, None);
    assert!(matches!(second, SeedOutcome::AlreadyExists(u) if u.id == created.id));
    assert_eq!(users.users.lock().unwrap().len(), 1);
}
