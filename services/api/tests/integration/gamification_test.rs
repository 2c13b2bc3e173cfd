use chrono::{Duration, Utc};

use techteam_api::error::ApiError;
use techteam_api::usecase::challenge::{
    ActiveChallengesUseCase, CompleteChallengeUseCase, RecommendedChallengesUseCase,
    StudentChallengesUseCase,
};
use techteam_api::usecase::ranking::RankingsUseCase;
use techteam_api::usecase::student::{AdjustPointsUseCase, LearningProgressUseCase};
use techteam_domain::user::UserRole;

use crate::helpers::{MockChallengeRepo, MockUserRepo, school_a, school_b, test_challenge, test_user};

// ── CompleteChallengeUseCase ─────────────────────────────────────────────────

#[tokio::test]
async fn should_credit_points_and_count_participant_on_completion() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let challenge = test_challenge(1, 25, true);
    let users = MockUserRepo::new(vec![student.clone()]);
    let repo = MockChallengeRepo::new(vec![challenge.clone()], users.clone());

    let out = CompleteChallengeUseCase { repo: repo.clone() }
        .execute(student.id, school_a(), challenge.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(out.total_points, 25);
    assert_eq!(out.completion.points_earned, 25);
    assert_eq!(out.challenge_title, challenge.title);
    assert_eq!(users.get(student.id).unwrap().points, 25);
    assert_eq!(repo.participants(challenge.id), 1);
}

#[tokio::test]
async fn should_refuse_second_completion_without_double_credit() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let challenge = test_challenge(1, 25, true);
    let users = MockUserRepo::new(vec![student.clone()]);
    let usecase = CompleteChallengeUseCase {
        repo: MockChallengeRepo::new(vec![challenge.clone()], users.clone()),
    };

    usecase
        .execute(student.id, school_a(), challenge.id, Utc::now())
        .await
        .unwrap();
    let again = usecase
        .execute(student.id, school_a(), challenge.id, Utc::now())
        .await;

    assert!(matches!(again, Err(ApiError::Conflict(_))));
    assert_eq!(users.get(student.id).unwrap().points, 25);
}

#[tokio::test]
async fn should_not_complete_inactive_or_missing_challenge() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let retired = test_challenge(1, 10, false);
    let users = MockUserRepo::new(vec![student.clone()]);
    let usecase = CompleteChallengeUseCase {
        repo: MockChallengeRepo::new(vec![retired.clone()], users.clone()),
    };

    let inactive = usecase
        .execute(student.id, school_a(), retired.id, Utc::now())
        .await;
    let missing = usecase
        .execute(student.id, school_a(), test_challenge(9, 10, true).id, Utc::now())
        .await;

    assert!(matches!(inactive, Err(ApiError::NotFound("challenge"))));
    assert!(matches!(missing, Err(ApiError::NotFound("challenge"))));
    assert_eq!(users.get(student.id).unwrap().points, 0);
}

// ── Student challenge views ──────────────────────────────────────────────────

#[tokio::test]
async fn should_split_active_and_recommended_by_completion() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let done = test_challenge(1, 10, true);
    let open = test_challenge(2, 20, true);
    let retired = test_challenge(3, 30, false);
    let users = MockUserRepo::new(vec![student.clone()]);
    let repo = MockChallengeRepo::new(vec![done.clone(), open.clone(), retired], users);
    CompleteChallengeUseCase { repo: repo.clone() }
        .execute(student.id, school_a(), done.id, Utc::now())
        .await
        .unwrap();

    let all = StudentChallengesUseCase { repo: repo.clone() }
        .execute(student.id, school_a())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    let done_view = all.iter().find(|c| c.challenge.id == done.id).unwrap();
    assert!(done_view.completed);
    assert_eq!(done_view.progress, 100);

    let active = ActiveChallengesUseCase { repo: repo.clone() }
        .execute(student.id, school_a())
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].challenge.id, done.id);

    let recommended = RecommendedChallengesUseCase { repo }
        .execute(student.id, school_a(), 5)
        .await
        .unwrap();
    assert_eq!(recommended.len(), 1);
    assert_eq!(recommended[0].challenge.id, open.id);
    assert_eq!(recommended[0].progress, 0);
}

#[tokio::test]
async fn should_scope_completions_to_school() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let challenge = test_challenge(1, 10, true);
    let users = MockUserRepo::new(vec![student.clone()]);
    let repo = MockChallengeRepo::new(vec![challenge.clone()], users);
    CompleteChallengeUseCase { repo: repo.clone() }
        .execute(student.id, school_a(), challenge.id, Utc::now())
        .await
        .unwrap();

    let elsewhere = StudentChallengesUseCase { repo }
        .execute(student.id, school_b())
        .await
        .unwrap();

    assert!(elsewhere.iter().all(|c| !c.completed));
}

#[tokio::test]
async fn should_report_learning_progress_per_student() {
    let jane = test_user(1, UserRole::Student, Some(school_a()));
    let ron = test_user(2, UserRole::Student, Some(school_a()));
    let first = test_challenge(1, 10, true);
    let second = test_challenge(2, 10, true);
    let users = MockUserRepo::new(vec![jane.clone(), ron.clone()]);
    let repo = MockChallengeRepo::new(vec![first.clone(), second.clone()], users.clone());
    let complete = CompleteChallengeUseCase { repo: repo.clone() };
    complete
        .execute(jane.id, school_a(), first.id, Utc::now())
        .await
        .unwrap();
    complete
        .execute(jane.id, school_a(), second.id, Utc::now())
        .await
        .unwrap();

    let progress = LearningProgressUseCase {
        users,
        challenges: repo,
    }
    .execute(school_a())
    .await
    .unwrap();

    let jane_row = progress.iter().find(|p| p.student.id == jane.id).unwrap();
    let ron_row = progress.iter().find(|p| p.student.id == ron.id).unwrap();
    assert_eq!(jane_row.challenges_completed(), 2);
    assert_eq!(ron_row.challenges_completed(), 0);
}

// ── Points ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refuse_adjustment_below_zero() {
    let mut student = test_user(1, UserRole::Student, Some(school_a()));
    student.points = 5;
    let users = MockUserRepo::new(vec![student.clone()]);
    let usecase = AdjustPointsUseCase {
        users: users.clone(),
    };

    let result = usecase.execute(school_a(), student.id, -6).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(users.get(student.id).unwrap().points, 5);

    assert_eq!(usecase.execute(school_a(), student.id, -5).await.unwrap(), 0);
}

#[tokio::test]
async fn should_refuse_out_of_range_delta_without_touching_points() {
    let mut student = test_user(1, UserRole::Student, Some(school_a()));
    student.points = 5;
    let users = MockUserRepo::new(vec![student.clone()]);
    let usecase = AdjustPointsUseCase {
        users: users.clone(),
    };

    let result = usecase.execute(school_a(), student.id, i32::MAX).await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert_eq!(users.get(student.id).unwrap().points, 5);
}

#[tokio::test]
async fn should_not_adjust_student_of_another_school() {
    let student = test_user(1, UserRole::Student, Some(school_b()));
    let usecase = AdjustPointsUseCase {
        users: MockUserRepo::new(vec![student.clone()]),
    };

    let result = usecase.execute(school_a(), student.id, 10).await;

    assert!(matches!(result, Err(ApiError::NotFound("student"))));
}

#[tokio::test]
async fn should_apply_concurrent_adjustments_exactly_once() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let users = MockUserRepo::new(vec![student.clone()]);
    let add = AdjustPointsUseCase {
        users: users.clone(),
    };
    let sub = AdjustPointsUseCase {
        users: users.clone(),
    };

    let (a, b) = tokio::join!(
        add.execute(school_a(), student.id, 10),
        sub.execute(school_a(), student.id, -3),
    );

    // The subtraction is refused if it lands first on a zero balance.
    let total = users.get(student.id).unwrap().points;
    match (a, b) {
        (Ok(_), Ok(_)) => assert_eq!(total, 7),
        (Ok(_), Err(ApiError::Validation(_))) => assert_eq!(total, 10),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

// ── RankingsUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_rank_school_members_by_points_with_creation_tiebreak() {
    let now = Utc::now();
    let mut first = test_user(1, UserRole::Student, Some(school_a()));
    first.points = 50;
    first.created_at = now - Duration::days(2);
    let mut tied_later = test_user(2, UserRole::Student, Some(school_a()));
    tied_later.points = 50;
    tied_later.created_at = now - Duration::days(1);
    let mut last = test_user(3, UserRole::Student, Some(school_a()));
    last.points = 10;
    let mut admin = test_user(4, UserRole::Admin, Some(school_a()));
    admin.points = 30;
    let mut outsider = test_user(5, UserRole::Student, Some(school_b()));
    outsider.points = 500;

    let usecase = RankingsUseCase {
        users: MockUserRepo::new(vec![
            last.clone(),
            tied_later.clone(),
            admin.clone(),
            outsider,
            first.clone(),
        ]),
    };

    let ranked = usecase.execute(school_a(), 10).await.unwrap();

    let order: Vec<_> = ranked.iter().map(|r| (r.rank, r.user.id)).collect();
    assert_eq!(
        order,
        vec![
            (1, first.id),
            (2, tied_later.id),
            (3, admin.id),
            (4, last.id)
        ]
    );
}

#[tokio::test]
async fn should_clamp_zero_limit_to_one_row() {
    let students = (1..=3)
        .map(|n| test_user(n, UserRole::Student, Some(school_a())))
        .collect();
    let usecase = RankingsUseCase {
        users: MockUserRepo::new(students),
    };

    let ranked = usecase.execute(school_a(), 0).await.unwrap();

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].rank, 1);
}
