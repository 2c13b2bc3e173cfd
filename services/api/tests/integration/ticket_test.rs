use uuid::Uuid;

use techteam_api::domain::types::{
    CheckDetails, RepairDetails, TicketFilter, TicketKind, TicketPatch,
};
use techteam_api::error::ApiError;
use techteam_api::usecase::ticket::{
    AssignedTicketsUseCase, CreateTicketInput, CreateTicketUseCase, DeleteTicketUseCase,
    GetTicketUseCase, ListTicketsUseCase, TicketCountsUseCase, UpdateTicketUseCase,
};
use techteam_auth_types::context::AuthContext;
use techteam_domain::ticket::{DeviceType, IssueType, TicketPriority, TicketStatus};
use techteam_domain::user::UserRole;

use crate::helpers::{MockTicketRepo, MockUserRepo, school_a, school_b, test_user};

fn ctx(user_id: Uuid, role: UserRole, school_id: Uuid) -> AuthContext {
    AuthContext {
        user_id,
        session_id: Uuid::now_v7(),
        role,
        school_id: Some(school_id),
    }
}

fn check_input() -> CreateTicketInput {
    CreateTicketInput {
        assigned_to: None,
        student_name: "Jane Smith".to_owned(),
        student_grade: Some("7".to_owned()),
        device_type: DeviceType::Chromebook,
        device_number: Some("CB-042".to_owned()),
        issue_description: "Weekly cart check".to_owned(),
        status: None,
        kind: TicketKind::Check(CheckDetails {
            teacher: Some("Ms. Hooch".to_owned()),
            all_present: Some(true),
            ..Default::default()
        }),
    }
}

fn repair_input() -> CreateTicketInput {
    CreateTicketInput {
        kind: TicketKind::Repair(RepairDetails::default()),
        issue_description: "Cracked screen".to_owned(),
        ..check_input()
    }
}

// ── CreateTicketUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pending_ticket_assigned_to_student_creator() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let tickets = MockTicketRepo::default();
    let usecase = CreateTicketUseCase {
        tickets: tickets.clone(),
        users: MockUserRepo::new(vec![student.clone()]),
    };

    let ticket = usecase
        .execute(&ctx(student.id, UserRole::Student, school_a()), school_a(), check_input())
        .await
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::Pending);
    assert_eq!(ticket.assigned_to, Some(student.id));
    assert_eq!(ticket.school_id, school_a());
    assert_eq!(ticket.kind.issue_type(), IssueType::Check);
    assert_eq!(tickets.all().len(), 1);
}

#[tokio::test]
async fn should_leave_admin_ticket_unassigned_and_default_repair_priority() {
    let admin = test_user(1, UserRole::Admin, Some(school_a()));
    let usecase = CreateTicketUseCase {
        tickets: MockTicketRepo::default(),
        users: MockUserRepo::new(vec![admin.clone()]),
    };

    let ticket = usecase
        .execute(&ctx(admin.id, UserRole::Admin, school_a()), school_a(), repair_input())
        .await
        .unwrap();

    assert_eq!(ticket.assigned_to, None);
    assert_eq!(
        ticket.kind,
        TicketKind::Repair(RepairDetails {
            priority: TicketPriority::Medium
        })
    );
}

#[tokio::test]
async fn should_reject_assignee_from_another_school() {
    let admin = test_user(1, UserRole::Admin, Some(school_a()));
    let outsider = test_user(2, UserRole::Student, Some(school_b()));
    let tickets = MockTicketRepo::default();
    let usecase = CreateTicketUseCase {
        tickets: tickets.clone(),
        users: MockUserRepo::new(vec![admin.clone(), outsider.clone()]),
    };

    let result = usecase
        .execute(
            &ctx(admin.id, UserRole::Admin, school_a()),
            school_a(),
            CreateTicketInput {
                assigned_to: Some(outsider.id),
                ..repair_input()
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert!(tickets.all().is_empty());
}

#[tokio::test]
async fn should_reject_blank_student_name() {
    let admin = test_user(1, UserRole::Admin, Some(school_a()));
    let usecase = CreateTicketUseCase {
        tickets: MockTicketRepo::default(),
        users: MockUserRepo::new(vec![admin.clone()]),
    };

    let result = usecase
        .execute(
            &ctx(admin.id, UserRole::Admin, school_a()),
            school_a(),
            CreateTicketInput {
                student_name: "   ".to_owned(),
                ..check_input()
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── Tenant isolation ─────────────────────────────────────────────────────────

async fn seeded() -> (MockTicketRepo, MockUserRepo, Uuid) {
    let admin = test_user(1, UserRole::Admin, Some(school_a()));
    let users = MockUserRepo::new(vec![admin.clone()]);
    let tickets = MockTicketRepo::default();
    let ticket = CreateTicketUseCase {
        tickets: tickets.clone(),
        users: users.clone(),
    }
    .execute(&ctx(admin.id, UserRole::Admin, school_a()), school_a(), check_input())
    .await
    .unwrap();
    (tickets, users, ticket.id)
}

#[tokio::test]
async fn should_hide_ticket_from_other_school() {
    let (tickets, _, id) = seeded().await;

    let get = GetTicketUseCase {
        tickets: tickets.clone(),
    };
    assert!(get.execute(school_a(), id).await.is_ok());
    assert!(matches!(
        get.execute(school_b(), id).await,
        Err(ApiError::NotFound("ticket"))
    ));

    let listed = ListTicketsUseCase { tickets }
        .execute(school_b(), &TicketFilter::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn should_not_update_or_delete_through_other_school() {
    let (tickets, users, id) = seeded().await;

    let patch = TicketPatch {
        status: Some(TicketStatus::Completed),
        ..Default::default()
    };
    let update = UpdateTicketUseCase {
        tickets: tickets.clone(),
        users,
    }
    .execute(school_b(), id, patch)
    .await;
    assert!(matches!(update, Err(ApiError::NotFound("ticket"))));

    let delete = DeleteTicketUseCase {
        tickets: tickets.clone(),
    }
    .execute(school_b(), id)
    .await;
    assert!(matches!(delete, Err(ApiError::NotFound("ticket"))));

    let stored = &tickets.all()[0];
    assert_eq!(stored.status, TicketStatus::Pending);
}

// ── UpdateTicketUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_complete_ticket_and_advance_updated_at() {
    let (tickets, users, id) = seeded().await;
    let before = tickets.all()[0].updated_at;

    let ticket = UpdateTicketUseCase {
        tickets: tickets.clone(),
        users,
    }
    .execute(
        school_a(),
        id,
        TicketPatch {
            status: Some(TicketStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(ticket.status, TicketStatus::Completed);
    assert!(ticket.updated_at >= before);
    assert_eq!(tickets.all()[0].status, TicketStatus::Completed);
}

#[tokio::test]
async fn should_unassign_ticket_with_explicit_null() {
    let admin = test_user(1, UserRole::Admin, Some(school_a()));
    let users = MockUserRepo::new(vec![admin.clone()]);
    let tickets = MockTicketRepo::default();
    let ticket = CreateTicketUseCase {
        tickets: tickets.clone(),
        users: users.clone(),
    }
    .execute(
        &ctx(admin.id, UserRole::Admin, school_a()),
        school_a(),
        CreateTicketInput {
            assigned_to: Some(admin.id),
            ..repair_input()
        },
    )
    .await
    .unwrap();
    assert_eq!(ticket.assigned_to, Some(admin.id));

    let updated = UpdateTicketUseCase { tickets, users }
        .execute(
            school_a(),
            ticket.id,
            TicketPatch {
                assigned_to: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.assigned_to, None);
}

// ── Counts / assigned ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_count_tickets_per_status() {
    let student = test_user(1, UserRole::Student, Some(school_a()));
    let users = MockUserRepo::new(vec![student.clone()]);
    let tickets = MockTicketRepo::default();
    let create = CreateTicketUseCase {
        tickets: tickets.clone(),
        users,
    };
    let caller = ctx(student.id, UserRole::Student, school_a());
    create.execute(&caller, school_a(), check_input()).await.unwrap();
    create.execute(&caller, school_a(), repair_input()).await.unwrap();
    create
        .execute(
            &caller,
            school_a(),
            CreateTicketInput {
                status: Some(TicketStatus::Issue),
                ..repair_input()
            },
        )
        .await
        .unwrap();

    let counts = TicketCountsUseCase {
        tickets: tickets.clone(),
    }
    .execute(school_a())
    .await
    .unwrap();
    assert_eq!(counts.pending, 2);
    assert_eq!(counts.issue, 1);
    assert_eq!(counts.total(), 3);

    let mine = AssignedTicketsUseCase { tickets }
        .execute(school_a(), student.id)
        .await
        .unwrap();
    assert_eq!(mine.len(), 3);
}
