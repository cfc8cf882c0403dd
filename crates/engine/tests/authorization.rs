use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::Database;

use engine::{
    Engine, EngineError, ExpenseCategory, ExpenseNewCmd, LocationNewCmd, Money, Principal, Role,
    TripNewCmd, TripUpdateCmd, UserNewCmd,
};

async fn engine_with_users() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    for (username, role) in [
        ("alice", Role::Guide),
        ("bob", Role::Guide),
        ("vera", Role::Visitor),
        ("root", Role::Admin),
    ] {
        engine
            .register_user(UserNewCmd::new(username, "password").role(role))
            .await
            .unwrap();
    }
    engine
}

fn guide_alice() -> Principal {
    Principal::new("alice", Role::Guide)
}

fn guide_bob() -> Principal {
    Principal::new("bob", Role::Guide)
}

fn visitor_vera() -> Principal {
    Principal::new("vera", Role::Visitor)
}

fn admin_root() -> Principal {
    Principal::new("root", Role::Admin)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn trip_cmd(title: &str) -> TripNewCmd {
    TripNewCmd::new(
        title,
        "Lisbon",
        date("2026-07-01"),
        date("2026-07-10"),
        Money::new(100_000),
    )
}

#[tokio::test]
async fn visitor_sees_all_trips_but_cannot_create() {
    let engine = engine_with_users().await;
    engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();

    let visible = engine.trips(&visitor_vera()).await.unwrap();
    assert_eq!(visible.len(), 1);

    let denied = engine.new_trip(&visitor_vera(), trip_cmd("Mine")).await;
    assert!(matches!(denied, Err(EngineError::PermissionDenied(_))));
}

#[tokio::test]
async fn visitor_has_no_expense_access() {
    let engine = engine_with_users().await;
    let trip_id = engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();
    let expense_id = engine
        .new_expense(
            &guide_alice(),
            ExpenseNewCmd::new(
                trip_id,
                ExpenseCategory::Food,
                Money::new(1000),
                date("2026-07-02"),
            ),
        )
        .await
        .unwrap();

    assert!(matches!(
        engine.expenses(&visitor_vera(), None).await,
        Err(EngineError::PermissionDenied(_))
    ));
    assert!(matches!(
        engine.expense(&visitor_vera(), expense_id).await,
        Err(EngineError::PermissionDenied(_))
    ));
    assert!(matches!(
        engine
            .new_expense(
                &visitor_vera(),
                ExpenseNewCmd::new(
                    trip_id,
                    ExpenseCategory::Food,
                    Money::new(100),
                    date("2026-07-02"),
                ),
            )
            .await,
        Err(EngineError::PermissionDenied(_))
    ));
}

#[tokio::test]
async fn guide_lists_only_own_trips() {
    let engine = engine_with_users().await;
    engine
        .new_trip(&guide_alice(), trip_cmd("Alice trip"))
        .await
        .unwrap();
    engine
        .new_trip(&guide_bob(), trip_cmd("Bob trip"))
        .await
        .unwrap();

    let alice_view = engine.trips(&guide_alice()).await.unwrap();
    assert_eq!(alice_view.len(), 1);
    assert_eq!(alice_view[0].user_id, "alice");

    assert_eq!(engine.trips(&admin_root()).await.unwrap().len(), 2);
    assert_eq!(engine.trips(&visitor_vera()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn guide_reads_foreign_trips_but_cannot_mutate_them() {
    let engine = engine_with_users().await;
    let trip_id = engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();

    // Reads pass through the safe-methods clause.
    let seen = engine.trip(&guide_bob(), trip_id).await.unwrap();
    assert_eq!(seen.user_id, "alice");

    let update = TripUpdateCmd::new(
        trip_id,
        "Hijacked",
        "Porto",
        date("2026-07-01"),
        date("2026-07-10"),
        Money::new(1),
    );
    assert!(matches!(
        engine.update_trip(&guide_bob(), update).await,
        Err(EngineError::PermissionDenied(_))
    ));
    assert!(matches!(
        engine.delete_trip(&guide_bob(), trip_id).await,
        Err(EngineError::PermissionDenied(_))
    ));
}

#[tokio::test]
async fn guide_expense_against_foreign_trip_is_denied_missing_trip_is_not_found() {
    let engine = engine_with_users().await;
    let alice_trip = engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();

    let foreign = engine
        .new_expense(
            &guide_bob(),
            ExpenseNewCmd::new(
                alice_trip,
                ExpenseCategory::Food,
                Money::new(500),
                date("2026-07-02"),
            ),
        )
        .await;
    assert!(matches!(foreign, Err(EngineError::PermissionDenied(_))));

    let missing = engine
        .new_expense(
            &guide_bob(),
            ExpenseNewCmd::new(
                uuid::Uuid::new_v4(),
                ExpenseCategory::Food,
                Money::new(500),
                date("2026-07-02"),
            ),
        )
        .await;
    assert!(matches!(missing, Err(EngineError::KeyNotFound(_))));
}

#[tokio::test]
async fn guide_expense_ownership_is_keyed_by_the_trip() {
    let engine = engine_with_users().await;
    let alice_trip = engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();

    // The admin logs an expense on Alice's trip; Alice may still revise and
    // delete it because she owns the trip.
    let expense_id = engine
        .new_expense(
            &admin_root(),
            ExpenseNewCmd::new(
                alice_trip,
                ExpenseCategory::Activity,
                Money::new(4200),
                date("2026-07-03"),
            ),
        )
        .await
        .unwrap();

    engine
        .update_expense(
            &guide_alice(),
            engine::ExpenseUpdateCmd::new(
                expense_id,
                ExpenseCategory::Activity,
                Money::new(4300),
                date("2026-07-03"),
            ),
        )
        .await
        .unwrap();

    // Bob owns neither the trip nor the expense.
    assert!(matches!(
        engine.delete_expense(&guide_bob(), expense_id).await,
        Err(EngineError::PermissionDenied(_))
    ));

    engine
        .delete_expense(&guide_alice(), expense_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn admin_mutates_anything() {
    let engine = engine_with_users().await;
    let trip_id = engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();

    engine
        .update_trip(
            &admin_root(),
            TripUpdateCmd::new(
                trip_id,
                "Renamed",
                "Porto",
                date("2026-07-01"),
                date("2026-07-10"),
                Money::new(5000),
            ),
        )
        .await
        .unwrap();

    let trip = engine.trip(&admin_root(), trip_id).await.unwrap();
    assert_eq!(trip.title, "Renamed");
    assert_eq!(trip.user_id, "alice");

    engine.delete_trip(&admin_root(), trip_id).await.unwrap();
    assert!(matches!(
        engine.trip(&admin_root(), trip_id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn location_mutations_follow_ownership() {
    let engine = engine_with_users().await;
    let location_id = engine
        .new_location(
            &guide_alice(),
            LocationNewCmd::new(
                "Castle",
                "09:00:00".parse().unwrap(),
                "18:00:00".parse().unwrap(),
            ),
        )
        .await
        .unwrap();

    // Visitors read everything but mutate nothing.
    assert_eq!(engine.locations(&visitor_vera()).await.unwrap().len(), 1);
    assert!(matches!(
        engine.delete_location(&visitor_vera(), location_id).await,
        Err(EngineError::PermissionDenied(_))
    ));

    assert!(matches!(
        engine.delete_location(&guide_bob(), location_id).await,
        Err(EngineError::PermissionDenied(_))
    ));
    engine
        .delete_location(&guide_alice(), location_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let engine = engine_with_users().await;
    let result = engine
        .register_user(UserNewCmd::new("alice", "other"))
        .await;
    assert!(matches!(result, Err(EngineError::ExistingKey(_))));
}

#[tokio::test]
async fn user_deletion_is_admin_only_and_cascades() {
    let engine = engine_with_users().await;
    engine
        .new_trip(&guide_alice(), trip_cmd("Summer"))
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_user(&guide_alice(), "bob").await,
        Err(EngineError::PermissionDenied(_))
    ));

    engine.delete_user(&admin_root(), "alice").await.unwrap();
    assert!(engine.trips(&admin_root()).await.unwrap().is_empty());
    assert!(matches!(
        engine.delete_user(&admin_root(), "alice").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn credentials_resolve_to_a_principal() {
    let engine = engine_with_users().await;

    let principal = engine
        .find_principal("alice", "password")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(principal.user_id, "alice");
    assert_eq!(principal.role, Role::Guide);

    assert!(engine
        .find_principal("alice", "wrong")
        .await
        .unwrap()
        .is_none());
    assert!(engine
        .find_principal("nobody", "password")
        .await
        .unwrap()
        .is_none());
}
