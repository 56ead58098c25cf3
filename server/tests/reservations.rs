//! Reservation flow tests
//!
//! Conflict policies, reservation transitions and the derived table status,
//! against the in-memory engine.

mod common;

use common::*;
use saffron_server::db::models::{ReservationStatus, TableStatus};
use saffron_server::db::repository::DiningTableRepository;
use saffron_server::reservations::{
    ConflictPolicy, ReservationError, ReservationScheduler, TableStateMachine,
};

fn fixed_window_scheduler(db: &surrealdb::Surreal<surrealdb::engine::local::Db>) -> ReservationScheduler {
    ReservationScheduler::new(
        DiningTableRepository::new(db.clone()),
        ConflictPolicy::FixedWindow,
        120,
        120,
    )
}

#[tokio::test]
async fn test_reservation_created_pending() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());

    let (table, reservation) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.duration_minutes, 120);
    assert_eq!(table.reservations.len(), 1);
    // A pending booking does not change the table status
    assert_eq!(table.status, TableStatus::Available);
}

#[tokio::test]
async fn test_overlapping_reservation_conflicts() {
    // 18:00 for two hours, second attempt 19:30 the same evening
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());

    scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    let result = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Bruno", None, 4, "2024-06-01", "19:30", None),
            None,
            NOW,
        )
        .await;

    assert!(matches!(result, Err(ReservationError::TimeConflict)));
}

#[tokio::test]
async fn test_conflict_is_symmetric() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());

    scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "15:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    // Probing 14:00 against the existing 15:00 booking reports the same collision
    assert!(
        scheduler
            .has_conflict(&table_id, "2024-06-01", "14:00", Some(120), None)
            .await
            .unwrap()
    );
    assert!(
        scheduler
            .has_conflict(&table_id, "2024-06-01", "16:00", Some(120), None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_same_time_other_day_is_free() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());

    scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    assert!(
        scheduler
            .create_reservation(
                &table_id,
                reservation_payload("Bruno", None, 2, "2024-06-02", "18:00", None),
                None,
                NOW,
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_policies_diverge_on_short_bookings() {
    // A one-hour booking at 18:00 leaves 19:30 free under interval overlap,
    // but the legacy proximity rule still reports a collision (90 < 120).
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let overlap = ReservationScheduler::from_db(db.clone());

    overlap
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", Some(60)),
            None,
            NOW,
        )
        .await
        .unwrap();

    assert!(
        !overlap
            .has_conflict(&table_id, "2024-06-01", "19:30", Some(120), None)
            .await
            .unwrap()
    );
    assert!(
        fixed_window_scheduler(&db)
            .has_conflict(&table_id, "2024-06-01", "19:30", Some(120), None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_cancelled_reservation_frees_the_window() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    let (_, reservation) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    machine
        .cancel_reservation(&table_id, &reservation.id, &staff())
        .await
        .unwrap();

    // The slot is bookable again
    assert!(
        scheduler
            .create_reservation(
                &table_id,
                reservation_payload("Bruno", None, 2, "2024-06-01", "18:30", None),
                None,
                NOW,
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_table_status_follows_reservation_lifecycle() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    let (_, reservation) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    // Confirm claims the table
    let table = machine
        .update_reservation_status(&table_id, &reservation.id, ReservationStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Reserved);

    // Check-in occupies it
    let table = machine
        .update_reservation_status(&table_id, &reservation.id, ReservationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
}

#[tokio::test]
async fn test_cancelling_last_blocking_reservation_frees_table() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    let (_, first) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "13:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();
    let (_, second) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Bruno", None, 2, "2024-06-01", "20:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    machine
        .update_reservation_status(&table_id, &first.id, ReservationStatus::Confirmed)
        .await
        .unwrap();

    // One blocking reservation remains — the table stays RESERVED
    let table = machine
        .cancel_reservation(&table_id, &first.id, &staff())
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Reserved);

    // Cancelling the last one frees the table
    let table = machine
        .cancel_reservation(&table_id, &second.id, &staff())
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Available);
}

#[tokio::test]
async fn test_reservation_transitions_are_guarded() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    let (_, reservation) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    machine
        .update_reservation_status(&table_id, &reservation.id, ReservationStatus::Completed)
        .await
        .unwrap();

    // Terminal — cancellation is rejected
    let result = machine
        .cancel_reservation(&table_id, &reservation.id, &staff())
        .await;
    assert!(matches!(
        result,
        Err(ReservationError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_guest_reservation_cancellable_by_email_owner() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    // Booked anonymously before login, identified only by contact email
    let (_, reservation) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", Some("ana@example.com"), 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await
        .unwrap();

    let stranger = machine
        .cancel_reservation(&table_id, &reservation.id, &customer("user-2"))
        .await;
    assert!(matches!(stranger, Err(ReservationError::Forbidden(_))));

    // Email match is case-insensitive
    let owner = machine
        .cancel_reservation(
            &table_id,
            &reservation.id,
            &customer_with_email("user-9", "Ana@Example.com"),
        )
        .await;
    assert!(owner.is_ok());
}

#[tokio::test]
async fn test_user_reservation_cancellable_by_user_id() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    let owner = customer("user-1");
    let (_, reservation) = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            Some(&owner),
            NOW,
        )
        .await
        .unwrap();
    assert_eq!(reservation.user.as_deref(), Some("user-1"));

    let table = machine
        .cancel_reservation(&table_id, &reservation.id, &owner)
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Available);
}

#[tokio::test]
async fn test_maintenance_blocks_booking_until_override() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 6).await;
    let scheduler = ReservationScheduler::from_db(db.clone());
    let machine = TableStateMachine::from_db(db.clone());

    machine
        .set_table_status(&table_id, TableStatus::Maintenance)
        .await
        .unwrap();

    let result = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await;
    assert!(matches!(result, Err(ReservationError::UnderMaintenance(_))));

    // Manual override puts the table back into service
    machine
        .set_table_status(&table_id, TableStatus::Available)
        .await
        .unwrap();
    assert!(
        scheduler
            .create_reservation(
                &table_id,
                reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
                None,
                NOW,
            )
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_payload_validation() {
    let db = test_db().await;
    let table_id = seed_table(&db, 5, 4).await;
    let scheduler = ReservationScheduler::from_db(db.clone());

    // More guests than the table seats
    let oversized = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 9, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await;
    assert!(matches!(oversized, Err(ReservationError::Validation(_))));

    // Unparseable date / time
    let bad_date = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "01/06/2024", "18:00", None),
            None,
            NOW,
        )
        .await;
    assert!(matches!(bad_date, Err(ReservationError::Validation(_))));

    let bad_time = scheduler
        .create_reservation(
            &table_id,
            reservation_payload("Ana", None, 2, "2024-06-01", "half past", None),
            None,
            NOW,
        )
        .await;
    assert!(matches!(bad_time, Err(ReservationError::Validation(_))));
}

#[tokio::test]
async fn test_unknown_table_rejected() {
    let db = test_db().await;
    let scheduler = ReservationScheduler::from_db(db.clone());

    let result = scheduler
        .create_reservation(
            "dining_table:nope",
            reservation_payload("Ana", None, 2, "2024-06-01", "18:00", None),
            None,
            NOW,
        )
        .await;
    assert!(matches!(result, Err(ReservationError::TableNotFound(_))));
}

#[tokio::test]
async fn test_duplicate_table_number_rejected() {
    let db = test_db().await;
    seed_table(&db, 5, 4).await;

    let duplicate = DiningTableRepository::new(db.clone())
        .create(saffron_server::db::models::DiningTableCreate {
            number: 5,
            capacity: Some(2),
        })
        .await;
    assert!(duplicate.is_err());
}
