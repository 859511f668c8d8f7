use chrono::{Datelike, NaiveDate};
use homeboard_core::db::open_db_in_memory;
use homeboard_core::model::tuition::{format_won, parse_amount_input, TuitionValidationError};
use homeboard_core::{
    OwnerTag, PaymentStatus, SqliteTuitionRepository, TuitionService, TuitionServiceError,
};
use std::collections::HashSet;
use uuid::Uuid;

fn mom() -> OwnerTag {
    OwnerTag::new("mom").unwrap()
}

fn dad() -> OwnerTag {
    OwnerTag::new("dad").unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn register_and_list_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());

    let amount = parse_amount_input("₩1,200,000").unwrap();
    let math = service.register(&mom(), " 수학학원 ", amount, 10).unwrap();
    let piano = service.register(&mom(), "피아노", 150_000, 25).unwrap();

    let fees = service.list(&mom()).unwrap();
    assert_eq!(fees.len(), 2);
    assert_eq!(fees[0].id, piano.id);
    assert_eq!(fees[1].academy_name, "수학학원");
    assert_eq!(format_won(fees[1].amount), "1,200,000");
    assert_eq!(service.monthly_total(&mom()).unwrap(), 1_350_000);
    assert_eq!(service.get(math.id).unwrap().unwrap(), math);
}

#[test]
fn invalid_fees_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.register(&mom(), "  ", 1000, 1),
        Err(TuitionServiceError::InvalidInput(TuitionValidationError::BlankAcademyName))
    ));
    assert!(matches!(
        service.register(&mom(), "영어", 0, 1),
        Err(TuitionServiceError::InvalidInput(TuitionValidationError::ZeroAmount))
    ));
    assert!(matches!(
        service.register(&mom(), "영어", 1000, 32),
        Err(TuitionServiceError::InvalidInput(TuitionValidationError::DueDayOutOfRange(32)))
    ));
    assert!(service.list(&mom()).unwrap().is_empty());
}

#[test]
fn update_replaces_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());
    let fee = service.register(&mom(), "태권도", 120_000, 5).unwrap();

    let updated = service.update(&mom(), fee.id, "태권도장", 130_000, 6).unwrap();

    assert_eq!(updated.id, fee.id);
    assert_eq!(updated.created_at, fee.created_at);
    assert_eq!(updated.academy_name, "태권도장");
    assert_eq!(updated.amount, 130_000);
    assert_eq!(updated.due_day, 6);
    assert!(matches!(
        service.update(&mom(), Uuid::new_v4(), "x", 1, 1),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
}

#[test]
fn payments_drive_status_and_cascade_on_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());
    let fee = service.register(&mom(), "미술", 90_000, 19).unwrap();
    let today = date(2026, 10, 19);

    assert_eq!(
        service.payment_status(&mom(), fee.id, 2026, 10, today).unwrap(),
        PaymentStatus::DueToday
    );
    assert_eq!(
        service.payment_status(&mom(), fee.id, 2026, 9, today).unwrap(),
        PaymentStatus::Overdue
    );
    assert_eq!(
        service.payment_status(&mom(), fee.id, 2026, 11, today).unwrap(),
        PaymentStatus::Upcoming
    );

    service.mark_paid(&mom(), fee.id, 2026, 10).unwrap();
    service.mark_paid(&mom(), fee.id, 2026, 10).unwrap();
    assert_eq!(service.payments(&mom(), fee.id).unwrap().len(), 1);
    assert_eq!(
        service.payment_status(&mom(), fee.id, 2026, 10, today).unwrap(),
        PaymentStatus::Paid
    );

    let overview = service.month_overview(&mom(), 2026, 10, today).unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].status, PaymentStatus::Paid);
    assert_eq!(overview[0].due_date, Some(today));

    assert!(service.unmark_paid(&mom(), fee.id, 2026, 10).unwrap());
    assert!(!service.unmark_paid(&mom(), fee.id, 2026, 10).unwrap());

    service.mark_paid(&mom(), fee.id, 2026, 11).unwrap();
    service.delete(&mom(), fee.id).unwrap();
    assert!(matches!(
        service.payments(&mom(), fee.id),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM tuition_payments", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn marking_unknown_fee_or_month_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());
    let fee = service.register(&mom(), "수영", 80_000, 3).unwrap();

    assert!(matches!(
        service.mark_paid(&mom(), Uuid::new_v4(), 2026, 10),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
    assert!(matches!(
        service.mark_paid(&mom(), fee.id, 2026, 13),
        Err(TuitionServiceError::InvalidInput(TuitionValidationError::MonthOutOfRange(13)))
    ));
}

#[test]
fn due_calendar_highlights_exactly_the_due_days() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());
    for (name, due_day) in [("국어", 1), ("수학", 15), ("영어", 30), ("과학", 31)] {
        service.register(&mom(), name, 100_000, due_day).unwrap();
    }
    let due_days: HashSet<u32> = [1, 15, 30, 31].into_iter().collect();
    let today = date(2026, 10, 19);

    for month in 1..=12 {
        let grid = service.due_calendar(&mom(), 2026, month, today).unwrap();
        for cell in &grid {
            let expected = cell.in_month && due_days.contains(&cell.date.day());
            assert_eq!(cell.marked, expected, "cell {} in 2026-{month:02}", cell.date);
        }
    }

    // April has no 31st; only the 1st, 15th and 30th light up.
    let april = service.due_calendar(&mom(), 2026, 4, today).unwrap();
    let lit: Vec<u32> = april
        .iter()
        .filter(|cell| cell.marked)
        .map(|cell| cell.date.day())
        .collect();
    assert_eq!(lit, vec![1, 15, 30]);
}

#[test]
fn other_owner_cannot_touch_fee_or_payments() {
    let conn = open_db_in_memory().unwrap();
    let service = TuitionService::new(SqliteTuitionRepository::try_new(&conn).unwrap());
    let fee = service.register(&mom(), "수학학원", 300_000, 10).unwrap();
    service.mark_paid(&mom(), fee.id, 2026, 9).unwrap();

    assert!(matches!(
        service.update(&dad(), fee.id, "바뀐 이름", 1, 1),
        Err(TuitionServiceError::FeeNotFound(id)) if id == fee.id
    ));
    assert!(matches!(
        service.delete(&dad(), fee.id),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
    assert!(matches!(
        service.mark_paid(&dad(), fee.id, 2026, 10),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
    assert!(matches!(
        service.unmark_paid(&dad(), fee.id, 2026, 9),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
    assert!(matches!(
        service.payments(&dad(), fee.id),
        Err(TuitionServiceError::FeeNotFound(_))
    ));
    assert!(matches!(
        service.payment_status(&dad(), fee.id, 2026, 9, date(2026, 10, 19)),
        Err(TuitionServiceError::FeeNotFound(_))
    ));

    assert_eq!(service.list(&mom()).unwrap(), vec![fee.clone()]);
    assert_eq!(service.payments(&mom(), fee.id).unwrap().len(), 1);
}
