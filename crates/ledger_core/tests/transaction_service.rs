use chrono::{DateTime, TimeZone, Utc};
use ledger_core::db::open_db_in_memory;
use ledger_core::{
    AccountTransaction, AccountTransactionDto, AccountTransactionRepository, RepoError, RepoResult,
    SqliteAccountTransactionRepository, TransactionFilter, TransactionService,
    TransactionServiceError, TransactionType, TransactionValidationError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rusqlite::Connection;
use std::cell::RefCell;

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
}

fn service(conn: &Connection) -> TransactionService<SqliteAccountTransactionRepository<'_>> {
    TransactionService::new(SqliteAccountTransactionRepository::new(conn))
}

fn seed_acc1(service: &TransactionService<SqliteAccountTransactionRepository<'_>>) {
    for (n, kind, amount) in [
        (1, TransactionType::Deposit, dec!(100.00)),
        (2, TransactionType::Withdraw, dec!(40.00)),
        (3, TransactionType::Deposit, dec!(10.00)),
    ] {
        service
            .add_transaction(AccountTransactionDto::new("ACC-1", Some(day(n)), kind, amount))
            .unwrap();
    }
}

fn timestamps(dtos: &[AccountTransactionDto]) -> Vec<Option<DateTime<Utc>>> {
    dtos.iter().map(|dto| dto.transaction_ts).collect()
}

#[test]
fn deposits_for_account_sum_to_expected_total() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed_acc1(&service);

    let deposits = service
        .find_all_for_account_and_type("ACC-1", TransactionType::Deposit)
        .unwrap();

    assert_eq!(timestamps(&deposits), vec![Some(day(1)), Some(day(3))]);
    let total: Decimal = deposits.iter().map(|dto| dto.amount).sum();
    assert_eq!(total, dec!(110.00));
}

#[test]
fn add_transaction_returns_record_with_new_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let input =
        AccountTransactionDto::new("ACC-5", Some(day(4)), TransactionType::Deposit, dec!(7.25));
    let saved = service.add_transaction(input.clone()).unwrap();

    assert!(saved.id.is_some());
    assert_eq!(AccountTransactionDto { id: None, ..saved.clone() }, input);
    assert_eq!(service.find_all_for_account("ACC-5").unwrap(), vec![saved]);
}

#[test]
fn add_transaction_rejects_negative_amount_as_validation_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .add_transaction(AccountTransactionDto::new(
            "ACC-1",
            None,
            TransactionType::Withdraw,
            dec!(-1.00),
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        TransactionServiceError::Validation(TransactionValidationError::NegativeAmount(_))
    ));
    assert!(service.find_all_for_account("ACC-1").unwrap().is_empty());
}

#[test]
fn range_query_includes_bounds_and_excludes_outside() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    for n in 1..=5 {
        service
            .add_transaction(AccountTransactionDto::new(
                "ACC-1",
                Some(day(n)),
                TransactionType::Withdraw,
                dec!(1),
            ))
            .unwrap();
    }

    let found = service
        .find_all_for_account_with_type_and_range(
            "ACC-1",
            TransactionType::Withdraw,
            day(2),
            day(4),
        )
        .unwrap();
    assert_eq!(
        timestamps(&found),
        vec![Some(day(2)), Some(day(3)), Some(day(4))]
    );
}

#[test]
fn optional_filters_follow_type_then_full_range_priority() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    seed_acc1(&service);

    let all = service
        .find_all_with_optional_filters("ACC-1", &TransactionFilter::default())
        .unwrap();
    assert_eq!(all.len(), 3);

    let deposits_only = TransactionFilter::by_type(TransactionType::Deposit);
    let by_type = service
        .find_all_with_optional_filters("ACC-1", &deposits_only)
        .unwrap();
    assert_eq!(timestamps(&by_type), vec![Some(day(1)), Some(day(3))]);

    let full_range = service
        .find_all_with_optional_filters(
            "ACC-1",
            &TransactionFilter::by_type(TransactionType::Deposit).with_range(day(2), day(3)),
        )
        .unwrap();
    assert_eq!(timestamps(&full_range), vec![Some(day(3))]);

    let partial_range = TransactionFilter {
        kind: Some(TransactionType::Deposit),
        start: None,
        end: Some(day(2)),
    };
    assert_eq!(
        service
            .find_all_with_optional_filters("ACC-1", &partial_range)
            .unwrap(),
        by_type
    );

    let range_without_type = TransactionFilter {
        kind: None,
        start: Some(day(2)),
        end: Some(day(2)),
    };
    assert_eq!(
        service
            .find_all_with_optional_filters("ACC-1", &range_without_type)
            .unwrap(),
        all
    );
}

#[test]
fn transfer_shape_serializes_with_external_field_names() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let saved = service
        .add_transaction(AccountTransactionDto::new(
            "ACC-1",
            Some(day(1)),
            TransactionType::Withdraw,
            dec!(40.00),
        ))
        .unwrap();

    let json = serde_json::to_value(&saved).unwrap();
    assert_eq!(json["accountNumber"], "ACC-1");
    assert_eq!(json["type"], "WITHDRAW");
    assert_eq!(json["amount"], "40.00");
    assert_eq!(json["id"], saved.id.unwrap().to_string());
    assert!(json["transactionTs"].is_string());

    let parsed: AccountTransactionDto = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, saved);
}

#[test]
fn transfer_shape_accepts_lenient_type_spelling() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let dto: AccountTransactionDto = serde_json::from_str(
        r#"{"accountNumber":"ACC-9","type":" deposit ","amount":"3.50"}"#,
    )
    .unwrap();
    assert_eq!(dto.kind, TransactionType::Deposit);
    service.add_transaction(dto).unwrap();
    assert_eq!(
        service
            .find_all_for_account_and_type("ACC-9", TransactionType::Deposit)
            .unwrap()
            .len(),
        1
    );

    let unknown = serde_json::from_str::<AccountTransactionDto>(
        r#"{"accountNumber":"ACC-9","type":"transfer","amount":"1"}"#,
    );
    assert!(unknown.is_err());
}

/// Repository whose every call fails, recording which queries were issued.
struct FailingRepository {
    calls: RefCell<Vec<&'static str>>,
}

impl FailingRepository {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }

    fn fail(&self, call: &'static str) -> RepoError {
        self.calls.borrow_mut().push(call);
        RepoError::InvalidData(format!("{call} unavailable"))
    }
}

impl AccountTransactionRepository for &FailingRepository {
    fn save(&self, _record: &AccountTransaction) -> RepoResult<AccountTransaction> {
        Err(self.fail("save"))
    }

    fn find_by_account(&self, _account_number: &str) -> RepoResult<Vec<AccountTransaction>> {
        Err(self.fail("account"))
    }

    fn find_by_account_and_type(
        &self,
        _account_number: &str,
        _kind: TransactionType,
    ) -> RepoResult<Vec<AccountTransaction>> {
        Err(self.fail("account_type"))
    }

    fn find_by_account_and_type_and_timestamp_between(
        &self,
        _account_number: &str,
        _kind: TransactionType,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> RepoResult<Vec<AccountTransaction>> {
        Err(self.fail("account_type_range"))
    }
}

fn assert_store_access(err: TransactionServiceError, expected_operation: &str) {
    match err {
        TransactionServiceError::StoreAccess {
            operation,
            account_number,
            ..
        } => {
            assert_eq!(operation, expected_operation);
            assert_eq!(account_number, "ACC-1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_operation_propagates_store_failure() {
    let repo = FailingRepository::new();
    let service = TransactionService::new(&repo);

    assert_store_access(
        service
            .add_transaction(AccountTransactionDto::new(
                "ACC-1",
                None,
                TransactionType::Deposit,
                dec!(1),
            ))
            .unwrap_err(),
        "add_transaction",
    );
    assert_store_access(
        service.find_all_for_account("ACC-1").unwrap_err(),
        "find_all_for_account",
    );
    assert_store_access(
        service
            .find_all_for_account_and_type("ACC-1", TransactionType::Deposit)
            .unwrap_err(),
        "find_all_for_account_and_type",
    );
    assert_store_access(
        service
            .find_all_for_account_with_type_and_range(
                "ACC-1",
                TransactionType::Deposit,
                day(1),
                day(2),
            )
            .unwrap_err(),
        "find_all_for_account_with_type_and_range",
    );
    assert_store_access(
        service
            .find_all_with_optional_filters(
                "ACC-1",
                &TransactionFilter::by_type(TransactionType::Withdraw).with_range(day(1), day(2)),
            )
            .unwrap_err(),
        "find_all_with_optional_filters",
    );

    assert_eq!(
        *repo.calls.borrow(),
        vec![
            "save",
            "account",
            "account_type",
            "account_type_range",
            "account_type_range"
        ]
    );
}

#[test]
fn store_access_error_exposes_cause() {
    let repo = FailingRepository::new();
    let service = TransactionService::new(&repo);

    let err = service.find_all_for_account("ACC-1").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("ACC-1"));
    assert!(message.contains("find_all_for_account"));
    assert!(std::error::Error::source(&err).is_some());
}
