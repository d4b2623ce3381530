//! End-to-end tests of the credit service over the in-memory store.

use kredit_shared::types::{ConsumerId, TransactionId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CreditService;
use crate::admission::AdmissionRequest;
use crate::consumer::{ConsumerUpdate, EligibilityRules, NewConsumer};
use crate::error::CreditError;
use crate::transaction::{TransactionStatus, TransactionTerms};

fn service() -> CreditService {
    CreditService::in_memory(EligibilityRules::default())
}

fn new_consumer(nik: &str) -> NewConsumer {
    NewConsumer {
        nik: nik.to_string(),
        full_name: "John Doe".to_string(),
        legal_name: "John Doe".to_string(),
        salary: dec!(5000000),
        ..Default::default()
    }
}

fn admission(consumer_id: ConsumerId, tenor: i64, contract: &str, amount: Decimal) -> AdmissionRequest {
    AdmissionRequest {
        consumer_id,
        tenor,
        contract_number: contract.to_string(),
        amount,
        terms: TransactionTerms {
            admin_fee: dec!(50000),
            installment_amount: dec!(110000),
            interest_amount: dec!(60000),
            asset_name: Some("Motorcycle".to_string()),
        },
    }
}

#[tokio::test]
async fn test_register_assigns_id() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();

    assert!(consumer.id.is_valid());
    assert_eq!(consumer.salary, dec!(5000000));
    assert_eq!(service.get_consumer(consumer.id).await.unwrap(), consumer);
    assert_eq!(
        service.get_consumer_by_nik("1234567890123456").await.unwrap().id,
        consumer.id
    );
}

#[tokio::test]
async fn test_register_rejects_malformed_nik() {
    let service = service();
    let err = service
        .register_consumer(new_consumer("INVALID"))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid national ID"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_nik() {
    let service = service();
    service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();
    let err = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Conflict(_)));
}

#[tokio::test]
async fn test_assign_limit_starts_unused() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();

    let limit = service
        .assign_limit(consumer.id, 6, dec!(1000000))
        .await
        .unwrap();
    assert_eq!(limit.used_amount, Decimal::ZERO);
    assert_eq!(limit.limit_amount, dec!(1000000));

    let err = service
        .assign_limit(consumer.id, 6, dec!(2000000))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Conflict(_)));

    let err = service
        .assign_limit(ConsumerId::new(99), 6, dec!(1000))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::NotFound(_)));
}

#[tokio::test]
async fn test_second_transaction_exceeds_headroom() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();
    service
        .assign_limit(consumer.id, 6, dec!(1000000))
        .await
        .unwrap();

    let tx = service
        .create_transaction(admission(consumer.id, 6, "KTR-001", dec!(600000)))
        .await
        .unwrap();
    assert_eq!(tx.status, TransactionStatus::Active);
    assert_eq!(tx.admin_fee, dec!(50000));
    assert_eq!(
        service.get_limit(consumer.id, 6).await.unwrap().used_amount,
        dec!(600000)
    );

    let err = service
        .create_transaction(admission(consumer.id, 6, "KTR-002", dec!(500000)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CreditError::InsufficientLimit { headroom, .. } if headroom == dec!(400000)
    ));
    assert_eq!(
        service.get_limit(consumer.id, 6).await.unwrap().used_amount,
        dec!(600000)
    );
    assert!(matches!(
        service.get_transaction_by_contract("KTR-002").await,
        Err(CreditError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_invalid_status_leaves_record_unchanged() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();
    service
        .assign_limit(consumer.id, 3, dec!(1000000))
        .await
        .unwrap();
    let tx = service
        .create_transaction(admission(consumer.id, 3, "KTR-001", dec!(100000)))
        .await
        .unwrap();

    let err = service
        .update_transaction_status(tx.id, "BOGUS")
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid status"));
    assert_eq!(
        service.get_transaction(tx.id).await.unwrap().status,
        TransactionStatus::Active
    );

    let completed = service
        .update_transaction_status(tx.id, "COMPLETED")
        .await
        .unwrap();
    assert_eq!(completed.status, TransactionStatus::Completed);
    // Status changes never touch the limit.
    assert_eq!(
        service.get_limit(consumer.id, 3).await.unwrap().used_amount,
        dec!(100000)
    );

    assert!(matches!(
        service.update_transaction_status(tx.id, "active").await,
        Err(CreditError::Validation(_))
    ));
    assert!(matches!(
        service
            .update_transaction_status(TransactionId::new(999), "DEFAULTED")
            .await,
        Err(CreditError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_listing_requires_existing_consumer() {
    let service = service();
    let unknown = ConsumerId::new(42);

    assert!(matches!(
        service.get_consumer_limits(unknown).await,
        Err(CreditError::NotFound(_))
    ));
    assert!(matches!(
        service.get_consumer_transactions(unknown).await,
        Err(CreditError::NotFound(_))
    ));

    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();
    assert!(service.get_consumer_limits(consumer.id).await.unwrap().is_empty());
    assert!(
        service
            .get_consumer_transactions(consumer.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_limits_listed_by_tenor() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();
    for (tenor, amount) in [(6, dec!(2000000)), (1, dec!(100000)), (3, dec!(500000))] {
        service.assign_limit(consumer.id, tenor, amount).await.unwrap();
    }

    let tenors: Vec<i16> = service
        .get_consumer_limits(consumer.id)
        .await
        .unwrap()
        .iter()
        .map(|limit| limit.tenor.months())
        .collect();
    assert_eq!(tenors, vec![1, 3, 6]);
}

#[tokio::test]
async fn test_update_limit_not_below_used() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();
    service
        .assign_limit(consumer.id, 2, dec!(1000000))
        .await
        .unwrap();
    service
        .create_transaction(admission(consumer.id, 2, "KTR-001", dec!(700000)))
        .await
        .unwrap();

    let err = service
        .update_limit(consumer.id, 2, dec!(600000))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "limit below used amount"));

    let limit = service
        .update_limit(consumer.id, 2, dec!(700000))
        .await
        .unwrap();
    assert_eq!(limit.headroom(), Decimal::ZERO);
}

#[tokio::test]
async fn test_limit_amount_must_be_storable() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();

    for amount in [dec!(0.001), dec!(10000000000000), Decimal::MAX] {
        let err = service
            .assign_limit(consumer.id, 1, amount)
            .await
            .unwrap_err();
        assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid amount"));
    }

    service
        .assign_limit(consumer.id, 1, dec!(9999999999999.99))
        .await
        .unwrap();
    let err = service
        .update_limit(consumer.id, 1, dec!(100.005))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid amount"));
}

#[tokio::test]
async fn test_update_and_delete_consumer() {
    let service = service();
    let consumer = service
        .register_consumer(new_consumer("1234567890123456"))
        .await
        .unwrap();

    let updated = service
        .update_consumer(
            consumer.id,
            ConsumerUpdate {
                full_name: "Jane Doe".to_string(),
                legal_name: "Jane Doe".to_string(),
                salary: dec!(7500000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Jane Doe");
    assert_eq!(updated.nik, consumer.nik);
    assert_eq!(updated.created_at, consumer.created_at);

    let err = service
        .update_consumer(
            consumer.id,
            ConsumerUpdate {
                full_name: "Jane Doe".to_string(),
                legal_name: "Jane Doe".to_string(),
                salary: dec!(10),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "income below minimum"));

    service.delete_consumer(consumer.id).await.unwrap();
    assert!(matches!(
        service.get_consumer(consumer.id).await,
        Err(CreditError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_consumer(consumer.id).await,
        Err(CreditError::NotFound(_))
    ));
    // The NIK stays taken after a soft delete.
    assert!(matches!(
        service.register_consumer(new_consumer("1234567890123456")).await,
        Err(CreditError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_invalid_ids_rejected() {
    let service = service();
    assert!(matches!(
        service.get_consumer(ConsumerId::new(0)).await,
        Err(CreditError::Validation(_))
    ));
    assert!(matches!(
        service.get_transaction(TransactionId::new(-1)).await,
        Err(CreditError::Validation(_))
    ));
}
