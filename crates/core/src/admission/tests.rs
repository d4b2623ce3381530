//! Admission controller tests, including the concurrency properties.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use kredit_shared::types::ConsumerId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;

use super::{AdmissionController, AdmissionRequest, KeyedLocks};
use crate::bounds::MAX_MONEY;
use crate::consumer::{EligibilityRules, NewConsumer};
use crate::error::CreditError;
use crate::limit::{LimitKey, Tenor};
use crate::service::CreditService;
use crate::store::{LimitStore, MemoryStore, TransactionStore};
use crate::transaction::{TransactionStatus, TransactionTerms};

fn request(consumer_id: ConsumerId, tenor: i64, contract: &str, amount: Decimal) -> AdmissionRequest {
    AdmissionRequest {
        consumer_id,
        tenor,
        contract_number: contract.to_string(),
        amount,
        terms: TransactionTerms::default(),
    }
}

async fn service_with_limit(limit_amount: Decimal, tenor: i64) -> (Arc<CreditService>, ConsumerId) {
    let service = Arc::new(CreditService::in_memory(EligibilityRules::default()));
    let consumer = service
        .register_consumer(NewConsumer {
            nik: "1234567890123456".to_string(),
            full_name: "John Doe".to_string(),
            legal_name: "John Doe".to_string(),
            salary: dec!(5000000),
            ..Default::default()
        })
        .await
        .unwrap();
    service
        .assign_limit(consumer.id, tenor, limit_amount)
        .await
        .unwrap();
    (service, consumer.id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_admissions_never_overdraw() {
    let (service, consumer_id) = service_with_limit(dec!(1000000), 6).await;
    let barrier = Arc::new(Barrier::new(100));

    let handles = (0..100).map(|i| {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            barrier.wait().await;
            service
                .create_transaction(request(consumer_id, 6, &format!("KTR-{i:03}"), dec!(20000)))
                .await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(CreditError::InsufficientLimit { .. })))
        .count();
    assert_eq!(admitted, 50);
    assert_eq!(rejected, 50);

    let limit = service.get_limit(consumer_id, 6).await.unwrap();
    assert_eq!(limit.used_amount, dec!(1000000));
    assert!(limit.is_consistent());

    let active_total: Decimal = service
        .get_consumer_transactions(consumer_id)
        .await
        .unwrap()
        .iter()
        .filter(|tx| tx.status == TransactionStatus::Active)
        .map(|tx| tx.otr)
        .sum();
    assert_eq!(active_total, limit.used_amount);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_contract_rejected_across_keys() {
    let (service, consumer_id) = service_with_limit(dec!(1000000), 6).await;
    for tenor in [1, 2, 3] {
        service
            .assign_limit(consumer_id, tenor, dec!(1000000))
            .await
            .unwrap();
    }

    // Same contract on four different keys: the per-key locks do not
    // serialize these, the store's uniqueness does.
    let handles = [1, 2, 3, 6].map(|tenor| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .create_transaction(request(consumer_id, tenor, "KTR-DUP", dec!(1000)))
                .await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(CreditError::Conflict(msg)) if msg == "duplicate contract number"))
            .count(),
        3
    );

    let used: Decimal = {
        let mut total = Decimal::ZERO;
        for tenor in [1, 2, 3, 6] {
            total += service.get_limit(consumer_id, tenor).await.unwrap().used_amount;
        }
        total
    };
    assert_eq!(used, dec!(1000));
}

#[tokio::test]
async fn test_other_keys_proceed_while_one_is_held() {
    let store = Arc::new(MemoryStore::new());
    let locks = Arc::new(KeyedLocks::new());
    let controller = AdmissionController::new(store.clone(), store.clone(), Arc::clone(&locks));

    for consumer in [1, 2] {
        LimitStore::insert(
            store.as_ref(),
            crate::limit::NewCreditLimit {
                consumer_id: ConsumerId::new(consumer),
                tenor: Tenor::Six,
                limit_amount: dec!(1000),
                created_at: chrono::Utc::now(),
            },
        )
        .await
        .unwrap();
    }

    let held = locks
        .acquire(LimitKey::new(ConsumerId::new(1), Tenor::Six))
        .await;

    let other = tokio::time::timeout(
        Duration::from_millis(200),
        controller.admit(request(ConsumerId::new(2), 6, "B-1", dec!(10))),
    )
    .await;
    assert!(matches!(other, Ok(Ok(_))), "unrelated key must not wait");

    let blocked = tokio::time::timeout(
        Duration::from_millis(50),
        controller.admit(request(ConsumerId::new(1), 6, "A-1", dec!(10))),
    )
    .await;
    assert!(blocked.is_err(), "held key must wait");

    drop(held);
    controller
        .admit(request(ConsumerId::new(1), 6, "A-1", dec!(10)))
        .await
        .unwrap();
    assert!(store.find_by_contract_number("A-1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_admission_boundary() {
    let (service, consumer_id) = service_with_limit(dec!(1000000), 3).await;

    service
        .create_transaction(request(consumer_id, 3, "K-1", dec!(999999.99)))
        .await
        .unwrap();
    let err = service
        .create_transaction(request(consumer_id, 3, "K-2", dec!(0.02)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CreditError::InsufficientLimit { requested, headroom }
            if requested == dec!(0.02) && headroom == dec!(0.01)
    ));
    service
        .create_transaction(request(consumer_id, 3, "K-3", dec!(0.01)))
        .await
        .unwrap();

    let limit = service.get_limit(consumer_id, 3).await.unwrap();
    assert_eq!(limit.headroom(), Decimal::ZERO);
}

#[tokio::test]
async fn test_validation_order() {
    let (service, consumer_id) = service_with_limit(dec!(1000), 6).await;

    let err = service
        .create_transaction(request(consumer_id, 5, "K-1", dec!(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "non-positive amount"));

    let err = service
        .create_transaction(request(consumer_id, 5, "K-1", dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid tenor"));

    let err = service
        .create_transaction(request(consumer_id, 2, "K-1", dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::NotFound(msg) if msg == "no limit for tenor"));

    let err = service
        .create_transaction(request(consumer_id, 6, "  ", dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "missing required field"));

    let mut negative_fee = request(consumer_id, 6, "K-9", dec!(10));
    negative_fee.terms.admin_fee = dec!(-1);
    let err = service.create_transaction(negative_fee).await.unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "negative fee"));

    service
        .create_transaction(request(consumer_id, 6, "K-1", dec!(10)))
        .await
        .unwrap();
    // Duplicate is detected before the limit lookup, even on a tenor with no limit.
    let err = service
        .create_transaction(request(consumer_id, 2, "K-1", dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Conflict(msg) if msg == "duplicate contract number"));
}

#[tokio::test]
async fn test_huge_amount_after_admission_is_rejected() {
    let (service, consumer_id) = service_with_limit(dec!(1000000), 6).await;
    service
        .create_transaction(request(consumer_id, 6, "A", dec!(1000)))
        .await
        .unwrap();

    let err = service
        .create_transaction(request(consumer_id, 6, "B", Decimal::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid amount"));

    let err = service
        .create_transaction(request(consumer_id, 6, "C", MAX_MONEY))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CreditError::InsufficientLimit { requested, headroom }
            if requested == MAX_MONEY && headroom == dec!(999000)
    ));

    let limit = service.get_limit(consumer_id, 6).await.unwrap();
    assert_eq!(limit.used_amount, dec!(1000));
}

#[tokio::test]
async fn test_unstorable_fields_rejected() {
    let (service, consumer_id) = service_with_limit(dec!(1000000), 6).await;

    let err = service
        .create_transaction(request(consumer_id, 6, "K-1", dec!(0.001)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid amount"));

    let err = service
        .create_transaction(request(consumer_id, 6, &"K".repeat(256), dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "field too long"));

    let mut fractional_fee = request(consumer_id, 6, "K-2", dec!(10));
    fractional_fee.terms.interest_amount = dec!(1.005);
    let err = service.create_transaction(fractional_fee).await.unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "invalid amount"));

    let mut long_asset = request(consumer_id, 6, "K-3", dec!(10));
    long_asset.terms.asset_name = Some("a".repeat(256));
    let err = service.create_transaction(long_asset).await.unwrap_err();
    assert!(matches!(err, CreditError::Validation(msg) if msg == "field too long"));

    // Nothing was reserved.
    let limit = service.get_limit(consumer_id, 6).await.unwrap();
    assert_eq!(limit.used_amount, Decimal::ZERO);

    // A 255-character contract number fits.
    service
        .create_transaction(request(consumer_id, 6, &"K".repeat(255), dec!(10)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_release_restores_headroom() {
    let (service, consumer_id) = service_with_limit(dec!(1000), 6).await;
    service
        .create_transaction(request(consumer_id, 6, "K-1", dec!(800)))
        .await
        .unwrap();

    let limit = service
        .release_limit(consumer_id, 6, dec!(300))
        .await
        .unwrap();
    assert_eq!(limit.used_amount, dec!(500));

    let limit = service
        .release_limit(consumer_id, 6, dec!(9000))
        .await
        .unwrap();
    assert_eq!(limit.used_amount, Decimal::ZERO);

    assert!(matches!(
        service.release_limit(consumer_id, 6, dec!(0)).await,
        Err(CreditError::Validation(_))
    ));
    assert!(matches!(
        service.release_limit(consumer_id, 1, dec!(10)).await,
        Err(CreditError::NotFound(_))
    ));
}

/// Strategy for amounts between 0.01 and 500.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..50_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any sequence of admissions keeps `0 <= used <= limit`, admits exactly
    /// the requests that fit, and keeps `used` equal to the admitted total.
    #[test]
    fn prop_sequential_admissions_preserve_invariants(
        limit_cents in 1i64..100_000i64,
        amounts in prop::collection::vec(amount(), 1..40),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let limit_amount = Decimal::new(limit_cents, 2);
            let (service, consumer_id) = service_with_limit(limit_amount, 1).await;
            let mut expected_used = Decimal::ZERO;

            for (i, amount) in amounts.into_iter().enumerate() {
                let fits = expected_used + amount <= limit_amount;
                let result = service
                    .create_transaction(request(consumer_id, 1, &format!("P-{i}"), amount))
                    .await;
                prop_assert_eq!(result.is_ok(), fits);
                if fits {
                    expected_used += amount;
                } else {
                    let is_insufficient = matches!(result, Err(CreditError::InsufficientLimit { .. }));
                    prop_assert!(is_insufficient);
                }

                let limit = service.get_limit(consumer_id, 1).await.unwrap();
                prop_assert!(limit.is_consistent());
                prop_assert_eq!(limit.used_amount, expected_used);
            }
            Ok(())
        })?;
    }
}
