//! End-to-end purchase flows through a corporation session.
//!
//! These tests verify that:
//! - Applied purchases debit funds by exactly `quantity * unit_cost`
//! - Rejected purchases leave every pool untouched
//! - Snapshots survive a save/load cycle on disk

use corp_market::{
    attempt_purchase, CorporationSession, FundsPool, MarketError, Material, MaterialKind,
    PurchaseError, StoragePool, Warehouse, BULK_PURCHASING,
};
use tempfile::tempdir;

fn unlocked_session(funds: f64, capacity: f64) -> CorporationSession {
    let mut warehouse = Warehouse::new(capacity).unwrap();
    for kind in [MaterialKind::Water, MaterialKind::Metal, MaterialKind::Hardware] {
        warehouse.stock(Material::new(kind, 10.0).unwrap()).unwrap();
    }
    let mut session = CorporationSession::new(funds, warehouse).unwrap();
    session.grant_research(BULK_PURCHASING);
    session
}

#[test]
fn worked_example_from_free_functions() {
    let mut metal = Material::with_unit_size(MaterialKind::Metal, 5.0, 10.0).unwrap();
    let storage = StoragePool::new(100.0, 90.0).unwrap();
    let mut funds = FundsPool::new(1000.0).unwrap();

    let applied = attempt_purchase("1", &mut metal, &storage, &mut funds).unwrap();
    assert_eq!(applied.cost, 10.0);
    assert_eq!(applied.quantity, 1.0);
    assert_eq!(funds.balance, 990.0);

    let err = attempt_purchase("abc", &mut metal, &storage, &mut funds).unwrap_err();
    assert!(matches!(err, PurchaseError::InvalidInput { .. }));
    assert_eq!(funds.balance, 990.0);
    assert_eq!(metal.quantity, 1.0);
}

#[test]
fn repeated_purchases_never_overfill_the_warehouse() {
    let mut session = unlocked_session(1e12, 50.0);

    let mut applied = 0;
    let mut rejected = 0;
    for _ in 0..200 {
        match session.bulk_purchase(MaterialKind::Metal, "7") {
            Ok(_) => applied += 1,
            Err(MarketError::Purchase(PurchaseError::InsufficientCapacity { .. })) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
        let pool = session.warehouse().storage_pool();
        assert!(pool.used <= pool.capacity, "used {} > capacity {}", pool.used, pool.capacity);
    }

    // 7 metal takes 0.7 space; 71 purchases fit in 50.
    assert_eq!(applied, 71);
    assert_eq!(rejected, 129);
}

#[test]
fn filling_to_the_remaining_space_keeps_the_snapshot_loadable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corp.json");

    for capacity in [0.37, 0.41, 1.23, 7.77, 50.0] {
        let mut session = unlocked_session(1e6, capacity);
        session.bulk_purchase(MaterialKind::Water, 2.6).unwrap();
        for _ in 0..3 {
            let remaining = session.warehouse().storage_pool().remaining();
            match session.bulk_purchase(MaterialKind::Water, remaining / MaterialKind::Water.unit_size()) {
                Ok(_) | Err(MarketError::Purchase(PurchaseError::InsufficientCapacity { .. })) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
            let pool = session.warehouse().storage_pool();
            assert!(pool.used <= pool.capacity, "used {} > capacity {}", pool.used, pool.capacity);
        }

        session.save(&path).unwrap();
        let loaded = CorporationSession::load(&path).unwrap();
        assert_eq!(loaded.warehouse(), session.warehouse());
    }
}

#[test]
fn funds_run_out_before_space() {
    let mut session = unlocked_session(1_000.0, 1e6);

    let mut spent = 0.0;
    loop {
        match session.bulk_purchase(MaterialKind::Hardware, 15.0) {
            Ok(receipt) => spent += receipt.cost,
            Err(err) => {
                assert!(matches!(
                    err,
                    MarketError::Purchase(PurchaseError::InsufficientFunds { .. })
                ));
                break;
            }
        }
    }

    assert_eq!(spent, 900.0);
    assert_eq!(session.funds().balance, 100.0);
    assert!(session.funds().balance >= 0.0);
}

#[test]
fn rejected_purchase_leaves_session_unchanged() {
    let mut session = unlocked_session(500.0, 10.0);
    let before_funds = *session.funds();
    let before_warehouse = session.warehouse().clone();

    for input in ["", "abc", "NaN", "-3", "1e400"] {
        let err = session.bulk_purchase(MaterialKind::Water, input).unwrap_err();
        assert!(err.is_user_error(), "{input:?} gave {err}");
    }
    assert!(session.bulk_purchase(MaterialKind::Water, 10_000.0).is_err());
    assert!(session.bulk_purchase(MaterialKind::Metal, 51.0).is_err());
    session.bulk_purchase(MaterialKind::Water, "0").unwrap();

    assert_eq!(*session.funds(), before_funds);
    assert_eq!(*session.warehouse(), before_warehouse);
    assert_eq!(session.receipts().count(), 0);
}

#[test]
fn bulk_and_buy_rate_are_independent() {
    let mut session = unlocked_session(100.0, 10.0);
    session.set_buy_rate(MaterialKind::Water, "25").unwrap();
    session.bulk_purchase(MaterialKind::Water, "5").unwrap();

    let water = session.warehouse().material(MaterialKind::Water).unwrap();
    assert_eq!(water.buy_rate, 25.0);
    assert_eq!(water.quantity, 5.0);
    assert_eq!(session.funds().balance, 50.0);
}

#[test]
fn quote_matches_the_purchase_it_previews() {
    let mut session = unlocked_session(10_000.0, 100.0);
    let quote = session.quote(MaterialKind::Metal, "12.5").unwrap();
    assert_eq!(quote.to_string(), "Purchasing 12.50 of Metal will cost $125.000");

    let receipt = session.bulk_purchase(MaterialKind::Metal, "12.5").unwrap();
    assert_eq!(receipt.cost, 125.0);
}

#[test]
fn snapshot_survives_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corp.json");

    let mut session = unlocked_session(2_000.0, 100.0);
    session.bulk_purchase(MaterialKind::Water, "40").unwrap();
    session.set_buy_rate(MaterialKind::Metal, 3.0).unwrap();
    session.save(&path).unwrap();

    let mut loaded = CorporationSession::load(&path).unwrap();
    assert_eq!(loaded.funds(), session.funds());
    assert_eq!(loaded.warehouse(), session.warehouse());
    assert_eq!(loaded.receipts().count(), 1);

    // Loaded sessions keep enforcing the same limits.
    loaded.bulk_purchase(MaterialKind::Water, "160").unwrap();
    assert_eq!(loaded.funds().balance, 0.0);
    assert!(loaded.bulk_purchase(MaterialKind::Water, "1").is_err());
}

#[test]
fn load_rejects_corrupt_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corp.json");
    std::fs::write(&path, "{\"funds\": ").unwrap();

    let err = CorporationSession::load(&path).unwrap_err();
    assert!(matches!(err, MarketError::Persistence { .. }));

    let missing = CorporationSession::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, MarketError::Persistence { .. }));
}
