use stmtcache::{LruStatementCache, StmtCacheError};

#[test]
fn test_capacity_below_one_is_rejected() {
    let err = LruStatementCache::<String>::new(0).unwrap_err();
    assert!(matches!(err, StmtCacheError::InvalidConfiguration(_)));
}

#[test]
fn test_get_on_missing_key_is_a_miss() {
    let cache = LruStatementCache::<String>::new(2).unwrap();
    assert!(cache.get("missing").is_none());
}

#[test]
fn test_set_then_get_returns_value() {
    let cache = LruStatementCache::new(2).unwrap();
    cache.set("k1", "s1".to_string());
    assert_eq!(cache.get("k1"), Some("s1".to_string()));
}

#[test]
fn test_get_refreshes_recency_before_eviction() {
    let cache = LruStatementCache::new(2).unwrap();
    cache.set("a", "A".to_string());
    cache.set("b", "B".to_string());

    // Touch a so that b becomes least recently used.
    assert_eq!(cache.get("a"), Some("A".to_string()));

    cache.set("c", "C".to_string());

    assert!(cache.get("b").is_none());
    assert_eq!(cache.get("a"), Some("A".to_string()));
    assert_eq!(cache.get("c"), Some("C".to_string()));
}

#[test]
fn test_set_existing_key_replaces_and_refreshes() {
    let cache = LruStatementCache::new(2).unwrap();
    cache.set("k1", "old".to_string());
    cache.set("k2", "S2".to_string());

    cache.set("k1", "new".to_string());
    cache.set("k3", "S3".to_string());

    assert!(cache.get("k2").is_none());
    assert_eq!(cache.get("k1"), Some("new".to_string()));
    assert_eq!(cache.get("k3"), Some("S3".to_string()));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_size_never_exceeds_capacity() {
    let cache = LruStatementCache::new(3).unwrap();
    for i in 0..50 {
        cache.set(&format!("k{i}"), i.to_string());
        assert!(cache.len() <= 3);
    }
    // The three most recent inserts survive.
    assert_eq!(cache.get("k49"), Some("49".to_string()));
    assert_eq!(cache.get("k48"), Some("48".to_string()));
    assert_eq!(cache.get("k47"), Some("47".to_string()));
    assert!(cache.get("k46").is_none());
}

#[test]
fn test_eviction_follows_access_order_not_insert_order() {
    let cache = LruStatementCache::new(3).unwrap();
    cache.set("a", "A".to_string());
    cache.set("b", "B".to_string());
    cache.set("c", "C".to_string());

    // Recency now c, b, a; touch a and b so c is least recent.
    cache.get("a");
    cache.get("b");
    cache.set("d", "D".to_string());

    assert!(cache.get("c").is_none());
    assert!(cache.get("a").is_some());
    assert!(cache.get("b").is_some());
    assert!(cache.get("d").is_some());
}

#[test]
fn test_get_on_most_recent_entry_keeps_order() {
    let cache = LruStatementCache::new(3).unwrap();
    cache.set("k1", "S1".to_string());
    cache.set("k2", "S2".to_string());

    // k2 is already most recent; touching it must not corrupt the list.
    assert_eq!(cache.get("k2"), Some("S2".to_string()));

    cache.set("k3", "S3".to_string());
    cache.set("k4", "S4".to_string());

    // k1 was least recent and goes first.
    assert!(cache.get("k1").is_none());
    assert!(cache.get("k2").is_some());
    assert!(cache.get("k3").is_some());
    assert!(cache.get("k4").is_some());
}

#[test]
fn test_clear_resets_to_virgin_state() {
    let cache = LruStatementCache::new(2).unwrap();
    cache.set("k1", "S1".to_string());
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.get("k1").is_none());

    // Insertions after clear behave as on a fresh cache.
    cache.set("k2", "S2".to_string());
    cache.set("k3", "S3".to_string());
    cache.set("k4", "S4".to_string());
    assert_eq!(cache.len(), 2);
    assert!(cache.get("k2").is_none());
    assert!(cache.get("k3").is_some());
    assert!(cache.get("k4").is_some());
}

#[test]
fn test_capacity_one_cache_holds_last_insert() {
    let cache = LruStatementCache::new(1).unwrap();
    cache.set("a", "A".to_string());
    cache.set("b", "B".to_string());
    assert!(cache.get("a").is_none());
    assert_eq!(cache.get("b"), Some("B".to_string()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_arena_slot_reuse_after_eviction() {
    let cache = LruStatementCache::new(2).unwrap();
    for round in 0..10 {
        let key = format!("k{round}");
        cache.set(&key, round.to_string());
        assert_eq!(cache.get(&key), Some(round.to_string()));
    }
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("k9"), Some("9".to_string()));
    assert_eq!(cache.get("k8"), Some("8".to_string()));
}
