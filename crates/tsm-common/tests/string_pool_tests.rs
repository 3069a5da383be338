use super::*;
use rayon::prelude::*;

#[test]
fn test_pool_deduplicates() {
    let pool = StringPool::new();

    let a = pool.intern("count");
    let b = pool.intern("count");
    let c = pool.intern("index");

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(&*a, "count");
    assert_eq!(pool.len(), 3);
}

#[test]
fn test_pool_empty_string_is_shared() {
    let pool = StringPool::new();

    assert!(pool.is_empty());
    let empty = pool.intern("");
    assert!(Arc::ptr_eq(&empty, &empty_string()));
    assert!(pool.is_empty());
}

#[test]
fn test_pool_intern_owned_matches_borrowed() {
    let pool = StringPool::new();

    let borrowed = pool.intern("sender");
    let owned = pool.intern_owned(String::from("sender"));
    assert!(Arc::ptr_eq(&borrowed, &owned));
}

#[test]
fn test_pool_intern_arc_adopts_new_spelling() {
    let pool = StringPool::new();

    let local: Arc<str> = Arc::from("predicate");
    let pooled = pool.intern_arc(&local);
    assert!(Arc::ptr_eq(&local, &pooled));
    assert!(pool.is_pooled(&local));

    let copy: Arc<str> = Arc::from("predicate");
    assert!(!pool.is_pooled(&copy));
    assert!(Arc::ptr_eq(&pool.intern_arc(&copy), &local));
}

#[test]
fn test_pool_get_does_not_insert() {
    let pool = StringPool::new();

    assert!(pool.get("missing").is_none());
    assert!(pool.is_empty());
    pool.intern("missing");
    assert!(pool.get("missing").is_some());
}

#[test]
fn test_pool_common_strings() {
    let pool = StringPool::new();
    pool.intern_common();

    let before = pool.len();
    let int32 = pool.intern("Int32");
    assert_eq!(pool.len(), before);
    assert!(pool.is_pooled(&int32));
}

#[test]
fn test_pool_concurrent_interning_yields_one_instance() {
    let pool = StringPool::new();

    let handles: Vec<Arc<str>> = (0..256)
        .into_par_iter()
        .map(|i| pool.intern(&format!("name{}", i % 8)))
        .collect();

    assert_eq!(pool.len(), 9);
    for handle in &handles {
        let canonical = pool.get(handle).expect("pooled");
        assert!(Arc::ptr_eq(&canonical, handle));
    }
}
