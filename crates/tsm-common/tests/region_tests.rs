use super::*;

#[test]
fn test_empty_region() {
    let region = DomRegion::EMPTY;
    assert!(region.is_empty());
    assert_eq!(region.file_name(), None);
    assert_eq!(region, DomRegion::default());
    assert_eq!(region.to_string(), "[no region]");
}

#[test]
fn test_region_contains() {
    let region = DomRegion::span("Program.cs", 3, 5, 4, 10);

    assert!(region.contains(TextLocation::new(3, 5)));
    assert!(region.contains(TextLocation::new(3, 80)));
    assert!(region.contains(TextLocation::new(4, 10)));
    assert!(!region.contains(TextLocation::new(3, 4)));
    assert!(!region.contains(TextLocation::new(4, 11)));
    assert!(!region.contains(TextLocation::new(5, 1)));
}

#[test]
fn test_point_region_contains_rest_of_line() {
    let region = DomRegion::at("Program.cs", 7, 12);

    assert!(region.contains(TextLocation::new(7, 12)));
    assert!(region.contains(TextLocation::new(7, 40)));
    assert!(!region.contains(TextLocation::new(7, 11)));
    assert!(!region.contains(TextLocation::new(8, 1)));
}

#[test]
fn test_region_display() {
    assert_eq!(
        DomRegion::span("a.cs", 1, 2, 3, 4).to_string(),
        "a.cs(1, 2)-(3, 4)"
    );
    assert_eq!(DomRegion::at("a.cs", 1, 2).to_string(), "a.cs(1, 2)");
}

#[test]
fn test_region_pool_file_name() {
    let pool = StringPool::new();
    let mut first = DomRegion::at("Widgets.cs", 1, 1);
    let mut second = DomRegion::at("Widgets.cs", 9, 1);

    first.pool_file_name(&pool);
    second.pool_file_name(&pool);

    let a = first.file_name.as_ref().expect("file name");
    let b = second.file_name.as_ref().expect("file name");
    assert!(Arc::ptr_eq(a, b));
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_region_serde_round_trip_keeps_file() {
    let region = DomRegion::span("Collections.cs", 10, 1, 12, 2);
    let json = serde_json::to_string(&region).expect("serialize region");
    let back: DomRegion = serde_json::from_str(&json).expect("deserialize region");
    assert_eq!(back, region);
    assert_eq!(back.file_name(), Some("Collections.cs"));
}
