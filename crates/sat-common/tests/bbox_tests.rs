//! Tests for bounding boxes built around target points.

use sat_common::{BoundingBox, TargetPoint, Tolerance};

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-90.0, 90.0, -180.0, 180.0);
    assert_eq!(bbox.min_lat, -90.0);
    assert_eq!(bbox.max_lat, 90.0);
    assert_eq!(bbox.min_lon, -180.0);
    assert_eq!(bbox.max_lon, 180.0);
}

#[test]
fn test_bbox_around_custom_tolerance() {
    let bbox = BoundingBox::around(TargetPoint::new(5.7141, -72.9339), Tolerance::new(1.0, 2.0));
    assert!((bbox.lat_span() - 2.0).abs() < 1e-12);
    assert!((bbox.lon_span() - 4.0).abs() < 1e-12);
    assert!((bbox.min_lon - (-74.9339)).abs() < 1e-12);
}

// ============================================================================
// Containment
// ============================================================================

#[test]
fn test_contains_center() {
    let target = TargetPoint::new(-33.5, 151.0);
    let bbox = BoundingBox::around(target, Tolerance::default());
    assert!(bbox.contains_point(target.lat, target.lon));
}

#[test]
fn test_contains_edges_inclusive() {
    let bbox = BoundingBox::around(TargetPoint::new(10.0, 100.0), Tolerance::default());
    assert!(bbox.contains_point(9.5, 99.5));
    assert!(bbox.contains_point(10.5, 100.5));
    assert!(bbox.contains_point(9.5, 100.5));
}

#[test]
fn test_excludes_outside_either_axis() {
    let bbox = BoundingBox::around(TargetPoint::new(10.0, 100.0), Tolerance::default());
    assert!(!bbox.contains_point(11.0, 100.0));
    assert!(!bbox.contains_point(10.0, 101.0));
    assert!(!bbox.contains_point(20.0, 110.0));
}

#[test]
fn test_excludes_nan_coordinates() {
    let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
    assert!(!bbox.contains_point(f64::NAN, 0.5));
    assert!(!bbox.contains_point(0.5, f64::NAN));
}
