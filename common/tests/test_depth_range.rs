// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::depth_range::DepthRange;

#[test]
pub fn keep_min_and_max_values() {
    let range = DepthRange::new(0.2, 0.8);
    assert_eq!(range.min(), 0.2);
    assert_eq!(range.max(), 0.8);
}

#[test]
pub fn copies_are_independent_values() {
    let range = DepthRange::new(0.2, 0.8);
    let copy = range;
    assert_eq!(copy, range);
    assert_eq!(range.min(), 0.2);
    assert_eq!(range.max(), 0.8);
}

#[test]
pub fn bounds_are_not_enforced() {
    let range = DepthRange::new(-1.0, 2.5);
    assert_eq!(range.min(), -1.0);
    assert_eq!(range.max(), 2.5);
}

#[test]
pub fn contains_is_inclusive() {
    let range = DepthRange::new(0.25, 0.75);
    assert!(range.contains(0.25));
    assert!(range.contains(0.5));
    assert!(range.contains(0.75));
    assert!(!range.contains(0.0));
    assert!(!range.contains(1.0));
}

#[test]
pub fn deserialize_depth_range_from_json() {
    let range = DepthRange::from_json(r#"{ "min": 0.25, "max": 0.75 }"#)
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(range, DepthRange::new(0.25, 0.75));
}
