// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{RolloverStep, StepIndicator};

#[test]
fn test_step_percentages_increase_and_end_at_100() {
    let percents: Vec<u8> = RolloverStep::ALL
        .iter()
        .map(RolloverStep::completion_percent)
        .collect();
    assert!(percents.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(percents.last(), Some(&100));
}

#[test]
fn test_step_indicator_thresholds() {
    assert_eq!(StepIndicator::from_percent(0).reached_count(), 1);
    assert_eq!(StepIndicator::from_percent(32).reached_count(), 1);
    assert_eq!(StepIndicator::from_percent(33).reached_count(), 2);
    assert_eq!(StepIndicator::from_percent(65).reached_count(), 2);
    assert_eq!(StepIndicator::from_percent(66).reached_count(), 3);
    assert_eq!(StepIndicator::from_percent(100).reached_count(), 3);
}

#[test]
fn test_step_indicator_labels_and_numbers() {
    let indicator: StepIndicator = StepIndicator::from_percent(50);
    let labels: Vec<&str> = indicator.steps.iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        vec!["Create fiscal year", "Migrate items", "Update accounts"]
    );
    assert_eq!(indicator.steps[2].number, 3);
    assert!(!indicator.steps[2].reached);
}
