use super::*;
use crate::record::{sort_records, GroupKey, NewRecord};
use chrono::{Duration, TimeZone, Utc};

fn group(ordinals: &[(&str, i64)]) -> Vec<OrderedRecord> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let mut records: Vec<OrderedRecord> = ordinals
        .iter()
        .enumerate()
        .map(|(i, (name, ordinal))| {
            let created = base + Duration::seconds(i64::try_from(i).unwrap());
            let mut record = NewRecord::new(GroupKey::category(), *name).into_record(*ordinal, created);
            record.id = (*name).to_string();
            record
        })
        .collect();
    sort_records(&mut records);
    records
}

fn order(records: &[OrderedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn moved(outcome: &MoveOutcome) -> i64 {
    match outcome {
        MoveOutcome::Moved { ordinal, .. } => *ordinal,
        MoveOutcome::NoOp => panic!("expected a move, got no-op"),
    }
}

#[test]
fn test_append_to_empty_group_uses_gap() {
    let seq = Sequencer::default();
    assert_eq!(seq.append_ordinal(&[]), 1000);
}

#[test]
fn test_second_append_adds_gap() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000)]);
    assert_eq!(seq.append_ordinal(&records), 2000);
}

#[test]
fn test_append_uses_max_not_last_inserted() {
    let seq = Sequencer::default();
    let records = group(&[("a", 5000), ("b", 10), ("c", 700)]);
    assert_eq!(seq.append_ordinal(&records), 6000);
}

#[test]
fn test_new_clamps_tiny_gap() {
    assert_eq!(Sequencer::new(1).gap(), MIN_GAP);
    assert_eq!(Sequencer::new(-50).gap(), MIN_GAP);
    assert_eq!(Sequencer::new(64).gap(), 64);
}

#[test]
fn test_move_up_first_is_noop() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000)]);
    assert_eq!(seq.move_up(&records, "a").unwrap(), MoveOutcome::NoOp);
}

#[test]
fn test_move_down_last_is_noop() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000)]);
    assert_eq!(seq.move_down(&records, "b").unwrap(), MoveOutcome::NoOp);
}

#[test]
fn test_move_up_second_goes_below_first() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(moved(&seq.move_up(&records, "b").unwrap()), 0);
}

#[test]
fn test_move_up_takes_midpoint_of_two_previous() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(moved(&seq.move_up(&records, "c").unwrap()), 1500);
}

#[test]
fn test_move_down_takes_midpoint_of_two_next() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(moved(&seq.move_down(&records, "a").unwrap()), 2500);
}

#[test]
fn test_move_down_penultimate_goes_past_last() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(moved(&seq.move_down(&records, "b").unwrap()), 4000);
}

#[test]
fn test_midpoint_floors_negative_sums() {
    let seq = Sequencer::default();
    let records = group(&[("a", -3), ("b", 0), ("c", 10)]);
    // floor((-3 + 0) / 2) = -2
    assert_eq!(moved(&seq.move_up(&records, "c").unwrap()), -2);
}

#[test]
fn test_move_unknown_id_is_not_found() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000)]);
    assert_eq!(
        seq.move_up(&records, "zzz"),
        Err(SequenceError::NotFound("zzz".to_string()))
    );
    assert_eq!(
        seq.move_down(&[], "zzz"),
        Err(SequenceError::NotFound("zzz".to_string()))
    );
}

#[test]
fn test_adjacent_ordinals_exhaust_gap() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 1001), ("c", 1002)]);
    assert_eq!(
        seq.move_up(&records, "c"),
        Err(SequenceError::GapExhausted {
            lower: 1000,
            upper: 1001
        })
    );
}

#[test]
fn test_duplicate_neighbours_exhaust_gap() {
    let seq = Sequencer::default();
    let records = group(&[("a", 7), ("b", 7), ("c", 7)]);
    assert!(matches!(
        seq.move_up(&records, "c"),
        Err(SequenceError::GapExhausted { .. })
    ));
}

#[test]
fn test_plan_move_renumbers_on_exhaustion() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 1001), ("c", 1002)]);
    let plan = seq.plan_move(&records, "c", Direction::Up).unwrap();

    assert!(plan.renumbers());
    assert_eq!(
        plan.renumber,
        vec![
            Assignment { id: "a".to_string(), ordinal: 1000 },
            Assignment { id: "b".to_string(), ordinal: 2000 },
            Assignment { id: "c".to_string(), ordinal: 3000 },
        ]
    );
    assert_eq!(
        plan.outcome,
        MoveOutcome::Moved {
            id: "c".to_string(),
            ordinal: 1500
        }
    );

    let mut applied = apply_assignments(&records, &plan.renumber);
    if let Some(c) = applied.iter_mut().find(|r| r.id == "c") {
        c.ordinal = 1500;
    }
    sort_records(&mut applied);
    assert_eq!(order(&applied), vec!["a", "c", "b"]);
}

#[test]
fn test_plan_move_without_exhaustion_touches_one_record() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    let plan = seq.plan_move(&records, "c", Direction::Up).unwrap();
    assert!(!plan.renumbers());
}

#[test]
fn test_plan_move_not_found_is_not_swallowed() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1), ("b", 2)]);
    assert!(matches!(
        seq.plan_move(&records, "nope", Direction::Down),
        Err(SequenceError::NotFound(_))
    ));
}

#[test]
fn test_renumber_preserves_relative_order() {
    let seq = Sequencer::default();
    let records = group(&[("a", -40), ("b", -40), ("c", 3), ("d", 9_000_000)]);
    let renumbered = apply_assignments(&records, &seq.renumber(&records));
    assert_eq!(order(&renumbered), order(&records));
    let ordinals: Vec<i64> = renumbered.iter().map(|r| r.ordinal).collect();
    assert_eq!(ordinals, vec![1000, 2000, 3000, 4000]);
}

#[test]
fn test_move_up_then_down_restores_position() {
    let seq = Sequencer::default();
    let mut records = group(&[("a", 1000), ("b", 2000), ("c", 3000), ("d", 4000)]);
    let before = order(&records).join(",");

    for direction in [Direction::Up, Direction::Down] {
        let plan = seq.plan_move(&records, "c", direction).unwrap();
        records = apply_assignments(&records, &plan.renumber);
        if let MoveOutcome::Moved { id, ordinal } = plan.outcome {
            records = apply_assignments(&records, &[Assignment { id, ordinal }]);
        }
    }

    assert_eq!(order(&records).join(","), before);
}

#[test]
fn test_insert_at_zero_prepends_below_minimum() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000)]);
    let ordinal = seq.insert_at(&records, 0).unwrap();
    assert!(ordinal < 1000);
    assert_eq!(ordinal, 0);
}

#[test]
fn test_insert_at_end_appends() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000)]);
    assert_eq!(seq.insert_at(&records, 2).unwrap(), 3000);
    assert_eq!(seq.insert_at(&records, 99).unwrap(), 3000);
}

#[test]
fn test_insert_at_middle_takes_midpoint() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(seq.insert_at(&records, 2).unwrap(), 2500);
}

#[test]
fn test_insert_into_empty_group() {
    let seq = Sequencer::default();
    assert_eq!(seq.insert_at(&[], 0).unwrap(), 1000);
    assert_eq!(seq.insert_at(&[], 5).unwrap(), 1000);
}

#[test]
fn test_plan_insert_renumbers_when_exhausted() {
    let seq = Sequencer::default();
    let records = group(&[("a", 10), ("b", 11)]);
    let plan = seq.plan_insert(&records, 1).unwrap();
    assert!(plan.renumbers());
    assert_eq!(plan.ordinal, 1500);
}

#[test]
fn test_move_to_same_position_is_noop() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(seq.move_to(&records, "b", 1).unwrap(), MoveOutcome::NoOp);
}

#[test]
fn test_move_to_front_and_back() {
    let seq = Sequencer::default();
    let records = group(&[("a", 1000), ("b", 2000), ("c", 3000)]);
    assert_eq!(moved(&seq.move_to(&records, "c", 0).unwrap()), 0);
    assert_eq!(moved(&seq.move_to(&records, "a", 10).unwrap()), 4000);
    assert_eq!(moved(&seq.move_to(&records, "c", 1).unwrap()), 1500);
}

#[test]
fn test_prepend_ordinal() {
    let seq = Sequencer::new(10);
    assert_eq!(seq.prepend_ordinal(&[]), 10);
    let records = group(&[("a", 5), ("b", 50)]);
    assert_eq!(seq.prepend_ordinal(&records), -5);
}

#[test]
fn test_move_down_past_max_ordinal_renumbers() {
    let seq = Sequencer::default();
    let records = group(&[("a", i64::MAX - 10), ("b", i64::MAX)]);
    assert!(matches!(
        seq.move_down(&records, "a"),
        Err(SequenceError::GapExhausted { .. })
    ));
    let plan = seq.plan_move(&records, "a", Direction::Down).unwrap();
    assert!(plan.renumbers());
    assert_eq!(moved(&plan.outcome), 3000);
}

#[test]
fn test_has_duplicate_ordinals() {
    assert!(!has_duplicate_ordinals(&group(&[("a", 1), ("b", 2)])));
    assert!(has_duplicate_ordinals(&group(&[("a", 1), ("b", 1)])));
    assert!(!has_duplicate_ordinals(&[]));
}

#[test]
fn test_direction_label() {
    assert_eq!(Direction::Up.label(), "up");
    assert_eq!(Direction::Down.label(), "down");
}
