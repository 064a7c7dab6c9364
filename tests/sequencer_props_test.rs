#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use ordo::sequencer::{apply_assignments, Assignment};
use ordo::{Direction, GroupKey, MoveOutcome, NewRecord, OrderedRecord, Sequencer};
use proptest::prelude::*;

fn seeded(count: usize, gap: i64) -> Vec<OrderedRecord> {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (1..=count)
        .map(|i| {
            let ordinal = i64::try_from(i).unwrap() * gap;
            NewRecord::new(GroupKey::category(), format!("r{i}")).into_record(ordinal, now)
        })
        .collect()
}

fn ids(records: &[OrderedRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn strictly_increasing(records: &[OrderedRecord]) -> bool {
    records.windows(2).all(|w| w[0].ordinal < w[1].ordinal)
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Down)]
}

proptest! {
    #[test]
    fn moves_swap_exactly_one_neighbour(
        count in 1_usize..8,
        gap in 2_i64..6,
        steps in proptest::collection::vec((0_usize..8, direction()), 1..40),
    ) {
        let sequencer = Sequencer::new(gap);
        let mut records = seeded(count, gap);
        let mut expected = ids(&records);

        for (pick, direction) in steps {
            let index = pick % records.len();
            let id = records[index].id.clone();
            let plan = sequencer.plan_move(&records, &id, direction).unwrap();
            records = apply_assignments(&records, &plan.renumber);
            if let MoveOutcome::Moved { id, ordinal } = plan.outcome {
                records = apply_assignments(&records, &[Assignment { id, ordinal }]);
                match direction {
                    Direction::Up => expected.swap(index, index - 1),
                    Direction::Down => expected.swap(index, index + 1),
                }
            } else {
                let boundary = match direction {
                    Direction::Up => index == 0,
                    Direction::Down => index + 1 == records.len(),
                };
                prop_assert!(boundary, "No-op only at the ends of the list");
            }
            prop_assert_eq!(ids(&records), expected.clone());
            prop_assert!(strictly_increasing(&records));
        }
    }

    #[test]
    fn insert_lands_at_requested_index(
        count in 0_usize..8,
        gap in 2_i64..6,
        inserts in proptest::collection::vec(0_usize..10, 1..20),
    ) {
        let sequencer = Sequencer::new(gap);
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut records = seeded(count, gap);

        for (n, target) in inserts.into_iter().enumerate() {
            let plan = sequencer.plan_insert(&records, target).unwrap();
            records = apply_assignments(&records, &plan.renumber);
            let new = NewRecord::new(GroupKey::category(), format!("new{n}"))
                .into_record(plan.ordinal, now);
            let new_id = new.id.clone();
            let mut with_new = records.clone();
            with_new.push(new);
            records = apply_assignments(&with_new, &[]);

            let landed = records.iter().position(|r| r.id == new_id).unwrap();
            prop_assert_eq!(landed, target.min(records.len() - 1));
            prop_assert!(strictly_increasing(&records));
        }
    }

    #[test]
    fn renumber_preserves_order(ordinals in proptest::collection::vec(-1000_i64..1000, 0..20)) {
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let mut records: Vec<OrderedRecord> = ordinals
            .into_iter()
            .enumerate()
            .map(|(i, o)| NewRecord::new(GroupKey::category(), format!("r{i}")).into_record(o, now))
            .collect();
        ordo::record::sort_records(&mut records);
        let before = ids(&records);

        let sequencer = Sequencer::default();
        let renumbered = apply_assignments(&records, &sequencer.renumber(&records));
        prop_assert_eq!(ids(&renumbered), before);
        prop_assert!(strictly_increasing(&renumbered));
        if let Some(first) = renumbered.first() {
            prop_assert_eq!(first.ordinal, sequencer.gap());
        }
    }
}
