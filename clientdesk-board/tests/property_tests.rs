//! Property-based tests for the ordering algorithm

use clientdesk_board::{Lane, MoveOutcome, Task, TaskId, TaskStore};
use proptest::prelude::*;

fn lane_strategy() -> impl Strategy<Value = Lane> {
    prop::sample::select(Lane::ALL.to_vec())
}

/// Up to 12 tasks with arbitrary, possibly sparse or duplicated ranks
fn store_strategy() -> impl Strategy<Value = TaskStore> {
    prop::collection::vec((lane_strategy(), 0u32..20), 1..12).prop_map(|entries| {
        let tasks = entries
            .into_iter()
            .enumerate()
            .map(|(i, (lane, rank))| {
                Task::new(format!("T{i}"), format!("Task {i}"), lane).with_rank(rank)
            });
        TaskStore::from_tasks(tasks).unwrap()
    })
}

fn pick(store: &TaskStore, n: usize) -> TaskId {
    let mut ids: Vec<_> = store.iter().map(|t| t.id.clone()).collect();
    ids.sort();
    ids[n % ids.len()].clone()
}

proptest! {
    #[test]
    fn test_density_holds_after_any_moves(
        store in store_strategy(),
        moves in prop::collection::vec((any::<usize>(), lane_strategy(), 0usize..16), 0..30),
    ) {
        let mut store = store;
        prop_assert!(store.check_density().is_ok());
        for (n, lane, index) in moves {
            let id = pick(&store, n);
            store.move_task(&id, lane, index).unwrap();
            prop_assert!(store.check_density().is_ok());
        }
    }

    #[test]
    fn test_move_is_idempotent(
        store in store_strategy(),
        n in any::<usize>(),
        lane in lane_strategy(),
        index in 0usize..16,
    ) {
        let mut store = store;
        let id = pick(&store, n);
        store.move_task(&id, lane, index).unwrap();
        let after_first = store.clone();

        let second = store.move_task(&id, lane, index).unwrap();
        prop_assert_eq!(second, MoveOutcome::Unchanged);
        prop_assert_eq!(store, after_first);
    }

    #[test]
    fn test_index_past_end_appends(
        store in store_strategy(),
        n in any::<usize>(),
        lane in lane_strategy(),
        extra in 0usize..50,
    ) {
        let id = pick(&store, n);
        let len = store.lane_len(lane);

        let mut clamped = store.clone();
        clamped.move_task(&id, lane, len + extra).unwrap();
        let mut appended = store;
        appended.move_task(&id, lane, len).unwrap();

        prop_assert_eq!(clamped, appended);
    }

    #[test]
    fn test_self_move_is_noop(store in store_strategy(), n in any::<usize>()) {
        let mut store = store;
        let id = pick(&store, n);
        let at = store.position(&id).unwrap();
        let before = store.clone();

        prop_assert_eq!(store.move_task(&id, at.lane, at.index).unwrap(), MoveOutcome::Unchanged);
        prop_assert_eq!(store, before);
    }

    #[test]
    fn test_restore_returns_exact_state(
        store in store_strategy(),
        moves in prop::collection::vec((any::<usize>(), lane_strategy(), 0usize..16), 1..10),
    ) {
        let mut store = store;
        let snapshot = store.snapshot();
        let before = store.clone();
        for (n, lane, index) in moves {
            let id = pick(&store, n);
            store.move_task(&id, lane, index).unwrap();
        }
        store.restore(snapshot);
        prop_assert_eq!(store, before);
    }
}
