//! End-to-end drag scenarios against the in-memory system of record

use clientdesk_board::{
    builtin_lane_table, Board, BoardError, DragEnd, DragTarget, FailureKind, InMemoryGateway,
    Lane, MoveCommit, Notice, Point, PointerEvent, Task, TaskId,
};
use std::sync::Arc;

fn id(s: &str) -> TaskId {
    TaskId::from_string(s)
}

fn setup(tasks: Vec<Task>) -> (Board, Arc<InMemoryGateway>) {
    let gateway = Arc::new(InMemoryGateway::new(tasks.clone()).unwrap());
    let board = Board::with_gateway(tasks, builtin_lane_table(), gateway.clone()).unwrap();
    (board, gateway)
}

fn lane_ids(board: &Board, lane: Lane) -> Vec<String> {
    board
        .store()
        .tasks_by_lane(lane)
        .map(|t| t.id.to_string())
        .collect()
}

fn lane_ranks(board: &Board, lane: Lane) -> Vec<u32> {
    board.store().tasks_by_lane(lane).map(|t| t.rank).collect()
}

fn press(board: &mut Board, task: &str) -> Result<Option<DragEnd>, BoardError> {
    board.handle(PointerEvent::Press {
        task: id(task),
        at: Point::new(100.0, 100.0),
    })
}

fn hover(board: &mut Board, target: DragTarget) {
    board
        .handle(PointerEvent::Move {
            at: Point::new(140.0, 120.0),
            over: Some(target),
        })
        .unwrap();
}

fn release(board: &mut Board, target: DragTarget) -> Option<DragEnd> {
    board
        .handle(PointerEvent::Release { over: Some(target) })
        .unwrap()
}

/// Backlog=[T1,T2], Todo=[]; drag T1 to Todo index 0
#[tokio::test]
async fn test_drag_across_lanes_commits_triple() {
    let (mut board, gateway) = setup(vec![
        Task::new("T1", "One", Lane::Backlog).with_rank(0),
        Task::new("T2", "Two", Lane::Backlog).with_rank(1),
    ]);

    press(&mut board, "T1").unwrap();
    hover(&mut board, DragTarget::lane(Lane::Todo));
    let ended = release(&mut board, DragTarget::lane(Lane::Todo));
    assert_eq!(ended, Some(DragEnd::Dropped { committed: true }));

    // Optimistic state is visible before the commit lands
    assert_eq!(lane_ids(&board, Lane::Backlog), vec!["T2"]);
    assert_eq!(lane_ranks(&board, Lane::Backlog), vec![0]);
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["T1"]);
    assert_eq!(lane_ranks(&board, Lane::Todo), vec![0]);
    assert_eq!(board.pending_commits(), 1);

    board.settle().await;
    assert_eq!(
        gateway.received().await,
        vec![MoveCommit::new("T1", Lane::Todo, 0)]
    );
    assert_eq!(&gateway.authoritative().await, board.store());
}

/// InProgress=[T3,T4,T5]; drag T5 to index 0
#[tokio::test]
async fn test_drag_within_lane_reorders() {
    let (mut board, gateway) = setup(vec![
        Task::new("T3", "Three", Lane::InProgress).with_rank(0),
        Task::new("T4", "Four", Lane::InProgress).with_rank(1),
        Task::new("T5", "Five", Lane::InProgress).with_rank(2),
    ]);

    press(&mut board, "T5").unwrap();
    hover(&mut board, DragTarget::task("T3"));
    release(&mut board, DragTarget::task("T3"));

    assert_eq!(lane_ids(&board, Lane::InProgress), vec!["T5", "T3", "T4"]);
    assert_eq!(lane_ranks(&board, Lane::InProgress), vec![0, 1, 2]);

    board.settle().await;
    assert_eq!(
        gateway.received().await,
        vec![MoveCommit::new("T5", Lane::InProgress, 0)]
    );
}

/// Scenario 1 with a network failure: the reload restores the original order
#[tokio::test]
async fn test_network_failure_reloads_authoritative_state() {
    let (mut board, gateway) = setup(vec![
        Task::new("T1", "One", Lane::Backlog).with_rank(0),
        Task::new("T2", "Two", Lane::Backlog).with_rank(1),
    ]);
    let before = board.store().clone();
    gateway.fail_next_commit(FailureKind::Network).await;

    press(&mut board, "T1").unwrap();
    hover(&mut board, DragTarget::lane(Lane::Todo));
    release(&mut board, DragTarget::lane(Lane::Todo));
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["T1"]);

    board.settle().await;

    assert_eq!(lane_ids(&board, Lane::Backlog), vec!["T1", "T2"]);
    assert!(lane_ids(&board, Lane::Todo).is_empty());
    assert_eq!(board.store(), &before);
    assert_eq!(board.store(), &gateway.authoritative().await);

    let notices = board.take_notices();
    assert!(matches!(
        notices.as_slice(),
        [Notice::CommitFailed { reloaded: true, .. }]
    ));
}

/// Blocked=[T7]; drop T7 at index 5 of an empty Completed lane
#[tokio::test]
async fn test_drop_into_empty_lane_clamps() {
    let (mut board, gateway) = setup(vec![Task::new("T7", "Seven", Lane::Blocked)]);

    let commit = tokio_test::assert_ok!(board.move_task(&id("T7"), Lane::Completed, 5));
    assert!(commit.is_some());
    assert_eq!(lane_ids(&board, Lane::Completed), vec!["T7"]);
    assert_eq!(lane_ranks(&board, Lane::Completed), vec![0]);
    assert!(lane_ids(&board, Lane::Blocked).is_empty());

    board.settle().await;
    assert_eq!(
        gateway.received().await,
        vec![MoveCommit::new("T7", Lane::Completed, 0)]
    );
}

/// A second drag while one is active is rejected and leaves the first intact
#[tokio::test]
async fn test_second_drag_is_rejected() {
    let (mut board, _gateway) = setup(vec![
        Task::new("T1", "One", Lane::Backlog).with_rank(0),
        Task::new("T2", "Two", Lane::Backlog).with_rank(1),
    ]);

    press(&mut board, "T1").unwrap();
    hover(&mut board, DragTarget::lane(Lane::Todo));
    let state_before = board.drag_state().clone();
    let store_before = board.store().clone();

    let err = press(&mut board, "T2").unwrap_err();
    assert!(matches!(err, BoardError::DragInProgress { ref active } if active == &id("T1")));
    assert_eq!(board.drag_state(), &state_before);
    assert_eq!(board.store(), &store_before);

    // The original session still completes normally
    let ended = release(&mut board, DragTarget::lane(Lane::Todo));
    assert_eq!(ended, Some(DragEnd::Dropped { committed: true }));
}

#[tokio::test]
async fn test_drop_outside_restores_snapshot() {
    let (mut board, gateway) = setup(vec![
        Task::new("T1", "One", Lane::Backlog).with_rank(0),
        Task::new("T2", "Two", Lane::Backlog).with_rank(1),
        Task::new("T3", "Three", Lane::Todo).with_rank(0),
    ]);
    let before = board.store().clone();

    press(&mut board, "T2").unwrap();
    hover(&mut board, DragTarget::task("T3"));
    hover(&mut board, DragTarget::lane(Lane::InReview));
    let ended = board.handle(PointerEvent::Release { over: None }).unwrap();

    assert_eq!(ended, Some(DragEnd::Cancelled));
    assert_eq!(board.store(), &before);
    assert_eq!(board.pending_commits(), 0);
    assert!(gateway.received().await.is_empty());
}

#[tokio::test]
async fn test_new_drag_while_commit_in_flight() {
    let (mut board, gateway) = setup(vec![
        Task::new("T1", "One", Lane::Backlog).with_rank(0),
        Task::new("T2", "Two", Lane::Backlog).with_rank(1),
    ]);

    press(&mut board, "T1").unwrap();
    hover(&mut board, DragTarget::lane(Lane::Todo));
    release(&mut board, DragTarget::lane(Lane::Todo));

    press(&mut board, "T2").unwrap();
    hover(&mut board, DragTarget::task("T1"));
    release(&mut board, DragTarget::task("T1"));

    assert_eq!(lane_ids(&board, Lane::Todo), vec!["T2", "T1"]);
    board.settle().await;

    assert_eq!(gateway.received().await.len(), 2);
    assert_eq!(&gateway.authoritative().await, board.store());
    assert_eq!(board.activity().count(), 2);
}

#[tokio::test]
async fn test_column_index_tracks_every_change() {
    let (mut board, _gateway) = setup(vec![
        Task::new("T1", "One", Lane::Backlog).with_rank(0),
        Task::new("T2", "Two", Lane::Backlog).with_rank(1),
    ]);

    press(&mut board, "T2").unwrap();
    hover(&mut board, DragTarget::lane(Lane::Blocked));
    assert_eq!(
        board.column_index().task_ids(Lane::Blocked),
        vec![&id("T2")]
    );

    board.handle(PointerEvent::Cancel).unwrap();
    assert!(board.column_index().task_ids(Lane::Blocked).is_empty());
    assert_eq!(board.column_index().total(), 2);
}
