mod common;

use std::sync::{mpsc, Arc};
use std::time::Duration;

use prism_core::config::DecompositionConfig;
use prism_core::decompose::{split_lab, split_rgb, DecomposeMode};
use prism_core::task::{
    Decomposer, Dispatch, ExecutionPath, InteractionGate, RequestId, TaskState,
};

use common::make_gradient_rgb;

fn make_decomposer(threshold: u64) -> (Decomposer, InteractionGate) {
    let gate = InteractionGate::new();
    let config = DecompositionConfig {
        large_image_threshold: threshold,
    };
    (Decomposer::new(config, gate.clone()), gate)
}

// ---------------------------------------------------------------------------
// Interaction gate
// ---------------------------------------------------------------------------

#[test]
fn test_gate_guard_scoping() {
    let gate = InteractionGate::new();
    assert!(!gate.is_blocked());
    {
        let _guard = gate.acquire();
        assert!(gate.is_blocked());
        assert!(gate.clone().is_blocked());
    }
    assert!(!gate.is_blocked());
    assert_eq!(gate.engagements(), 1);
}

// ---------------------------------------------------------------------------
// Synchronous path
// ---------------------------------------------------------------------------

#[test]
fn test_small_image_runs_synchronously() {
    let (mut decomposer, gate) = make_decomposer(10_000);
    let img = Arc::new(make_gradient_rgb(20, 10));

    match decomposer.request(Arc::clone(&img), DecomposeMode::Rgb).unwrap() {
        Dispatch::Ready(result) => {
            assert_eq!(result.path, ExecutionPath::Synchronous);
            assert_eq!(result.mode, DecomposeMode::Rgb);
            assert_eq!(result.buffer, split_rgb(&img));
        }
        Dispatch::Scheduled(_) => panic!("small image must not be scheduled"),
    }
    assert_eq!(gate.engagements(), 0);
    assert!(!gate.is_blocked());
}

#[test]
fn test_threshold_is_exclusive() {
    // 100 pixels with threshold 100 stays on the calling thread.
    let (mut decomposer, _gate) = make_decomposer(100);
    let img = Arc::new(make_gradient_rgb(10, 10));
    let dispatch = decomposer.request(img, DecomposeMode::Lab).unwrap();
    assert!(matches!(dispatch, Dispatch::Ready(_)));
}

#[test]
fn test_request_ids_increase() {
    let (mut decomposer, _gate) = make_decomposer(10_000);
    let img = Arc::new(make_gradient_rgb(4, 4));
    let ids: Vec<RequestId> = (0..3)
        .map(|_| match decomposer.request(Arc::clone(&img), DecomposeMode::Rgb).unwrap() {
            Dispatch::Ready(r) => r.request,
            Dispatch::Scheduled(t) => t.request(),
        })
        .collect();
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    assert_eq!(format!("{}", RequestId(7)), "#7");
}

// ---------------------------------------------------------------------------
// Background path
// ---------------------------------------------------------------------------

#[test]
fn test_large_image_runs_in_background() {
    let (mut decomposer, gate) = make_decomposer(100);
    let img = Arc::new(make_gradient_rgb(20, 10));

    let task = match decomposer.request(Arc::clone(&img), DecomposeMode::Lab).unwrap() {
        Dispatch::Scheduled(task) => task,
        Dispatch::Ready(_) => panic!("large image must be scheduled"),
    };
    assert_eq!(task.state(), TaskState::Running);
    assert_eq!(task.mode(), DecomposeMode::Lab);
    // Held until the result is delivered.
    assert!(gate.is_blocked());

    let result = task.wait().expect("worker result");
    assert_eq!(result.path, ExecutionPath::Background);
    assert_eq!(result.buffer, split_lab(&img));
    assert!(!gate.is_blocked());
    assert_eq!(gate.engagements(), 1);
}

#[test]
fn test_poll_delivers_exactly_once() {
    let (mut decomposer, gate) = make_decomposer(10);
    let img = Arc::new(make_gradient_rgb(8, 8));
    let (wake_tx, wake_rx) = mpsc::channel();

    let mut task = match decomposer
        .request_with_waker(img, DecomposeMode::Rgb, move || {
            let _ = wake_tx.send(());
        })
        .unwrap()
    {
        Dispatch::Scheduled(task) => task,
        Dispatch::Ready(_) => panic!("expected a background task"),
    };

    wake_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("waker should fire");

    let mut delivered = 0;
    let mut blocked_in_handler = false;
    let handler_gate = gate.clone();
    assert!(task.poll(|result| {
        delivered += 1;
        blocked_in_handler = handler_gate.is_blocked();
        assert_eq!((result.buffer.width(), result.buffer.height()), (24, 8));
    }));
    assert!(!task.poll(|_| delivered += 1));

    assert_eq!(delivered, 1);
    assert!(blocked_in_handler, "gate stays closed until the handler returns");
    assert_eq!(task.state(), TaskState::Done);
    assert!(!gate.is_blocked());
}

#[test]
fn test_poll_before_start_is_noop() {
    let mut task = prism_core::task::DecompositionTask::new(RequestId(1), DecomposeMode::Rgb);
    assert_eq!(task.state(), TaskState::Idle);
    assert!(!task.poll(|_| panic!("nothing to deliver")));
}
