use futures::StreamExt;
use integration_test_utils::{init_logging, recording};
use memory_grid::{MemoryGrid, MemoryGridConfig};
use rx_grid::RxGrid;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn slow_grid() -> (Arc<MemoryGrid>, RxGrid<MemoryGrid>) {
    init_logging();
    let instance = Arc::new(
        MemoryGrid::start(
            MemoryGridConfig::default()
                .with_name("slow")
                .with_latency(Duration::from_millis(50)),
        )
        .unwrap(),
    );
    (instance.clone(), RxGrid::from_instance(instance))
}

#[tokio::test]
async fn unsubscribe_before_execution_skips_the_operation() {
    let (instance, grid) = slow_grid();
    let counter = grid.get_atomic_long("skipped");

    let (observer, record) = recording();
    let subscription = counter.increment_and_get().subscribe(observer);
    subscription.unsubscribe();

    assert_eq!(counter.get().first().await, Ok(Some(0)));
    assert!(record.signals().is_empty());
    assert_eq!(instance.invocation_count(), 2);
    assert_eq!(instance.cancelled_invocation_count(), 1);
}

#[tokio::test]
async fn dropping_the_stream_unsubscribes() {
    let (instance, grid) = slow_grid();
    let counter = grid.get_atomic_long("dropped");

    let stream = counter.add_and_get(5).to_stream();
    let subscription = stream.subscription().clone();
    drop(stream);

    assert!(subscription.is_unsubscribed());
    assert_eq!(counter.get().first().await, Ok(Some(0)));
    assert_eq!(instance.cancelled_invocation_count(), 1);
}

#[tokio::test]
async fn unsubscribe_after_completion_has_no_effect() {
    let (instance, grid) = slow_grid();
    let counter = grid.get_atomic_long("late");

    let mut stream = counter.increment_and_get().to_stream();
    assert_eq!(stream.next().await, Some(Ok(1)));
    assert_eq!(stream.next().await, None);

    stream.subscription().unsubscribe();
    assert!(stream.subscription().is_terminated());
    assert!(!stream.subscription().is_unsubscribed());
    assert_eq!(instance.cancelled_invocation_count(), 0);
}

#[test]
fn observe_on_delivers_on_the_given_runtime() {
    init_logging();
    let instance = Arc::new(MemoryGrid::start(MemoryGridConfig::default()).unwrap());
    let grid = RxGrid::from_instance(instance);
    let delivery = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("observer-pool")
        .build()
        .unwrap();

    let (sender, receiver) = std::sync::mpsc::channel();
    struct ThreadProbe(std::sync::mpsc::Sender<(Option<i64>, Option<String>)>);
    impl rx_grid::Observer<i64> for ThreadProbe {
        fn on_next(&mut self, value: i64) {
            let name = thread::current().name().map(str::to_string);
            let _ = self.0.send((Some(value), name));
        }
        fn on_error(&mut self, _error: rx_grid::GridError) {}
        fn on_completed(&mut self) {
            let name = thread::current().name().map(str::to_string);
            let _ = self.0.send((None, name));
        }
    }

    grid.get_atomic_long("scheduled")
        .add_and_get(2)
        .observe_on(delivery.handle().clone())
        .subscribe(ThreadProbe(sender));

    let next = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    let completed = receiver.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(next, (Some(2), Some("observer-pool".to_string())));
    assert_eq!(completed, (None, Some("observer-pool".to_string())));
}

#[test]
fn without_observe_on_signals_arrive_on_the_grid_thread() {
    init_logging();
    let instance = Arc::new(
        MemoryGrid::start(MemoryGridConfig::default().with_name("owner")).unwrap(),
    );
    let grid = RxGrid::from_instance(instance);

    let (sender, receiver) = std::sync::mpsc::channel();
    struct NameProbe(std::sync::mpsc::Sender<Option<String>>);
    impl rx_grid::Observer<i64> for NameProbe {
        fn on_next(&mut self, _value: i64) {
            let _ = self.0.send(thread::current().name().map(str::to_string));
        }
        fn on_error(&mut self, _error: rx_grid::GridError) {}
        fn on_completed(&mut self) {}
    }

    grid.get_atomic_long("unscheduled")
        .get()
        .subscribe(NameProbe(sender));
    assert_eq!(
        receiver.recv_timeout(Duration::from_secs(5)).unwrap(),
        Some("owner-io".to_string())
    );
}
