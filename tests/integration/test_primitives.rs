// 並行処理プリミティブの統合テスト
// カウンター・多重化ディスパッチ・ティッカーを実際のタスク構成で確認

use conc_pipeline::{
    multiplex, run_periodic, AtomicCounter, BoundedQueue, EventSource, Multiplexed, Multiplexer,
    PeriodicTicker,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_counter_hundred_up_ten_down_is_ninety() {
    for _ in 0..50 {
        let counter = Arc::new(AtomicCounter::new(0));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                counter.increment();
            }));
        }
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                counter.decrement();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(counter.value(), 90);
    }
}

#[tokio::test]
async fn test_multiplex_dispatches_exactly_one_event_per_call() {
    let first = Arc::new(BoundedQueue::<String>::new(4));
    let second = Arc::new(BoundedQueue::<String>::new(4));
    first.put("one".to_string()).await;
    second.put("two".to_string()).await;

    let sources: [&dyn EventSource<String>; 2] = [first.as_ref(), second.as_ref()];

    // 両方準備完了でもどちらか一方だけがディスパッチされ、もう一方は残る
    let mut received = Vec::new();
    for _ in 0..2 {
        match multiplex(&sources, Duration::from_millis(100)).await {
            Multiplexed::Event {
                value: Some(value), ..
            } => received.push(value),
            other => panic!("unexpected dispatch: {other:?}"),
        }
    }
    received.sort();
    assert_eq!(received, vec!["one".to_string(), "two".to_string()]);

    // 何も残っていなければタイムアウトのみ
    assert!(multiplex(&sources, Duration::from_millis(20))
        .await
        .is_timeout());
}

#[tokio::test]
async fn test_select_loop_with_timeout_fallback() {
    let fast = Arc::new(BoundedQueue::<&'static str>::new(1));
    let slow = Arc::new(BoundedQueue::<&'static str>::new(1));

    {
        let fast = Arc::clone(&fast);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            fast.put("fast").await;
        });
    }
    {
        let slow = Arc::clone(&slow);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            slow.put("slow").await;
        });
    }

    let multiplexer = Multiplexer::<&'static str>::new(Duration::from_millis(150))
        .with_source(fast.as_ref())
        .with_source(slow.as_ref());
    assert_eq!(multiplexer.source_count(), 2);

    let mut dispatched = Vec::new();
    let mut timeouts = 0;
    while timeouts == 0 {
        match multiplexer.next().await {
            Multiplexed::Event {
                source,
                value: Some(value),
            } => dispatched.push((source, value)),
            Multiplexed::Event { value: None, .. } => unreachable!("no source is closed"),
            Multiplexed::TimedOut => timeouts += 1,
        }
    }

    assert_eq!(dispatched, vec![(0, "fast"), (1, "slow")]);
}

#[tokio::test]
async fn test_closed_source_reports_exhaustion() {
    let queue = Arc::new(BoundedQueue::<u8>::new(1));
    queue.close();

    let sources: [&dyn EventSource<u8>; 1] = [queue.as_ref()];
    let outcome = multiplex(&sources, Duration::from_secs(1)).await;

    assert_eq!(
        outcome,
        Multiplexed::Event {
            source: 0,
            value: None
        }
    );
}

#[tokio::test]
async fn test_ticker_stop_is_terminal() {
    let ticker = PeriodicTicker::new(Duration::from_millis(5));

    assert!(ticker.tick().await.is_some());
    ticker.stop();
    ticker.stop();

    for _ in 0..3 {
        assert_eq!(
            timeout(Duration::from_millis(50), ticker.tick())
                .await
                .unwrap(),
            None
        );
    }
    assert!(ticker.is_stopped());
}

#[tokio::test]
async fn test_ticker_as_multiplexed_source() {
    let ticker = PeriodicTicker::new(Duration::from_millis(10));
    let sources: [&dyn EventSource<Instant>; 1] = [&ticker];

    let first = multiplex(&sources, Duration::from_millis(500)).await;
    assert!(matches!(
        first,
        Multiplexed::Event {
            source: 0,
            value: Some(_)
        }
    ));

    // 停止したティッカーは枯渇したソースとして即座に準備完了になる
    ticker.stop();
    let after_stop = multiplex(&sources, Duration::from_millis(500)).await;
    assert_eq!(
        after_stop,
        Multiplexed::Event {
            source: 0,
            value: None
        }
    );
}

#[tokio::test]
async fn test_cancellation_token_wins_over_timeout() {
    let done = CancellationToken::new();
    {
        let done = done.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            done.cancel();
        });
    }

    let multiplexer = Multiplexer::<()>::new(Duration::from_millis(5)).with_source(&done);

    let mut timeouts = 0;
    loop {
        match multiplexer.next().await {
            Multiplexed::TimedOut => timeouts += 1,
            Multiplexed::Event { .. } => break,
        }
    }

    assert!(timeouts >= 1);
    assert!(done.is_cancelled());
}

#[tokio::test]
async fn test_run_periodic_stops_on_cancel() {
    let cancel = CancellationToken::new();
    let started = Instant::now();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            cancel.cancel();
        });
    }

    let mut observed = Vec::new();
    let ticks = timeout(
        Duration::from_secs(2),
        run_periodic(Duration::from_millis(10), &cancel, |n, at| {
            observed.push((n, at));
        }),
    )
    .await
    .expect("cancellation must end the loop");

    assert_eq!(ticks as usize, observed.len());
    assert!(ticks >= 2);
    // 最初のティックは1周期後
    assert!(observed[0].1 >= started + Duration::from_millis(10));
    assert!(observed.windows(2).all(|pair| pair[0].1 < pair[1].1));
}
