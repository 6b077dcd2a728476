// 並行処理ツアー
// パイプライン・多重化ディスパッチ・周期ティッカー・アトミックカウンターを順に実行する

use anyhow::Result;
use conc_pipeline::{
    run_periodic, AtomicCounter, BoundedQueue, ConsoleProgressReporter, DefaultPipelineConfig,
    DelayedTransform, MemoryResultSink, Multiplexed, Multiplexer, PipelineEngine,
    ScaleTransform,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== 1. Producer → Worker Pool → Collector ===");
    demonstrate_pipeline().await?;

    println!("\n=== 2. 多重化ディスパッチとタイムアウト ===");
    demonstrate_multiplex().await;

    println!("\n=== 3. 周期ティッカー ===");
    demonstrate_ticker().await;

    println!("\n=== 4. アトミックカウンター ===");
    demonstrate_counter().await?;

    Ok(())
}

// 20件を3ワーカー・容量10のキューで処理し、5件ごとに進捗を出す
async fn demonstrate_pipeline() -> Result<()> {
    let config = DefaultPipelineConfig::default()
        .with_worker_count(3)
        .with_queue_capacity(10)
        .with_progress_interval(5)
        .with_producer_delay(Duration::from_millis(10));

    let engine = PipelineEngine::new(
        DelayedTransform::new(ScaleTransform::default(), Duration::from_millis(50)),
        config,
        ConsoleProgressReporter::new(),
        MemoryResultSink::new(),
    )
    .with_payload(|id| (id * 37 % 100) as f64);

    let summary = engine.run(20).await?;
    println!(
        "  平均値: {:.2}（{}件をシンクに保存）",
        summary.average_value(),
        engine.sink().stored_count()
    );
    println!("  {}", serde_json::to_string(&summary)?);

    Ok(())
}

// 信号Aは100ms後、信号Bは200ms後に届く。待ち時間は50msなので途中でタイムアウトも起こる
async fn demonstrate_multiplex() {
    let signal_a = Arc::new(BoundedQueue::<&'static str>::new(1));
    let signal_b = Arc::new(BoundedQueue::<&'static str>::new(1));

    for (queue, delay, message) in [
        (Arc::clone(&signal_a), 100, "信号 A"),
        (Arc::clone(&signal_b), 200, "信号 B"),
    ] {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            queue.put(message).await;
        });
    }

    let multiplexer = Multiplexer::<&'static str>::new(Duration::from_millis(50))
        .with_source(signal_a.as_ref())
        .with_source(signal_b.as_ref());

    let mut received = 0;
    while received < 2 {
        match multiplexer.next().await {
            Multiplexed::Event {
                source,
                value: Some(message),
            } => {
                received += 1;
                println!("  📨 受信 (source {source}): {message}");
            }
            Multiplexed::Event { source, value: None } => {
                println!("  🔌 source {source} は枯渇しました");
                break;
            }
            Multiplexed::TimedOut => println!("  🚨 応答タイムアウト"),
        }
    }
}

// 100msごとに打刻し、450ms後にキャンセルする
async fn demonstrate_ticker() {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(450)).await;
            cancel.cancel();
        });
    }

    println!("  ティッカー開始...");
    let ticks = run_periodic(Duration::from_millis(100), &cancel, |n, _| {
        println!(
            "  ⏰ 打刻 #{n}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f")
        );
    })
    .await;
    println!("  🛑 定期処理停止（{ticks}回）");
}

// 100回のいいねと10回の取り消しを並行に実行する
async fn demonstrate_counter() -> Result<()> {
    let counter = Arc::new(AtomicCounter::new(0));
    let up_count = Arc::new(AtomicCounter::new(0));
    let down_count = Arc::new(AtomicCounter::new(0));

    let mut handles = Vec::new();
    for _ in 0..100 {
        let (counter, up_count) = (Arc::clone(&counter), Arc::clone(&up_count));
        handles.push(tokio::spawn(async move {
            counter.increment();
            up_count.increment();
        }));
    }
    for _ in 0..10 {
        let (counter, down_count) = (Arc::clone(&counter), Arc::clone(&down_count));
        handles.push(tokio::spawn(async move {
            counter.decrement();
            down_count.increment();
        }));
    }

    for handle in handles {
        handle.await?;
    }

    println!(
        "  集計 -> いいね: {}回, 取り消し: {}回, 最終値: {}",
        up_count.value(),
        down_count.value(),
        counter.value()
    );
    Ok(())
}
