// PeriodicTicker - 停止可能な周期ティッカー

use super::multiplex::EventSource;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// 一定間隔でティックを発行するティッカー
///
/// 最初のティックは作成から1間隔後。受信側が遅れた分のティックは
/// まとめて発行せずスキップする。
///
/// `stop`は終端状態への遷移で、何度呼んでも安全。`stop`が返った後に
/// `tick`がティックを返すことはなく、内部のタイマーは解放される。
/// dropでも停止する。
#[derive(Debug)]
pub struct PeriodicTicker {
    period: Duration,
    // None = タイマー解放済み
    interval: Mutex<Option<Interval>>,
    stopped: CancellationToken,
}

impl PeriodicTicker {
    /// # Panics
    ///
    /// `period`が0の場合
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "PeriodicTicker period must be non-zero");
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            period,
            interval: Mutex::new(Some(interval)),
            stopped: CancellationToken::new(),
        }
    }

    /// 次のティックを待つ。停止済みなら即座に`None`
    ///
    /// 同じイテレーションで停止とティックが同時に準備完了の場合は停止を優先する。
    pub async fn tick(&self) -> Option<Instant> {
        if self.stopped.is_cancelled() {
            return None;
        }

        let mut guard = tokio::select! {
            biased;
            _ = self.stopped.cancelled() => return None,
            guard = self.interval.lock() => guard,
        };

        let fired = match guard.as_mut() {
            Some(interval) => tokio::select! {
                biased;
                _ = self.stopped.cancelled() => None,
                instant = interval.tick() => Some(instant),
            },
            None => return None,
        };

        if fired.is_none() {
            guard.take();
        }
        fired
    }

    /// ティッカーを停止する
    pub fn stop(&self) {
        self.stopped.cancel();
        // tick実行中でロックが取れない場合は、そのtickが停止を観測して解放する
        if let Ok(mut guard) = self.interval.try_lock() {
            guard.take();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.is_cancelled()
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for PeriodicTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[async_trait]
impl EventSource<Instant> for PeriodicTicker {
    async fn next_event(&self) -> Option<Instant> {
        self.tick().await
    }
}

/// ティッカーを所有する周期実行ループ
///
/// 各イテレーションで{キャンセル, ティック}の二つのソースを多重化して待つ。
/// [`multiplex`](crate::primitives::multiplex)は同時準備完了時の選択順を規定しないので、
/// ここではbiasedな`select!`でキャンセルを常に先に見る。タイムアウトは持たない。
/// キャンセルされるとティッカーを停止してループを抜ける。ティッカーは
/// このループが所有するため、panicを含むどの経路で抜けても停止される。
/// 戻り値はディスパッチしたティック数。
pub async fn run_periodic<F>(period: Duration, cancel: &CancellationToken, mut on_tick: F) -> u64
where
    F: FnMut(u64, Instant),
{
    let ticker = PeriodicTicker::new(period);
    let mut ticks = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                ticker.stop();
                break;
            }
            tick = ticker.tick() => match tick {
                Some(at) => {
                    ticks += 1;
                    on_tick(ticks, at);
                }
                None => break,
            },
        }
    }

    ticks
}
