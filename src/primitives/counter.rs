// AtomicCounter - ロックフリーの共有カウンター

use std::sync::atomic::{AtomicI64, Ordering};

/// 複数タスクから同時に更新できるカウンター
///
/// 全ての更新はアトミックなfetch_addで行い、読み込み→書き込みの
/// 分離は行わないため更新の消失は起きない。
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicI64,
}

impl AtomicCounter {
    pub fn new(initial: i64) -> Self {
        Self {
            value: AtomicI64::new(initial),
        }
    }

    /// +1して更新後の値を返す
    pub fn increment(&self) -> i64 {
        self.add(1)
    }

    /// -1して更新後の値を返す
    pub fn decrement(&self) -> i64 {
        self.add(-1)
    }

    /// 任意の差分を加えて更新後の値を返す
    pub fn add(&self, delta: i64) -> i64 {
        self.value.fetch_add(delta, Ordering::SeqCst) + delta
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }
}
