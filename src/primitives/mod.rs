// 並行処理プリミティブ
// キュー、カウンター、多重化ディスパッチ、周期ティッカー

pub mod counter;
pub mod multiplex;
pub mod queue;
pub mod ticker;

// 公開API
pub use counter::AtomicCounter;
pub use multiplex::{multiplex, EventSource, Multiplexed, Multiplexer};
pub use queue::BoundedQueue;
pub use ticker::{run_periodic, PeriodicTicker};
