//! 统计信息
//!
//! 网络级汇总计数与每个单向信道的被动计数器。

use serde::Serialize;

/// 网络统计信息
#[derive(Debug, Default, Clone, Serialize)]
pub struct Stats {
    pub sent_pkts: u64,
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    pub dropped_pkts: u64,
    pub dropped_bytes: u64,
}

/// 单向信道计数器（字节为链路上的总字节数）
#[derive(Debug, Default, Clone, Serialize)]
pub struct ChannelStats {
    pub tx_pkts: u64,
    pub tx_bytes: u64,
    pub rx_pkts: u64,
    pub rx_bytes: u64,
    pub dropped_pkts: u64,
    pub dropped_bytes: u64,
    /// 信道处于序列化发送状态的累计时间（纳秒）
    pub busy_ns: u64,
    /// 观察到的最大排队字节数
    pub max_queue_bytes: u64,
}

impl ChannelStats {
    /// 在 `window_ns` 内的利用率，上限为 1
    pub fn utilization(&self, window_ns: u64) -> f64 {
        if window_ns == 0 {
            return 0.0;
        }
        (self.busy_ns as f64 / window_ns as f64).min(1.0)
    }
}
