//! 数据速率
//!
//! 以 bit/s 表示的链路/发送速率，支持 `"100Mbps"`、`"1Mb/s"`、`"10kbps"`、`"2Gb/s"`、
//! `"500B/s"` 及纯数字（bps）这些写法。

use crate::sim::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 数据速率（bit/s）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DataRate(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid data rate `{0}`")]
pub struct ParseDataRateError(pub String);

impl DataRate {
    pub fn from_mbps(mbps: u64) -> Self {
        DataRate(mbps.saturating_mul(1_000_000))
    }

    pub fn bps(self) -> u64 {
        self.0
    }

    /// 以该速率发送 `bytes` 字节所需的时间：ceil(bytes*8 / bps) 秒 -> 纳秒
    pub fn tx_time(self, bytes: u32) -> SimTime {
        if self.0 == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bps = self.0 as u128;
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128) + (bps - 1)) / bps;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}

impl FromStr for DataRate {
    type Err = ParseDataRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDataRateError(s.to_string());
        let t = s.trim();
        let split = t
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(t.len());
        let (num, unit) = t.split_at(split);
        let value: f64 = num.parse().map_err(|_| err())?;

        let (scale, rest) = match unit.chars().next() {
            Some('k' | 'K') => (1e3, &unit[1..]),
            Some('M') => (1e6, &unit[1..]),
            Some('G') => (1e9, &unit[1..]),
            _ => (1.0, unit),
        };
        let bits_per_unit = match rest {
            "" | "bps" | "b/s" => 1.0,
            "Bps" | "B/s" => 8.0,
            _ => return Err(err()),
        };

        let bps = value * scale * bits_per_unit;
        if !bps.is_finite() || bps < 0.0 || bps > u64::MAX as f64 {
            return Err(err());
        }
        Ok(DataRate(bps.round() as u64))
    }
}

impl TryFrom<String> for DataRate {
    type Error = ParseDataRateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DataRate> for String {
    fn from(r: DataRate) -> Self {
        r.to_string()
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bps = self.0;
        if bps != 0 && bps % 1_000_000_000 == 0 {
            write!(f, "{}Gbps", bps / 1_000_000_000)
        } else if bps != 0 && bps % 1_000_000 == 0 {
            write!(f, "{}Mbps", bps / 1_000_000)
        } else if bps != 0 && bps % 1_000 == 0 {
            write!(f, "{}kbps", bps / 1_000)
        } else {
            write!(f, "{}bps", bps)
        }
    }
}
