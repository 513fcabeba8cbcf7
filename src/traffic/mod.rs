//! 流量编排与应用
//!
//! 攻击流（On/Off 恒定码率）、合法流（有字节预算的批量发送）与受害者接收端。

mod app;
mod bulk_send;
mod flow;
mod onoff;
pub mod orchestrator;
mod sink;

pub use app::{AppEvent, AppEventKind, AppId, AppStack, Application};
pub use bulk_send::BulkSendApplication;
pub use flow::{FlowBudget, FlowClass, TrafficFlow};
pub use onoff::{OnOffApplication, OnOffConfig};
pub use orchestrator::{AttackSpec, LegitSpec, TrafficOrchestrator, TrafficPlan, TrafficSpec};
pub use sink::{PacketSink, SinkReport, SourceStat};
