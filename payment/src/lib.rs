// 支付资产核心模块
// 余额/积分流水账、提现打款处理、支付通知对账

pub mod channel;
pub mod gateway;
pub mod job;
pub mod pool;
pub mod service;
pub mod store;

pub use channel::TransferChannel;
pub use pool::Pool;
pub use service::{
    Aggregate, LedgerService, NotifyAck, NotifyService, RefundCompensator, RefundService,
    SettlementService, TransSummary, TransferAmount, TransferService, TransferStatus,
};
