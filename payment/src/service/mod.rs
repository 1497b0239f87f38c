// 业务服务层

pub mod integral;
pub mod ledger;
pub mod notify;
pub mod refund;
pub mod settlement;
pub mod transfer;

pub use ledger::{Aggregate, LedgerService};
pub use notify::{NotifyAck, NotifyService, RefundCompensator};
pub use refund::RefundService;
pub use settlement::{SettlementService, TransSummary, TransferStatus};
pub use transfer::{TransferAmount, TransferService};
