pub mod app_payment_record;
pub mod app_payment_refund;
pub mod app_payment_transfer;
pub mod payment_ledger;

pub use app_payment_record::*;
pub use app_payment_refund::*;
pub use app_payment_transfer::*;
pub use payment_ledger::*;
