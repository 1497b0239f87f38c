//! 参考建表语句
//!
//! 表结构由运维侧统一管理, 这里仅随库提供参考 DDL

/// 支付资产相关表的参考建表语句
pub const INSTALL_PAYMENT_SQL: &str = include_str!("payment.sql");
