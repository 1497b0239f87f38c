use async_trait::async_trait;
use common::{AppError, AppResult};
use orm::entities::{
    AppAccountUser, AppPaymentRecord, AppPaymentRefund, AppPaymentTransfer, PaymentLedger,
};
use rbatis::RBatis;
use rbs::Value;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::channel::TransferChannel;
use crate::pool::Pool;
use crate::store::{AccountStore, LedgerStore, OrderStore, SumFilter, TransferStore};

/// 求和查询的单行结果
#[derive(Debug, Deserialize)]
struct SumRow {
    v: Option<Decimal>,
}

fn last_insert_id(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_u64().map(|v| v as i64))
}

/// 基于 rbatis 的资金流水存储
pub struct DbLedgerStore {
    rb: Arc<RBatis>,
}

impl DbLedgerStore {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }
}

#[async_trait]
impl LedgerStore for DbLedgerStore {
    async fn find(&self, pool: Pool, unid: i64, code: &str) -> AppResult<Option<PaymentLedger>> {
        let sql = format!(
            "select * from {} where unid = ? and code = ? and deleted = 0 limit 1",
            pool.table()
        );
        let rows: Vec<PaymentLedger> = self
            .rb
            .query_decode(&sql, vec![rbs::to_value!(unid), rbs::to_value!(code)])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_by_code(&self, pool: Pool, code: &str) -> AppResult<Option<PaymentLedger>> {
        let sql = format!(
            "select * from {} where code = ? and deleted = 0 limit 1",
            pool.table()
        );
        let rows: Vec<PaymentLedger> = self
            .rb
            .query_decode(&sql, vec![rbs::to_value!(code)])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn save(&self, pool: Pool, entry: &PaymentLedger) -> AppResult<PaymentLedger> {
        if let Some(id) = entry.id {
            let sql = format!(
                "update {} set unid = ?, code = ?, name = ?, amount = ?, remark = ?, \
                 `unlock` = ?, unlock_time = ?, cancel = ?, cancel_time = ?, \
                 deleted = ?, deleted_time = ? where id = ?",
                pool.table()
            );
            self.rb
                .exec(
                    &sql,
                    vec![
                        rbs::to_value!(entry.unid),
                        rbs::to_value!(&entry.code),
                        rbs::to_value!(&entry.name),
                        rbs::to_value!(entry.amount),
                        rbs::to_value!(&entry.remark),
                        rbs::to_value!(entry.unlock),
                        rbs::to_value!(&entry.unlock_time),
                        rbs::to_value!(entry.cancel),
                        rbs::to_value!(&entry.cancel_time),
                        rbs::to_value!(entry.deleted),
                        rbs::to_value!(&entry.deleted_time),
                        rbs::to_value!(id),
                    ],
                )
                .await?;
            Ok(entry.clone())
        } else {
            let sql = format!(
                "insert into {} (unid, code, name, amount, remark, `unlock`, unlock_time, \
                 cancel, cancel_time, deleted, deleted_time, create_time) \
                 values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                pool.table()
            );
            let result = self
                .rb
                .exec(
                    &sql,
                    vec![
                        rbs::to_value!(entry.unid),
                        rbs::to_value!(&entry.code),
                        rbs::to_value!(&entry.name),
                        rbs::to_value!(entry.amount),
                        rbs::to_value!(&entry.remark),
                        rbs::to_value!(entry.unlock),
                        rbs::to_value!(&entry.unlock_time),
                        rbs::to_value!(entry.cancel),
                        rbs::to_value!(&entry.cancel_time),
                        rbs::to_value!(entry.deleted),
                        rbs::to_value!(&entry.deleted_time),
                        rbs::to_value!(&entry.create_time),
                    ],
                )
                .await?;
            if result.rows_affected == 0 {
                return Err(AppError::DataPersistenceFailed("流水写入失败".to_string()));
            }
            let mut saved = entry.clone();
            saved.id = last_insert_id(&result.last_insert_id);
            Ok(saved)
        }
    }

    async fn sum(&self, pool: Pool, unid: Option<i64>, filter: SumFilter) -> AppResult<Decimal> {
        let mut sql = format!(
            "select ifnull(sum(amount), 0) as v from {} where cancel = 0 and deleted = 0",
            pool.table()
        );
        let mut args = Vec::new();
        if let Some(unid) = unid {
            sql.push_str(" and unid = ?");
            args.push(rbs::to_value!(unid));
        }
        match filter {
            SumFilter::Active => {}
            SumFilter::Locked => sql.push_str(" and `unlock` = 0"),
            SumFilter::Outgoing => sql.push_str(" and amount < 0 and `unlock` = 1"),
            SumFilter::Incoming => sql.push_str(" and amount > 0"),
        }
        let rows: Vec<SumRow> = self.rb.query_decode(&sql, args).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.v)
            .unwrap_or(Decimal::ZERO))
    }
}

/// 基于 rbatis 的账户存储
pub struct DbAccountStore {
    rb: Arc<RBatis>,
}

impl DbAccountStore {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }
}

#[async_trait]
impl AccountStore for DbAccountStore {
    async fn exists(&self, unid: i64) -> AppResult<bool> {
        let user = AppAccountUser::select_by_id(self.rb.as_ref(), unid).await?;
        Ok(user.is_some())
    }

    async fn merge_extra(
        &self,
        unid: i64,
        data: &HashMap<String, serde_json::Value>,
    ) -> AppResult<()> {
        let mut user = AppAccountUser::select_by_id(self.rb.as_ref(), unid)
            .await?
            .ok_or(AppError::AccountNotFound(unid))?;

        // 合并到已有附加字段, 保留无关键
        let mut extra = user
            .extra
            .take()
            .and_then(|raw| {
                serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw).ok()
            })
            .unwrap_or_default();
        for (key, value) in data {
            extra.insert(key.clone(), value.clone());
        }
        user.extra = Some(serde_json::to_string(&extra)?);

        AppAccountUser::update_by_map(self.rb.as_ref(), &user, rbs::value! {"id": unid}).await?;
        Ok(())
    }
}

/// 基于 rbatis 的提现订单存储
pub struct DbTransferStore {
    rb: Arc<RBatis>,
}

impl DbTransferStore {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }
}

#[async_trait]
impl TransferStore for DbTransferStore {
    async fn list_pending(&self) -> AppResult<Vec<AppPaymentTransfer>> {
        let [banks, wallet] = TransferChannel::ONLINE_CODES;
        let jobs: Vec<AppPaymentTransfer> = self
            .rb
            .query_decode(
                "select * from app_payment_transfer \
                 where `type` in (?, ?) and status in (3, 4) order by id asc",
                vec![rbs::to_value!(banks), rbs::to_value!(wallet)],
            )
            .await?;
        Ok(jobs)
    }

    async fn update(&self, job: &AppPaymentTransfer) -> AppResult<()> {
        let id = job
            .id
            .ok_or_else(|| AppError::DataPersistenceFailed("提现订单缺少主键".to_string()))?;
        AppPaymentTransfer::update_by_map(self.rb.as_ref(), job, rbs::value! {"id": id}).await?;
        Ok(())
    }

    async fn sum_in_status(&self, unid: Option<i64>, statuses: &[i32]) -> AppResult<Decimal> {
        if statuses.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let placeholders = vec!["?"; statuses.len()].join(", ");
        let mut sql = format!(
            "select ifnull(sum(amount), 0) as v from app_payment_transfer where status in ({})",
            placeholders
        );
        let mut args: Vec<Value> = statuses.iter().map(|s| rbs::to_value!(*s)).collect();
        if let Some(unid) = unid {
            sql.push_str(" and unid = ?");
            args.push(rbs::to_value!(unid));
        }
        let rows: Vec<SumRow> = self.rb.query_decode(&sql, args).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.v)
            .unwrap_or(Decimal::ZERO))
    }
}

/// 基于 rbatis 的支付记录/退款单存储
pub struct DbOrderStore {
    rb: Arc<RBatis>,
}

impl DbOrderStore {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }
}

#[async_trait]
impl OrderStore for DbOrderStore {
    async fn find_record(&self, code: &str) -> AppResult<Option<AppPaymentRecord>> {
        Ok(AppPaymentRecord::select_by_code(self.rb.as_ref(), code).await?)
    }

    async fn update_record(&self, record: &AppPaymentRecord) -> AppResult<()> {
        let id = record
            .id
            .ok_or_else(|| AppError::DataPersistenceFailed("支付记录缺少主键".to_string()))?;
        AppPaymentRecord::update_by_map(self.rb.as_ref(), record, rbs::value! {"id": id}).await?;
        Ok(())
    }

    async fn find_refund(&self, code: &str) -> AppResult<Option<AppPaymentRefund>> {
        Ok(AppPaymentRefund::select_by_code(self.rb.as_ref(), code).await?)
    }

    async fn save_refund(&self, refund: &AppPaymentRefund) -> AppResult<AppPaymentRefund> {
        match refund.id {
            Some(id) => {
                AppPaymentRefund::update_by_map(self.rb.as_ref(), refund, rbs::value! {"id": id})
                    .await?;
                Ok(refund.clone())
            }
            None => {
                let result = AppPaymentRefund::insert(self.rb.as_ref(), refund).await?;
                if result.rows_affected == 0 {
                    return Err(AppError::DataPersistenceFailed("退款单写入失败".to_string()));
                }
                let mut saved = refund.clone();
                saved.id = last_insert_id(&result.last_insert_id);
                Ok(saved)
            }
        }
    }
}
