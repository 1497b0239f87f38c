// 定时任务注册
// 宿主进程创建调度器后在这里挂载周期任务

use common::{AppError, AppResult};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::service::SettlementService;

/// 提现打款定时任务
pub struct TransJob;

impl TransJob {
    /// 默认执行计划: 每分钟一次
    pub const DEFAULT_SCHEDULE: &'static str = "0 * * * * *";

    /// 把打款批处理挂载到调度器
    pub async fn register(
        sched: &JobScheduler,
        service: Arc<SettlementService>,
        schedule: &str,
    ) -> AppResult<()> {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let service = service.clone();
            Box::pin(async move {
                match service.run_once().await {
                    Ok(summary) => {
                        log::info!(
                            "提现打款任务完成: 共 {} 笔, 失败 {} 笔",
                            summary.total,
                            summary.error
                        );
                    }
                    Err(err) => log::error!("提现打款任务执行失败: {}", err),
                }
            })
        })
        .map_err(|e| AppError::business(format!("创建定时任务失败: {}", e)))?;

        sched
            .add(job)
            .await
            .map_err(|e| AppError::business(format!("注册定时任务失败: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ledger::LedgerService;
    use crate::store::memory::{
        MemAccountStore, MemLedgerStore, MemTransferStore, MockGateway, MockPayoutProvider,
    };

    #[tokio::test]
    async fn test_register_accepts_default_schedule() {
        let ledger = Arc::new(MemLedgerStore::new());
        let accounts = Arc::new(MemAccountStore::with_accounts(&[7]));
        let balance = Arc::new(LedgerService::balance(ledger, accounts));
        let service = Arc::new(SettlementService::new(
            Arc::new(MemTransferStore::new()),
            Arc::new(MockGateway::new()),
            Arc::new(MockPayoutProvider::new("wx-app", "openid")),
            balance,
        ));

        let sched = JobScheduler::new().await.unwrap();
        TransJob::register(&sched, service, TransJob::DEFAULT_SCHEDULE)
            .await
            .unwrap();
    }
}
