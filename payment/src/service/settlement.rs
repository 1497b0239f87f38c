use common::{AppError, AppResult};
use orm::entities::AppPaymentTransfer;
use rbatis::rbdc::datetime::DateTime;
use std::sync::Arc;

use crate::channel::TransferChannel;
use crate::gateway::{
    to_minor, BankPayout, PaymentGateway, PayoutProfile, PayoutProvider, PayoutRequest,
    PayoutStatus, WalletPayout,
};
use crate::service::ledger::LedgerService;
use crate::store::TransferStore;

/// 提现订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// 打款失败 (终态)
    Failed = 0,
    /// 待审核
    PendingAudit = 1,
    /// 已驳回
    AuditRejected = 2,
    /// 待打款
    PendingPayout = 3,
    /// 打款中, 等待通道确认
    AwaitingConfirm = 4,
    /// 已打款 (终态)
    Settled = 5,
}

impl TransferStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TransferStatus::Failed),
            1 => Some(TransferStatus::PendingAudit),
            2 => Some(TransferStatus::AuditRejected),
            3 => Some(TransferStatus::PendingPayout),
            4 => Some(TransferStatus::AwaitingConfirm),
            5 => Some(TransferStatus::Settled),
            _ => None,
        }
    }
}

/// 单轮提现处理汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransSummary {
    /// 本轮处理的订单数
    pub total: u64,
    /// 处理失败的订单数
    pub error: u64,
}

/// 提现打款批处理服务
///
/// 由外部调度器按周期触发, 单线程顺序处理; 单笔失败只记录
/// 原因并继续下一笔, 整轮永不中断
pub struct SettlementService {
    transfers: Arc<dyn TransferStore>,
    gateway: Arc<dyn PaymentGateway>,
    payout: Arc<dyn PayoutProvider>,
    balance: Arc<LedgerService>,
}

impl SettlementService {
    pub fn new(
        transfers: Arc<dyn TransferStore>,
        gateway: Arc<dyn PaymentGateway>,
        payout: Arc<dyn PayoutProvider>,
        balance: Arc<LedgerService>,
    ) -> Self {
        Self {
            transfers,
            gateway,
            payout,
            balance,
        }
    }

    /// 执行一轮提现打款处理
    pub async fn run_once(&self) -> AppResult<TransSummary> {
        let jobs = self.transfers.list_pending().await?;
        let mut summary = TransSummary {
            total: jobs.len() as u64,
            error: 0,
        };

        for mut job in jobs {
            log::info!("开始处理订单 {} 提现", job.code);
            if let Err(err) = self.process(&mut job).await {
                summary.error += 1;
                log::warn!("处理提现订单 {} 失败: {}", job.code, err);
                job.change_time = Some(DateTime::now());
                job.change_desc = Some(err.to_string());
                if let Err(save_err) = self.transfers.update(&job).await {
                    log::error!("回写提现订单 {} 失败原因未成功: {}", job.code, save_err);
                }
            }
        }

        log::info!(
            "此次共处理 {} 笔提现操作, 其中有 {} 笔处理失败",
            summary.total,
            summary.error
        );
        Ok(summary)
    }

    async fn process(&self, job: &mut AppPaymentTransfer) -> AppResult<()> {
        match TransferStatus::from_code(job.status) {
            Some(TransferStatus::PendingPayout) => self.submit(job).await,
            Some(TransferStatus::AwaitingConfirm) => self.confirm(job).await,
            // 待处理列表只含 3/4 两种状态
            _ => Ok(()),
        }
    }

    /// 状态 3: 发起打款
    async fn submit(&self, job: &mut AppPaymentTransfer) -> AppResult<()> {
        log::info!("尝试处理订单 {} 打款", job.code);
        let profile = self.payout.payout_profile(job.unid).await?;
        let request = Self::build_request(job, &profile)?;
        let created = self.gateway.create_transfer(&request).await?;

        let now = DateTime::now();
        if created.success {
            job.status = TransferStatus::AwaitingConfirm.code();
            job.appid = Some(profile.appid);
            job.openid = Some(profile.openid);
            job.trade_no = Some(created.trade_no.unwrap_or_else(|| job.code.clone()));
            job.trade_time = Some(created.pay_time.unwrap_or_else(|| now.clone()));
            job.change_time = Some(now);
            job.change_desc = Some("创建提现打款成功".to_string());
        } else {
            // 业务失败不改状态, 留待下一轮重试
            job.change_time = Some(now);
            job.change_desc =
                Some(created.error_reason.unwrap_or_else(|| "线上提现失败".to_string()));
        }
        self.transfers.update(job).await
    }

    /// 按通道构建打款请求, 打款额为申请金额减去手续费
    fn build_request(
        job: &AppPaymentTransfer,
        profile: &PayoutProfile,
    ) -> AppResult<PayoutRequest> {
        let amount = to_minor(job.amount - job.charge_amount);
        match TransferChannel::from_code(&job.r#type) {
            Some(TransferChannel::WechatBanks) => Ok(PayoutRequest::Bank(BankPayout {
                partner_trade_no: job.code.clone(),
                bank_no: job.bank_code.clone().unwrap_or_default(),
                true_name: job.bank_user.clone().unwrap_or_default(),
                bank_code: job.bank_wseq.clone().unwrap_or_default(),
                amount,
                desc: "银行卡提现".to_string(),
            })),
            Some(TransferChannel::WechatWallet) => Ok(PayoutRequest::Wallet(WalletPayout {
                partner_trade_no: job.code.clone(),
                openid: profile.openid.clone(),
                amount,
                desc: "余额提现".to_string(),
            })),
            _ => Err(AppError::business(format!(
                "不支持的提现通道: {}",
                job.r#type
            ))),
        }
    }

    /// 状态 4: 查询并推进打款结果
    async fn confirm(&self, job: &mut AppPaymentTransfer) -> AppResult<()> {
        log::info!("刷新提现订单 {} 状态", job.code);
        let trade_no = job
            .trade_no
            .clone()
            .ok_or_else(|| AppError::business("提现订单缺少交易单号"))?;
        let result = self.gateway.query_transfer(&trade_no).await?;

        let now = DateTime::now();
        match result.status {
            PayoutStatus::Success => {
                job.status = TransferStatus::Settled.code();
                job.trade_time = Some(result.pay_time.unwrap_or_else(|| now.clone()));
                job.change_time = Some(now);
                job.change_desc = Some("提现打款成功".to_string());
                self.transfers.update(job).await?;
                // 打款到账, 永久释放锁定的余额
                self.balance.unlock(&job.code, true).await?;
                self.balance.recount(job.unid).await?;
            }
            PayoutStatus::Failed => {
                job.status = TransferStatus::Failed.code();
                job.change_time = Some(now);
                job.change_desc = Some("提现打款失败".to_string());
                self.transfers.update(job).await?;
                // 作废锁定流水, 恢复可提现余额
                self.balance.cancel(&job.code, true).await?;
                self.balance.recount(job.unid).await?;
            }
            PayoutStatus::Pending => {}
        }
        Ok(())
    }
}
