use serde::{Deserialize, Serialize};

/// 提现通道
///
/// 线上通道由打款任务自动处理, 线下通道仅登记人工转账
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferChannel {
    /// 提现到微信零钱（线上）
    WechatWallet,
    /// 提现到微信绑定银行卡（线上）
    WechatBanks,
    /// 提现到微信收款码（线下）
    WechatQrcode,
    /// 提现到支付宝收款码（线下）
    AlipayQrcode,
    /// 提现到支付宝账户（线下）
    AlipayAccount,
    /// 提现到银行卡账户（线下）
    TransferBanks,
}

impl TransferChannel {
    /// 线上自动打款通道编码
    pub const ONLINE_CODES: [&'static str; 2] = ["wechat_banks", "wechat_wallet"];

    /// 通道编码
    pub fn code(&self) -> &'static str {
        match self {
            TransferChannel::WechatWallet => "wechat_wallet",
            TransferChannel::WechatBanks => "wechat_banks",
            TransferChannel::WechatQrcode => "wechat_qrcode",
            TransferChannel::AlipayQrcode => "alipay_qrcode",
            TransferChannel::AlipayAccount => "alipay_account",
            TransferChannel::TransferBanks => "transfer_banks",
        }
    }

    /// 从通道编码转换
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "wechat_wallet" => Some(TransferChannel::WechatWallet),
            "wechat_banks" => Some(TransferChannel::WechatBanks),
            "wechat_qrcode" => Some(TransferChannel::WechatQrcode),
            "alipay_qrcode" => Some(TransferChannel::AlipayQrcode),
            "alipay_account" => Some(TransferChannel::AlipayAccount),
            "transfer_banks" => Some(TransferChannel::TransferBanks),
            _ => None,
        }
    }

    /// 通道名称
    pub fn type_name(&self) -> &'static str {
        match self {
            TransferChannel::WechatWallet => "提现到微信零钱（线上）",
            TransferChannel::WechatBanks => "提现到微信银行卡（线上）",
            TransferChannel::WechatQrcode => "提现到微信收款码（线下）",
            TransferChannel::AlipayQrcode => "提现到支付宝收款码（线下）",
            TransferChannel::AlipayAccount => "提现到支付宝账户（线下）",
            TransferChannel::TransferBanks => "提现到银行卡账户（线下）",
        }
    }

    /// 是否线上自动打款通道
    pub fn is_online(&self) -> bool {
        matches!(
            self,
            TransferChannel::WechatWallet | TransferChannel::WechatBanks
        )
    }
}
