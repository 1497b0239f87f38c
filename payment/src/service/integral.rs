use common::services::{ConfigService, PaymentSetting};
use common::AppResult;
use rust_decimal::Decimal;

/// 按配置比率折算积分
///
/// ratio(x) = x / 比率, 比率默认 1 且不低于 1
pub fn apply_ratio(integral: Decimal, rate: Decimal) -> Decimal {
    let rate = if rate < Decimal::ONE {
        Decimal::ONE
    } else {
        rate
    };
    integral / rate
}

/// 积分转换比率 (读取动态配置, 无副作用)
pub async fn ratio(config: &ConfigService, integral: Decimal) -> AppResult<Decimal> {
    let setting: PaymentSetting = config.load_config().await?;
    Ok(apply_ratio(integral, setting.integral_rate))
}
