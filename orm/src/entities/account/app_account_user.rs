use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 主账号用户表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppAccountUser {
    pub id: Option<i64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub nickname: Option<String>,
    /// 附加数据, JSON 文本 (余额/积分统计快照等)
    pub extra: Option<String>,
    pub status: Option<i32>,
    pub deleted: Option<bool>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppAccountUser {}, "app_account_user");
impl_select!(AppAccountUser{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});

impl AppAccountUser {
    pub const TABLE_NAME: &'static str = "app_account_user";
}
