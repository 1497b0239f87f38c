use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 账号终端绑定表 (公众号/小程序授权信息)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppAccountBind {
    pub id: Option<i64>,
    pub unid: i64,
    /// 授权类型 (normal|wxapp|wechat)
    pub r#type: Option<String>,
    pub appid: Option<String>,
    pub openid: Option<String>,
    pub create_time: Option<DateTime>,
    pub update_time: Option<DateTime>,
}

crud!(AppAccountBind {}, "app_account_bind");
impl_select!(AppAccountBind{select_by_unid_type(unid: i64, bind_type: &str) -> Option =>
    "`where unid = #{unid} and type = #{bind_type} and openid <> '' limit 1`"});
impl_select!(AppAccountBind{select_first_with_openid(unid: i64) -> Option =>
    "`where unid = #{unid} and openid <> '' limit 1`"});

impl AppAccountBind {
    pub const TABLE_NAME: &'static str = "app_account_bind";
}
