use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alertcfg")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(nullable)]
    pub tg_token: Option<String>,
    #[sea_orm(nullable)]
    pub tg_userid: Option<String>,
    #[sea_orm(nullable)]
    pub wx_api: Option<String>,
    #[sea_orm(nullable)]
    pub wx_token: Option<String>,
    /// 到期前多少天开始提醒
    pub days: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Model {
    /// Telegram 的 token 与 chat id 均已配置时返回二者
    pub fn telegram(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.tg_token)?, non_empty(&self.tg_userid)?))
    }

    /// 微信推送地址与 token 均已配置时返回二者
    pub fn wechat(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.wx_api)?, non_empty(&self.wx_token)?))
    }
}
