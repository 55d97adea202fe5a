use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub domain: String,
    #[sea_orm(nullable)]
    pub registrar: Option<String>,
    #[sea_orm(nullable)]
    pub status: Option<String>,
    /// `YYYY-MM-DD` 或 ISO-8601 时间戳
    pub expiry_date: String,
    /// 到期提醒开关（0/1）
    pub tgsend: i32,
    /// 离线提醒开关（0/1）
    pub st_tgsend: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn expiry_alerts_enabled(&self) -> bool {
        self.tgsend == 1
    }

    pub fn offline_alerts_enabled(&self) -> bool {
        self.st_tgsend == 1
    }
}
