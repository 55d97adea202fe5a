use crate::entity::{alertcfg, domains, AlertConfig, DomainRecord};
use crate::error::Result;
use crate::status::DomainStatus;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Schema,
};

/// 告警配置与域名表的读写
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// 第一条告警配置
    async fn alert_config(&self) -> Result<Option<AlertConfig>>;

    /// `names` 中开启了任一提醒开关的域名
    async fn notifiable_domains(&self, names: &[String]) -> Result<Vec<DomainRecord>>;

    /// 回写连通状态
    async fn update_status(&self, domain: &str, status: DomainStatus) -> Result<()>;
}

#[derive(Clone)]
pub struct DbDomainStore {
    db: DatabaseConnection,
}

impl DbDomainStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl DomainStore for DbDomainStore {
    async fn alert_config(&self) -> Result<Option<AlertConfig>> {
        let config = alertcfg::Entity::find()
            .order_by_asc(alertcfg::Column::Id)
            .one(&self.db)
            .await?;
        Ok(config)
    }

    async fn notifiable_domains(&self, names: &[String]) -> Result<Vec<DomainRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = domains::Entity::find()
            .filter(domains::Column::Domain.is_in(names.iter().cloned()))
            .filter(
                Condition::any()
                    .add(domains::Column::Tgsend.eq(1))
                    .add(domains::Column::StTgsend.eq(1)),
            )
            .order_by_asc(domains::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn update_status(&self, domain: &str, status: DomainStatus) -> Result<()> {
        domains::Entity::update_many()
            .col_expr(domains::Column::Status, Expr::value(status.label()))
            .filter(domains::Column::Domain.eq(domain))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// 表不存在时创建 `alertcfg` 与 `domains`
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema
            .create_table_from_entity(alertcfg::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(domains::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in statements.iter() {
        db.execute(backend.build(stmt)).await?;
    }

    tracing::debug!("Schema ensured for alertcfg/domains");
    Ok(())
}
