use chrono::Utc;
use contracts::collection::order::{OrderRecord, ScopeKey};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub scope: String,
    pub order_json: String,
    pub hidden_json: String,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Снисходительный разбор JSON-колонки: испорченное содержимое деградирует
/// до пустого списка с предупреждением в логе, а не роняет запрос.
fn parse_ids(raw: &str, scope: &str, column: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Колонка {} для области '{}' повреждена ({}), использую пустой список",
                column,
                scope,
                e
            );
            Vec::new()
        }
    }
}

impl From<Model> for OrderRecord {
    fn from(m: Model) -> Self {
        let order = parse_ids(&m.order_json, &m.scope, "order_json");
        let hidden = parse_ids(&m.hidden_json, &m.scope, "hidden_json");
        OrderRecord {
            scope: ScopeKey::new(m.scope),
            order,
            hidden,
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn get_by_scope(scope: &str) -> anyhow::Result<Option<OrderRecord>> {
    let result = Entity::find_by_id(scope.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn upsert(record: &OrderRecord) -> anyhow::Result<()> {
    let existing = Entity::find_by_id(record.scope.as_str().to_string())
        .one(conn())
        .await?;

    let order_json = serde_json::to_string(&record.order)?;
    let hidden_json = serde_json::to_string(&record.hidden)?;

    match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.order_json = Set(order_json);
            active.hidden_json = Set(hidden_json);
            active.updated_at = Set(Some(Utc::now()));
            active.update(conn()).await?;
        }
        None => {
            let active = ActiveModel {
                scope: Set(record.scope.as_str().to_string()),
                order_json: Set(order_json),
                hidden_json: Set(hidden_json),
                updated_at: Set(Some(Utc::now())),
            };
            active.insert(conn()).await?;
        }
    }
    Ok(())
}

pub async fn delete_by_scope(scope: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(scope.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
