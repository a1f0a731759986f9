use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 得奖记录实体
/// 说明:
/// - award_id 弱引用 award.id，删除奖项不会级联删除
/// - award 冗余存储得奖当时的奖项名称
/// - emp_id 全表唯一 (一人一奖)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "winner")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub award_id: String,
    pub award: String,
    /// 员工工号
    pub emp_id: String,
    pub emp_cname: Option<String>,
    pub emp_ename: Option<String>,
    /// 厂别 / 部门
    pub emp_factory: Option<String>,
    pub won_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
