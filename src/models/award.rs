use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::non_empty;
use crate::entities::award_entity;

/// 新增奖项请求
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateAwardRequest {
    #[schema(example = "01")]
    pub id: Option<String>,
    #[schema(example = "頭獎 SHARP 電視")]
    pub award: Option<String>,
    #[schema(example = 1)]
    pub num: Option<i32>,
}

/// 更新奖项请求，未提供的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAwardRequest {
    pub award: Option<String>,
    pub num: Option<i32>,
}

/// 奖项更新补丁 (已规范化：空名称视为未提供)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AwardPatch {
    pub award: Option<String>,
    pub num: Option<i32>,
}

impl AwardPatch {
    pub fn is_empty(&self) -> bool {
        self.award.is_none() && self.num.is_none()
    }
}

impl From<UpdateAwardRequest> for AwardPatch {
    fn from(req: UpdateAwardRequest) -> Self {
        AwardPatch {
            award: non_empty(req.award),
            num: req.num,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AwardResponse {
    pub id: String,
    pub award: String,
    pub num: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<award_entity::Model> for AwardResponse {
    fn from(m: award_entity::Model) -> Self {
        AwardResponse {
            id: m.id,
            award: m.award,
            num: m.num,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
