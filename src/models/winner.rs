use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::non_empty;
use crate::entities::winner_entity;
use crate::error::{AppError, AppResult};

/// 新增得奖者请求 (单笔 / 批量中的一笔)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateWinnerRequest {
    #[schema(example = "01")]
    pub award_id: Option<String>,
    #[schema(example = "頭獎 SHARP 電視")]
    pub award: Option<String>,
    #[schema(example = "A00018801")]
    pub emp_id: Option<String>,
    pub emp_cname: Option<String>,
    pub emp_ename: Option<String>,
    pub emp_factory: Option<String>,
}

/// 通过必填校验的得奖者数据
#[derive(Debug, Clone, PartialEq)]
pub struct NewWinner {
    pub award_id: String,
    pub award: String,
    pub emp_id: String,
    pub emp_cname: Option<String>,
    pub emp_ename: Option<String>,
    pub emp_factory: Option<String>,
}

impl CreateWinnerRequest {
    /// award_id / award / emp_id 任一为空返回 None；选填名称为空串时存 NULL
    pub fn validate(&self) -> Option<NewWinner> {
        let cloned = self.clone();
        Some(NewWinner {
            award_id: non_empty(cloned.award_id)?,
            award: non_empty(cloned.award)?,
            emp_id: non_empty(cloned.emp_id)?,
            emp_cname: non_empty(cloned.emp_cname),
            emp_ename: non_empty(cloned.emp_ename),
            emp_factory: non_empty(cloned.emp_factory),
        })
    }
}

/// 区分「字段缺省」与「显式 null」
fn double_option<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

/// 更新得奖者请求
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateWinnerRequest {
    pub award_id: Option<String>,
    pub award: Option<String>,
    pub emp_id: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub emp_cname: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub emp_ename: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub emp_factory: Option<Option<String>>,
}

/// 得奖者更新补丁
/// - award_id / award / emp_id: None 表示不变，空串同样视为不变
/// - 选填名称: None 不变，Some(None) 清空，Some(Some(v)) 设置
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinnerPatch {
    pub award_id: Option<String>,
    pub award: Option<String>,
    pub emp_id: Option<String>,
    pub emp_cname: Option<Option<String>>,
    pub emp_ename: Option<Option<String>>,
    pub emp_factory: Option<Option<String>>,
}

impl WinnerPatch {
    pub fn is_empty(&self) -> bool {
        self.award_id.is_none()
            && self.award.is_none()
            && self.emp_id.is_none()
            && self.emp_cname.is_none()
            && self.emp_ename.is_none()
            && self.emp_factory.is_none()
    }
}

impl From<UpdateWinnerRequest> for WinnerPatch {
    fn from(req: UpdateWinnerRequest) -> Self {
        WinnerPatch {
            award_id: non_empty(req.award_id),
            award: non_empty(req.award),
            emp_id: non_empty(req.emp_id),
            emp_cname: req.emp_cname.map(non_empty),
            emp_ename: req.emp_ename.map(non_empty),
            emp_factory: req.emp_factory.map(non_empty),
        }
    }
}

/// 得奖者列表过滤条件
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct WinnerQuery {
    pub award_id: Option<String>,
    pub emp_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WinnerResponse {
    pub id: i32,
    pub award_id: String,
    pub award: String,
    pub emp_id: String,
    pub emp_cname: Option<String>,
    pub emp_ename: Option<String>,
    pub emp_factory: Option<String>,
    pub won_at: DateTime<Utc>,
}

impl From<winner_entity::Model> for WinnerResponse {
    fn from(m: winner_entity::Model) -> Self {
        WinnerResponse {
            id: m.id,
            award_id: m.award_id,
            award: m.award,
            emp_id: m.emp_id,
            emp_cname: m.emp_cname,
            emp_ename: m.emp_ename,
            emp_factory: m.emp_factory,
            won_at: m.won_at,
        }
    }
}

/// 批量新增请求；每笔先保留原始 JSON，以便回报出错的序号
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BatchCreateWinnersRequest {
    #[schema(value_type = Option<Vec<CreateWinnerRequest>>)]
    pub winners: Option<Vec<serde_json::Value>>,
}

impl BatchCreateWinnersRequest {
    /// 逐笔解析；第一笔类型不符或缺必填字段时整批拒绝，附上序号与原始内容
    pub fn into_entries(self) -> AppResult<Option<Vec<CreateWinnerRequest>>> {
        let Some(values) = self.winners else {
            return Ok(None);
        };

        let mut entries = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<CreateWinnerRequest>(value.clone()) {
                Ok(entry) if entry.validate().is_some() => entries.push(entry),
                _ => return Err(AppError::InvalidBatchEntry { index, entry: value }),
            }
        }
        Ok(Some(entries))
    }
}

/// 批量新增中单笔的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Created,
    Failed,
    Duplicate,
    InvalidAward,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchItemResult {
    pub emp_id: String,
    pub status: BatchItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<WinnerResponse>,
}

impl BatchItemResult {
    pub fn created(emp_id: String, data: WinnerResponse) -> Self {
        Self {
            emp_id,
            status: BatchItemStatus::Created,
            error: None,
            data: Some(data),
        }
    }

    pub fn rejected(emp_id: String, status: BatchItemStatus, error: String) -> Self {
        Self {
            emp_id,
            status,
            error: Some(error),
            data: None,
        }
    }
}

/// 批量结果的整体分类
/// - all_created: 全部新增
/// - partial: 部分新增
/// - nothing_new: 一笔都没新增，且失败全部是重复得奖
/// - failed: 一笔都没新增，且存在奖项无效或写入失败
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    AllCreated,
    Partial,
    NothingNew,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchCreateWinnersResponse {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub outcome: BatchOutcome,
    pub results: Vec<BatchItemResult>,
}

impl BatchCreateWinnersResponse {
    pub fn from_results(results: Vec<BatchItemResult>) -> Self {
        let total = results.len();
        let created = results
            .iter()
            .filter(|r| r.status == BatchItemStatus::Created)
            .count();
        let failed = total - created;
        let only_duplicates = results
            .iter()
            .filter(|r| r.status != BatchItemStatus::Created)
            .all(|r| r.status == BatchItemStatus::Duplicate);

        let outcome = if failed == 0 {
            BatchOutcome::AllCreated
        } else if created > 0 {
            BatchOutcome::Partial
        } else if only_duplicates {
            BatchOutcome::NothingNew
        } else {
            BatchOutcome::Failed
        };

        Self {
            total,
            created,
            failed,
            outcome,
            results,
        }
    }

    /// 至少新增一笔才算成功
    pub fn success(&self) -> bool {
        self.created > 0
    }

    pub fn message(&self) -> String {
        format!(
            "Batch operation completed: {} created, {} failed",
            self.created, self.failed
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BatchDeleteQuery {
    pub award_id: Option<String>,
}

/// 被批量删除的得奖者摘要 (删除前读取)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedWinnerSummary {
    pub id: i32,
    pub emp_id: String,
    pub emp_cname: Option<String>,
}

impl From<winner_entity::Model> for DeletedWinnerSummary {
    fn from(m: winner_entity::Model) -> Self {
        DeletedWinnerSummary {
            id: m.id,
            emp_id: m.emp_id,
            emp_cname: m.emp_cname,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchDeleteWinnersResponse {
    pub deleted: u64,
    pub award_id: String,
    pub winners: Vec<DeletedWinnerSummary>,
}
