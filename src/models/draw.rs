use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 抽奖候选人
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DrawCandidate {
    #[schema(example = "A00018801")]
    pub emp_id: Option<String>,
    pub emp_cname: Option<String>,
    pub emp_ename: Option<String>,
    pub emp_factory: Option<String>,
}

/// 管理端抽奖请求
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DrawRequest {
    #[schema(example = "05")]
    pub award_id: Option<String>,
    /// 抽出人数，缺省为该奖项剩余名额
    pub count: Option<u32>,
    #[serde(default)]
    pub candidates: Vec<DrawCandidate>,
}
