use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 看板分页签 (按名次区间分组)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BoardTab {
    /// 特奖 + 头奖 (0-1)
    #[serde(rename = "special_top")]
    SpecialTop,
    #[serde(rename = "tier_2_5")]
    Tier2To5,
    #[serde(rename = "tier_6_10")]
    Tier6To10,
    #[serde(rename = "tier_11_13")]
    Tier11To13,
    /// 温馨奖 (99)
    #[serde(rename = "comfort")]
    Comfort,
    #[serde(rename = "other")]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BoardQuery {
    pub tab: Option<BoardTab>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BoardSearchQuery {
    pub q: Option<String>,
}

/// 看板上的得奖者 (姓名已遮罩)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardWinner {
    pub emp_id: String,
    /// 例: "陳O銘 (A00018801)"
    pub name: String,
    pub department: String,
    pub won_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardPrize {
    pub id: String,
    pub name: String,
    pub rank: i32,
    pub tab: BoardTab,
    /// 总名额
    pub total: i32,
    /// 已抽出
    pub drawn: usize,
    /// 剩余名额 (超抽时为 0)
    pub remaining: usize,
    pub winners: Vec<BoardWinner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardResponse {
    pub title: String,
    pub prizes: Vec<BoardPrize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardSearchResult {
    pub prize_id: String,
    pub prize_name: String,
    pub winner: BoardWinner,
}
