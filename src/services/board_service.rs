use crate::database::Store;
use crate::entities::{award_entity as awards, winner_entity as winners};
use crate::error::AppResult;
use crate::models::{BoardPrize, BoardResponse, BoardSearchResult, BoardTab, BoardWinner};
use crate::utils::{award_rank, display_name, mask_name, tab_for_rank};
use sea_orm::{EntityTrait, QueryOrder};

const DEFAULT_DEPARTMENT: &str = "General";

/// 看板投影：奖项 + 得奖者 -> 按名次排序、姓名遮罩后的展示结构
#[derive(Clone)]
pub struct BoardService {
    store: Store,
    title: String,
}

/// 未遮罩的中间结果，搜索需要原始姓名
struct ProjectedWinner {
    emp_id: String,
    full_name: String,
    department: String,
    won_at: chrono::DateTime<chrono::Utc>,
}

impl ProjectedWinner {
    fn from_model(m: &winners::Model) -> Self {
        ProjectedWinner {
            emp_id: m.emp_id.clone(),
            full_name: display_name(&m.emp_id, m.emp_cname.as_deref(), m.emp_ename.as_deref()),
            department: m
                .emp_factory
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
            won_at: m.won_at,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.full_name.to_lowercase().contains(query)
            || self.department.to_lowercase().contains(query)
            || self.emp_id.to_lowercase().contains(query)
    }

    fn to_board(&self) -> BoardWinner {
        BoardWinner {
            emp_id: self.emp_id.clone(),
            name: mask_name(&self.full_name),
            department: self.department.clone(),
            won_at: self.won_at,
        }
    }
}

struct ProjectedPrize {
    award: awards::Model,
    rank: i32,
    winners: Vec<ProjectedWinner>,
}

/// 按名次 (相同时按 id) 排序，得奖者按得奖时间升序
fn project(
    award_list: Vec<awards::Model>,
    winner_list: &[winners::Model],
) -> Vec<ProjectedPrize> {
    let mut prizes: Vec<ProjectedPrize> = award_list
        .into_iter()
        .map(|award| {
            let mut prize_winners: Vec<&winners::Model> = winner_list
                .iter()
                .filter(|w| w.award_id == award.id)
                .collect();
            prize_winners.sort_by(|a, b| a.won_at.cmp(&b.won_at).then(a.id.cmp(&b.id)));

            ProjectedPrize {
                rank: award_rank(&award.id),
                winners: prize_winners
                    .into_iter()
                    .map(ProjectedWinner::from_model)
                    .collect(),
                award,
            }
        })
        .collect();

    prizes.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.award.id.cmp(&b.award.id)));
    prizes
}

impl BoardService {
    pub fn new(store: Store, title: String) -> Self {
        Self { store, title }
    }

    pub async fn board(&self, tab: Option<BoardTab>) -> AppResult<BoardResponse> {
        let (award_list, winner_list) = self.load().await?;
        Ok(Self::build_board(&self.title, award_list, &winner_list, tab))
    }

    /// 在未遮罩的姓名、部门、工号中做不区分大小写的子串匹配
    pub async fn search(&self, query: Option<String>) -> AppResult<Vec<BoardSearchResult>> {
        let query = query.unwrap_or_default().trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let (award_list, winner_list) = self.load().await?;
        Ok(Self::search_projection(award_list, &winner_list, &query))
    }

    pub fn build_board(
        title: &str,
        award_list: Vec<awards::Model>,
        winner_list: &[winners::Model],
        tab: Option<BoardTab>,
    ) -> BoardResponse {
        let prizes = project(award_list, winner_list)
            .into_iter()
            .map(|p| {
                let drawn = p.winners.len();
                let total = p.award.num;
                BoardPrize {
                    id: p.award.id,
                    name: p.award.award,
                    rank: p.rank,
                    tab: tab_for_rank(p.rank),
                    total,
                    drawn,
                    remaining: usize::try_from(total).unwrap_or(0).saturating_sub(drawn),
                    winners: p.winners.iter().map(ProjectedWinner::to_board).collect(),
                }
            })
            .filter(|p| tab.is_none_or(|t| p.tab == t))
            .collect();

        BoardResponse {
            title: title.to_string(),
            prizes,
        }
    }

    fn search_projection(
        award_list: Vec<awards::Model>,
        winner_list: &[winners::Model],
        query: &str,
    ) -> Vec<BoardSearchResult> {
        let mut results = Vec::new();
        for prize in project(award_list, winner_list) {
            for winner in prize.winners.iter().filter(|w| w.matches(query)) {
                results.push(BoardSearchResult {
                    prize_id: prize.award.id.clone(),
                    prize_name: prize.award.award.clone(),
                    winner: winner.to_board(),
                });
            }
        }
        results
    }

    async fn load(&self) -> AppResult<(Vec<awards::Model>, Vec<winners::Model>)> {
        let db = self.store.conn()?;
        let award_list = awards::Entity::find()
            .order_by_asc(awards::Column::Id)
            .all(db)
            .await?;
        let winner_list = winners::Entity::find()
            .order_by_asc(winners::Column::WonAt)
            .all(db)
            .await?;
        Ok((award_list, winner_list))
    }
}
