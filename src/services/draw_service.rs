use crate::database::Store;
use crate::entities::{award_entity as awards, winner_entity as winners};
use crate::error::{AppError, AppResult};
use crate::models::{
    BatchCreateWinnersResponse, CreateWinnerRequest, DrawCandidate, DrawRequest, non_empty,
};
use crate::services::WinnerService;
use crate::services::winner_service::existing_emp_ids;
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::HashSet;

/// 管理端抽奖：从候选名单中随机抽出得奖者，再交给批量新增处理
#[derive(Clone)]
pub struct DrawService {
    store: Store,
    winner_service: WinnerService,
}

/// 随机取 count 个 (不足时全取)
fn pick_random<T, R: Rng + ?Sized>(mut items: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items.truncate(count);
    items
}

impl DrawService {
    pub fn new(store: Store, winner_service: WinnerService) -> Self {
        Self {
            store,
            winner_service,
        }
    }

    /// 抽奖:
    /// 1. 校验奖项存在、候选名单非空且每人都有工号
    /// 2. 候选人按工号去重，排除已经得过奖的人
    /// 3. 人数缺省为剩余名额
    /// 4. 随机抽出后走批量新增 (仍由一人一奖规则兜底)
    pub async fn draw(&self, request: DrawRequest) -> AppResult<BatchCreateWinnersResponse> {
        let db = self.store.conn()?;

        let award_id = non_empty(request.award_id).ok_or_else(|| {
            AppError::ValidationError("Missing required field: award_id".to_string())
        })?;
        let award = awards::Entity::find_by_id(award_id.clone())
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Award ID {award_id} does not exist")))?;

        if request.candidates.is_empty() {
            return Err(AppError::ValidationError(
                "Candidates list cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut pool: Vec<(String, DrawCandidate)> = Vec::with_capacity(request.candidates.len());
        for (index, candidate) in request.candidates.into_iter().enumerate() {
            let emp_id = non_empty(candidate.emp_id.clone()).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Invalid candidate at index {index}: missing emp_id"
                ))
            })?;
            if seen.insert(emp_id.clone()) {
                pool.push((emp_id, candidate));
            }
        }

        let count = match request.count {
            Some(count) => count as usize,
            None => {
                let drawn = winners::Entity::find()
                    .filter(winners::Column::AwardId.eq(award.id.as_str()))
                    .count(db)
                    .await?;
                u64::try_from(award.num)
                    .unwrap_or(0)
                    .saturating_sub(drawn) as usize
            }
        };
        if count == 0 {
            return Err(AppError::ValidationError(format!(
                "No remaining slots for award {}",
                award.id
            )));
        }

        let already_won = existing_emp_ids(db, pool.iter().map(|(id, _)| id.clone()).collect())
            .await?;
        let eligible: Vec<(String, DrawCandidate)> = pool
            .into_iter()
            .filter(|(emp_id, _)| !already_won.contains(emp_id))
            .collect();
        if eligible.is_empty() {
            return Err(AppError::ValidationError(
                "No eligible candidates left".to_string(),
            ));
        }

        let picked = pick_random(eligible, count, &mut rand::thread_rng());
        log::info!(
            "Drawing {} winner(s) for award {} ({})",
            picked.len(),
            award.id,
            award.award
        );

        let requests = picked
            .into_iter()
            .map(|(emp_id, candidate)| CreateWinnerRequest {
                award_id: Some(award.id.clone()),
                award: Some(award.award.clone()),
                emp_id: Some(emp_id),
                emp_cname: candidate.emp_cname,
                emp_ename: candidate.emp_ename,
                emp_factory: candidate.emp_factory,
            })
            .collect();

        self.winner_service.batch_create(Some(requests)).await
    }
}
