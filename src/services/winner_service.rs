use crate::database::{DbPool, Store};
use crate::entities::{award_entity as awards, winner_entity as winners};
use crate::error::{AppError, AppResult};
use crate::models::{
    BatchCreateWinnersResponse, BatchDeleteWinnersResponse, BatchItemResult, BatchItemStatus,
    CreateWinnerRequest, DeleteResponse, DeletedWinnerSummary, NewWinner, WinnerPatch,
    WinnerQuery, WinnerResponse, non_empty,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use std::collections::HashSet;

const ALREADY_WON: &str = "Employee has already won a prize";
const AWARD_MISSING: &str = "Award ID does not exist";

/// 写入冲突 (emp_id 唯一索引) 归类为「已得奖」
fn already_won(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(ALREADY_WON.to_string()),
        _ => AppError::from(e),
    }
}

/// 得奖者服务：维护「一人一奖」约束的单笔/批量新增与删除
#[derive(Clone)]
pub struct WinnerService {
    store: Store,
}

impl WinnerService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// 按得奖时间倒序列出，可按 award_id / emp_id 过滤
    pub async fn list_winners(&self, query: &WinnerQuery) -> AppResult<Vec<WinnerResponse>> {
        let db = self.store.conn()?;

        let mut select = winners::Entity::find();
        if let Some(award_id) = non_empty(query.award_id.clone()) {
            select = select.filter(winners::Column::AwardId.eq(award_id));
        }
        if let Some(emp_id) = non_empty(query.emp_id.clone()) {
            select = select.filter(winners::Column::EmpId.eq(emp_id));
        }

        let list = select
            .order_by_desc(winners::Column::WonAt)
            .order_by_desc(winners::Column::Id)
            .all(db)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_winner(&self, id: i32) -> AppResult<WinnerResponse> {
        let db = self.store.conn()?;
        winners::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Winner not found".to_string()))
    }

    /// 单笔新增，依次检查:
    /// 1. 必填字段
    /// 2. 奖项存在 (不存在视为请求错误而非 404)
    /// 3. 员工尚未得奖
    pub async fn create_winner(&self, request: CreateWinnerRequest) -> AppResult<WinnerResponse> {
        let db = self.store.conn()?;

        let new_winner = request.validate().ok_or_else(|| {
            AppError::ValidationError("Missing required fields: award_id, award, emp_id".into())
        })?;

        if !award_exists(db, &new_winner.award_id).await? {
            return Err(AppError::ValidationError(AWARD_MISSING.to_string()));
        }

        let existing = winners::Entity::find()
            .filter(winners::Column::EmpId.eq(new_winner.emp_id.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(ALREADY_WON.to_string()));
        }

        let model = insert_winner(db, new_winner).await.map_err(already_won)?;
        log::info!("Winner {} assigned to award {}", model.emp_id, model.award_id);
        Ok(model.into())
    }

    /// 按补丁更新；改 award_id 时校验奖项存在，不重新检查一人一奖
    pub async fn update_winner(&self, id: i32, patch: WinnerPatch) -> AppResult<WinnerResponse> {
        let db = self.store.conn()?;

        if patch.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        if let Some(award_id) = &patch.award_id
            && !award_exists(db, award_id).await?
        {
            return Err(AppError::ValidationError(AWARD_MISSING.to_string()));
        }

        let model = winners::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Winner not found".to_string()))?;

        let mut am = model.into_active_model();
        if let Some(award_id) = patch.award_id {
            am.award_id = Set(award_id);
        }
        if let Some(award) = patch.award {
            am.award = Set(award);
        }
        if let Some(emp_id) = patch.emp_id {
            am.emp_id = Set(emp_id);
        }
        if let Some(emp_cname) = patch.emp_cname {
            am.emp_cname = Set(emp_cname);
        }
        if let Some(emp_ename) = patch.emp_ename {
            am.emp_ename = Set(emp_ename);
        }
        if let Some(emp_factory) = patch.emp_factory {
            am.emp_factory = Set(emp_factory);
        }

        let updated = am.update(db).await.map_err(already_won)?;
        Ok(updated.into())
    }

    pub async fn delete_winner(&self, id: i32) -> AppResult<DeleteResponse> {
        let db = self.store.conn()?;
        let result = winners::Entity::delete_by_id(id).exec(db).await?;
        Ok(DeleteResponse {
            deleted: result.rows_affected,
        })
    }

    /// 批量新增 (非原子，允许部分成功)
    ///
    /// 1. 整批结构校验，第一笔缺字段即整批拒绝
    /// 2. 一次查询有效奖项，一次查询已得奖员工
    /// 3. 逐笔按输入顺序处理；成功写入后立即加入已得奖集合，拦截同批重复
    pub async fn batch_create(
        &self,
        winners: Option<Vec<CreateWinnerRequest>>,
    ) -> AppResult<BatchCreateWinnersResponse> {
        let db = self.store.conn()?;

        let requests = winners.filter(|w| !w.is_empty()).ok_or_else(|| {
            AppError::ValidationError(
                "Invalid request: winners array is required and cannot be empty".to_string(),
            )
        })?;

        let mut candidates: Vec<NewWinner> = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            match request.validate() {
                Some(candidate) => candidates.push(candidate),
                None => {
                    return Err(AppError::InvalidBatchEntry {
                        index,
                        entry: serde_json::to_value(request)?,
                    });
                }
            }
        }

        let award_ids: Vec<String> = candidates
            .iter()
            .map(|c| c.award_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let valid_award_ids: HashSet<String> = awards::Entity::find()
            .select_only()
            .column(awards::Column::Id)
            .filter(awards::Column::Id.is_in(award_ids))
            .into_tuple::<String>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let emp_ids: Vec<String> = candidates.iter().map(|c| c.emp_id.clone()).collect();
        let mut already_won_ids = existing_emp_ids(db, emp_ids).await?;

        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let emp_id = candidate.emp_id.clone();

            if !valid_award_ids.contains(&candidate.award_id) {
                let message = format!("Award ID {} does not exist", candidate.award_id);
                results.push(BatchItemResult::rejected(
                    emp_id,
                    BatchItemStatus::InvalidAward,
                    message,
                ));
                continue;
            }

            if already_won_ids.contains(&emp_id) {
                results.push(BatchItemResult::rejected(
                    emp_id,
                    BatchItemStatus::Duplicate,
                    ALREADY_WON.to_string(),
                ));
                continue;
            }

            match insert_winner(db, candidate).await {
                Ok(model) => {
                    already_won_ids.insert(emp_id.clone());
                    results.push(BatchItemResult::created(emp_id, model.into()));
                }
                Err(e) => {
                    log::error!("Error creating winner {emp_id}: {e}");
                    results.push(BatchItemResult::rejected(
                        emp_id,
                        BatchItemStatus::Failed,
                        e.to_string(),
                    ));
                }
            }
        }

        let response = BatchCreateWinnersResponse::from_results(results);
        log::info!("{}", response.message());
        Ok(response)
    }

    /// 删除某奖项下全部得奖者，返回删除前读取的摘要
    ///
    /// 先读后删，两步之间不加事务。
    pub async fn batch_delete_by_award(
        &self,
        award_id: Option<String>,
    ) -> AppResult<BatchDeleteWinnersResponse> {
        let db = self.store.conn()?;

        let award_id = non_empty(award_id).ok_or_else(|| {
            AppError::ValidationError("Missing required parameter: award_id".to_string())
        })?;

        if !award_exists(db, &award_id).await? {
            return Err(AppError::NotFound(format!(
                "Award ID {award_id} does not exist"
            )));
        }

        let to_delete = winners::Entity::find()
            .filter(winners::Column::AwardId.eq(award_id.as_str()))
            .order_by_asc(winners::Column::Id)
            .all(db)
            .await?;

        if !to_delete.is_empty() {
            winners::Entity::delete_many()
                .filter(winners::Column::AwardId.eq(award_id.as_str()))
                .exec(db)
                .await?;
            log::info!(
                "Deleted {} winner(s) for award {award_id}",
                to_delete.len()
            );
        }

        Ok(BatchDeleteWinnersResponse {
            deleted: to_delete.len() as u64,
            award_id,
            winners: to_delete.into_iter().map(DeletedWinnerSummary::from).collect(),
        })
    }

    /// 清空全部得奖记录 (管理端重置)
    pub async fn reset_winners(&self) -> AppResult<DeleteResponse> {
        let db = self.store.conn()?;
        let result = winners::Entity::delete_many().exec(db).await?;
        log::warn!("Winner ledger reset, {} row(s) removed", result.rows_affected);
        Ok(DeleteResponse {
            deleted: result.rows_affected,
        })
    }
}

pub(crate) async fn award_exists(db: &DbPool, award_id: &str) -> Result<bool, DbErr> {
    Ok(awards::Entity::find_by_id(award_id.to_string())
        .one(db)
        .await?
        .is_some())
}

/// 给定工号中已有得奖记录的部分 (一次查询)
pub(crate) async fn existing_emp_ids(
    db: &DbPool,
    emp_ids: Vec<String>,
) -> Result<HashSet<String>, DbErr> {
    if emp_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let found = winners::Entity::find()
        .select_only()
        .column(winners::Column::EmpId)
        .filter(winners::Column::EmpId.is_in(emp_ids))
        .into_tuple::<String>()
        .all(db)
        .await?;
    Ok(found.into_iter().collect())
}

async fn insert_winner(db: &DbPool, winner: NewWinner) -> Result<winners::Model, DbErr> {
    winners::ActiveModel {
        award_id: Set(winner.award_id),
        award: Set(winner.award),
        emp_id: Set(winner.emp_id),
        emp_cname: Set(winner.emp_cname),
        emp_ename: Set(winner.emp_ename),
        emp_factory: Set(winner.emp_factory),
        won_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::memory_store;
    use crate::models::{BatchOutcome, CreateAwardRequest};
    use crate::services::AwardService;
    use sea_orm::ConnectionTrait;

    fn req(award_id: &str, award: &str, emp_id: &str) -> CreateWinnerRequest {
        CreateWinnerRequest {
            award_id: Some(award_id.into()),
            award: Some(award.into()),
            emp_id: Some(emp_id.into()),
            ..Default::default()
        }
    }

    async fn setup(award_ids: &[&str]) -> WinnerService {
        let store = memory_store().await;
        let award_service = AwardService::new(store.clone());
        for id in award_ids {
            award_service
                .create_award(CreateAwardRequest {
                    id: Some(id.to_string()),
                    award: Some(format!("Prize {id}")),
                    num: Some(3),
                })
                .await
                .unwrap();
        }
        WinnerService::new(store)
    }

    async fn ledger_size(service: &WinnerService) -> usize {
        service
            .list_winners(&WinnerQuery::default())
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_create_winner() {
        let service = setup(&["01"]).await;
        let created = service
            .create_winner(CreateWinnerRequest {
                emp_cname: Some("陳大明".into()),
                emp_factory: Some(String::new()),
                ..req("01", "Grand", "E1")
            })
            .await
            .unwrap();

        assert_eq!(created.emp_id, "E1");
        assert_eq!(created.emp_cname.as_deref(), Some("陳大明"));
        assert_eq!(created.emp_factory, None);
        assert_eq!(service.get_winner(created.id).await.unwrap().award_id, "01");
    }

    #[tokio::test]
    async fn test_create_winner_missing_fields() {
        let service = setup(&["01"]).await;
        let err = service
            .create_winner(req("01", "", "E1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_winner_unknown_award_is_validation_error() {
        let service = setup(&["01"]).await;
        let err = service
            .create_winner(req("ZZ", "X", "E1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m == AWARD_MISSING));
        assert_eq!(ledger_size(&service).await, 0);
    }

    #[tokio::test]
    async fn test_employee_cannot_win_twice() {
        let service = setup(&["01", "02"]).await;
        service.create_winner(req("01", "Grand", "E1")).await.unwrap();

        let err = service
            .create_winner(req("02", "Second", "E1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(ledger_size(&service).await, 1);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let service = setup(&["01", "02"]).await;
        service.create_winner(req("01", "Grand", "E1")).await.unwrap();
        service.create_winner(req("02", "Second", "E2")).await.unwrap();
        service.create_winner(req("02", "Second", "E3")).await.unwrap();

        let all = service.list_winners(&WinnerQuery::default()).await.unwrap();
        let emp_ids: Vec<&str> = all.iter().map(|w| w.emp_id.as_str()).collect();
        assert_eq!(emp_ids, vec!["E3", "E2", "E1"]);

        let second = service
            .list_winners(&WinnerQuery {
                award_id: Some("02".into()),
                emp_id: None,
            })
            .await
            .unwrap();
        assert_eq!(second.len(), 2);

        let one = service
            .list_winners(&WinnerQuery {
                award_id: Some("02".into()),
                emp_id: Some("E2".into()),
            })
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].emp_id, "E2");
    }

    #[tokio::test]
    async fn test_batch_catches_duplicates_within_batch() {
        let service = setup(&["01"]).await;
        let resp = service
            .batch_create(Some(vec![
                req("01", "Grand", "E1"),
                req("01", "Grand", "E1"),
            ]))
            .await
            .unwrap();

        assert_eq!(resp.created, 1);
        assert_eq!(resp.failed, 1);
        assert!(resp.success());
        assert_eq!(resp.outcome, BatchOutcome::Partial);
        assert_eq!(resp.results[0].emp_id, "E1");
        assert_eq!(resp.results[0].status, BatchItemStatus::Created);
        assert_eq!(resp.results[1].emp_id, "E1");
        assert_eq!(resp.results[1].status, BatchItemStatus::Duplicate);
        assert_eq!(ledger_size(&service).await, 1);
    }

    #[tokio::test]
    async fn test_batch_invalid_award() {
        let service = setup(&["01"]).await;
        let resp = service
            .batch_create(Some(vec![req("ZZ", "X", "E2")]))
            .await
            .unwrap();

        assert_eq!(resp.created, 0);
        assert_eq!(resp.failed, 1);
        assert!(!resp.success());
        assert_eq!(resp.outcome, BatchOutcome::Failed);
        assert_eq!(resp.results[0].emp_id, "E2");
        assert_eq!(resp.results[0].status, BatchItemStatus::InvalidAward);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_skips_existing_winners() {
        let service = setup(&["01", "02"]).await;
        service.create_winner(req("01", "Grand", "E9")).await.unwrap();

        let resp = service
            .batch_create(Some(vec![
                req("02", "Second", "E1"),
                req("02", "Second", "E9"),
                req("ZZ", "Nope", "E2"),
                req("02", "Second", "E3"),
            ]))
            .await
            .unwrap();

        let statuses: Vec<(String, BatchItemStatus)> = resp
            .results
            .iter()
            .map(|r| (r.emp_id.clone(), r.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("E1".to_string(), BatchItemStatus::Created),
                ("E9".to_string(), BatchItemStatus::Duplicate),
                ("E2".to_string(), BatchItemStatus::InvalidAward),
                ("E3".to_string(), BatchItemStatus::Created),
            ]
        );
        assert_eq!(resp.total, 4);
        assert_eq!(resp.created, 2);
        assert_eq!(ledger_size(&service).await, 3);
    }

    #[tokio::test]
    async fn test_batch_all_duplicates_is_nothing_new() {
        let service = setup(&["01"]).await;
        service.create_winner(req("01", "Grand", "E1")).await.unwrap();

        let resp = service
            .batch_create(Some(vec![req("01", "Grand", "E1")]))
            .await
            .unwrap();
        assert!(!resp.success());
        assert_eq!(resp.outcome, BatchOutcome::NothingNew);
    }

    #[tokio::test]
    async fn test_batch_rejects_empty_and_malformed() {
        let service = setup(&["01"]).await;

        let err = service.batch_create(Some(vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = service.batch_create(None).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .batch_create(Some(vec![
                req("01", "Grand", "E1"),
                req("01", "Grand", ""),
            ]))
            .await
            .unwrap_err();
        match err {
            AppError::InvalidBatchEntry { index, entry } => {
                assert_eq!(index, 1);
                assert_eq!(entry["award_id"], "01");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ledger_size(&service).await, 0);
    }

    #[tokio::test]
    async fn test_batch_delete_by_award() {
        let service = setup(&["01", "02"]).await;
        service
            .batch_create(Some(vec![
                req("01", "Grand", "E1"),
                req("01", "Grand", "E2"),
                req("01", "Grand", "E3"),
                req("02", "Second", "E4"),
            ]))
            .await
            .unwrap();

        let resp = service
            .batch_delete_by_award(Some("01".into()))
            .await
            .unwrap();
        assert_eq!(resp.deleted, 3);
        assert_eq!(resp.award_id, "01");
        let emp_ids: Vec<&str> = resp.winners.iter().map(|w| w.emp_id.as_str()).collect();
        assert_eq!(emp_ids, vec!["E1", "E2", "E3"]);
        assert_eq!(ledger_size(&service).await, 1);

        let resp = service
            .batch_delete_by_award(Some("01".into()))
            .await
            .unwrap();
        assert_eq!(resp.deleted, 0);
        assert!(resp.winners.is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete_unknown_award() {
        let service = setup(&["01"]).await;
        service.create_winner(req("01", "Grand", "E1")).await.unwrap();

        let err = service
            .batch_delete_by_award(Some("ZZ".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service.batch_delete_by_award(None).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(ledger_size(&service).await, 1);
    }

    #[tokio::test]
    async fn test_update_winner() {
        let service = setup(&["01", "02"]).await;
        let created = service
            .create_winner(CreateWinnerRequest {
                emp_cname: Some("王小明".into()),
                ..req("01", "Grand", "E1")
            })
            .await
            .unwrap();

        let updated = service
            .update_winner(
                created.id,
                WinnerPatch {
                    award_id: Some("02".into()),
                    award: Some("Second".into()),
                    emp_cname: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.award_id, "02");
        assert_eq!(updated.award, "Second");
        assert_eq!(updated.emp_cname, None);
        assert_eq!(updated.emp_id, "E1");
    }

    #[tokio::test]
    async fn test_update_winner_errors() {
        let service = setup(&["01"]).await;
        let first = service.create_winner(req("01", "Grand", "E1")).await.unwrap();
        service.create_winner(req("01", "Grand", "E2")).await.unwrap();

        let err = service
            .update_winner(first.id, WinnerPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .update_winner(
                first.id,
                WinnerPatch {
                    award_id: Some("ZZ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .update_winner(
                9999,
                WinnerPatch {
                    award: Some("x".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // 唯一索引兜底
        let err = service
            .update_winner(
                first.id,
                WinnerPatch {
                    emp_id: Some("E2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_and_reset() {
        let service = setup(&["01"]).await;
        let first = service.create_winner(req("01", "Grand", "E1")).await.unwrap();
        service.create_winner(req("01", "Grand", "E2")).await.unwrap();

        assert_eq!(service.delete_winner(first.id).await.unwrap().deleted, 1);
        assert_eq!(service.delete_winner(first.id).await.unwrap().deleted, 0);
        assert_eq!(service.reset_winners().await.unwrap().deleted, 1);
        assert_eq!(ledger_size(&service).await, 0);
    }

    #[tokio::test]
    async fn test_batch_store_rejection_is_per_item() {
        let service = setup(&["01"]).await;
        service
            .store
            .conn()
            .unwrap()
            .execute_unprepared(
                "CREATE TRIGGER reject_bad_emp BEFORE INSERT ON winner \
                 WHEN NEW.emp_id = 'BAD' \
                 BEGIN SELECT RAISE(ABORT, 'emp rejected by store'); END;",
            )
            .await
            .unwrap();

        let resp = service
            .batch_create(Some(vec![
                req("01", "Grand", "E1"),
                req("01", "Grand", "BAD"),
                req("01", "Grand", "E2"),
            ]))
            .await
            .unwrap();
        let statuses: Vec<BatchItemStatus> = resp.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                BatchItemStatus::Created,
                BatchItemStatus::Failed,
                BatchItemStatus::Created
            ]
        );
        assert!(
            resp.results[1]
                .error
                .as_deref()
                .is_some_and(|e| e.contains("emp rejected by store"))
        );
        assert_eq!(resp.outcome, BatchOutcome::Partial);
        assert_eq!(ledger_size(&service).await, 2);

        let resp = service
            .batch_create(Some(vec![req("01", "Grand", "BAD")]))
            .await
            .unwrap();
        assert_eq!(resp.created, 0);
        assert_eq!(resp.results[0].status, BatchItemStatus::Failed);
        assert_eq!(resp.outcome, BatchOutcome::Failed);
    }
}
