use crate::database::Store;
use crate::entities::award_entity as awards;
use crate::error::{AppError, AppResult};
use crate::models::{AwardPatch, AwardResponse, CreateAwardRequest, DeleteResponse, non_empty};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set, SqlErr};

#[derive(Clone)]
pub struct AwardService {
    store: Store,
}

impl AwardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// 全部奖项，按 id 升序
    pub async fn list_awards(&self) -> AppResult<Vec<AwardResponse>> {
        let db = self.store.conn()?;
        let list = awards::Entity::find()
            .order_by_asc(awards::Column::Id)
            .all(db)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_award(&self, id: &str) -> AppResult<AwardResponse> {
        let db = self.store.conn()?;
        awards::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Award not found".to_string()))
    }

    pub async fn create_award(&self, request: CreateAwardRequest) -> AppResult<AwardResponse> {
        let db = self.store.conn()?;

        let (Some(id), Some(name), Some(num)) =
            (non_empty(request.id), non_empty(request.award), request.num)
        else {
            return Err(AppError::ValidationError(
                "Missing required fields: id, award, num".to_string(),
            ));
        };
        if num < 0 {
            return Err(AppError::ValidationError(
                "num must be a non-negative integer".to_string(),
            ));
        }

        if awards::Entity::find_by_id(id.clone()).one(db).await?.is_some() {
            return Err(AppError::Conflict("Award ID already exists".to_string()));
        }

        let now = Utc::now();
        let model = awards::ActiveModel {
            id: Set(id),
            award: Set(name),
            num: Set(num),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Award ID already exists".to_string())
            }
            _ => AppError::from(e),
        })?;

        log::info!("Award {} created ({} slots)", model.id, model.num);
        Ok(model.into())
    }

    /// 更新名称和/或名额；两者都未提供时拒绝
    pub async fn update_award(&self, id: &str, patch: AwardPatch) -> AppResult<AwardResponse> {
        let db = self.store.conn()?;

        if patch.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        if patch.num.is_some_and(|n| n < 0) {
            return Err(AppError::ValidationError(
                "num must be a non-negative integer".to_string(),
            ));
        }

        let model = awards::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Award not found".to_string()))?;

        let mut am = model.into_active_model();
        if let Some(name) = patch.award {
            am.award = Set(name);
        }
        if let Some(num) = patch.num {
            am.num = Set(num);
        }
        am.updated_at = Set(Utc::now());
        let updated = am.update(db).await?;

        Ok(updated.into())
    }

    /// 无条件删除，不检查是否仍有得奖记录引用
    pub async fn delete_award(&self, id: &str) -> AppResult<DeleteResponse> {
        let db = self.store.conn()?;
        let result = awards::Entity::delete_by_id(id.to_string()).exec(db).await?;
        if result.rows_affected > 0 {
            log::info!("Award {id} deleted");
        }
        Ok(DeleteResponse {
            deleted: result.rows_affected,
        })
    }
}
