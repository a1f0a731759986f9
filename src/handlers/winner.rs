use crate::models::*;
use crate::services::WinnerService;
use actix_web::{HttpResponse, ResponseError, Result, web};

/// 批量结果：至少新增一笔返回 201，否则 400 (响应体相同)
pub(crate) fn batch_response(result: BatchCreateWinnersResponse) -> HttpResponse {
    let body = ApiResponse {
        success: result.success(),
        message: Some(result.message()),
        data: Some(result),
        count: None,
    };
    if body.success {
        HttpResponse::Created().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

#[utoipa::path(
    get,
    path = "/winners",
    tag = "winner",
    params(
        ("award_id" = Option<String>, Query, description = "按奖项过滤"),
        ("emp_id" = Option<String>, Query, description = "按工号过滤")
    ),
    responses(
        (status = 200, description = "得奖者列表 (得奖时间倒序)", body = [WinnerResponse])
    )
)]
pub async fn list_winners(
    service: web::Data<WinnerService>,
    query: web::Query<WinnerQuery>,
) -> Result<HttpResponse> {
    match service.list_winners(&query.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::list(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/winners",
    tag = "winner",
    request_body = CreateWinnerRequest,
    responses(
        (status = 201, description = "新增得奖者成功", body = WinnerResponse),
        (status = 400, description = "缺少必填字段或奖项不存在", body = ApiError),
        (status = 409, description = "该员工已得奖", body = ApiError)
    )
)]
pub async fn create_winner(
    service: web::Data<WinnerService>,
    request: web::Json<CreateWinnerRequest>,
) -> Result<HttpResponse> {
    match service.create_winner(request.into_inner()).await {
        Ok(winner) => Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
            winner,
            "Winner created successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/winners/{id}",
    tag = "winner",
    params(("id" = i32, Path, description = "得奖记录ID")),
    responses(
        (status = 200, description = "获取得奖者成功", body = WinnerResponse),
        (status = 404, description = "记录不存在", body = ApiError)
    )
)]
pub async fn get_winner(
    service: web::Data<WinnerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.get_winner(path.into_inner()).await {
        Ok(winner) => Ok(HttpResponse::Ok().json(ApiResponse::success(winner))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/winners/{id}",
    tag = "winner",
    params(("id" = i32, Path, description = "得奖记录ID")),
    request_body = UpdateWinnerRequest,
    responses(
        (status = 200, description = "更新成功", body = WinnerResponse),
        (status = 400, description = "没有可更新的字段或奖项不存在", body = ApiError),
        (status = 404, description = "记录不存在", body = ApiError),
        (status = 409, description = "工号与其他得奖者重复", body = ApiError)
    )
)]
pub async fn update_winner(
    service: web::Data<WinnerService>,
    path: web::Path<i32>,
    request: web::Json<UpdateWinnerRequest>,
) -> Result<HttpResponse> {
    let patch = WinnerPatch::from(request.into_inner());
    match service.update_winner(path.into_inner(), patch).await {
        Ok(winner) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            winner,
            "Winner updated successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/winners/{id}",
    tag = "winner",
    params(("id" = i32, Path, description = "得奖记录ID")),
    responses(
        (status = 200, description = "删除完成 (不存在时 deleted = 0)", body = DeleteResponse)
    )
)]
pub async fn delete_winner(
    service: web::Data<WinnerService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.delete_winner(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            result,
            "Winner deleted successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/winners/batch",
    tag = "winner",
    request_body = BatchCreateWinnersRequest,
    responses(
        (status = 201, description = "至少新增一笔", body = BatchCreateWinnersResponse),
        (status = 400, description = "一笔都未新增，或请求结构不合法", body = BatchCreateWinnersResponse)
    )
)]
/// 批量新增得奖者，逐笔返回 created / duplicate / invalid_award / failed
pub async fn batch_create_winners(
    service: web::Data<WinnerService>,
    request: web::Json<BatchCreateWinnersRequest>,
) -> Result<HttpResponse> {
    let entries = match request.into_inner().into_entries() {
        Ok(entries) => entries,
        Err(e) => return Ok(e.error_response()),
    };
    match service.batch_create(entries).await {
        Ok(result) => Ok(batch_response(result)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/winners/batch",
    tag = "winner",
    params(("award_id" = String, Query, description = "奖项编号")),
    responses(
        (status = 200, description = "删除该奖项全部得奖者", body = BatchDeleteWinnersResponse),
        (status = 400, description = "缺少 award_id", body = ApiError),
        (status = 404, description = "奖项不存在", body = ApiError)
    )
)]
pub async fn batch_delete_winners(
    service: web::Data<WinnerService>,
    query: web::Query<BatchDeleteQuery>,
) -> Result<HttpResponse> {
    match service.batch_delete_by_award(query.into_inner().award_id).await {
        Ok(result) => {
            let message = if result.deleted == 0 {
                format!("No winners found for award {}", result.award_id)
            } else {
                format!(
                    "Successfully deleted {} winner(s) for award {}",
                    result.deleted, result.award_id
                )
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(result, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (batch 必须先于 {id} 注册)
pub fn winner_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/winners")
            .route("", web::get().to(list_winners))
            .route("", web::post().to(create_winner))
            .route("/batch", web::post().to(batch_create_winners))
            .route("/batch", web::delete().to(batch_delete_winners))
            .route("/{id}", web::get().to(get_winner))
            .route("/{id}", web::put().to(update_winner))
            .route("/{id}", web::delete().to(delete_winner)),
    );
}
