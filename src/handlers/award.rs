use crate::models::*;
use crate::services::AwardService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/awards",
    tag = "award",
    responses(
        (status = 200, description = "获取全部奖项 (按 id 升序)", body = [AwardResponse]),
        (status = 503, description = "数据库未配置", body = ApiError)
    )
)]
pub async fn list_awards(service: web::Data<AwardService>) -> Result<HttpResponse> {
    match service.list_awards().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::list(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/awards",
    tag = "award",
    request_body = CreateAwardRequest,
    responses(
        (status = 201, description = "创建奖项成功", body = AwardResponse),
        (status = 400, description = "缺少必填字段", body = ApiError),
        (status = 409, description = "奖项编号已存在", body = ApiError)
    )
)]
pub async fn create_award(
    service: web::Data<AwardService>,
    request: web::Json<CreateAwardRequest>,
) -> Result<HttpResponse> {
    match service.create_award(request.into_inner()).await {
        Ok(award) => Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
            award,
            "Award created successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/awards/{id}",
    tag = "award",
    params(("id" = String, Path, description = "奖项编号")),
    responses(
        (status = 200, description = "获取奖项成功", body = AwardResponse),
        (status = 404, description = "奖项不存在", body = ApiError)
    )
)]
pub async fn get_award(
    service: web::Data<AwardService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.get_award(&path.into_inner()).await {
        Ok(award) => Ok(HttpResponse::Ok().json(ApiResponse::success(award))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/awards/{id}",
    tag = "award",
    params(("id" = String, Path, description = "奖项编号")),
    request_body = UpdateAwardRequest,
    responses(
        (status = 200, description = "更新奖项成功", body = AwardResponse),
        (status = 400, description = "没有可更新的字段", body = ApiError),
        (status = 404, description = "奖项不存在", body = ApiError)
    )
)]
pub async fn update_award(
    service: web::Data<AwardService>,
    path: web::Path<String>,
    request: web::Json<UpdateAwardRequest>,
) -> Result<HttpResponse> {
    let patch = AwardPatch::from(request.into_inner());
    match service.update_award(&path.into_inner(), patch).await {
        Ok(award) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            award,
            "Award updated successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/awards/{id}",
    tag = "award",
    params(("id" = String, Path, description = "奖项编号")),
    responses(
        (status = 200, description = "删除完成 (不存在时 deleted = 0)", body = DeleteResponse)
    )
)]
/// 删除奖项，不会删除引用它的得奖记录
pub async fn delete_award(
    service: web::Data<AwardService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.delete_award(&path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            result,
            "Award deleted successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn award_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/awards")
            .route("", web::get().to(list_awards))
            .route("", web::post().to(create_award))
            .route("/{id}", web::get().to(get_award))
            .route("/{id}", web::put().to(update_award))
            .route("/{id}", web::delete().to(delete_award)),
    );
}
