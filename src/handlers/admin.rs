use crate::handlers::winner::batch_response;
use crate::models::*;
use crate::services::{DrawService, WinnerService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/admin/draw",
    tag = "admin",
    request_body = DrawRequest,
    responses(
        (status = 201, description = "抽出至少一位得奖者", body = BatchCreateWinnersResponse),
        (status = 400, description = "无剩余名额 / 无可抽候选人 / 一笔都未新增", body = ApiError),
        (status = 404, description = "奖项不存在", body = ApiError)
    )
)]
/// 从候选名单中随机抽出得奖者:
/// 1. 排除已得过奖的员工
/// 2. 人数缺省为剩余名额
/// 3. 结果与批量新增相同
pub async fn draw(
    service: web::Data<DrawService>,
    request: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    match service.draw(request.into_inner()).await {
        Ok(result) => Ok(batch_response(result)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/winners",
    tag = "admin",
    responses(
        (status = 200, description = "已清空全部得奖记录", body = DeleteResponse)
    )
)]
pub async fn reset_winners(service: web::Data<WinnerService>) -> Result<HttpResponse> {
    match service.reset_winners().await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            result,
            "All winners have been reset",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/draw", web::post().to(draw))
            .route("/winners", web::delete().to(reset_winners)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::testing::memory_store;
    use crate::handlers::json_config;
    use crate::services::AwardService;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_draw_then_reset() {
        let store = memory_store().await;
        AwardService::new(store.clone())
            .create_award(CreateAwardRequest {
                id: Some("07".into()),
                award: Some("七獎".into()),
                num: Some(2),
            })
            .await
            .unwrap();
        let winner_service = WinnerService::new(store.clone());
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .app_data(web::Data::new(winner_service.clone()))
                .app_data(web::Data::new(DrawService::new(store.clone(), winner_service)))
                .configure(admin_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/admin/draw")
            .set_json(json!({
                "award_id": "07",
                "candidates": [
                    { "emp_id": "E1", "emp_cname": "陳大明" },
                    { "emp_id": "E2" },
                    { "emp_id": "E3" }
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["created"], 2);

        // 名额已满
        let req = test::TestRequest::post()
            .uri("/admin/draw")
            .set_json(json!({ "award_id": "07", "candidates": [{ "emp_id": "E4" }] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::delete().uri("/admin/winners").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["deleted"], 2);
    }
}
