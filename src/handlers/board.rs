use crate::models::*;
use crate::services::BoardService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/board",
    tag = "board",
    params(
        ("tab" = Option<BoardTab>, Query, description = "页签过滤: special_top / tier_2_5 / tier_6_10 / tier_11_13 / comfort / other")
    ),
    responses(
        (status = 200, description = "看板数据 (按名次排序，姓名已遮罩)", body = BoardResponse),
        (status = 503, description = "数据库未配置", body = ApiError)
    )
)]
pub async fn get_board(
    service: web::Data<BoardService>,
    query: web::Query<BoardQuery>,
) -> Result<HttpResponse> {
    match service.board(query.into_inner().tab).await {
        Ok(board) => Ok(HttpResponse::Ok().json(ApiResponse::success(board))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/board/search",
    tag = "board",
    params(("q" = Option<String>, Query, description = "姓名 / 部门 / 工号关键字")),
    responses(
        (status = 200, description = "匹配的得奖者", body = [BoardSearchResult])
    )
)]
/// 搜索得奖者；空关键字返回空列表
pub async fn search_board(
    service: web::Data<BoardService>,
    query: web::Query<BoardSearchQuery>,
) -> Result<HttpResponse> {
    match service.search(query.into_inner().q).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::list(results))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn board_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/board")
            .route("", web::get().to(get_board))
            .route("/search", web::get().to(search_board)),
    );
}
