use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::award::list_awards,
        handlers::award::create_award,
        handlers::award::get_award,
        handlers::award::update_award,
        handlers::award::delete_award,
        handlers::winner::list_winners,
        handlers::winner::create_winner,
        handlers::winner::get_winner,
        handlers::winner::update_winner,
        handlers::winner::delete_winner,
        handlers::winner::batch_create_winners,
        handlers::winner::batch_delete_winners,
        handlers::board::get_board,
        handlers::board::search_board,
        handlers::admin::draw,
        handlers::admin::reset_winners,
    ),
    components(
        schemas(
            ApiError,
            DeleteResponse,
            CreateAwardRequest,
            UpdateAwardRequest,
            AwardResponse,
            CreateWinnerRequest,
            UpdateWinnerRequest,
            WinnerQuery,
            WinnerResponse,
            BatchCreateWinnersRequest,
            BatchItemStatus,
            BatchItemResult,
            BatchOutcome,
            BatchCreateWinnersResponse,
            BatchDeleteQuery,
            DeletedWinnerSummary,
            BatchDeleteWinnersResponse,
            BoardTab,
            BoardQuery,
            BoardSearchQuery,
            BoardWinner,
            BoardPrize,
            BoardResponse,
            BoardSearchResult,
            DrawCandidate,
            DrawRequest,
        )
    ),
    tags(
        (name = "award", description = "Award catalog API"),
        (name = "winner", description = "Winner ledger API"),
        (name = "board", description = "Lottery board display API"),
        (name = "admin", description = "Drawing panel API"),
    ),
    info(
        title = "Lottery Board API",
        version = "1.0.0",
        description = "Year-end party lottery results REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_batch_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/winners/batch"));
        assert!(doc.paths.paths.contains_key("/admin/draw"));
    }
}
