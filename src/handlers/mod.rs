pub mod admin;
pub mod award;
pub mod board;
pub mod winner;

pub use admin::admin_config;
pub use award::award_config;
pub use board::board_config;
pub use winner::winner_config;

use crate::error::AppError;
use actix_web::web;

/// 请求体解析失败统一按参数错误返回
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {err}")).into()
    })
}

/// 查询参数解析失败 (如未知的 tab) 同样按参数错误返回
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query string: {err}")).into()
    })
}
