use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use lottery_board::{
    config::Config,
    database::connect_store,
    handlers,
    middlewares::create_cors,
    services::*,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 数据库不可用时不退出，接口统一返回 503
    let store = connect_store(&config.database).await;

    let award_service = AwardService::new(store.clone());
    let winner_service = WinnerService::new(store.clone());
    let board_service = BoardService::new(store.clone(), config.lottery.title.clone());
    let draw_service = DrawService::new(store.clone(), winner_service.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(web::Data::new(award_service.clone()))
            .app_data(web::Data::new(winner_service.clone()))
            .app_data(web::Data::new(board_service.clone()))
            .app_data(web::Data::new(draw_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::award_config)
                    .configure(handlers::winner_config)
                    .configure(handlers::board_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
