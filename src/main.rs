use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;
use std::sync::Arc;

use leo_portal::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    store::SeaStore,
    swagger::swagger_config,
    utils::JwtService,
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

    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let pool = create_pool(&config.database).await.map_err(|e| {
        log::error!("Failed to connect to the database: {e}");
        std::io::Error::other(e.to_string())
    })?;

    run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run database migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let store = Arc::new(SeaStore::new(pool));

    let auth_service = AuthService::new(
        store.clone(),
        jwt_service.clone(),
        config.portal.bootstrap_admin_email.clone(),
    );
    let user_service = UserService::new(store.clone());
    let event_service = EventService::new(store.clone());
    let attendance_service = AttendanceService::new(store.clone(), store.clone());
    let points_service = PointsService::new(store.clone());
    let monthly_points_service =
        MonthlyPointsService::new(store.clone(), store.clone(), store.clone());
    let badge_service = BadgeService::new(store.clone(), store.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(event_service.clone()))
            .app_data(web::Data::new(attendance_service.clone()))
            .app_data(web::Data::new(points_service.clone()))
            .app_data(web::Data::new(monthly_points_service.clone()))
            .app_data(web::Data::new(badge_service.clone()))
            .configure(swagger_config)
            .service(web::scope("/api/v1").configure(handlers::api_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
