pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod validation;

use actix_web::web;

/// Full route table under `/api`, shared by `main` and the integration
/// tests so both exercise the same wiring. Application state is
/// registered separately by the caller.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    let json_cfg = web::JsonConfig::default().error_handler(|err, _req| {
        handlers::ApiError::Validation(format!("Invalid request body: {err}")).into()
    });
    let query_cfg = web::QueryConfig::default().error_handler(|err, _req| {
        handlers::ApiError::Validation(format!("Invalid query string: {err}")).into()
    });

    cfg.app_data(json_cfg).app_data(query_cfg).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/profile", web::get().to(auth::get_profile))
                    .route("/profile", web::put().to(auth::update_profile))
                    .route("/password", web::put().to(auth::change_password))
                    .route("/verify", web::get().to(auth::verify)),
            )
            .service(
                web::scope("/budget")
                    .route("/summary", web::get().to(handlers::summary))
                    .route("/entries", web::get().to(handlers::list_entries))
                    .route("/entries/{category}", web::post().to(handlers::add_entry))
                    .route("/entries/{id}", web::put().to(handlers::update_entry))
                    .route("/entries/{id}", web::delete().to(handlers::delete_entry))
                    .route(
                        "/monthly/{year}/{month}",
                        web::get().to(handlers::monthly_totals),
                    )
                    .route("/reset", web::delete().to(handlers::reset)),
            )
            .default_service(web::route().to(handlers::not_found)),
    );
}
