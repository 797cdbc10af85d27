use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use rfq_portal::api::ApiClient;
use rfq_portal::cache::{self, PageCache};
use rfq_portal::config::AppConfig;
use rfq_portal::handlers;
use rfq_portal::models::proposal::Submitter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();
    let api = ApiClient::new(&config.api_base_url);
    let submitter = web::Data::new(Submitter::new(api.clone()));
    let cache = web::Data::new(PageCache::new());

    // Pre-render the known tenders; everything else loads on first request.
    cache.prewarm(&api);
    cache::spawn_refresher(cache.clone(), api.clone());

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+) — generating random key", val.len());
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    let api = web::Data::new(api);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(api.clone())
            .app_data(config.clone())
            .app_data(cache.clone())
            .app_data(submitter.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Root redirect
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::SeeOther()
                    .insert_header(("Location", "/tenders"))
                    .finish()
            }))
            .route("/tenders", web::get().to(handlers::tender_handlers::list))
            .route(
                "/tenders/{id}/create-proposal",
                web::get().to(handlers::proposal_handlers::form),
            )
            .route(
                "/tenders/{id}/create-proposal",
                web::post().to(handlers::proposal_handlers::submit),
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
