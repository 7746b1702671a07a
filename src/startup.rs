use crate::configuration::Settings;
use crate::connectors;
use crate::health::HealthChecker;
use crate::helpers;
use crate::routes;
use crate::services::session_registry::spawn_idle_sweeper;
use crate::services::{DocumentGenerator, LegalChatbot, SessionRegistry, TemplateCatalog};
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use sqlx::SqlitePool;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pool: SqlitePool,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    // External service connectors; disabled ones fall back to mocks
    let llm = connectors::init_llm(&settings.connectors);
    let retriever = connectors::init_retriever(&settings.connectors);
    let identity: web::Data<Arc<dyn connectors::IdentityConnector>> =
        web::Data::new(connectors::init_identity(&settings.connectors));

    let output_dir = settings.documents.output_dir.clone();
    tokio::fs::create_dir_all(&output_dir).await?;

    let catalog = TemplateCatalog::new(&settings.documents.templates_dir);
    let generator = Arc::new(DocumentGenerator::new(catalog, &output_dir));
    let chatbot = LegalChatbot::new(
        llm.clone(),
        retriever.clone(),
        generator.clone(),
        settings.chatbot.clone(),
        settings.public_url.clone(),
    )
    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let chatbot = web::Data::new(chatbot);
    let generator = web::Data::from(generator);

    let registry = Arc::new(SessionRegistry::new());
    spawn_idle_sweeper(
        registry.clone(),
        Duration::from_secs(settings.sessions.idle_ttl_secs),
        Duration::from_secs(settings.sessions.sweep_interval_secs),
    );
    let registry = web::Data::from(registry);

    let health_checker = web::Data::new(HealthChecker::new(pool.clone(), llm, retriever));

    let settings = web::Data::new(settings);
    let pool = web::Data::new(pool);
    let json_config = web::JsonConfig::default().error_handler(helpers::json_error_handler);
    let query_config = web::QueryConfig::default().error_handler(helpers::query_error_handler);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(Cors::permissive())
            .service(routes::root)
            .service(
                web::scope("/health_check")
                    .service(routes::health_check)
                    .service(routes::health_components),
            )
            .service(
                web::scope("/chat")
                    .service(routes::chat::send_handler)
                    .service(routes::chat::save_handler)
                    .service(routes::chat::restore_handler)
                    .service(routes::chat::history_handler)
                    .service(routes::chat::session_handler)
                    .service(routes::chat::new_handler),
            )
            .service(web::scope("/session").service(routes::session::reset_handler))
            .service(routes::templates::list_handler)
            .service(web::scope("/document").service(routes::document::generate_handler))
            .service(routes::auth::signup_handler)
            .service(routes::auth::login_handler)
            .service(Files::new("/generated_documents", &output_dir))
            .app_data(json_config.clone())
            .app_data(query_config.clone())
            .app_data(pool.clone())
            .app_data(settings.clone())
            .app_data(registry.clone())
            .app_data(chatbot.clone())
            .app_data(generator.clone())
            .app_data(identity.clone())
            .app_data(health_checker.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
