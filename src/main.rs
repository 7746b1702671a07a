use legal_aid::configuration::get_configuration;
use legal_aid::db;
use legal_aid::startup::run;
use legal_aid::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("legal-aid".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().expect("Failed to read configuration.");

    tracing::info!(db_path = %settings.database.path, "Opening SQLite database");
    let pool = db::connect(&settings.database)
        .await
        .expect("Failed to open database.");

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)
        .unwrap_or_else(|err| panic!("failed to bind to {}: {}", address, err));

    run(listener, pool, settings).await?.await
}
