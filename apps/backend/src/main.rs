use actix_web::{web, App, HttpServer};
use session_backend::config::{SessionOptions, SlackSettings};
use session_backend::logging::slack::SlackLayer;
use session_backend::middleware::RequestTrace;
use session_backend::routes;
use session_backend::state::{AppState, SessionConfig};
use session_backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Slack settings are read before the subscriber exists, so failures here
    // can only go to stderr.
    let slack = match SlackSettings::from_env() {
        Ok(Some(settings)) => match SlackLayer::from_settings(&settings) {
            Ok(pair) => Some(pair),
            Err(e) => {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
        },
        Ok(None) => None,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let (slack_layer, slack_worker) = match slack {
        Some((layer, worker)) => (Some(layer), Some(worker)),
        None => (None, None),
    };
    telemetry::init_tracing(slack_layer);
    if let Some(worker) = slack_worker {
        actix_web::rt::spawn(worker.run());
        tracing::info!("slack log forwarding enabled");
    }

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let session_config = match SessionOptions::from_env().and_then(SessionConfig::configure) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!("🚀 Starting session backend on http://{}:{}", host, port);
    tracing::info!(config = ?session_config, "session configuration loaded");

    let data = web::Data::new(AppState::new(session_config));

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
