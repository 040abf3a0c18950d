mod cli;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use gembot_ai::{GeminiClient, GeminiConfig};
use gembot_config::Config;
use gembot_web::{start_server, ChatService, WebConfig};

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment.
    gembot_config::load_dotenv();

    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("gembot=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "gembot=info".parse().unwrap()),
            ),
        )
        .init();

    let config = Config::from_env();
    let api_key = config.gemini_api_key().await;
    let model = config.gemini_model().await;

    // A missing key is not fatal: the server starts and each chat turn
    // fails with an "Error: ..." reply until a key is supplied.
    if api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; chat turns will fail until one is provided");
        tracing::warn!("set GEMINI_API_KEY or TF_VAR_gemini_api_key in the environment or .env");
        tracing::warn!("free keys: https://aistudio.google.com/apikey");
    }

    tracing::info!(model = %model, "starting gembot");

    let client = GeminiClient::new(GeminiConfig::new(
        api_key.unwrap_or_default(),
        model.clone(),
    ));
    let service = Arc::new(ChatService::new(Arc::new(client)));

    let web_config = WebConfig {
        host: args.host,
        port: args.port,
    };
    if let Err(e) = start_server(&web_config, service, &model).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
