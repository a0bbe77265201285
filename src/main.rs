use tracing_subscriber::EnvFilter;

use newsdeck::app::App;
use newsdeck::config::Config;
use newsdeck::error::{ApiError, AppError, Result};
use newsdeck::ui;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsdeck=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        match &err {
            AppError::Api(ApiError::Auth(message)) => {
                ui::show_error(message);
                ui::show_info("Get a free API key at https://newsapi.org/register");
            }
            other => ui::show_error(&other.to_string()),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::load()?;
    let mut app = App::new(config)?;
    app.run().await
}
