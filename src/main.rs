// Entrypoint for the news dashboard.
// - Loads `.env`, sets up logging, reads the configuration and hands over
//   to the interactive loop.
// - Returns `anyhow::Result` so startup failures print a readable chain.

use news_dashboard::{api::looks_like_api_key, app::App, config::Config, ui::Ui};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `news_dashboard=debug`.
const LOG_ENV: &str = "NEWS_DASHBOARD_LOG";

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    configure_logging();

    let mut ui = Ui::stdout();
    ui.clear()?;
    ui.header()?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            ui.error(&e.to_string())?;
            ui.info("Please update your .env file with a valid API key")?;
            ui.info("Get your free API key at: https://newsapi.org/register")?;
            std::process::exit(1);
        }
    };

    if !looks_like_api_key(&config.api_key) {
        ui.warning("NEWS_API_KEY looks too short; requests may be rejected")?;
        ui.press_enter()?;
    }

    let mut app = App::new(config, ui)?;
    app.run()
}

fn configure_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = tracing_subscriber::fmt::format().with_target(false).compact();

    tracing_subscriber::fmt()
        .event_format(format)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
