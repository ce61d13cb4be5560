use anyhow::Context;
use parlance::api::ChatClient;
use parlance::config;
use parlance::controller::{spawn_controller, ChatController};
use parlance::logging;
use parlance::render::MarkdownRenderer;
use parlance::store::FileStore;
use parlance::ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    config::initialize_config().context("failed to initialize configuration")?;
    let cfg = config::get_config();

    let _logger = logging::init_logging(&cfg.log_level).context("failed to start logging")?;

    let history_path = match &cfg.history_path {
        Some(path) => path.clone(),
        None => FileStore::default_path()?,
    };

    let client = ChatClient::new(&cfg.backend_url, cfg.request_timeout_secs)?;
    let controller = ChatController::new(
        client,
        FileStore::new(history_path),
        MarkdownRenderer::new(),
        cfg.bot_name.clone(),
    );
    let (command_tx, event_rx) = spawn_controller(controller);

    ui::run_ui(command_tx, event_rx)
        .await
        .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    Ok(())
}
