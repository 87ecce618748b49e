use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use wordpeek_config::Config;
use wordpeek_config::input::InputSource;
use wordpeek_dictionary::{DefinitionClient, DictionaryApiClient};
use wordpeek_types::Size;
use wordpeek_ui::{Surface, TerminalSurface};

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod selection;
pub mod state;
pub mod status;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputArg {
    Stdin,
    Clipboard,
    Websocket,
}

impl From<InputArg> for InputSource {
    fn from(arg: InputArg) -> Self {
        match arg {
            InputArg::Stdin => InputSource::Stdin,
            InputArg::Clipboard => InputSource::Clipboard,
            InputArg::Websocket => InputSource::Websocket,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wordpeek", about = "Select a word, get its definition", version)]
struct Args {
    /// JSON profile to load on top of env defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where selection events come from
    #[arg(short, long, value_enum)]
    input: Option<InputArg>,

    /// Dictionary API base URL
    #[arg(long)]
    api_base: Option<String>,

    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Start with lookups turned off
    #[arg(long)]
    disabled: bool,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(input) = self.input {
            config.input.source = input.into();
        }
        if let Some(base) = &self.api_base {
            config.dictionary.base_url = base.clone();
        }
        if let Some(ms) = self.debounce_ms {
            config.popup.debounce_ms = ms;
        }
        if self.disabled {
            config.enabled = false;
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if atty::is(atty::Stream::Stderr) {
        builder.init();
    } else {
        builder.json().init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing();

    let mut config = match &args.config {
        Some(path) => profile::load_config(path)?,
        None => Config::new(),
    };
    args.apply(&mut config);

    if args.print_config {
        println!("{}", profile::dump_config(&config)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));

    // stdin reads park a blocking thread that never returns on its own
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

async fn run(config: Config) -> anyhow::Result<()> {
    let viewport = Size::new(config.popup.viewport_width, config.popup.viewport_height);
    let client: Arc<dyn DefinitionClient> = Arc::new(DictionaryApiClient::new(&config.dictionary)?);
    let surface: Arc<dyn Surface> = Arc::new(TerminalSurface::new(viewport));

    tracing::info!(
        "WordPeek starting (input: {:?}, dictionary: {})",
        config.input.source,
        config.dictionary.base_url
    );

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let (mut tasks, _status) = controller.spawn_tasks(client, surface, true);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                controller.shutdown();
                break;
            }
            _ = controller.cancelled() => break,
            joined = tasks.join_next() => match joined {
                Some(Ok(Ok(()))) => tracing::debug!("Task finished"),
                Some(Ok(Err(e))) => {
                    tracing::error!("Task failed: {:#}", e);
                    controller.shutdown();
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!("Task panicked: {}", e);
                    controller.shutdown();
                    break;
                }
                None => break,
            },
        }
    }

    // let the controller tear down its popup before the runtime goes away
    while let Ok(Some(joined)) =
        tokio::time::timeout(Duration::from_millis(250), tasks.join_next()).await
    {
        if let Ok(Err(e)) = joined {
            tracing::warn!("Task failed during shutdown: {:#}", e);
        }
    }

    tracing::info!("WordPeek stopped");
    Ok(())
}
