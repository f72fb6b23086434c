//! web-search: run a query through the web search provider
//!
//! Enables the extension against the built-in controller, searches, opens
//! the result and disables again. Also lists and selects engines.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use web_search_provider::{
    config::{self, FileSettingsStore, SettingsStore},
    extension::{ExtensionMetadata, WebSearchExtension},
    host::{FixedScale, PrintLauncher, SystemLauncher, UrlLauncher},
    prefs::EnginePreferences,
    search::ProviderRegistry,
};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    list: bool,
    select: Option<usize>,
    dry_run: bool,
    terms: Vec<String>,
}

enum Command {
    Run(Args),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1))? {
        Command::Run(args) => args,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("web-search {}", web_search_provider::VERSION);
            return Ok(());
        }
    };

    let settings = config::load(args.config.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting web-search v{}", web_search_provider::VERSION);

    let store: Arc<dyn SettingsStore> = Arc::new(
        FileSettingsStore::open(settings.store_path())
            .with_context(|| format!("opening {}", settings.store_path().display()))?,
    );

    if args.list || args.select.is_some() {
        let mut prefs = EnginePreferences::fill_from(
            &settings.catalog.data_dir,
            &settings.catalog.file_name,
            store,
        )?;
        if let Some(index) = args.select {
            prefs.select(index)?;
        }
        for (i, name) in prefs.names().iter().enumerate() {
            let marker = if i as i64 == prefs.selected() { "*" } else { " " };
            println!("{} {:>2}  {}", marker, i, name);
        }
        return Ok(());
    }

    if args.terms.is_empty() {
        print_usage();
        bail!("no search terms given");
    }

    let launcher: Arc<dyn UrlLauncher> = if args.dry_run {
        Arc::new(PrintLauncher::new())
    } else if let Some(ref command) = settings.launcher.command {
        Arc::new(SystemLauncher::with_command(command.clone()))
    } else {
        Arc::new(SystemLauncher::new())
    };

    let controller = ProviderRegistry::new();
    let mut extension = WebSearchExtension::new(
        ExtensionMetadata::from_settings(&settings),
        store,
        launcher,
        Arc::new(FixedScale(settings.display.scale_factor)),
    );
    extension
        .enable(&controller)
        .with_context(|| format!("loading {}", settings.catalog_path().display()))?;
    info!("Provider {} ready", extension.metadata().uuid);

    let results = controller.search(args.terms).await;
    let Some(first) = results.iter().find(|r| !r.metas.is_empty()) else {
        extension.disable(&controller);
        bail!("no results");
    };

    let meta = &first.metas[0];
    info!("{}: {}", meta.name, meta.description);
    controller.activate(&first.provider_id, &meta.id);

    extension.disable(&controller);
    Ok(())
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--list" => parsed.list = true,
            "--select" => {
                let value = args.next().context("--select needs an index")?;
                parsed.select = Some(value.parse().context("--select needs an index")?);
            }
            "--dry-run" => parsed.dry_run = true,
            "--" => parsed.terms.extend(args.by_ref()),
            other if other.starts_with('-') && other.len() > 1 => {
                bail!("unknown option: {}", other)
            }
            _ => parsed.terms.push(arg),
        }
    }

    Ok(Command::Run(parsed))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
web-search v{}
Open a web search for the given terms with the configured engine

USAGE:
    web-search [OPTIONS] <TERMS>...

OPTIONS:
    -c, --config <FILE>    Path to configuration file
        --list             List engines, marking the selected one
        --select <N>       Select engine N and persist it
        --dry-run          Print the URL instead of opening it
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    WEBSEARCH_SETTINGS_PATH  Path to settings.yml
    WEBSEARCH_DEBUG          Enable debug logging (true/false)
    WEBSEARCH_DATA_DIR       Directory holding search-engines.json
    WEBSEARCH_SCALE_FACTOR   Icon scale factor
    WEBSEARCH_UUID           Provider identifier
    WEBSEARCH_STORE_PATH     Path of the persisted engine selection
"#,
        web_search_provider::VERSION
    );
}
