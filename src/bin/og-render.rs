//! Command-line front end: renders one card to a PNG file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use og_renderer::{OgConfig, OgService, RenderRequest, icon_keys, theme_names};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "og-render", version, about = "Render an Open Graph preview card")]
struct Args {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    subtitle: Option<String>,

    /// Icon key, e.g. `code`, `rocket`, `github`.
    #[arg(long)]
    icon: Option<String>,

    /// Theme name, or `custom` together with `--color`.
    #[arg(long)]
    theme: Option<String>,

    /// Hex color for the custom theme, with or without `#`.
    #[arg(long)]
    color: Option<String>,

    /// Emoji to show instead of the icon.
    #[arg(long)]
    emoji: Option<String>,

    /// JSON configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip remote fonts and icons.
    #[arg(long)]
    offline: bool,

    #[arg(long, short, value_name = "FILE", default_value = "og.png")]
    out: PathBuf,

    /// Print the built-in theme names and exit.
    #[arg(long)]
    list_themes: bool,

    /// Print the built-in icon keys and exit.
    #[arg(long)]
    list_icons: bool,
}

impl Args {
    fn request(&self) -> RenderRequest {
        let pairs = [
            ("title", &self.title),
            ("subtitle", &self.subtitle),
            ("icon", &self.icon),
            ("theme", &self.theme),
            ("color", &self.color),
            ("emoji", &self.emoji),
        ];
        RenderRequest::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (key, v))),
        )
    }

    fn load_config(&self) -> Result<OgConfig, String> {
        let config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                OgConfig::from_json(&json).map_err(|e| e.to_string())?
            }
            None => OgConfig::default(),
        };
        Ok(if self.offline {
            OgConfig {
                cache: config.cache,
                ..OgConfig::offline()
            }
        } else {
            config
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_themes {
        theme_names().for_each(|name| println!("{name}"));
        return ExitCode::SUCCESS;
    }
    if args.list_icons {
        icon_keys().for_each(|key| println!("{key}"));
        return ExitCode::SUCCESS;
    }

    let config = match args.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let service = match OgService::new(config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let response = service.respond(&args.request()).await;
    if !response.is_success() {
        eprintln!("{}", String::from_utf8_lossy(&response.body));
        return ExitCode::FAILURE;
    }

    if let Err(err) = std::fs::write(&args.out, &response.body) {
        eprintln!("cannot write {}: {err}", args.out.display());
        return ExitCode::FAILURE;
    }
    tracing::info!(path = %args.out.display(), bytes = response.body.len(), "wrote image");
    ExitCode::SUCCESS
}
