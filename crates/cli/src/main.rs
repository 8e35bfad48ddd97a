use clap::{Parser, Subcommand};
use http::Method;
use std::path::Path;
use std::sync::Arc;

use addonkit_core::bundle::{Bundle, BundleProvider};
use addonkit_core::config::{config_path, load_config, save_config, AppConfig};
use addonkit_core::exchange::AddonRequest;
use addonkit_core::provider::{Provider, StubProvider};
use addonkit_core::router::Router;
use addonkit_core::schema::ResourceName;

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "addonkit")]
#[command(about = "Validate addon bundles and dry-run the addon router")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a bundle file (manifest, metas, streams)
    Validate {
        /// Bundle file (.toml or .json)
        #[arg(required = true)]
        bundle: String,
    },

    /// Route a request path and print the response
    Route {
        /// Request path, e.g. /manifest.json or /<token>/catalog/movie/top.json
        #[arg(required = true)]
        path: String,

        /// Bundle file to serve; defaults to the configured bundle
        #[arg(short, long)]
        bundle: Option<String>,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize default config file
    Init,
    /// Show current configuration
    Show,
    /// Print the config file location
    Path,
    /// Set a configuration value
    Set {
        /// Key (dot-separated path)
        key: String,
        /// Value
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Validate { bundle } => run_validate(bundle, cli.json),
        Commands::Route { path, bundle, method } => run_route(path, bundle.as_deref(), method, cli.json),
        Commands::Config { action } => run_config(action, cli.json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_validate(bundle_path: &str, json: bool) -> CliResult {
    let bundle = Bundle::load(Path::new(bundle_path))?;
    let manifest = &bundle.manifest;
    let resources: Vec<ResourceName> = manifest.resources.iter().map(|r| r.name).collect();
    let streams: usize = bundle.streams.values().map(Vec::len).sum();

    if json {
        let out = serde_json::json!({
            "valid": true,
            "id": manifest.id,
            "version": manifest.version,
            "resources": resources,
            "catalogs": manifest.catalogs.len(),
            "metas": bundle.metas.len(),
            "streams": streams,
            "secured": bundle.is_secured(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} {} ({})", manifest.name, manifest.version, manifest.id);
        let names: Vec<&str> = resources.iter().map(|r| r.as_str()).collect();
        println!("  Resources: {}", names.join(", "));
        println!("  Catalogs:  {}", manifest.catalogs.len());
        println!("  Metas:     {}", bundle.metas.len());
        println!("  Streams:   {}", streams);
        if bundle.is_secured() {
            println!("  Secured:   {} token(s)", bundle.tokens.len());
        }
        println!("OK");
    }
    Ok(())
}

fn run_route(target: &str, bundle_path: Option<&str>, method: &str, json: bool) -> CliResult {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("Invalid HTTP method: {}", method))?;

    let provider: Arc<dyn Provider> = match bundle_path
        .map(Path::new)
        .map(Path::to_path_buf)
        .or_else(|| load_config().bundle_path())
    {
        Some(path) => Arc::new(BundleProvider::open(path)?),
        None => {
            tracing::warn!("no bundle given or configured; routing against the stub provider");
            Arc::new(StubProvider::new())
        }
    };

    let response = Router::new(provider).handle(&AddonRequest::new(method, target));
    let body = String::from_utf8_lossy(response.body());

    if json {
        let headers: serde_json::Map<String, serde_json::Value> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().unwrap_or_default();
                (name.as_str().to_string(), serde_json::Value::from(value))
            })
            .collect();
        let body = serde_json::from_str::<serde_json::Value>(&body)
            .unwrap_or_else(|_| serde_json::Value::from(&*body));
        let out = serde_json::json!({
            "status": response.status().as_u16(),
            "headers": headers,
            "body": body,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", response.status());
        for (name, value) in response.headers() {
            println!("{}: {}", name, value.to_str().unwrap_or_default());
        }
        if !body.is_empty() {
            println!();
            println!("{}", body);
        }
    }
    Ok(())
}

fn run_config(action: &ConfigAction, json: bool) -> CliResult {
    match action {
        ConfigAction::Init => {
            let path = config_path().ok_or("Could not determine config directory")?;
            save_config(&AppConfig::default(), &path)?;
            println!("Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let cfg = load_config();
            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else {
                println!("{}", cfg.to_toml()?);
            }
        }
        ConfigAction::Path => {
            let path = config_path().ok_or("Could not determine config directory")?;
            if json {
                println!("{}", serde_json::json!({ "path": path }));
            } else {
                println!("{}", path.display());
            }
        }
        ConfigAction::Set { key, value } => {
            let path = config_path().ok_or("Could not determine config directory")?;
            let mut cfg = load_config();
            set_config_key(&mut cfg, key, value)?;
            save_config(&cfg, &path)?;
            if !json {
                println!("Updated {}", key);
            }
        }
    }
    Ok(())
}

fn set_config_key(cfg: &mut AppConfig, key: &str, value: &str) -> CliResult {
    match key {
        "server.bind" => cfg.server.bind = value.to_string(),
        "server.watch" => {
            cfg.server.watch = value
                .parse()
                .map_err(|_| format!("Expected true or false for {}, got {:?}", key, value))?
        }
        "bundle.path" => cfg.bundle.path = Some(value.to_string()).filter(|v| !v.is_empty()),
        "logging.filter" => cfg.logging.filter = value.to_string(),
        _ => return Err(format!("Unknown key: {}", key).into()),
    }
    Ok(())
}
