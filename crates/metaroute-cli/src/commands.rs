use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use metaroute_registry::{KindResolution, UnknownReason};
use metaroute_server::{describe_routes, directory_from_config, route_bases, MetaServer, RouteBase, ServerConfig};
use metaroute_types::{Action, ObjectId, RouteIdentity};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Routes(args) => cmd_routes(args, format),
        Command::Classify(args) => cmd_classify(args, format),
        Command::CheckConfig(args) => cmd_check_config(args, format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    tracing::debug!(path = ?path, "loading config");
    match path {
        Some(path) => {
            ServerConfig::load(path).with_context(|| format!("loading config from {}", path.display()))
        }
        None => Ok(ServerConfig::default()),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let server = MetaServer::new(config)?;
    let bases = route_bases(server.state().handlers.directory())?;
    println!(
        "{} Serving {} collection base(s) under /{} on {}",
        "✓".green().bold(),
        bases.len().to_string().bold(),
        server.config().namespace,
        server.config().bind_addr.to_string().cyan(),
    );
    server.serve().await?;
    Ok(())
}

fn cmd_routes(args: RoutesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    config.validate()?;
    let directory = directory_from_config(&config)?;
    let bases = route_bases(&directory)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&routes_json(&bases, &config.namespace))?),
        OutputFormat::Text => {
            for base in &bases {
                let kinds: Vec<String> = base.kinds.iter().map(|(family, name)| format!("{family}:{name}")).collect();
                let label = kinds.join(", ");
                if base.kinds.len() > 1 {
                    println!("{} ({}) {}", base.base.yellow().bold(), label, "ambiguous".red());
                } else {
                    println!("{} ({})", base.base.yellow().bold(), label.dimmed());
                }
                for line in describe_routes(std::slice::from_ref(base), &config.namespace) {
                    println!("  {line}");
                }
            }
            if bases.is_empty() {
                println!("No exposed kinds; only /health is served.");
            }
        }
    }
    Ok(())
}

fn routes_json(bases: &[RouteBase], namespace: &str) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = bases
        .iter()
        .map(|base| {
            serde_json::json!({
                "base": base.base,
                "kinds": base.kinds.iter().map(|(family, name)| serde_json::json!({
                    "family": family.as_str(),
                    "name": name,
                })).collect::<Vec<_>>(),
                "routes": describe_routes(std::slice::from_ref(base), namespace),
            })
        })
        .collect();
    serde_json::json!({ "namespace": namespace, "bases": entries })
}

fn cmd_classify(args: ClassifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let directory = directory_from_config(&config)?;
    let route = route_for_argument(&args.base);
    let resolution = directory.classify(&route.collection_base);
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "route": route,
                "resolution": resolution,
            }))?
        ),
        OutputFormat::Text => {
            if args.base.starts_with('/') {
                println!(
                    "{} base={} id={} key={}",
                    args.base.dimmed(),
                    route.collection_base,
                    route.object_id,
                    route.meta_key.as_deref().unwrap_or("-"),
                );
            }
            println!("{}", describe_resolution(&route.collection_base, &resolution));
        }
    }
    Ok(())
}

/// A leading `/` marks a full request path; anything else is a bare base.
fn route_for_argument(arg: &str) -> RouteIdentity {
    if arg.starts_with('/') {
        RouteIdentity::extract(arg)
    } else {
        RouteIdentity::new(arg, ObjectId::none(), None)
    }
}

fn describe_resolution(base: &str, resolution: &KindResolution) -> String {
    match resolution {
        KindResolution::Content(kind) | KindResolution::Classification(kind) => {
            let capability = |action| kind.capability_for(action).unwrap_or("(none)").to_string();
            format!(
                "{} -> {} kind {}\n  create: {}\n  delete: {}",
                base.bold(),
                kind.family,
                kind.internal_name.yellow(),
                capability(Action::Create).cyan(),
                capability(Action::Delete).cyan(),
            )
        }
        KindResolution::Unknown(reason) => {
            let hint = match reason {
                UnknownReason::Ambiguous { .. } => " (requests to this base are rejected)",
                _ => "",
            };
            format!("{} -> {}: {}{}", base.bold(), "unknown".red(), reason, hint)
        }
    }
}

fn cmd_check_config(args: CheckConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = ServerConfig::load(&args.path).with_context(|| format!("loading config from {}", args.path.display()))?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "valid": true,
                "bind_addr": config.bind_addr.to_string(),
                "namespace": config.namespace,
                "content_kinds": config.content_kinds.len(),
                "classification_kinds": config.classification_kinds.len(),
                "tokens": config.tokens.len(),
            })
        ),
        OutputFormat::Text => {
            println!("{} {} is valid", "✓".green().bold(), args.path.display());
            println!("  Bind: {}", config.bind_addr.to_string().cyan());
            println!("  Namespace: /{}", config.namespace);
            println!(
                "  Kinds: {} content, {} classification",
                config.content_kinds.len(),
                config.classification_kinds.len()
            );
            println!("  Tokens: {}", config.tokens.len());
        }
    }
    Ok(())
}
