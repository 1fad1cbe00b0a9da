use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use stepform_editor::{EditorContext, render_outline, resolve_kind, root_editor_provider, step_editor_provider};
use stepform_registry::{ManifestCache, RegistryConfig};
use stepform_types::{Definition, Step};
use tracing::{debug, info};

fn main() -> Result<()> {
    init_tracing();
    let matches = build_cli().get_matches();
    let config = RegistryConfig::load();

    match matches.subcommand() {
        Some(("render", sub)) => run_render(&config, sub),
        Some(("kinds", sub)) => run_kinds(&config, sub),
        _ => anyhow::bail!("expected a subcommand; see --help"),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_cli() -> Command {
    let definition = Arg::new("definition")
        .long("definition")
        .short('d')
        .required(true)
        .action(ArgAction::Set)
        .help("Path to a flow definition JSON file");
    let cache = Arg::new("cache")
        .long("cache")
        .action(ArgAction::Set)
        .help("Path to a cache manifest; overrides the configured one");

    Command::new("stepform")
        .about("Render schema-driven step editors as a text outline")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Print the editor tree for the root settings or one step")
                .arg(definition.clone())
                .arg(cache.clone())
                .arg(Arg::new("step").long("step").short('s').action(ArgAction::Set).help("Id of the step to edit"))
                .arg(Arg::new("readonly").long("readonly").action(ArgAction::SetTrue).help("Render with all inputs disabled")),
        )
        .subcommand(
            Command::new("kinds")
                .about("Print the widget kind chosen for each field of a step")
                .arg(definition)
                .arg(cache)
                .arg(Arg::new("step").long("step").short('s').required(true).action(ArgAction::Set)),
        )
}

/// Logs designer notifications; the CLI has no designer to redraw.
struct LoggingContext;

impl EditorContext for LoggingContext {
    fn notify_properties_changed(&self) {
        info!("properties changed");
    }

    fn notify_name_changed(&self) {
        info!("name changed");
    }
}

fn run_render(config: &RegistryConfig, matches: &ArgMatches) -> Result<()> {
    let definition = load_definition(matches)?;
    let cache = load_cache(config, matches)?;
    let readonly = matches.get_flag("readonly") || config.readonly;

    let editor = match matches.get_one::<String>("step") {
        Some(step_id) => {
            let step = find_step(&definition, step_id)?;
            let editor = step_editor_provider(&step, Rc::new(LoggingContext), &definition, &cache)
                .with_context(|| format!("failed to build the editor for step '{step_id}'"))?;
            editor.set_readonly(readonly);
            editor
        }
        None => root_editor_provider(&definition, Rc::new(LoggingContext), readonly),
    };
    print!("{}", render_outline(editor.panel()));
    Ok(())
}

fn run_kinds(config: &RegistryConfig, matches: &ArgMatches) -> Result<()> {
    let definition = load_definition(matches)?;
    let cache = load_cache(config, matches)?;
    let step_id = matches.get_one::<String>("step").context("missing --step")?;
    let step = find_step(&definition, step_id)?;

    for (scope, fields) in [("property", &step.properties), ("parameter", &step.parameters)] {
        let mut keys: Vec<&String> = fields.keys().collect();
        keys.sort();
        for key in keys {
            let descriptor = fields[key]
                .descriptor(key)
                .with_context(|| format!("field '{key}' has an unusable option source"))?;
            println!("{scope}\t{key}\t{}", resolve_kind(&descriptor, &cache));
        }
    }
    Ok(())
}

fn load_definition(matches: &ArgMatches) -> Result<Rc<RefCell<Definition>>> {
    let path = matches.get_one::<String>("definition").context("missing --definition")?;
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read definition {path}"))?;
    let definition: Definition = serde_json::from_str(&content).with_context(|| format!("failed to parse definition {path}"))?;
    debug!(path = %path, steps = definition.sequence.len(), "Loaded definition");
    Ok(Rc::new(RefCell::new(definition)))
}

fn load_cache(config: &RegistryConfig, matches: &ArgMatches) -> Result<ManifestCache> {
    match matches.get_one::<String>("cache") {
        Some(path) => ManifestCache::load(path).with_context(|| format!("failed to load cache manifest {path}")),
        None => ManifestCache::from_config(config).context("failed to load the configured cache manifest"),
    }
}

fn find_step(definition: &Rc<RefCell<Definition>>, step_id: &str) -> Result<Step> {
    definition
        .borrow()
        .find_step(step_id)
        .cloned()
        .with_context(|| format!("step '{step_id}' not found in definition"))
}
