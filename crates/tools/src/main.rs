mod latent;
mod remote;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use catalog::{
    DescriptorSource, JsonSource, LayerCatalog, StaticSource, load_catalog, malaysia_layers,
};
use clap::{Parser, Subcommand};
use layers::{
    InitializeReport, LayerRegistry, LayerStatus, LifecycleController, LifecycleState,
    RegistryMetrics, StyleTable,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::latent::LatentSurface;
use crate::remote::HttpSource;

const CATALOG_ENV: &str = "ATLAS_LAYERS_CATALOG";

#[derive(Parser, Debug)]
#[command(name = "atlas-layers", about = "Inspect and exercise map layer catalogs")]
struct Cli {
    /// Layer catalog JSON file (falls back to $ATLAS_LAYERS_CATALOG, then the built-in Malaysia set).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Fetch the layer catalog from a REST endpoint; takes precedence over --catalog.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Validate ids and style templates.
    Check,
    /// Attach the catalog to an in-memory surface and report the result.
    Simulate {
        /// Make the surface reject this layer (repeatable).
        #[arg(long = "fail", value_name = "ID")]
        fail: Vec<String>,
        /// Toggle this layer while materialization is in flight (repeatable).
        #[arg(long = "toggle", value_name = "ID")]
        toggle: Vec<String>,
        /// Set opacity while materialization is in flight, as ID=VALUE (repeatable).
        #[arg(long = "opacity", value_name = "ID=VALUE", value_parser = parse_opacity_edit)]
        opacity: Vec<(String, f32)>,
        /// Base attach latency per layer in milliseconds.
        #[arg(long, default_value_t = 0)]
        latency_ms: u64,
        /// Detach before materialization settles.
        #[arg(long)]
        detach_early: bool,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = real_main(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn real_main(cli: Cli) -> Result<(), String> {
    let catalog = resolve_catalog(cli.catalog, cli.url).await?;

    match cli.command {
        Command::List { json } => cmd_list(&catalog, json),
        Command::Check => cmd_check(&catalog),
        Command::Simulate {
            fail,
            toggle,
            opacity,
            latency_ms,
            detach_early,
            json,
        } => {
            let opts = SimulateOptions {
                fail,
                toggle,
                opacity,
                latency: Duration::from_millis(latency_ms),
                detach_early,
                json,
            };
            cmd_simulate(catalog, opts).await
        }
    }
}

async fn resolve_catalog(
    path: Option<PathBuf>,
    url: Option<String>,
) -> Result<LayerCatalog, String> {
    let path = path.or_else(|| env::var(CATALOG_ENV).ok().map(PathBuf::from));
    let source: Box<dyn DescriptorSource> = match (url, path) {
        (Some(url), _) => Box::new(HttpSource::new(url)),
        (None, Some(path)) => Box::new(JsonSource::from_path(&path).map_err(|e| e.to_string())?),
        (None, None) => Box::new(StaticSource::new(malaysia_layers())),
    };
    info!(source = source.name(), "loading layer catalog");
    load_catalog(source.as_ref())
        .await
        .map_err(|e| e.to_string())
}

#[derive(Serialize)]
struct PanelRow {
    id: String,
    name: String,
    kind: String,
    visible: bool,
    opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    materialized: Option<bool>,
}

impl PanelRow {
    fn from_status(status: &LayerStatus) -> Self {
        let d = &status.descriptor;
        Self {
            id: d.id.clone(),
            name: d.display_name.clone(),
            kind: d.kind.to_string(),
            visible: d.visible,
            opacity: d.opacity.get(),
            materialized: Some(status.materialized),
        }
    }
}

fn cmd_list(catalog: &LayerCatalog, json: bool) -> Result<(), String> {
    if json {
        let payload = serde_json::to_string_pretty(catalog.as_slice())
            .map_err(|e| format!("json: {e}"))?;
        println!("{payload}");
        return Ok(());
    }

    let rows: Vec<PanelRow> = catalog
        .iter()
        .map(|d| PanelRow {
            id: d.id.clone(),
            name: d.display_name.clone(),
            kind: d.kind.to_string(),
            visible: d.visible,
            opacity: d.opacity.get(),
            materialized: None,
        })
        .collect();
    print_rows(&rows);
    eprintln!(
        "{} layers, {} visible",
        catalog.len(),
        catalog.visible_count()
    );
    Ok(())
}

fn cmd_check(catalog: &LayerCatalog) -> Result<(), String> {
    let styles = StyleTable::default();
    let mut problems = 0usize;
    for d in catalog {
        if !d.kind.is_recognized() {
            eprintln!("note: {}: unrecognized kind {:?}, generic style applies", d.id, d.kind.as_str());
        }
        if let Err(e) = styles.render(d) {
            eprintln!("error: {e}");
            problems += 1;
        }
    }
    if problems > 0 {
        return Err(format!("{problems} layer(s) would fail to materialize"));
    }
    eprintln!("ok: {} layers, {} visible", catalog.len(), catalog.visible_count());
    Ok(())
}

struct SimulateOptions {
    fail: Vec<String>,
    toggle: Vec<String>,
    opacity: Vec<(String, f32)>,
    latency: Duration,
    detach_early: bool,
    json: bool,
}

struct Simulation {
    state: LifecycleState,
    report: InitializeReport,
    rows: Vec<PanelRow>,
    metrics: RegistryMetrics,
    drawables: usize,
    visible: usize,
}

/// Attaches the catalog to a latent in-memory surface. Attaches are held
/// until the requested edits (and an early detach) have been applied, so
/// they always land while materialization is in flight.
async fn run_simulation(catalog: LayerCatalog, opts: &SimulateOptions) -> Simulation {
    let surface = Arc::new(LatentSurface::new(opts.latency));
    for id in &opts.fail {
        surface.inner().reject_layer(id.clone());
    }
    surface.inner().hold();

    let controller = LifecycleController::new(LayerRegistry::new(catalog));
    let registry = controller.registry().clone();

    let edits = async {
        tokio::task::yield_now().await;
        for id in &opts.toggle {
            registry.toggle_visibility(id);
        }
        for (id, value) in &opts.opacity {
            registry.set_opacity(id, *value);
        }
        if opts.detach_early {
            controller.detach();
        }
        surface.inner().release();
    };
    let (report, ()) = tokio::join!(controller.attach(surface.clone()), edits);

    Simulation {
        state: controller.state(),
        report,
        rows: registry.layer_panel().iter().map(PanelRow::from_status).collect(),
        metrics: registry.metrics(),
        drawables: surface.inner().drawable_count(),
        visible: registry.visible_count(),
    }
}

async fn cmd_simulate(catalog: LayerCatalog, opts: SimulateOptions) -> Result<(), String> {
    let sim = run_simulation(catalog, &opts).await;
    if opts.json {
        let payload = serde_json::json!({
            "state": format!("{:?}", sim.state),
            "report": report_json(&sim.report),
            "layers": sim.rows,
            "drawables": sim.drawables,
        });
        let text = serde_json::to_string_pretty(&payload).map_err(|e| format!("json: {e}"))?;
        println!("{text}");
    } else {
        print_rows(&sim.rows);
        let m = sim.metrics;
        eprintln!(
            "state={:?} epoch={} materialized={} failed={} stale={} drawables={} visible={}",
            sim.state,
            sim.report.epoch,
            m.materialized,
            m.failed,
            m.stale_discarded,
            sim.drawables,
            sim.visible
        );
    }
    Ok(())
}

fn report_json(report: &InitializeReport) -> serde_json::Value {
    serde_json::json!({
        "epoch": report.epoch.value(),
        "requested": report.requested,
        "materialized": report.materialized,
        "failed": report.failed,
        "stale": report.stale,
    })
}

fn print_rows(rows: &[PanelRow]) {
    let id_w = rows.iter().map(|r| r.id.len()).max().unwrap_or(2).max(2);
    let kind_w = rows.iter().map(|r| r.kind.len()).max().unwrap_or(4).max(4);
    for r in rows {
        let mark = match r.materialized {
            Some(true) => " live",
            Some(false) => " ----",
            None => "",
        };
        println!(
            "{:<id_w$}  {:<kind_w$}  {}  {:.2}{}  {}",
            r.id,
            r.kind,
            if r.visible { "on " } else { "off" },
            r.opacity,
            mark,
            r.name,
        );
    }
}

fn parse_opacity_edit(raw: &str) -> Result<(String, f32), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got {raw:?}"))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid opacity {value:?}: {e}"))?;
    Ok((id.trim().to_string(), value))
}
