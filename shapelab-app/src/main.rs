mod cli;
mod output;
mod preferences;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};

use shapelab_core::{
    compose_reflections, rotate_translate_rotate, transform_shape, ReflectionEvent,
    ReflectionSession,
};
use shapelab_engine::Pipeline;

use cli::{Cli, Command, ComplexArgs, ConfigArgs, MatrixArgs, MotionArgs, ReflectArgs};
use preferences::LabPreferences;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting ShapeLab");

    let config_path = preferences::config_path(cli.config.as_deref());
    let prefs = LabPreferences::load(&config_path);
    let pretty = cli.pretty || prefs.pretty_json;

    let doc = run(cli.command, &prefs, &config_path)?;
    println!("{}", output::render(&doc, pretty)?);
    Ok(())
}

/// Execute one command and build its JSON document.
fn run(command: Command, prefs: &LabPreferences, config_path: &Path) -> Result<Value> {
    match command {
        Command::Complex(args) => complex(&args, prefs),
        Command::Matrix(args) => matrix(&args),
        Command::Reflect(args) => Ok(reflect(&args)),
        Command::Motion(args) => Ok(motion(&args)),
        Command::Config(args) => config(&args, prefs, config_path),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn complex(args: &ComplexArgs, prefs: &LabPreferences) -> Result<Value> {
    let relation = args.relation.as_deref().unwrap_or(&prefs.default_relation);
    let function = args.function.as_deref().unwrap_or(&prefs.default_function);
    let config = args.sampler_config(prefs.sampler);
    debug!(relation, function, ?config, "complex");

    let pipeline = Pipeline::new(config).context("invalid sampler settings")?;
    let outcome = pipeline.run(relation, function);
    Ok(output::complex_document(relation, function, &outcome))
}

fn matrix(args: &MatrixArgs) -> Result<Value> {
    let shape = args.shape()?;
    let image = transform_shape(&shape, &args.matrix)?;
    debug!(points = image.shape.len(), det = args.matrix.det(), "matrix");
    Ok(output::matrix_document(&shape, &args.matrix, &image))
}

fn reflect(args: &ReflectArgs) -> Value {
    let (mut session, mut view) = ReflectionSession::default().handle(ReflectionEvent::Configure {
        first: args.first,
        second: args.second,
    });
    let mut views = Vec::with_capacity(args.points.len().max(1));
    if args.points.is_empty() {
        views.push(view);
    }
    for &p in &args.points {
        (session, view) = session.handle(ReflectionEvent::Click(p));
        views.push(view);
    }
    output::reflect_document(&compose_reflections(args.first, args.second), &views)
}

fn motion(args: &MotionArgs) -> Value {
    let m = rotate_translate_rotate(args.alpha, args.translate, args.beta);
    output::motion_document(&m, args.point)
}

fn config(args: &ConfigArgs, prefs: &LabPreferences, config_path: &Path) -> Result<Value> {
    if args.write {
        prefs.save(config_path)?;
        info!("Wrote preferences to {}", config_path.display());
    }
    Ok(serde_json::json!({
        "path": config_path,
        "preferences": prefs,
    }))
}
