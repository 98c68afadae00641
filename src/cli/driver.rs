use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::Path;
use tracing::debug;
use yangbind_model::{SchemaContext, load_schema_document};
use yangbind_reactor::{Reactor, ReactorOutput};

use crate::cli::args::CliArgs;
use crate::cli::config::{OutputFormat, ResolvedConfig, resolve_config};

/// Resolve configuration, run the reactor over the schema document and
/// build the JSON report printed by the binary.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<Value> {
    let config = resolve_config(args, cwd)?;
    debug!(schema = %config.schema.display(), ?config.options, "resolved configuration");

    let ctx = load_schema_document(&config.schema)
        .with_context(|| format!("failed to load schema document: {}", config.schema.display()))?;
    debug!(statements = ctx.len(), modules = ctx.modules().len(), "loaded schema");

    run_context(&ctx, &config)
}

/// Run the reactor over an already loaded context.
pub fn run_context(ctx: &SchemaContext, config: &ResolvedConfig) -> Result<Value> {
    let mut reactor =
        Reactor::new(ctx, config.options.clone()).context("failed to set up the reactor")?;
    let output = reactor.run().context("reactor run failed")?;
    report(ctx, output, config.output)
}

fn report(ctx: &SchemaContext, output: &ReactorOutput, format: OutputFormat) -> Result<Value> {
    let modules: Vec<Value> = output
        .modules()
        .iter()
        .map(|(module, &id)| {
            let name = ctx
                .module_by_namespace(module)
                .map(|info| info.name.clone())
                .unwrap_or_default();
            json!({
                "name": name,
                "namespace": module.namespace,
                "revision": module.revision,
                "dataRoot": output.type_name(id).map(|n| n.to_string()),
            })
        })
        .collect();

    let types: Vec<Value> = match format {
        OutputFormat::Names => output
            .generated_types()
            .map(|(id, ty)| {
                let mut entry = json!({
                    "statement": output.describe(ctx, id),
                    "name": ty.name.to_string(),
                });
                if let Some(key) = output.key_type_name(id) {
                    entry["key"] = Value::String(key.to_string());
                }
                entry
            })
            .collect(),
        OutputFormat::Types => output
            .generated_types()
            .flat_map(|(id, ty)| std::iter::once(ty).chain(output.key_type(id)))
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .context("failed to serialize generated types")?,
    };
    debug!(modules = modules.len(), types = types.len(), "built report");

    Ok(json!({ "modules": modules, "types": types }))
}
