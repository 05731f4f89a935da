//! Input commands.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};

use logmesh_core::NodeError;
use logmesh_core::api::InputLaunchRequest;

use super::context::Ctx;

pub async fn cmd_inputs(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    let inputs = node.inputs(&ctx.api).await?;

    if inputs.is_empty() {
        println!("No inputs running on {}.", node.transport_address());
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Inputs on {} ({})", node.short_node_id(), inputs.len());
    println!("═══════════════════════════════════════");
    for input in &inputs {
        println!("  ┌─ {}", input.title());
        println!("  │  id   : {}", input.id());
        println!("  └─ type : {}", input.input_type());
    }
    Ok(())
}

pub async fn cmd_input_types(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    let types = node.all_input_type_information(&ctx.api).await?;

    let mut names: Vec<_> = types.keys().collect();
    names.sort();

    println!("═══════════════════════════════════════");
    println!("  Input Types ({})", types.len());
    println!("═══════════════════════════════════════");
    for name in names {
        let t = &types[name];
        let exclusive = if t.is_exclusive { " [exclusive]" } else { "" };
        println!("  {:<40} {}{}", name, t.name, exclusive);
    }
    Ok(())
}

/// Parse `--exclusive` and `--config key=value` flags.
fn parse_launch_flags(rest: &[&str]) -> Result<(bool, HashMap<String, serde_json::Value>)> {
    let mut exclusive = false;
    let mut configuration = HashMap::new();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--exclusive" => exclusive = true,
            "--config" => {
                i += 1;
                let pair = rest.get(i).context("--config requires key=value")?;
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("--config expects key=value, got {pair}"))?;
                // numbers and booleans go over as JSON, everything else as a string
                let value = serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
                configuration.insert(key.to_string(), value);
            }
            other => bail!("unexpected argument: {other}"),
        }
        i += 1;
    }
    Ok((exclusive, configuration))
}

pub async fn cmd_launch(
    ctx: &Ctx,
    target: &str,
    input_type: &str,
    title: &str,
    rest: &[&str],
) -> Result<()> {
    let (exclusive, configuration) = parse_launch_flags(rest)?;
    let node = ctx.node(target).await?;

    let request = InputLaunchRequest {
        title: title.to_string(),
        input_type: input_type.to_string(),
        configuration,
        creator_user_id: std::env::var("USER").unwrap_or_else(|_| "logmesh-ctl".into()),
    };

    match node.launch_input(&ctx.api, &request, exclusive).await {
        Ok(true) => println!("Launched {} ({}) on {}.", title, input_type, node.transport_address()),
        Ok(false) => bail!("node {} did not accept the launch request", node),
        Err(NodeError::ExclusiveInput { input_type, .. }) => {
            bail!("an input of type {input_type} is already running and the type is exclusive")
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub async fn cmd_terminate(ctx: &Ctx, target: &str, input_id: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    if !node.terminate_input(&ctx.api, input_id).await {
        bail!("could not terminate input {} on {}", input_id, node);
    }
    println!("Terminated input {}.", input_id);
    Ok(())
}
