//! System, processing, diagnostics and metrics commands.

use anyhow::{Result, bail};

use super::context::Ctx;

pub async fn cmd_system(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    let api = &ctx.api;

    let hostname = node.hostname(api).await.unwrap_or_else(|| "unknown".into());
    let processing = match node.is_processing(api).await.ready() {
        Some(true) => "running",
        Some(false) => "paused",
        None => "unknown",
    };
    let throughput = node.throughput(api).await.unwrap_or(0);
    let inputs = node.number_of_inputs(api).await?;

    println!("═══════════════════════════════════════");
    println!("  {}", node);
    println!("═══════════════════════════════════════");
    println!("  Hostname   : {}", hostname);
    println!("  Processing : {}", processing);
    println!("  Throughput : {} msg/s", throughput);
    println!("  Inputs     : {}", inputs);
    if let Some(info) = node.system_info() {
        println!("  Version    : {}", info.version);
        println!("  Lifecycle  : {}", info.lifecycle);
    }

    Ok(())
}

pub async fn cmd_pause(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    if !node.pause(&ctx.api).await {
        bail!("could not pause processing on {}", node);
    }
    println!("Processing paused on {}.", node.transport_address());
    Ok(())
}

pub async fn cmd_resume(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    if !node.resume(&ctx.api).await {
        bail!("could not resume processing on {}", node);
    }
    println!("Processing resumed on {}.", node.transport_address());
    Ok(())
}

pub async fn cmd_threaddump(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    match node.thread_dump(&ctx.api).await.ready() {
        Some(dump) => println!("{}", dump),
        None => bail!("could not fetch thread dump from {}", node),
    }
    Ok(())
}

pub async fn cmd_loggers(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    let mut loggers = node.all_loggers(&ctx.api).await.unwrap_or_default();
    loggers.sort_by(|a, b| a.name.cmp(&b.name));

    println!("═══════════════════════════════════════");
    println!("  Loggers ({})", loggers.len());
    println!("═══════════════════════════════════════");
    for l in &loggers {
        println!("  {:<48} {:<6} (syslog {})", l.name, l.level, l.syslog_level);
    }
    Ok(())
}

pub async fn cmd_buffers(ctx: &Ctx, target: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    let Some(info) = node.buffer_info(&ctx.api).await.ready() else {
        bail!("could not read buffer info from {}", node);
    };

    println!("═══════════════════════════════════════");
    println!("  Buffers");
    println!("═══════════════════════════════════════");
    for (name, b) in [
        ("input", info.input),
        ("process", info.process),
        ("output", info.output),
    ] {
        println!(
            "  {:<8} {:>6.1}%  ({}/{})",
            name, b.utilization_percent, b.utilization, b.size
        );
    }
    Ok(())
}

pub async fn cmd_metrics(ctx: &Ctx, target: &str, namespace: &str) -> Result<()> {
    let node = ctx.node(target).await?;
    let metrics = node.metrics(&ctx.api, namespace).await.unwrap_or_default();

    if metrics.is_empty() {
        println!("No metrics under {}.", namespace);
        return Ok(());
    }

    let mut names: Vec<_> = metrics.keys().collect();
    names.sort();

    println!("═══════════════════════════════════════");
    println!("  Metrics: {} ({})", namespace, metrics.len());
    println!("═══════════════════════════════════════");
    for name in names {
        let m = &metrics[name];
        println!("  ┌─ {}", name);
        println!("  │  type  : {}", m.metric_type);
        println!("  └─ value : {}", m.value);
    }
    Ok(())
}
