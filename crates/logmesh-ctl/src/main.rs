//! logmesh-ctl: command-line interface for managing cluster nodes.

use anyhow::{Context, Result};

mod cmd;

use cmd::context::Ctx;
use logmesh_core::config::LogmeshConfig;

fn print_usage() {
    println!("Usage: logmesh-ctl [--node <url>]... <command>");
    println!();
    println!("Commands:");
    println!("  nodes                                 Refresh and list known nodes (default)");
    println!("  system <node>                         Hostname, processing state, throughput");
    println!("  pause <node>                          Pause message processing");
    println!("  resume <node>                         Resume message processing");
    println!("  threaddump <node>                     Print the node's thread dump");
    println!("  loggers <node>                        List internal loggers");
    println!("  buffers <node>                        Show buffer utilization");
    println!("  metrics <node> <namespace>            List metrics in a namespace");
    println!("  inputs <node>                         List running inputs");
    println!("  input-types <node>                    List available input types");
    println!("  launch <node> <type> <title> [--exclusive] [--config key=value]...");
    println!("                                        Launch an input");
    println!("  terminate <node> <input-id>           Stop an input");
    println!("  config init                           Write the default config file");
    println!();
    println!("<node> is a transport address (http://host:port) or a node id.");
    println!();
    println!("Options:");
    println!("  --node <url>   Node to contact; repeatable. Overrides configured nodes.");
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut nodes: Vec<String> = Vec::new();
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--node" {
            i += 1;
            nodes.push(args.get(i).context("--node requires a value")?.clone());
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    if let ["config", "init"] = remaining.as_slice() {
        return cmd::config::cmd_config_init();
    }
    if let ["help"] | ["--help"] | ["-h"] = remaining.as_slice() {
        print_usage();
        return Ok(());
    }

    let config = LogmeshConfig::load().context("failed to load config")?;
    let ctx = Ctx::new(config, &nodes)?;

    match remaining.as_slice() {
        ["nodes"] | [] => cmd::nodes::cmd_nodes(&ctx).await,
        ["system", node] => cmd::system::cmd_system(&ctx, node).await,
        ["pause", node] => cmd::system::cmd_pause(&ctx, node).await,
        ["resume", node] => cmd::system::cmd_resume(&ctx, node).await,
        ["threaddump", node] => cmd::system::cmd_threaddump(&ctx, node).await,
        ["loggers", node] => cmd::system::cmd_loggers(&ctx, node).await,
        ["buffers", node] => cmd::system::cmd_buffers(&ctx, node).await,
        ["metrics", node, namespace] => cmd::system::cmd_metrics(&ctx, node, namespace).await,
        ["inputs", node] => cmd::inputs::cmd_inputs(&ctx, node).await,
        ["input-types", node] => cmd::inputs::cmd_input_types(&ctx, node).await,
        ["launch", node, input_type, title, rest @ ..] => {
            cmd::inputs::cmd_launch(&ctx, node, input_type, title, rest).await
        }
        ["terminate", node, input_id] => cmd::inputs::cmd_terminate(&ctx, node, input_id).await,
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
