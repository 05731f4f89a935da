//! Node listing.

use anyhow::Result;

use super::ago;
use super::context::Ctx;

pub async fn cmd_nodes(ctx: &Ctx) -> Result<()> {
    let report = ctx.refresh().await;
    let nodes = ctx.registry.all();

    println!("═══════════════════════════════════════");
    println!("  Cluster Nodes ({})", nodes.len());
    println!("═══════════════════════════════════════");
    println!(
        "  Contacted {} · failed {} · reported {}",
        report.contacted, report.failed, report.discovered
    );

    if nodes.is_empty() {
        println!("\n  No nodes known.");
        return Ok(());
    }

    for node in &nodes {
        let s = node.snapshot();
        let icon = if s.is_active { "✓" } else { "✗" };
        let role = if s.is_master { " (master)" } else { "" };

        println!("  ┌─ {} {}{}", icon, s.short_node_id, role);
        println!("  │  address      : {}", s.transport_address);
        if let Some(id) = &s.node_id {
            println!("  │  node id      : {}", id);
        }
        if s.is_from_configuration {
            println!("  │  origin       : configuration");
        }
        if s.failure_count > 0 {
            println!("  │  failures     : {}", s.failure_count);
        }
        println!("  │  last seen    : {}", ago(s.last_seen));
        println!("  └─ last contact : {}", ago(s.last_contact));
    }

    Ok(())
}
