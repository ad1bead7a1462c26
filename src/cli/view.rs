//! Read-only manifest commands (tree, summary, invalid)

use std::path::Path;

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::{self, Axis, ManifestSummary, RenderedNode};
use crate::storage::{open_source, Config, SharedSource};

/// Opens and loads the source at `path`, failing if it cannot be read
async fn load(output: &Output, config: &Config, path: &Path) -> Result<SharedSource> {
    let source = open_source(path, &config.project.extensions).await;
    let set = source.init().await;
    output.verbose_ctx(
        "load",
        &format!(
            "Loaded {} manifests ({} invalid) from {}",
            set.len(),
            set.invalid_len(),
            path.display()
        ),
    );

    if set.invalid_source {
        bail!("Could not read or parse manifests at {}", path.display());
    }
    Ok(source)
}

/// Show manifests grouped along one axis
pub async fn tree(
    output: &Output,
    config: &Config,
    path: &Path,
    axis: Axis,
    depth: Option<usize>,
) -> Result<()> {
    let source = load(output, config, path).await?;
    let set = source.init().await;
    let nodes = domain::expand(axis, axis.select(&set.indexes), depth);

    if output.is_json() {
        output.data(&serde_json::json!({
            "axis": axis,
            "nodes": nodes,
        }));
    } else if nodes.is_empty() {
        println!("No valid manifests found.");
    } else {
        output.tree(&nodes);
    }

    Ok(())
}

/// Show manifest counts and the top level of every axis
pub async fn summary(output: &Output, config: &Config, path: &Path) -> Result<()> {
    let source = load(output, config, path).await?;
    let set = source.init().await;

    let tops: Vec<(Axis, Vec<RenderedNode>)> = Axis::ALL
        .iter()
        .map(|axis| (*axis, domain::expand(*axis, axis.select(&set.indexes), Some(1))))
        .collect();

    if output.is_json() {
        let axes: serde_json::Map<String, serde_json::Value> = tops
            .iter()
            .map(|(axis, nodes)| {
                let labels = nodes.iter().map(|n| n.label.clone()).collect::<Vec<_>>();
                (axis.to_string(), serde_json::json!(labels))
            })
            .collect();
        output.data(&serde_json::json!({
            "path": path,
            "total": set.len(),
            "valid": set.valid_len(),
            "invalid": set.invalid_len(),
            "axes": axes,
        }));
    } else {
        println!("Manifests: {}", set.len());
        println!("  Valid:   {}", set.valid_len());
        println!("  Invalid: {}", set.invalid_len());
        for (axis, nodes) in &tops {
            println!();
            println!("By {}:", axis);
            if nodes.is_empty() {
                println!("  (none)");
            }
            for node in nodes {
                println!("  {}", node.label);
            }
        }
    }

    Ok(())
}

/// List documents that are not valid manifests
pub async fn invalid(output: &Output, config: &Config, path: &Path) -> Result<()> {
    let source = load(output, config, path).await?;
    let set = source.init().await;

    if output.is_json() {
        let items: Vec<ManifestSummary> = set
            .invalid_manifests
            .iter()
            .map(|m| ManifestSummary::from(m.as_ref()))
            .collect();
        output.data(&items);
    } else if set.invalid_manifests.is_empty() {
        println!("No invalid documents.");
    } else {
        println!("Invalid documents ({}):", set.invalid_len());
        println!("{:<40} {:<16} {:<24} NAME", "LOCATION", "KIND", "API VERSION");
        println!("{}", "-".repeat(90));
        for m in &set.invalid_manifests {
            let location = match m.position() {
                Some(pos) => format!("{}:{}:{}", m.source_path().display(), pos.line, pos.column),
                None => m.source_path().display().to_string(),
            };
            println!(
                "{:<40} {:<16} {:<24} {}",
                location,
                m.kind().unwrap_or("-"),
                m.api_version().unwrap_or("-"),
                m.name().unwrap_or("-")
            );
        }
    }

    Ok(())
}
