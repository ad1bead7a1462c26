//! Follow mode: stdin drives the active document
//!
//! Each line on stdin is treated as an "active document changed" event.
//! Whenever the explorer swaps its source, all three trees are redrawn.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::output::Output;
use crate::domain::{Axis, RenderedNode, TreeNode};
use crate::explorer::{Explorer, ManifestsTree};
use crate::storage::Config;

pub async fn run(
    output: &Output,
    config: &Config,
    active: Option<&Path>,
    depth: Option<usize>,
) -> Result<()> {
    let explorer = Explorer::new(config.project.clone(), active);
    let mut changes = explorer
        .tree(Axis::Kind)
        .context("Explorer has no kind tree")?
        .subscribe();

    // the initial source is not a change, so draw it up front
    redraw(output, &explorer, depth).await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            // drain pending redraws before reading the next event
            biased;

            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                changes.borrow_and_update();
                redraw(output, &explorer, depth).await;
            }

            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let path = line.trim();
                if path.is_empty() {
                    continue;
                }
                if !explorer.activate(Path::new(path)).await {
                    output.verbose_ctx("follow", &format!("Ignoring non-manifest path: {}", path));
                }
            }
        }
    }

    Ok(())
}

async fn redraw(output: &Output, explorer: &Explorer, depth: Option<usize>) {
    let Some(first) = explorer.trees().first() else {
        return;
    };
    let Some(source) = first.source().await else {
        return;
    };

    let mut trees = Vec::new();
    for tree in explorer.trees() {
        trees.push((tree.axis(), expand(tree, None, depth).await));
    }
    let invalid_source = source.get().is_some_and(|set| set.invalid_source);

    if output.is_json() {
        let rendered: serde_json::Map<String, serde_json::Value> = trees
            .into_iter()
            .map(|(axis, nodes)| (axis.to_string(), serde_json::json!(nodes)))
            .collect();
        output.data(&serde_json::json!({
            "path": source.path(),
            "invalid_source": invalid_source,
            "trees": rendered,
        }));
        return;
    }

    println!("== {} ==", source.path().display());
    if invalid_source {
        println!("Could not read or parse this document.");
        return;
    }
    for (axis, nodes) in &trees {
        println!("[{}]", axis);
        if nodes.is_empty() {
            println!("  (none)");
        }
        output.tree(nodes);
    }
}

/// Expands a tree through its lazy `children` interface
fn expand<'a>(
    tree: &'a ManifestsTree,
    parent: Option<&'a TreeNode>,
    depth: Option<usize>,
) -> Pin<Box<dyn Future<Output = Vec<RenderedNode>> + 'a>> {
    Box::pin(async move {
        if depth == Some(0) {
            return Vec::new();
        }

        let mut rendered = Vec::new();
        for node in tree.children(parent).await {
            let children = if node.is_expandable() {
                expand(tree, Some(&node), depth.map(|d| d - 1)).await
            } else {
                Vec::new()
            };
            rendered.push(RenderedNode {
                open_at: node.open_at(),
                label: node.label.clone(),
                children,
            });
        }
        rendered
    })
}
