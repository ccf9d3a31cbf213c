//! CLI command implementations

use crate::LayoutKind;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use trellis_core::{Graph, NodeId, ParentIndex, Point, Reconciler};
use trellis_render::{
    LayoutEngine, PassthroughLayout, RecordingSink, RenderConfig, Renderer, StackLayout,
};
use trellis_router::{find_simplified_path, RectCollider};

/// Config from `path`, or the defaults when no file was given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RenderConfig> {
    match path {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RenderConfig::default()),
    }
}

pub fn diff(previous: &Path, current: &Path) -> anyhow::Result<()> {
    let previous = load_graph(previous)?;
    let current = load_graph(current)?;

    let mut reconciler = Reconciler::new();
    reconciler.reconcile(&previous);
    let pass = reconciler.reconcile(&current);

    let (nn, nu, nr) = pass.nodes.counts();
    tracing::info!("Diff: {} new, {} updated, {} removed nodes", nn, nu, nr);
    print_json(&pass)
}

pub async fn render(
    snapshots: &[PathBuf],
    layout: LayoutKind,
    config: RenderConfig,
) -> anyhow::Result<()> {
    let graphs = snapshots
        .iter()
        .map(|p| load_graph(p))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let passes = match layout {
        LayoutKind::Stack => {
            let layout = StackLayout::new(config.layout.clone());
            run_passes(layout, graphs, config).await?
        }
        LayoutKind::Passthrough => run_passes(PassthroughLayout, graphs, config).await?,
    };
    print_json(&passes)
}

async fn run_passes<L: LayoutEngine>(
    layout: L,
    graphs: Vec<Graph>,
    config: RenderConfig,
) -> anyhow::Result<Vec<trellis_core::Reconciliation>> {
    let mut renderer = Renderer::new(layout, RecordingSink::new(), config);
    let mut passes = Vec::with_capacity(graphs.len());
    for graph in graphs {
        renderer.set_graph(graph);
        passes.push(renderer.render().await?);
    }
    Ok(passes)
}

pub fn route(
    from: Point,
    to: Point,
    graph: Option<&Path>,
    config: &RenderConfig,
) -> anyhow::Result<()> {
    let collider = match graph {
        Some(path) => {
            let graph = load_graph(path)?;
            let index = ParentIndex::build(&graph);
            // nodes under either endpoint are where the route starts and ends
            let exempt: Vec<NodeId> = graph
                .walk()
                .filter(|(_, n)| n.rect.contains(from) || n.rect.contains(to))
                .map(|(_, n)| n.id.clone())
                .collect();
            RectCollider::from_graph(&graph, &index, &exempt, config.router.padding)
        }
        None => RectCollider::default(),
    };
    tracing::debug!("Routing around {} obstacles", collider.len());

    let route = find_simplified_path(from, to, &collider, &config.router)?;
    if route.is_fallback() {
        tracing::warn!("No route found ({:?}), using straight line", route.outcome);
    }
    print_json(&route)
}

pub fn simplify(points: &Path, tolerance: f64) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(points)
        .with_context(|| format!("reading {}", points.display()))?;
    let input: Vec<Point> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing points from {}", points.display()))?;

    let output = trellis_router::simplify(&input, tolerance);
    tracing::info!("Simplified {} points to {}", input.len(), output.len());
    print_json(&output)
}

fn load_graph(path: &Path) -> anyhow::Result<Graph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let graph: Graph = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    graph
        .validate()
        .with_context(|| format!("invalid snapshot {}", path.display()))?;
    tracing::debug!(
        "Loaded {} ({} nodes, {} edges)",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
