//! Reads a GraphML file and prints what was found in it.
//!
//! Vertices are kept as their document ids, so every declared key shows up
//! as ignored.

use std::env;
use std::process;

use graphml_codec::model::{AdjacencyGraph, Edge};
use graphml_codec::{ReadOptions, read_graphml_file};

fn main() {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: inspect_graphml <file.graphml> [--strict]");
        process::exit(1);
    };
    let options = if args.any(|a| a == "--strict") {
        ReadOptions::strict()
    } else {
        ReadOptions::new()
    };

    let mut graph: AdjacencyGraph<String, Edge<String>> = AdjacencyGraph::directed();
    let report = match read_graphml_file(
        &path,
        &mut graph,
        |id| id.to_string(),
        |source, target, _id| Edge::new(source.clone(), target.clone()),
        &options,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Failed to read {} [{}]: {}", path, e.code().name(), e);
            process::exit(1);
        }
    };

    println!("=== {} ===", path);
    println!("Nodes: {}", report.nodes);
    println!("Edges: {}", report.edges);

    for edge in graph.edge_list().iter().take(20) {
        println!("  {} -> {}", edge.source, edge.target);
    }
    if graph.edge_count() > 20 {
        println!("  ... and {} more", graph.edge_count() - 20);
    }

    if !report.ignored_keys.is_empty() {
        println!("Ignored keys: {}", report.ignored_keys.join(", "));
    }
    for warning in &report.warnings {
        println!(
            "Warning: <{}> at byte {}: {}",
            warning.element, warning.position, warning.message
        );
    }
}
