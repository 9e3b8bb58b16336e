//! Benchmark for GraphML serialization using city data.
//!
//! Builds a graph of cities linked to their states (plus country vertices)
//! from a cities JSON dump, or a synthetic one when the file is missing, and
//! times encoding, compression and decoding.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use graphml_codec::model::{AdjacencyGraph, EdgeListGraph, GraphMlType, MutableGraph, SchemaBuilder, TaggedEdge};
use graphml_codec::{ReadOptions, WriteOptions, decode_graphml, decode_graphml_bytes, encode_graphml, encode_graphml_compressed};
use serde::Deserialize;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct City {
    id: u32,
    name: String,
    state_id: u32,
    state_name: String,
    country_id: u32,
    country_name: String,
    latitude: String,
    longitude: String,
    population: Option<i64>,
    timezone: Option<String>,
    translations: Option<HashMap<String, String>>,
}

// =============================================================================
// GRAPH TYPES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
struct Place {
    kind: String,
    code: i64,
    name: String,
    population: i64,
    coordinates: Vec<String>,
    timezone: String,
    aliases: Vec<String>,
}

impl GraphMlType for Place {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.field("kind", |p| &p.kind, |p, v| p.kind = v);
        schema.field("code", |p| &p.code, |p, v| p.code = v);
        schema.field("name", |p| &p.name, |p, v| p.name = v);
        schema
            .field("population", |p| &p.population, |p, v| p.population = v)
            .default_value(0i64);
        schema.field("coordinates", |p| &p.coordinates, |p, v| p.coordinates = v);
        schema
            .field("timezone", |p| &p.timezone, |p, v| p.timezone = v)
            .default_value("");
        schema.field("aliases", |p| &p.aliases, |p, v| p.aliases = v);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Relation {
    kind: String,
    weight: f64,
}

impl GraphMlType for Relation {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.field("kind", |r| &r.kind, |r, v| r.kind = v);
        schema.field("weight", |r| &r.weight, |r, v| r.weight = v);
    }
}

type PlaceGraph = AdjacencyGraph<Place, TaggedEdge<Place, Relation>>;

fn synthetic_cities(count: u32) -> Vec<City> {
    (0..count)
        .map(|i| City {
            id: i,
            name: format!("City {i}"),
            state_id: i % 500,
            state_name: format!("State {}", i % 500),
            country_id: i % 50,
            country_name: format!("Country {}", i % 50),
            latitude: format!("{:.5}", (i % 180) as f64 - 90.0),
            longitude: format!("{:.5}", (i % 360) as f64 - 180.0),
            population: (i % 3 == 0).then_some(i as i64 * 17),
            timezone: (i % 2 == 0).then(|| "Europe/Paris".to_string()),
            translations: None,
        })
        .collect()
}

fn build_graph(cities: &[City]) -> PlaceGraph {
    let mut graph = PlaceGraph::directed();
    let mut states: HashMap<u32, Place> = HashMap::new();
    let mut countries: HashMap<u32, Place> = HashMap::new();

    for city in cities {
        countries.entry(city.country_id).or_insert_with(|| Place {
            kind: "country".into(),
            code: city.country_id as i64,
            name: city.country_name.clone(),
            ..Place::default()
        });

        let state = states
            .entry(city.state_id)
            .or_insert_with(|| Place {
                kind: "state".into(),
                code: city.state_id as i64,
                name: city.state_name.clone(),
                ..Place::default()
            })
            .clone();

        let mut aliases: Vec<String> = city
            .translations
            .as_ref()
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default();
        aliases.sort();

        let place = Place {
            kind: "city".into(),
            code: city.id as i64,
            name: city.name.clone(),
            population: city.population.unwrap_or(0),
            coordinates: vec![city.latitude.clone(), city.longitude.clone()],
            timezone: city.timezone.clone().unwrap_or_default(),
            aliases,
        };
        graph.add_vertex(place.clone());
        graph.add_edge(TaggedEdge::new(
            place,
            state,
            Some(Relation {
                kind: "in_state".into(),
                weight: 1.0,
            }),
        ));
    }

    let mut states: Vec<_> = states.into_values().collect();
    states.sort_by_key(|s| s.code);
    let mut countries: Vec<_> = countries.into_values().collect();
    countries.sort_by_key(|c| c.code);
    for state in states {
        graph.add_vertex(state);
    }
    for country in countries {
        graph.add_vertex(country);
    }
    graph
}

fn main() {
    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/cities.json".to_string());

    let cities: Vec<City> = if Path::new(&data_path).exists() {
        println!("Loading cities from: {}", data_path);
        let json_data = fs::read_to_string(&data_path).expect("Failed to read cities.json");
        let parse_start = Instant::now();
        let cities: Vec<City> = serde_json::from_str(&json_data).expect("Failed to parse JSON");
        println!("Loaded {} cities in {:?}", cities.len(), parse_start.elapsed());
        cities
    } else {
        println!("{} not found, using synthetic data", data_path);
        synthetic_cities(50_000)
    };

    let convert_start = Instant::now();
    let graph = build_graph(&cities);
    println!(
        "Built graph with {} vertices and {} edges in {:?}",
        graph.vertex_count(),
        graph.edge_count(),
        convert_start.elapsed()
    );

    // Benchmark encoding (pretty)
    let encode_start = Instant::now();
    let encoded = encode_graphml(&graph, &WriteOptions::new()).expect("Failed to encode");
    let encode_time = encode_start.elapsed();
    println!("\nEncode (indented): {} bytes in {:?}", encoded.len(), encode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        (encoded.len() as f64 / 1_000_000.0) / encode_time.as_secs_f64()
    );

    // Benchmark encoding (compact)
    let compact_start = Instant::now();
    let compact = encode_graphml(&graph, &WriteOptions::compact()).expect("Failed to encode compact");
    let compact_time = compact_start.elapsed();
    println!("\nEncode (compact): {} bytes in {:?}", compact.len(), compact_time);

    // Encoding is deterministic
    let compact2 = encode_graphml(&graph, &WriteOptions::compact()).expect("Failed to encode compact");
    assert_eq!(compact, compact2, "Encoding should be deterministic");

    // Benchmark encoding (compressed)
    let compress_start = Instant::now();
    let compressed =
        encode_graphml_compressed(&graph, &WriteOptions::compact(), 3).expect("Failed to compress");
    let compress_time = compress_start.elapsed();
    println!("\nCompressed (level 3): {} bytes in {:?}", compressed.len(), compress_time);
    println!(
        "  Compression ratio: {:.1}x",
        compact.len() as f64 / compressed.len() as f64
    );

    // Benchmark decoding
    const DECODE_ITERS: u32 = 5;
    let make_vertex = |_: &str| Place::default();
    let make_edge = |s: &Place, t: &Place, _: &str| TaggedEdge::new(s.clone(), t.clone(), None);

    let decode_start = Instant::now();
    let mut decoded = PlaceGraph::directed();
    for i in 0..DECODE_ITERS {
        let mut graph = PlaceGraph::directed();
        decode_graphml(&compact, &mut graph, make_vertex, make_edge, &ReadOptions::new())
            .expect("Failed to decode");
        if i + 1 == DECODE_ITERS {
            decoded = graph;
        }
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;
    println!("\nDecode: {:?} (avg of {} iterations)", decode_time, DECODE_ITERS);
    println!(
        "  Throughput: {:.2} MB/s",
        (compact.len() as f64 / 1_000_000.0) / decode_time.as_secs_f64()
    );
    assert_eq!(decoded, graph);

    // Benchmark decoding (strict)
    let strict_start = Instant::now();
    let mut strict = PlaceGraph::directed();
    let report = decode_graphml(&compact, &mut strict, make_vertex, make_edge, &ReadOptions::strict())
        .expect("Failed to decode strict");
    println!(
        "\nDecode (strict): {:?}, {} warnings",
        strict_start.elapsed(),
        report.warnings.len()
    );

    // Benchmark decoding (compressed)
    let decompress_start = Instant::now();
    let mut from_compressed = PlaceGraph::directed();
    decode_graphml_bytes(&compressed, &mut from_compressed, make_vertex, make_edge, &ReadOptions::new())
        .expect("Failed to decode compressed");
    println!("\nDecode (compressed): {:?}", decompress_start.elapsed());
    assert_eq!(from_compressed.edges().count(), graph.edge_count());

    println!("\n=== Summary ===");
    println!("Vertices:        {:>10}", graph.vertex_count());
    println!("Edges:           {:>10}", graph.edge_count());
    println!("Indented size:   {:>10} bytes", encoded.len());
    println!("Compact size:    {:>10} bytes", compact.len());
    println!("Compressed size: {:>10} bytes", compressed.len());
}
