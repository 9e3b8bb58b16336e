//! GraphML encoding and decoding.
//!
//! - [`text`]: member values to and from their wire text
//! - [`cache`]: compiled per-type codecs, shared process wide
//! - [`writer`]: graph to GraphML
//! - [`reader`]: GraphML to graph
//! - [`document`]: the XML tree the reader works on

pub mod cache;
pub mod document;
pub mod reader;
pub mod text;
pub mod writer;

pub use cache::{Direction, TypeCodec, codec_for};
pub use document::{XmlAttribute, XmlElement, XmlNamespace, parse_document};
pub use reader::{
    ReadOptions, ReadReport, decode_graphml, decode_graphml_bytes, read_graphml, read_graphml_file,
};
pub use text::{format_value, parse_value};
pub use writer::{
    WriteOptions, encode_graphml, encode_graphml_compressed, encode_graphml_with_ids, write_graphml,
    write_graphml_file,
};

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::{ConfigError, DecodeError, ErrorCode};
    use crate::format::ZSTD_MAGIC;
    use crate::model::{
        AdjacencyGraph, EdgeListGraph, GraphEdge, GraphMlType, MutableGraph, SchemaBuilder,
    };

    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
    struct TestVertex {
        id: String,
        string: String,
        int: i32,
        long: i64,
        flag: bool,
        ints: Vec<i32>,
        strings: Vec<String>,
    }

    impl GraphMlType for TestVertex {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("v_string", |v| &v.string, |v, x| v.string = x);
            schema.field("v_int", |v| &v.int, |v, x| v.int = x);
            schema.field("v_long", |v| &v.long, |v, x| v.long = x);
            schema.field("v_bool", |v| &v.flag, |v, x| v.flag = x);
            schema.field("v_ints", |v| &v.ints, |v, x| v.ints = x);
            schema.field("v_strings", |v| &v.strings, |v, x| v.strings = x);
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Data {
        lolilol: f32,
        note: String,
    }

    impl GraphMlType for Data {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("lolilol", |d| &d.lolilol, |d, x| d.lolilol = x)
                .default_value(10.0f32);
            schema.field("note", |d| &d.note, |d, x| d.note = x);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct TestEdge {
        source: TestVertex,
        target: TestVertex,
        string: String,
        int: i32,
        long: i64,
        double: f64,
        flag: bool,
        float: f32,
        tag: Option<Data>,
    }

    impl TestEdge {
        fn new(source: TestVertex, target: TestVertex) -> Self {
            Self {
                source,
                target,
                string: "defaultString".into(),
                int: 1,
                long: 2,
                double: 0.0,
                flag: false,
                float: 0.0,
                tag: None,
            }
        }
    }

    impl GraphEdge for TestEdge {
        type Vertex = TestVertex;

        fn source(&self) -> &TestVertex {
            &self.source
        }

        fn target(&self) -> &TestVertex {
            &self.target
        }
    }

    impl GraphMlType for TestEdge {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema
                .field("e_string", |e| &e.string, |e, x| e.string = x)
                .default_value("defaultString");
            schema.field("e_int", |e| &e.int, |e, x| e.int = x).default_value(1i32);
            schema.field("e_long", |e| &e.long, |e, x| e.long = x).default_value(2i64);
            schema.field("e_double", |e| &e.double, |e, x| e.double = x);
            schema.field("e_bool", |e| &e.flag, |e, x| e.flag = x);
            schema.field("e_float", |e| &e.float, |e, x| e.float = x);
            schema.tag(|e| e.tag.as_ref(), |e| &mut e.tag);
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct TestGraph {
        inner: AdjacencyGraph<TestVertex, TestEdge>,
        name: String,
        revision: i64,
    }

    impl EdgeListGraph for TestGraph {
        type Vertex = TestVertex;
        type Edge = TestEdge;

        fn is_directed(&self) -> bool {
            self.inner.is_directed()
        }

        fn vertices(&self) -> impl Iterator<Item = &TestVertex> {
            self.inner.vertices()
        }

        fn edges(&self) -> impl Iterator<Item = &TestEdge> {
            self.inner.edges()
        }
    }

    impl MutableGraph for TestGraph {
        fn add_vertex(&mut self, vertex: TestVertex) -> bool {
            self.inner.add_vertex(vertex)
        }

        fn add_edge(&mut self, edge: TestEdge) -> bool {
            self.inner.add_edge(edge)
        }
    }

    impl GraphMlType for TestGraph {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.field("g_name", |g| &g.name, |g, x| g.name = x);
            schema.field("g_revision", |g| &g.revision, |g, x| g.revision = x);
        }
    }

    fn vertex(string: &str, int: i32) -> TestVertex {
        TestVertex {
            string: string.to_string(),
            int,
            ..TestVertex::default()
        }
    }

    fn decode(xml: &str, options: &ReadOptions) -> Result<(TestGraph, ReadReport), DecodeError> {
        let mut graph = TestGraph::default();
        let report = decode_graphml(
            xml,
            &mut graph,
            |id| TestVertex {
                id: id.to_string(),
                ..TestVertex::default()
            },
            |s, t, _| TestEdge::new(s.clone(), t.clone()),
            options,
        )?;
        Ok((graph, report))
    }

    fn without_ids(graph: &TestGraph) -> Vec<TestVertex> {
        graph
            .vertices()
            .map(|v| TestVertex {
                id: String::new(),
                ..v.clone()
            })
            .collect()
    }

    #[test]
    fn test_tagged_edge_roundtrip() {
        let mut graph = TestGraph::default();
        let (v1, v2) = (vertex("foo", 10), vertex("", 0));
        graph.add_vertex(v1.clone());
        graph.add_vertex(v2.clone());
        let mut edge = TestEdge::new(v1, v2);
        edge.tag = Some(Data {
            lolilol: 25.0,
            note: "n".into(),
        });
        graph.add_edge(edge);

        let xml = encode_graphml(&graph, &WriteOptions::new()).unwrap();
        assert!(xml.contains(r#"attr.name="TAG-lolilol""#));

        let (decoded, report) = decode(&xml, &ReadOptions::strict()).unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!((report.nodes, report.edges), (2, 1));
        assert_eq!(without_ids(&decoded), without_ids(&graph));
        let edge = decoded.edges().next().unwrap();
        assert_eq!(
            edge.tag,
            Some(Data {
                lolilol: 25.0,
                note: "n".into()
            })
        );
        assert_eq!(edge.source.string, "foo");
        assert_eq!(edge.target.string, "");

        let mut stripped = decoded.clone();
        stripped.inner = AdjacencyGraph::directed();
        for v in without_ids(&decoded) {
            stripped.add_vertex(v);
        }
        for e in decoded.edges() {
            let mut e = e.clone();
            e.source.id.clear();
            e.target.id.clear();
            stripped.add_edge(e);
        }
        assert_eq!(encode_graphml(&stripped, &WriteOptions::new()).unwrap(), xml);
    }

    #[test]
    fn test_default_values_not_written() {
        let mut graph = TestGraph::default();
        let (a, b) = (vertex("a", 0), vertex("b", 0));
        graph.add_vertex(a.clone());
        graph.add_vertex(b.clone());
        graph.add_edge(TestEdge::new(a, b));

        let xml = encode_graphml(&graph, &WriteOptions::compact()).unwrap();
        assert!(xml.contains(r#"attr.name="e_string" attr.type="string"><default>defaultString</default></key>"#));
        assert!(xml.contains(r#"attr.name="TAG-lolilol" attr.type="float"><default>10.0</default></key>"#));
        // Only e_double, e_bool and e_float have no default.
        let edge = &xml[xml.find("<edge ").unwrap()..];
        assert_eq!(edge.matches("<data ").count(), 3);

        let (decoded, _) = decode(&xml, &ReadOptions::new()).unwrap();
        let edge = decoded.edges().next().unwrap();
        assert_eq!((edge.string.as_str(), edge.int, edge.long), ("defaultString", 1, 2));
        assert_eq!(edge.tag, None);
    }

    #[test]
    fn test_arrays_and_graph_members() {
        let mut graph = TestGraph {
            name: "net".into(),
            revision: -3,
            ..TestGraph::default()
        };
        graph.add_vertex(TestVertex {
            ints: vec![1, -2, 3],
            strings: vec!["a;b".into(), String::new(), "back\\slash".into()],
            long: i64::MIN,
            flag: true,
            ..TestVertex::default()
        });
        graph.add_vertex(TestVertex {
            strings: vec![String::new()],
            ..TestVertex::default()
        });

        let xml = encode_graphml(&graph, &WriteOptions::new()).unwrap();
        assert!(xml.contains(r"a\;b;;back\\slash;"));
        let (decoded, _) = decode(&xml, &ReadOptions::strict()).unwrap();
        assert_eq!(decoded.name, "net");
        assert_eq!(decoded.revision, -3);
        assert_eq!(without_ids(&decoded), without_ids(&graph));
    }

    #[test]
    fn test_sample_document() {
        let (graph, report) = decode(include_str!("../../testdata/sample.graphml"), &ReadOptions::strict()).unwrap();
        assert_eq!(graph.name, "routes");
        assert_eq!(report.ignored_keys, ["n3"]);
        assert!(report.warnings.is_empty());

        let vertices: Vec<_> = graph.vertices().collect();
        assert_eq!(vertices[0].id, "a");
        assert_eq!(vertices[0].string, "Alpha");
        assert_eq!(vertices[0].ints, [1, 2, 3]);
        assert_eq!(vertices[0].int, 42);
        assert_eq!(vertices[1].int, 7);
        assert_eq!(vertices[2].int, 42);

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges[0].double, 0.5);
        assert_eq!(edges[0].tag, None);
        assert_eq!((edges[1].source.id.as_str(), edges[1].target.id.as_str()), ("b", "c"));
        // The key default of TAG-note lands once lolilol created the tag.
        assert_eq!(
            edges[1].tag,
            Some(Data {
                lolilol: 2.5,
                note: "memo".into()
            })
        );
        // A tag created by TAG-note alone starts from lolilol's declared default.
        assert_eq!(
            edges[2].tag,
            Some(Data {
                lolilol: 10.0,
                note: "direct".into()
            })
        );
    }

    #[test]
    fn test_tag_member_defaults_roundtrip() {
        let mut graph = TestGraph::default();
        let (a, b) = (vertex("a", 0), vertex("b", 0));
        graph.add_vertex(a.clone());
        graph.add_vertex(b.clone());
        let mut edge = TestEdge::new(a, b);
        edge.tag = Some(Data {
            lolilol: 10.0,
            note: "kept".into(),
        });
        graph.add_edge(edge);

        let xml = encode_graphml(&graph, &WriteOptions::compact()).unwrap();
        let edge_xml = &xml[xml.find("<edge ").unwrap()..];
        // lolilol equals its declared default and is left out.
        assert_eq!(edge_xml.matches("<data ").count(), 4);

        let (decoded, _) = decode(&xml, &ReadOptions::strict()).unwrap();
        let edge = decoded.edges().next().unwrap();
        assert_eq!(
            edge.tag,
            Some(Data {
                lolilol: 10.0,
                note: "kept".into()
            })
        );

        let mut again = TestGraph::default();
        for v in without_ids(&decoded) {
            again.add_vertex(v);
        }
        for e in decoded.edges() {
            let mut e = e.clone();
            e.source.id.clear();
            e.target.id.clear();
            again.add_edge(e);
        }
        assert_eq!(encode_graphml(&again, &WriteOptions::compact()).unwrap(), xml);
    }

    #[test]
    fn test_repeated_vertex_roundtrip() {
        let mut graph = TestGraph::default();
        let (a, b) = (vertex("a", 1), vertex("b", 2));
        assert!(graph.add_vertex(a.clone()));
        assert!(graph.add_vertex(b.clone()));
        assert!(!graph.add_vertex(a.clone()));
        graph.add_edge(TestEdge::new(a, b));

        let xml = encode_graphml(&graph, &WriteOptions::compact()).unwrap();
        let (decoded, report) = decode(&xml, &ReadOptions::new()).unwrap();
        assert_eq!((report.nodes, report.edges), (2, 1));
        assert_eq!(without_ids(&decoded), without_ids(&graph));
    }

    #[test]
    fn test_tag_key_default_needs_tag() {
        let xml = r#"<graphml>
            <key id="e1" for="edge" attr.name="TAG-lolilol" attr.type="float"><default>4.5</default></key>
            <key id="e2" for="edge" attr.name="TAG-note" attr.type="string"/>
            <graph edgedefault="directed">
                <node id="a"/><node id="b"/>
                <edge source="a" target="b"/>
                <edge source="b" target="a"><data key="e2">x</data></edge>
                <edge source="a" target="a"><data key="e1">1.5</data></edge>
            </graph>
        </graphml>"#;
        let (graph, _) = decode(xml, &ReadOptions::strict()).unwrap();
        let tags: Vec<_> = graph.edges().map(|e| e.tag.clone()).collect();
        assert_eq!(
            tags,
            [
                None,
                Some(Data {
                    lolilol: 4.5,
                    note: "x".into()
                }),
                Some(Data {
                    lolilol: 1.5,
                    note: String::new()
                }),
            ]
        );
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            (
                include_str!("../../testdata/missing_node_id.graphml"),
                "node",
                "id",
            ),
            (
                include_str!("../../testdata/missing_source.graphml"),
                "edge",
                "source",
            ),
            (
                include_str!("../../testdata/missing_target.graphml"),
                "edge",
                "target",
            ),
        ];
        for (xml, element, attribute) in cases {
            match decode(xml, &ReadOptions::new()) {
                Err(DecodeError::MissingAttribute {
                    element: e,
                    attribute: a,
                    ..
                }) => assert_eq!((e, a), (element, attribute)),
                other => panic!("expected missing {element}@{attribute}, got {other:?}"),
            }
        }

        let err = decode(include_str!("../../testdata/invalid_tag.graphml"), &ReadOptions::new()).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedElement { ref name, .. } if name == "vertex"));
        assert_eq!(err.code(), ErrorCode::Structural);

        let err = decode(include_str!("../../testdata/missing_graph.graphml"), &ReadOptions::new()).unwrap_err();
        assert_eq!(err, DecodeError::NoGraph);

        let err = decode(include_str!("../../testdata/missing_graphml.graphml"), &ReadOptions::new()).unwrap_err();
        assert_eq!(err, DecodeError::MissingGraphMl);
    }

    #[test]
    fn test_strict_mode() {
        let xml = r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns"><graph><node id="a"/></graph></graphml>"#;
        let (graph, _) = decode(xml, &ReadOptions::new()).unwrap();
        assert_eq!(graph.vertices().count(), 1);

        let err = decode(xml, &ReadOptions::strict()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn test_compressed_roundtrip() {
        let mut graph = TestGraph::default();
        for i in 0..50 {
            graph.add_vertex(vertex(&format!("v{i}"), i));
        }
        let bytes = encode_graphml_compressed(&graph, &WriteOptions::new(), 3).unwrap();
        assert_eq!(&bytes[..4], &ZSTD_MAGIC);

        let mut decoded = TestGraph::default();
        let report = decode_graphml_bytes(
            &bytes,
            &mut decoded,
            |_| TestVertex::default(),
            |s, t, _| TestEdge::new(s.clone(), t.clone()),
            &ReadOptions::new(),
        )
        .unwrap();
        assert_eq!(report.nodes, 50);
        assert_eq!(decoded.vertices().nth(49).unwrap().string, "v49");
    }

    #[test]
    fn test_file_and_reader_roundtrip() {
        let mut graph = TestGraph::default();
        let (a, b) = (
            TestVertex {
                id: "left".into(),
                ..vertex("L", 1)
            },
            TestVertex {
                id: "right".into(),
                ..vertex("R", 2)
            },
        );
        graph.add_vertex(a.clone());
        graph.add_vertex(b.clone());
        graph.add_edge(TestEdge::new(a, b));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.graphml");
        write_graphml_file(
            &graph,
            &path,
            |v| v.id.clone(),
            |e| format!("{}->{}", e.source.id, e.target.id),
            &WriteOptions::new(),
        )
        .unwrap();

        let mut edge_ids = Vec::new();
        let mut decoded = TestGraph::default();
        read_graphml_file(
            &path,
            &mut decoded,
            |id| TestVertex {
                id: id.to_string(),
                ..TestVertex::default()
            },
            |s, t, id| {
                edge_ids.push(id.to_string());
                TestEdge::new(s.clone(), t.clone())
            },
            &ReadOptions::strict(),
        )
        .unwrap();
        assert_eq!(decoded, graph);
        assert_eq!(edge_ids, ["left->right"]);

        let text = std::fs::read_to_string(&path).unwrap();
        let mut again = TestGraph::default();
        read_graphml(
            Cursor::new(text.into_bytes()),
            &mut again,
            |id| TestVertex {
                id: id.to_string(),
                ..TestVertex::default()
            },
            |s, t, _| TestEdge::new(s.clone(), t.clone()),
            &ReadOptions::new(),
        )
        .unwrap();
        assert_eq!(again, graph);

        let err = read_graphml_file(
            "",
            &mut again,
            |_| TestVertex::default(),
            |s, t, _| TestEdge::new(s.clone(), t.clone()),
            &ReadOptions::new(),
        )
        .unwrap_err();
        assert_eq!(err, DecodeError::Argument { name: "path" });
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
    struct Measured {
        size: i32,
    }

    impl GraphMlType for Measured {
        fn describe(schema: &mut SchemaBuilder<Self>) {
            schema.read_only("size", |m| &m.size);
        }
    }

    #[test]
    fn test_read_only_member_cannot_be_decoded() {
        let mut graph: AdjacencyGraph<Measured, crate::model::Edge<Measured>> = AdjacencyGraph::directed();
        graph.add_vertex(Measured { size: 3 });
        let xml = encode_graphml(&graph, &WriteOptions::compact()).unwrap();

        let mut target: AdjacencyGraph<Measured, crate::model::Edge<Measured>> = AdjacencyGraph::directed();
        let err = decode_graphml(
            &xml,
            &mut target,
            |_| Measured::default(),
            |s, t, _| crate::model::Edge::new(s.clone(), t.clone()),
            &ReadOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::Config(ConfigError::MissingSetter { .. })));
        assert_eq!(err.code(), ErrorCode::Configuration);
    }
}
