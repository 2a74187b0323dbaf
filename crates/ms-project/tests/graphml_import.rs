use std::path::Path;

use ms_flow::{PropagationOptions, Seed, propagate};
use ms_project::GraphmlDocument;

#[test]
fn loop_diagram_imports_and_terminates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/loop.graphml");
    let doc = GraphmlDocument::load(&path).unwrap();
    assert_eq!(doc.nodes.len(), 3);
    assert_eq!(doc.edges.len(), 3);

    let mut network = doc.to_network().unwrap();
    assert!(network.warnings.is_empty());
    assert_eq!(network.config.pipes["n1"].left_connections, ["n0", "n2"]);
    assert_eq!(network.config.pipes["n2"].right_connections, ["n1"]);
    assert_eq!(network.config.pipes["n2"].length, 0.3);

    let seeds = [Seed::new("n0", 3.0)];
    let run = propagate(&network.graph, &seeds, &PropagationOptions::default());
    for name in ["n1", "n2"] {
        let flow = run.result.get_by_name(&network.graph, name).unwrap();
        assert!((flow - 3.0).abs() < 1e-12, "{name}: {flow}");
    }
    assert_eq!(run.diagnostics.cycle_truncations, 1);

    assert_eq!(network.apply_flows(&run.result), 3);
    assert_eq!(network.config.pipes["n0"].flow, Some(3.0));
    assert!(network.config.pipes["n2"].flow.is_some());
}
