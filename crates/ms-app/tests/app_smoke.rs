use ms_app::{
    AppError, ConvertOptions, graphml_to_network, node_red_to_header, node_red_to_network,
    parse_seed, receiver_series, write_header, write_network, write_series,
};
use ms_flow::{PropagationOptions, SeedPolicy};

fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const EXPORT: &str = r#"[
    {"id": "f1", "type": "flow", "flowValue": "4", "wires": [["a"]]},
    {"id": "f2", "type": "flow", "flowValue": "3", "wires": [["b"]]},
    {"id": "a", "type": "pipe", "name": "main", "radius": "0.01", "wires": [["b", "c"]]},
    {"id": "b", "type": "pipe", "radius": "0.01", "wires": [["s"]]},
    {"id": "c", "type": "pipe", "radius": "0.01", "wires": [["s"]]},
    {"id": "s", "type": "sink", "wires": []},
    {"id": "cfg", "type": "simulation-config", "timeToRun": "50"}
]"#;

#[test]
fn node_red_conversion_end_to_end() {
    let input = temp_file("ms_app_smoke_export.json", EXPORT);
    let conversion = node_red_to_network(&input, &ConvertOptions::default()).unwrap();

    let summary = conversion.summary();
    assert_eq!(summary.pipes, 3);
    assert_eq!(summary.sinks, 1);
    assert_eq!(summary.with_flow, 3);
    assert_eq!(summary.warnings, 0);

    // last write wins: the split share from pipe1 replaces pipe2's own seed
    let branch = conversion.config.pipes["pipe2"].flow.unwrap();
    assert!((branch - 2.0).abs() < 1e-12);
    let side = conversion.config.pipes["pipe3"].flow.unwrap();
    assert!((side - 2.0).abs() < 1e-12);

    let output = std::env::temp_dir().join("ms_app_smoke_network.yaml");
    write_network(&output, &conversion.config).unwrap();
    let loaded = ms_project::load_yaml(&output).unwrap();
    assert_eq!(loaded, conversion.config);
}

#[test]
fn accumulate_policy_superposes_walks() {
    let input = temp_file("ms_app_smoke_accumulate.json", EXPORT);
    let options = ConvertOptions {
        propagation: PropagationOptions::with_policy(SeedPolicy::Accumulate),
        ..ConvertOptions::default()
    };
    let conversion = node_red_to_network(&input, &options).unwrap();
    let pipe2 = conversion.config.pipes["pipe2"].flow.unwrap();
    assert!((pipe2 - 5.0).abs() < 1e-12, "{pipe2}");
}

#[test]
fn strict_mode_rejects_unknown_seed() {
    let input = temp_file(
        "ms_app_smoke_graph.graphml",
        r#"<graphml><graph>
            <node id="n0"><data><NodeLabel>length=0.1, radius=0.01</NodeLabel></data></node>
        </graph></graphml>"#,
    );
    let seeds = vec![parse_seed("n7=1").unwrap()];

    let lenient = graphml_to_network(&input, &seeds, &ConvertOptions::default()).unwrap();
    assert_eq!(lenient.flows.diagnostics.unknown_seeds, ["n7"]);
    assert!(lenient.config.pipes["n0"].flow.is_none());

    let strict = ConvertOptions {
        strict: true,
        ..ConvertOptions::default()
    };
    assert!(matches!(
        graphml_to_network(&input, &seeds, &strict),
        Err(AppError::Flow(_))
    ));
}

#[test]
fn header_conversion_writes_file() {
    let input = temp_file("ms_app_smoke_header.json", EXPORT);
    let header = node_red_to_header(&input).unwrap();
    let output = std::env::temp_dir().join("ms_app_smoke_config.h");
    write_header(&output, &header).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("#define TIME_TO_RUN 50\n"));
    assert!(text.contains("#define FLOW_VALUE 4\n"));
}

#[test]
fn receiver_series_bins_file() {
    let input = temp_file("ms_app_smoke_r1output.txt", "1,1,1,1,2,2,2,2,9");
    let series = receiver_series(&input, 4).unwrap();
    assert_eq!(series.samples, 9);
    assert_eq!(series.to_csv(), "time_step,count\n0,4\n1,8\n");

    assert!(matches!(receiver_series(&input, 0), Err(AppError::Results(_))));
}

#[test]
fn write_series_exports_csv() {
    let input = temp_file("ms_app_smoke_r2output.txt", "3,0,5,0");
    let series = receiver_series(&input, 2).unwrap();

    let output = std::env::temp_dir().join("ms_app_smoke_series.csv");
    write_series(&output, &series).unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "time_step,count\n0,3\n1,5\n");

    let missing_dir = std::env::temp_dir().join("ms_app_smoke_no_such_dir").join("out.csv");
    assert!(matches!(
        write_series(&missing_dir, &series),
        Err(AppError::OutputWrite { .. })
    ));
}
