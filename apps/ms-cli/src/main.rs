use clap::{Parser, Subcommand};
use ms_app::{AppResult, Conversion, ConvertOptions, convert_service, series_service};
use ms_flow::{PropagationOptions, SeedPolicy};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ms-cli")]
#[command(about = "Molecular simulation config tools - network, header and output conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Node-RED export into the network YAML
    NodeRedYaml {
        /// Node-RED flow export (JSON)
        input: PathBuf,
        /// Output YAML path
        output: PathBuf,
        #[command(flatten)]
        flow: FlowArgs,
    },
    /// Generate config.h from a Node-RED export
    NodeRedHeader {
        /// Node-RED flow export (JSON)
        input: PathBuf,
        /// Output header path
        output: PathBuf,
    },
    /// Convert a GraphML diagram into the network YAML
    GraphmlYaml {
        /// GraphML diagram
        input: PathBuf,
        /// Output YAML path
        output: PathBuf,
        /// Flow injected at a node, as NODE_ID=FLOW (repeatable)
        #[arg(long = "seed", value_name = "ID=FLOW")]
        seeds: Vec<String>,
        #[command(flatten)]
        flow: FlowArgs,
    },
    /// Print the resolved flow of every pipe in a Node-RED export
    Flows {
        /// Node-RED flow export (JSON)
        input: PathBuf,
        #[command(flatten)]
        flow: FlowArgs,
    },
    /// Bin a receiver output file into a time_step,count CSV
    ReceiverSeries {
        /// Receiver output file (comma separated counts)
        file: PathBuf,
        /// Simulation steps per bin
        #[arg(long, default_value_t = 10)]
        rate: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct FlowArgs {
    /// How repeated seeds and overlapping walks combine (overwrite or accumulate)
    #[arg(long, default_value = "overwrite")]
    seed_policy: SeedPolicy,
    /// Fail on unknown seeds, invalid seed values or unusable radii
    #[arg(long)]
    strict: bool,
}

impl FlowArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            propagation: PropagationOptions::with_policy(self.seed_policy),
            strict: self.strict,
            ..ConvertOptions::default()
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::NodeRedYaml {
            input,
            output,
            flow,
        } => cmd_node_red_yaml(&input, &output, &flow),
        Commands::NodeRedHeader { input, output } => cmd_node_red_header(&input, &output),
        Commands::GraphmlYaml {
            input,
            output,
            seeds,
            flow,
        } => cmd_graphml_yaml(&input, &output, &seeds, &flow),
        Commands::Flows { input, flow } => cmd_flows(&input, &flow),
        Commands::ReceiverSeries { file, rate, output } => {
            cmd_receiver_series(&file, rate, output.as_deref())
        }
    }
}

fn cmd_node_red_yaml(input: &Path, output: &Path, flow: &FlowArgs) -> AppResult<()> {
    let conversion = convert_service::node_red_to_network(input, &flow.options())?;
    print_warnings(&conversion);
    convert_service::write_network(output, &conversion.config)?;
    print_summary(&conversion, output);
    Ok(())
}

fn cmd_node_red_header(input: &Path, output: &Path) -> AppResult<()> {
    let header = convert_service::node_red_to_header(input)?;
    if header.settings.is_none() {
        println!("⚠ No simulation-config node found, writing include guard only");
    }
    convert_service::write_header(output, &header)?;
    if let Some(flow) = &header.flow_value {
        println!("  FLOW_VALUE = {}", flow);
    }
    println!("✓ Header written to {}", output.display());
    Ok(())
}

fn cmd_graphml_yaml(
    input: &Path,
    output: &Path,
    seeds: &[String],
    flow: &FlowArgs,
) -> AppResult<()> {
    let seeds = seeds
        .iter()
        .map(|s| convert_service::parse_seed(s))
        .collect::<AppResult<Vec<_>>>()?;
    tracing::debug!(seeds = seeds.len(), "graphml seeds parsed");

    let conversion = convert_service::graphml_to_network(input, &seeds, &flow.options())?;
    print_warnings(&conversion);
    convert_service::write_network(output, &conversion.config)?;
    print_summary(&conversion, output);
    Ok(())
}

fn cmd_flows(input: &Path, flow: &FlowArgs) -> AppResult<()> {
    let conversion = convert_service::node_red_to_network(input, &flow.options())?;
    print_warnings(&conversion);

    println!("Flows ({} policy):", flow.seed_policy.label());
    for (name, pipe) in &conversion.config.pipes {
        match pipe.flow {
            Some(value) => println!("  {:<24} {:e}", name, value),
            None => println!("  {:<24} -", name),
        }
    }

    let diagnostics = &conversion.flows.diagnostics;
    if diagnostics.cycle_truncations > 0 {
        println!(
            "  ({} revisited targets not reassigned)",
            diagnostics.cycle_truncations
        );
    }
    for &segment in &diagnostics.degenerate_junctions {
        if let Some(seg) = conversion.graph.segment(segment) {
            println!("⚠ {}: branch weights sum to zero, flow stops here", seg.name);
        }
    }
    Ok(())
}

fn cmd_receiver_series(file: &Path, rate: usize, output: Option<&Path>) -> AppResult<()> {
    let series = series_service::receiver_series(file, rate)?;
    if let Some(path) = output {
        series_service::write_series(path, &series)?;
        println!(
            "✓ Exported {} bins ({} samples, rate {}) to {}",
            series.bins.len(),
            series.samples,
            series.rate,
            path.display()
        );
    } else {
        print!("{}", series.to_csv());
    }
    Ok(())
}

fn print_warnings(conversion: &Conversion) {
    for warning in &conversion.warnings {
        println!("⚠ {}", warning);
    }
}

fn print_summary(conversion: &Conversion, output: &Path) {
    let summary = conversion.summary();
    println!(
        "✓ Wrote {} pipes and {} sinks to {} ({} with flow)",
        summary.pipes,
        summary.sinks,
        output.display(),
        summary.with_flow
    );
    if summary.warnings > 0 {
        println!("  {} warnings", summary.warnings);
    }
}
