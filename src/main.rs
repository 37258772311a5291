use kepsim::{ScenarioConfig, Scenario};
use kepsim::{bench_kepler, bench_root_finders};

use clap::Parser;
use anyhow::{Context, Result};
use tracing::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "circular.yaml")]
    file_name: String,

    /// Run the timing benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg = ScenarioConfig::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if args.bench {
        bench_kepler();
        bench_root_finders();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    let mu = scenario.system.central_mass();
    let initial: Vec<f64> = scenario.system.bodies.iter().skip(1).map(|b| b.specific_energy(mu)).collect();

    let steps = scenario.run()?;
    info!(steps, t = scenario.system.t, "done");

    for (i, (b, e0)) in scenario.system.bodies.iter().skip(1).zip(initial).enumerate() {
        let e1 = b.specific_energy(mu);
        println!(
            "body {:3}: x = [{:+.9e}, {:+.9e}, {:+.9e}]  energy drift = {:.3e}",
            i + 1,
            b.x[0],
            b.x[1],
            b.x[2],
            ((e1 - e0) / e0).abs()
        );
    }

    Ok(())
}
