use std::{fs, io};

use anyhow::{Context, Result};
use cache_sim::{cache::write_report, config::Config, sim::Sim, trace::Trace};
use env_logger::Env;
use log::{info, warn};

fn main() -> Result<()> {
    env_logger::init_from_env(Env::default().filter_or("CACHE_SIM_LOG", "info"));

    let mut args = pico_args::Arguments::from_env();
    let n_warm: u64 = args
        .opt_value_from_str("-w")
        .context("-w should be an integer")?
        .unwrap_or(0);
    let heartbeat_int: u64 = args
        .opt_value_from_str("-h")
        .context("-h should be an integer")?
        .unwrap_or(0);
    let seed: Option<u64> = args
        .opt_value_from_str("--seed")
        .context("--seed should be an integer")?;

    let config = if let Some(config_str) = args.opt_value_from_str::<_, String>("--config")? {
        serde_json::from_str(&config_str).context("invalid --config")?
    } else if let Some(config_path) = args.opt_value_from_str::<_, String>("-p")? {
        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("could not read config file {config_path}"))?;
        serde_json::from_str(&config_str)
            .with_context(|| format!("invalid config file {config_path}"))?
    } else {
        Config::standard()
    };
    let mut caches = config.to_caches();

    let stats_path: Option<String> = args.opt_value_from_str("--json")?;
    let trace_path: String = args
        .opt_value_from_str("-t")?
        .unwrap_or_else(|| "traces.txt".to_string());

    let remaining = args.finish();
    if !remaining.is_empty() {
        warn!("ignoring unused arguments: {remaining:?}");
    }

    let mut sim = seed
        .map_or_else(Sim::from_entropy, Sim::new)
        .with_warmup(n_warm)
        .with_heartbeat(heartbeat_int);
    info!("Random seed: {}", sim.seed());

    let trace =
        Trace::open(&trace_path).with_context(|| format!("cannot open trace {trace_path}"))?;

    for address in trace {
        let address = address.with_context(|| format!("bad trace {trace_path}"))?;
        sim.operate(&mut caches, address);
    }
    info!("Replayed {} accesses", sim.accesses);
    if !sim.warmed_up() {
        warn!("trace ended before warm-up finished, statistics include every access");
    }

    let stats = caches.iter().map(|c| c.make_stats()).collect::<Vec<_>>();
    write_report(&stats, &mut io::stdout().lock())?;

    if let Some(stats_path) = stats_path {
        let stats_file = fs::File::create(&stats_path)
            .with_context(|| format!("cannot open output file {stats_path}"))?;
        serde_json::to_writer_pretty(stats_file, &stats)?;
    }
    Ok(())
}
