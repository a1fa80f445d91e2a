use anyhow::{anyhow, Context, Result};
use clap::{arg, ArgAction, ArgMatches, Command};
use knap_solver::{
    format, generate_instance, GenerateParams, Instance, KnapsackError, Mode, Solver,
    SolverConfig,
};
use log::info;
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Instant,
};

fn cli() -> Command {
    Command::new("knap-runtime")
        .about("Solves 0/1 knapsack instances with sequential, shared-memory or distributed DP")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Packs the knapsack described by an instance file")
                .arg(
                    arg!(<SOURCE> "Path to the instance file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(<DESTINATION> "Path the result file is written to")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--mode [MODE] "sequential, shared_memory or distributed")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(--omp "Same as --mode shared_memory").action(ArgAction::SetTrue))
                .arg(
                    arg!(--mpi "Same as --mode distributed")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("omp"),
                )
                .arg(
                    arg!(--config [CONFIG] "Solver config json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--threads [THREADS] "Shared-memory thread count")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--workers [WORKERS] "Distributed worker count")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"row-block" [ROW_BLOCK] "Items per distributed row block")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"column-chunk" [COLUMN_CHUNK] "Columns per parallel chunk")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Writes a random instance file")
                .arg(
                    arg!(<DESTINATION> "Path the instance file is written to")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"num-items" <NUM_ITEMS> "Number of items")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"max-weight" <MAX_WEIGHT> "Knapsack capacity")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--values [VALUES] "Inclusive value range as MIN,MAX")
                        .default_value("1,100")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--weights [WEIGHTS] "Inclusive weight range as MIN,MAX")
                        .default_value("1,50")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--seed [SEED] "A string used in seed generation")
                        .default_value("0")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(sub_m),
        Some(("generate", sub_m)) => generate(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<KnapsackError>()
            .map(KnapsackError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn solve(sub_m: &ArgMatches) -> Result<()> {
    let source = sub_m.get_one::<PathBuf>("SOURCE").unwrap().clone();
    let destination = sub_m.get_one::<PathBuf>("DESTINATION").unwrap().clone();
    let config = solver_config(sub_m)?;
    let solver = Solver::from_config(&config)?;

    let instance = load_instance(&source)?;
    info!(
        "loaded {} items with capacity {} from {}",
        instance.items.len(),
        instance.max_weight,
        source.display()
    );

    let mut knapsack = instance.knapsack();
    let start = Instant::now();
    let value = solver.pack(&mut knapsack, &instance.items)?;
    let elapsed = start.elapsed().as_secs_f64();
    info!("{} solver reached value {}", solver.mode(), value);

    println!("Task complete. Duration = {:.6}", elapsed);
    save_selection(&destination, &knapsack)
}

fn generate(sub_m: &ArgMatches) -> Result<()> {
    let destination = sub_m.get_one::<PathBuf>("DESTINATION").unwrap().clone();
    let mut params = GenerateParams::new(
        *sub_m.get_one::<usize>("num-items").unwrap(),
        *sub_m.get_one::<u64>("max-weight").unwrap(),
    );
    params.value_range = parse_range(sub_m.get_one::<String>("values").unwrap())?;
    params.weight_range = parse_range(sub_m.get_one::<String>("weights").unwrap())?;
    let seed: [u8; 32] = blake3::hash(sub_m.get_one::<String>("seed").unwrap().as_bytes()).into();

    let instance = generate_instance(&seed, &params)?;
    let file = File::create(&destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    format::write_instance(BufWriter::new(file), &instance)?;
    info!(
        "wrote {} random items to {}",
        instance.items.len(),
        destination.display()
    );
    Ok(())
}

fn solver_config(sub_m: &ArgMatches) -> Result<SolverConfig> {
    let mut config = match sub_m.get_one::<String>("config") {
        Some(config) => load_config(config)?,
        None => SolverConfig::default(),
    };
    if let Some(mode) = sub_m.get_one::<String>("mode") {
        config.mode = mode.parse::<Mode>()?;
    }
    if sub_m.get_flag("omp") {
        config.mode = Mode::SharedMemory;
    }
    if sub_m.get_flag("mpi") {
        config.mode = Mode::Distributed;
    }
    if let Some(threads) = sub_m.get_one::<usize>("threads") {
        config.num_threads = Some(*threads);
    }
    if let Some(workers) = sub_m.get_one::<usize>("workers") {
        config.num_workers = *workers;
    }
    if let Some(row_block) = sub_m.get_one::<usize>("row-block") {
        config.row_block = *row_block;
    }
    if let Some(column_chunk) = sub_m.get_one::<usize>("column-chunk") {
        config.column_chunk = *column_chunk;
    }
    Ok(config)
}

fn load_config(config: &str) -> Result<SolverConfig> {
    let config = if config.ends_with(".json") {
        fs::read_to_string(config)
            .with_context(|| format!("Failed to read config file: {}", config))?
    } else {
        config.to_string()
    };
    Ok(SolverConfig::from_json(&config)?)
}

fn load_instance(path: &Path) -> Result<Instance> {
    let file = File::open(path).map_err(|e| KnapsackError::Argument {
        reason: format!("cannot open {}: {}", path.display(), e),
    })?;
    Ok(format::read_instance(BufReader::new(file))?)
}

/// Writes `<path>.partial` and renames it over `path` once complete.
fn save_selection(path: &Path, knapsack: &knap_solver::Knapsack) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let file = File::create(&partial).map_err(|e| KnapsackError::Argument {
        reason: format!("cannot create {}: {}", partial.display(), e),
    })?;
    let written = format::write_selection(BufWriter::new(file), knapsack).and_then(|()| {
        fs::rename(&partial, path).map_err(|e| {
            KnapsackError::io(format!("moving result into {}", path.display()), e)
        })
    });
    if written.is_err() {
        let _ = fs::remove_file(&partial);
    }
    Ok(written?)
}

fn parse_range(range: &str) -> Result<(u64, u64)> {
    let (min, max) = range
        .split_once(',')
        .ok_or_else(|| anyhow!("Range '{}' must look like MIN,MAX", range))?;
    Ok((
        min.trim()
            .parse()
            .with_context(|| format!("Invalid range minimum '{}'", min))?,
        max.trim()
            .parse()
            .with_context(|| format!("Invalid range maximum '{}'", max))?,
    ))
}
