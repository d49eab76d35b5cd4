use clap::Parser;
use log::debug;
use pokesay_core::assets::ArtSource;
use pokesay_core::cli::Args;
use pokesay_core::config::Config;
use pokesay_core::render;
use pokesay_core::Pokedex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load(args.config.as_deref())?;
    let snapshot_path = args
        .snapshot
        .clone()
        .or_else(|| config.snapshot_path())
        .ok_or("could not determine where the pokedex lives, pass --snapshot")?;
    debug!("loading pokedex from {}", snapshot_path.display());
    let pokedex = Pokedex::load(&snapshot_path)?;

    let mut stdout = io::stdout().lock();

    if args.list_categories {
        let categories = pokedex.list_categories();
        writeln!(stdout, "{}\n{} total categories", categories.join(" "), categories.len())?;
        return Ok(());
    }
    if args.list_names {
        let names = pokedex.list_names();
        writeln!(stdout, "{}\n{} total names", names.join(" "), names.len())?;
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    debug!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let request = args.request();
    debug!("request {:?}", request);
    let selection = pokedex.select(&request, &mut rng)?;
    debug!(
        "chose {} (entry {}, {:?})",
        selection.metadata.name, selection.entry_index, selection.categories
    );

    let art = pokedex.art(selection.entry_index)?;
    let opts = args.render_options(&config.display);
    let out = render::render(io::stdin().lock(), &art, selection.metadata, selection.categories, &opts)?;
    stdout.write_all(out.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
