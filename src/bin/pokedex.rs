use clap::Parser;
use pokesay_core::builder::build_from_dir;
use pokesay_core::cli::PokedexArgs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = PokedexArgs::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &PokedexArgs) -> pokesay_core::Result<()> {
    let pokedex = build_from_dir(&args.from, &args.names)?;
    pokedex.save(&args.to)?;

    println!("✓ Complete! Indexed {} pokemon", pokedex.total());
    println!("✓ {} names, {} categories", pokedex.list_names().len(), pokedex.list_categories().len());
    println!("✓ Wrote pokedex snapshot to {}", args.to.display());
    Ok(())
}
