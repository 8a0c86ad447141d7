use clap::Parser;
use std::path::PathBuf;

use lobby_core::{lobby_summary, run, LobbySettings, ReferenceData};

#[derive(Debug, Parser)]
#[command(name = "lobby-randomiser", version, about = "Random agents and map for a custom lobby")]
struct Args {
    /// Attacker names, in slot order (up to five are kept).
    #[arg(long, short = 'a', value_delimiter = ',')]
    attackers: Vec<String>,

    /// Defender names, in slot order (up to five are kept).
    #[arg(long, short = 'd', value_delimiter = ',')]
    defenders: Vec<String>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    randomize_agents: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    randomize_map: bool,

    /// Play on this map; disables the map roll.
    #[arg(long)]
    map: Option<String>,

    /// JSON catalog replacing the built-in agents and maps.
    #[arg(long, value_name = "JSON")]
    catalog: Option<PathBuf>,

    /// Write the finished lobby as JSON.
    #[arg(long, value_name = "JSON")]
    output: Option<PathBuf>,

    /// Print the built-in catalog as JSON and exit.
    #[arg(long)]
    dump_catalog: bool,
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let args = Args::parse();

    if args.dump_catalog {
        match serde_json::to_string_pretty(&ReferenceData::builtin().to_file()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("using seed {seed}");

    let settings = LobbySettings {
        seed,
        attackers: args.attackers,
        defenders: args.defenders,
        randomize_agents: args.randomize_agents,
        randomize_map: args.randomize_map,
        map: args.map,
        catalog_path: args.catalog,
        output_path: args.output,
    };

    match run(settings) {
        Ok(lobby) => {
            println!("Seed: {seed}");
            print!("{}", lobby_summary(&lobby));
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
