use color_eyre::Result;
use clap::Parser;
use vetappt::{Config, Profile, RecordStore, SCHEMA_VERSION, cli::{Cli, Commands}, logging};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps config and data apart from the real appointment book
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&vetappt::utils::expand_path(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    let command = cli.command.unwrap_or(Commands::Tui);

    // The TUI owns the terminal, so its logs go to a file
    match command {
        Commands::Tui => logging::init_file(&config.get_log_path(), &config.log_level)?,
        _ => logging::init_stderr(&config.log_level),
    }

    let mut store = RecordStore::open(&config.get_database_path(), SCHEMA_VERSION)?;

    match command {
        Commands::Tui => {
            let app = vetappt::tui::App::new(config, store)?;
            vetappt::tui::run_event_loop(app)?;
        }
        Commands::Add(args) => {
            vetappt::cli::handle_add(args, &mut store)?;
        }
        Commands::List { json } => {
            vetappt::cli::handle_list(json, &store)?;
        }
        Commands::Edit(args) => {
            vetappt::cli::handle_edit(args, &mut store)?;
        }
        Commands::Delete { id } => {
            vetappt::cli::handle_delete(id, &mut store)?;
        }
    }

    Ok(())
}

