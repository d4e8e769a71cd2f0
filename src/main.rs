use clap::Parser;
use field_autofill::cli::commands::{FillSettings, cmd_classify, cmd_fill, cmd_save, cmd_scan, render_save_report};
use field_autofill::cli::config::{
    Cli, Commands, RESOLVER_ENDPOINT_ENV, load_config, resolve_endpoint, resolve_speed, resolve_store_dir,
};
use field_autofill::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = load_config(cli.config.as_deref());

    // Resolve slow-pass endpoint: CLI > config > env
    let env_endpoint = std::env::var(RESOLVER_ENDPOINT_ENV).ok();
    let endpoint = resolve_endpoint(cli.resolver_endpoint.as_deref(), &config, env_endpoint.as_deref());

    match cli.command {
        Commands::Scan { page } => {
            println!("{}", cmd_scan(&page)?);
        }
        Commands::Classify { page } => {
            println!("{}", cmd_classify(&page)?);
        }
        Commands::Fill {
            page,
            user,
            speed,
            out,
            store,
        } => {
            let settings = FillSettings {
                store_dir: resolve_store_dir(store, &config),
                speed: resolve_speed(speed, &config),
                endpoint,
                out,
            };
            println!("{}", cmd_fill(&page, &user, &settings, &config)?);
        }
        Commands::Save { page, user, store } => {
            let report = cmd_save(&page, &user, &resolve_store_dir(store, &config))?;
            println!("{}", render_save_report(&report)?);
            if report.saved() == 0 && report.failed() > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
