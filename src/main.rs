use std::io;
use std::process::ExitCode;

use dotenvy::dotenv;
use supermarket::errors::AppError;
use supermarket::{establish_session, run_migrations, AppConfig, Console, OrderService};

fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    let mut session = establish_session(&config.database_url)?;
    log::info!("Database connection established");

    if config.run_migrations {
        let applied = run_migrations(&mut session)?;
        log::info!("Applied {} pending migration(s)", applied);
    }

    let stdin = io::stdin();
    let mut console = Console::new(OrderService::new(session), stdin.lock(), io::stdout());
    console.run()?;

    // Dropping the service closes the connection.
    let (service, _) = console.into_parts();
    drop(service);
    log::info!("Database connection closed");
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
