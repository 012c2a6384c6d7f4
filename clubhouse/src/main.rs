use clap::Parser;
use tokio::time::sleep;
use tracing::info;

use clubhouse::app_state::AppState;
use clubhouse::http::setup_http_server;
use clubhouse::init_telemetry;
use clubhouse::settings::config::Settings;

#[derive(Parser)]
#[command(name = "clubhouse")]
#[command(about = "Venue booking backend with role-scoped access control")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the clubhouse server (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Config => {
            let app_state = AppState::new_for_config_only().await?;
            println!("{:#?}", &app_state.settings);
            return Ok(());
        }
        Commands::Run => {
            // Continue with the normal server startup
        }
    }

    let settings = Settings::new()?;
    init_telemetry::init_tracing(settings.debug)?;

    let mut handles = vec![];

    let app_state = AppState::from_settings(settings).await?;

    // Setup http server.
    {
        let handle =
            setup_http_server(app_state.clone(), &app_state.settings.api.bind_address).await?;
        handles.push(handle);
    }

    sleep(std::time::Duration::from_millis(100)).await;

    loop {
        // Remove and await completed handles
        handles.retain(|handle| !handle.is_finished());

        // Break the loop if no more handles are running
        if handles.is_empty() {
            info!("All tasks are done");
            break;
        }

        // Sleep for a short duration to avoid busy-waiting
        tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
    }

    Ok(())
}
