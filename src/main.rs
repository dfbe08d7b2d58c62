use dotenv::dotenv;
use pony_bot::TurnController;
use pony_bot::infra::{
    CompositeObserver, Config, DefaultObserver, GameObserver, PonyPanicClient, ReplayObserver,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pony_bot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = Config::from_env()?;
    tracing::info!("Game service: {}", config.base_url);
    tracing::info!("Heuristic: {:?}", config.heuristic);

    let mut observers: Vec<Box<dyn GameObserver>> = vec![Box::new(DefaultObserver)];
    if let Some(folder) = &config.replays_folder {
        let replay = ReplayObserver::new(folder)?;
        tracing::info!("Writing replay to {}", replay.path().display());
        observers.push(Box::new(replay));
    }

    let client = PonyPanicClient::new(&config)?;
    let mut controller =
        TurnController::new(client, CompositeObserver::new(observers), config.heuristic);

    let stop = controller.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping after the current turn");
            stop.stop();
        }
    });

    controller.run_episode_loop().await?;
    Ok(())
}
