use anyhow::Result;
use dotenv::dotenv;
use log::info;
use trade_journal::{
    app::Journal,
    models::{database, trade_store::TradeStore},
    run_configs::interactive,
    utils::config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let adapter = database::connect(&config).await?;
    let store = TradeStore::load(adapter).await?;

    let mut journal = Journal::new(store);
    interactive::run(&mut journal).await?;

    info!("Journal closed.");

    Ok(())
}
