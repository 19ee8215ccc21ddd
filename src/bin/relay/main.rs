use std::sync::Arc;

use spinstats::{github, server, EnvConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from(spinstats::ENV_FILES);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EnvConfig::load_from_env()?;
    let upstream = Arc::new(github::Client::new(&config));
    server::serve(config.address, upstream).await
}
