use saasbase_core::Config;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = saasbase_api::setup::initialize_app(config.clone()).await?;

    saasbase_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
