use server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::logging::init("info");

    let config = ServerConfig::from_env()?;
    server::run(config).await
}
