use clap::Parser;
use route_finder::{cli::Args, config::RouterConfig, spawn::try_spawn_with_args};

#[tokio::test(flavor = "multi_thread")]
async fn spawn_writes_default_config_and_serves() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("route-finder.yaml");
    let args = Args::parse_from([
        "route-finder",
        "--http.port",
        "0",
        "--constant-rate",
        "1",
        "--http.route-prefix",
        "route-finder",
    ]);

    let handle = try_spawn_with_args(args, &config_path).await?;

    let config = RouterConfig::load_from_file(&config_path)?;
    assert_eq!(config.chains, RouterConfig::default().chains);
    assert_eq!(config.pricefeed.constant_rate, Some(1.0));
    assert_eq!(handle.chains.len(), config.chains.len());

    let response = reqwest::get(format!("{}/route-finder/health", handle.http_url())).await?;
    assert!(response.status().is_success());
    assert_eq!(response.text().await?, "OK");

    handle.server.abort();
    Ok(())
}
