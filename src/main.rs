use aquasphere::{config::DemoConfig, DemoApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DemoConfig::from_env();
    log::info!(
        "Starting {} ({}x{}, assets in {})",
        config.title,
        config.window_size.0,
        config.window_size.1,
        config.asset_root.display()
    );

    DemoApp::new(config)?.run()
}
