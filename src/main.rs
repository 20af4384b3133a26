use specplot::{run_specplot, SpecPlotConfig};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cfg = SpecPlotConfig::load().unwrap_or_else(|e| {
        log::warn!("{e}; starting with the default configuration");
        SpecPlotConfig::default()
    });
    log::debug!("{cfg:?}");
    run_specplot(cfg)
}
