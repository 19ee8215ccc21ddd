use eframe::NativeOptions;

use spinstats::{logger, App, CarouselConfig, EnvConfig};

fn main() -> anyhow::Result<()> {
    simple_env_load::load_env_from(spinstats::ENV_FILES);

    let logs = logger::init_logger()?;
    let config = EnvConfig::load_from_env()?;
    let carousel = CarouselConfig::load_or_bundled(&config.carousel_path)?;

    eframe::run_native(
        "spinstats",
        NativeOptions::default(),
        Box::new(move |cc| {
            let repo_url = cc
                .storage
                .and_then(|storage| storage.get_string(App::REPO_URL_KEY))
                .unwrap_or_default();

            Box::new(App::new(
                cc.egui_ctx.clone(),
                &config,
                carousel,
                logs,
                repo_url,
            ))
        }),
    );

    Ok(())
}
