use std::path::PathBuf;

use merlin_host::cli::CliOptions;
use merlin_host::config::AppConfig;

fn main() {
    let options = match CliOptions::parse_from_env() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    let (project, frames, overrides) = options.into_config_overrides();
    let asset_root = PathBuf::from("assets");
    let mut config = AppConfig::load_or_default(asset_root.join("host.json"));
    config.apply_overrides(&overrides);
    if let Err(err) = merlin_host::run(config, asset_root, project, frames) {
        eprintln!("Application error: {err:?}");
        std::process::exit(1);
    }
}
