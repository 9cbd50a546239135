//! This is the importer binary. It only wires up the logger and settings and
//! runs one import with functions from the `karaoke_import` library crate
//! (which is tested).

use karaoke_import::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let settings = Settings::init()?;
    let summary = karaoke_import::run(&settings).await?;
    println!("{summary}");

    Ok(())
}
