use anyhow::Context;
use engine::{logging, EngineConfig, EngineContext, Host};

mod rogue;

use rogue::HybridRogue;

const CONFIG_PATH: &str = "hybrid_rogue.toml";

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::load(CONFIG_PATH)
        .with_context(|| format!("loading {CONFIG_PATH}"))?;
    logging::init(&config.logging.filter);

    // ---- Host owns the engine context for the whole session ----
    let mut host = Host::on_main_thread()?;
    host.start(|| EngineContext::new(config, HybridRogue::new()))?;
    Ok(())
}
