//! Reference host binary.
//!
//! Usage: `particle-nav [PARTICLE_COUNT]`. Set `RUST_LOG=debug` to see
//! assignment reports and engine events.

use particle_nav::config::EngineConfig;
use particle_nav::host;

fn main() {
    env_logger::init();

    let mut config = EngineConfig::new();
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<usize>() {
            Ok(count) => config = config.with_particle_count(count),
            Err(_) => log::warn!("Ignoring invalid particle count {:?}", arg),
        }
    }

    if let Err(e) = host::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
