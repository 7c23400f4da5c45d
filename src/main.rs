//! Cube Pop entry point
//!
//! Native builds run a headless autoplay demo: the real session, spawn and
//! target policies and best-score storage, with a simulated player standing
//! in for physics and touch input. The web build is driven by the page
//! through `cube_pop::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f64 = 90.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cube_pop::autoplay::{AutoPlayer, AutoplayConfig, run_demo};
    use cube_pop::consts::SIM_DT;
    use cube_pop::platform::entropy_seed;
    use cube_pop::platform::storage::{default_store, load_best_score};
    use cube_pop::sim::GameSession;
    use cube_pop::{Collaborators, GameConfig};

    env_logger::init();
    log::info!("Cube Pop (native) starting...");

    let config = GameConfig::load();
    let mut store = default_store();
    let best = load_best_score(store.as_mut());
    let seed = config.seed.unwrap_or_else(entropy_seed);
    log::info!("Seed {}", seed);

    let mut session = match GameSession::new(config, best, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    let mut player = AutoPlayer::new(AutoplayConfig::default(), seed.rotate_left(17));
    let mut collaborators = Collaborators::new().with_store(store);

    let summary = run_demo(&mut session, &mut player, &mut collaborators, DEMO_SECONDS, SIM_DT);

    println!(
        "{:.0}s simulated: {} cubes, {} popped, {} runs over ({} wrong cube, {} out of misses), best {}",
        summary.seconds,
        summary.spawned,
        summary.pops,
        summary.runs_finished(),
        summary.wrong_cube_endings,
        summary.miss_endings,
        summary.best_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is cube_pop::web::wasm_main, this is just to satisfy the compiler
}
