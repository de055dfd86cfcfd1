#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver that plays a scripted herding run.
//!
//! A deterministic pointer script drags the hero between the herd and the
//! yard until every animal is delivered, printing localized HUD lines along
//! the way. Useful for soak-testing the simulation and for reproducing
//! seeds without a window.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use glam::Vec2;
use herdsman_core::{AnimalState, AnimalView, Event, HeroView, SessionPhase};
use herdsman_presentation::{
    clock::{format_time, parse_time},
    compose_hud, compose_scene,
    records::{record_run, MemoryStore, RunRecord},
    strings::{Catalog, CatalogTables, Language, StringKey},
};
use herdsman_session::{Session, SessionConfig};
use herdsman_system_input::{InputEvent, InputFrame};
use herdsman_world::query;
use log::{info, warn, LevelFilter};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{fs, path::PathBuf};

/// Plays one deterministic herding run without opening a window.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON session configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured sampling seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of simulated frames before giving up.
    #[arg(long, default_value_t = 20_000)]
    ticks: u32,

    /// Simulated frame delta in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f32,

    /// HUD language code (en, uk, es or pl).
    #[arg(long, default_value = "en")]
    language: Language,

    /// Path to a JSON translation catalog replacing the built-in tables.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Record time from an earlier run as MM:SS.d, seeding the record store.
    #[arg(long, value_parser = parse_time)]
    best_time: Option<u64>,

    /// Enables debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the herdsman command-line driver.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let catalog = load_catalog(&args)?;
    let mut store = match args.best_time {
        Some(best_ms) => MemoryStore::with_record(best_ms),
        None => MemoryStore::new(),
    };

    let seed = config.seed;
    let mut session = Session::new(config).context("invalid session configuration")?;

    print_welcome(&catalog);
    run(&args, &mut session, &catalog, seed);
    report(&mut store, &session, &catalog);
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    let _ = builder.try_init();
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading session configuration from {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing session configuration from {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    let mut catalog = match &args.catalog {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading translation catalog from {}", path.display()))?;
            let tables: CatalogTables = serde_json::from_str(&raw)
                .with_context(|| format!("parsing translation catalog from {}", path.display()))?;
            Catalog::from_tables(tables)
        }
        None => Catalog::builtin(),
    };

    catalog.set_language(args.language);
    Ok(catalog)
}

fn print_welcome(catalog: &Catalog) {
    println!("{}", catalog.translate(StringKey::Title));
    println!();
    println!("{}", catalog.translate(StringKey::ControlsHeading));
    println!("  {}", catalog.translate(StringKey::ControlClick));
    println!("  {}", catalog.translate(StringKey::ControlDrag));
    println!("  {}", catalog.translate(StringKey::ControlKeys));
    println!("{}", catalog.translate(StringKey::GoalsHeading));
    println!("  {}", catalog.translate(StringKey::GoalCollect));
    println!("  {}", catalog.translate(StringKey::GoalDeliver));
    println!();
}

fn run(args: &Args, session: &mut Session, catalog: &Catalog, seed: u64) {
    let mut events = Vec::new();
    session.start(&mut events);

    let mut script = AutoHerder::new(seed);
    for _ in 0..args.ticks {
        let frame = script.next_frame(session);
        events.clear();
        session.tick(&frame, args.frame_ms, &mut events);

        for event in &events {
            if let Event::ScoreChanged { total } = event {
                let hud = compose_hud(
                    catalog,
                    session.phase(),
                    *total,
                    session.herd_size(),
                    session.elapsed_ms() as u64,
                    None,
                );
                println!("{}  {}", hud.score_line, hud.clock_line);
            }
        }

        if session.phase() == SessionPhase::Completed {
            break;
        }
    }
}

fn report(store: &mut MemoryStore, session: &Session, catalog: &Catalog) {
    let elapsed_ms = session.elapsed_ms() as u64;
    match session.phase() {
        SessionPhase::Completed => {
            let RunRecord { best_ms, improved } = record_run(store, elapsed_ms);
            let hud = compose_hud(
                catalog,
                SessionPhase::Completed,
                session.score(),
                session.herd_size(),
                elapsed_ms,
                Some(best_ms),
            );

            println!();
            if let Some(banner) = hud.banner {
                println!("{banner}");
            }
            for line in hud.results {
                println!("{line}");
            }
            if improved {
                info!("record improved, pass --best-time {} next run", format_time(best_ms));
            }
        }
        phase => {
            warn!(
                "run ended in {:?} with {}/{} delivered after {}",
                phase,
                session.score(),
                session.herd_size(),
                format_time(elapsed_ms)
            );
            let world = session.world();
            let scene = compose_scene(
                session.viewport(),
                &query::hero_view(world),
                &query::yard_view(world),
                &query::animal_view(world),
            );
            for animal in &scene.animals {
                info!(
                    "animal #{} stranded at ({:.0}, {:.0}) as {:?}",
                    animal.id.get(),
                    animal.position.x,
                    animal.position.y,
                    animal.state
                );
            }
        }
    }
}

/// Pointer script that drags the hero between the herd and the yard.
///
/// While the trail is empty it aims at the nearest idle animal; as soon as
/// any animal follows, it hauls the trail to the yard center. Goals get a
/// small seeded jitter so repeated runs do not degenerate into straight
/// lines while staying reproducible.
struct AutoHerder {
    rng: ChaCha8Rng,
    dragging: bool,
}

impl AutoHerder {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            dragging: false,
        }
    }

    fn next_frame(&mut self, session: &Session) -> InputFrame {
        let world = session.world();
        let yard = query::yard_view(world);
        let animals = query::animal_view(world);

        let herding = animals
            .iter()
            .any(|snapshot| snapshot.state == AnimalState::Following);
        let goal = if herding {
            yard.center
        } else {
            let hero = query::hero_view(world);
            nearest_idle(&hero, &animals).unwrap_or(yard.center)
        };
        let jitter = Vec2::new(self.rng.gen_range(-12.0..12.0), self.rng.gen_range(-12.0..12.0));
        let position = goal + jitter;

        let mut frame = InputFrame::new();
        if self.dragging {
            frame.push(InputEvent::PointerMoved { position });
        } else {
            frame.push(InputEvent::PointerDown { position });
            self.dragging = true;
        }
        frame
    }
}

fn nearest_idle(hero: &HeroView, animals: &AnimalView) -> Option<Vec2> {
    animals
        .iter()
        .filter(|snapshot| snapshot.state == AnimalState::Idle)
        .min_by(|a, b| {
            hero.position
                .distance_squared(a.position)
                .total_cmp(&hero.position.distance_squared(b.position))
        })
        .map(|snapshot| snapshot.position)
}
