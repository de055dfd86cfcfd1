#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session driver for the herdsman simulation.
//!
//! A [`Session`] owns the authoritative world together with the pure systems
//! and pumps them in a fixed order once per rendered frame: input translation,
//! the world tick, follow recruitment and pursuit, auto-delivery release,
//! patrol assignment, yard arrival, and finally scoring. Hosts hand in one
//! [`InputFrame`] plus the frame delta and receive the tick's typed event
//! stream back through an out parameter, mirroring how the world itself
//! broadcasts events.
//!
//! The session also owns everything the world deliberately does not know
//! about: the lifecycle phase, the pause gate, the run clock, and the
//! win condition.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use herdsman_core::{Command, Event, GameTuning, SessionPhase, Viewport};
use herdsman_system_auto_deliver::AutoDeliver;
use herdsman_system_collision::Collision;
use herdsman_system_follow::{Config as FollowConfig, Follow};
use herdsman_system_input::{Input, InputFrame};
use herdsman_system_patrol::{Config as PatrolConfig, Patrol};
use herdsman_system_score::Score;
use herdsman_world::{self as world, World};

/// Salt folded into the session seed for the patrol sampling stream, keeping
/// it decorrelated from the spawn stream.
const PATROL_STREAM_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Host-provided session parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial viewport width in world units.
    pub width: u32,
    /// Initial viewport height in world units.
    pub height: u32,
    /// Seed shared by the spawn and patrol sampling streams.
    pub seed: u64,
    /// Simulation tuning forwarded to the world and derived system configs.
    pub tuning: GameTuning,
}

impl SessionConfig {
    /// Checks every tuning knob against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }

        let tuning = &self.tuning;
        if tuning.animal.count == 0 {
            return Err(ConfigError::EmptyHerd);
        }
        if tuning.hero.max_followers == 0 {
            return Err(ConfigError::NoFollowerCapacity);
        }

        ensure_positive("hero.radius", tuning.hero.radius)?;
        ensure_positive("hero.speed", tuning.hero.speed)?;
        ensure_positive(
            "hero.follow_trigger_distance",
            tuning.hero.follow_trigger_distance,
        )?;
        ensure_positive("animal.radius", tuning.animal.radius)?;
        ensure_positive("animal.patrol_speed", tuning.animal.patrol_speed)?;
        ensure_positive("animal.auto_deliver_speed", tuning.animal.auto_deliver_speed)?;
        ensure_positive("animal.min_spawn_distance", tuning.animal.min_spawn_distance)?;
        ensure_positive("yard.base_width", tuning.yard.base_width)?;
        ensure_positive("yard.base_height", tuning.yard.base_height)?;
        ensure_non_negative("yard.margin", tuning.yard.margin)?;
        ensure_non_negative("sampling.edge_margin", tuning.sampling.edge_margin)?;

        let fraction = tuning.yard.height_fraction;
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::FractionOutOfRange { value: fraction });
        }

        ensure_budget(
            "trail.lag_frames_per_follower",
            tuning.trail.lag_frames_per_follower,
        )?;
        ensure_budget("sampling.spawn_attempts", tuning.sampling.spawn_attempts)?;
        ensure_budget("sampling.patrol_attempts", tuning.sampling.patrol_attempts)?;

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            seed: 0,
            tuning: GameTuning::default(),
        }
    }
}

/// Rejected session parameters.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The viewport would have no area.
    #[error("viewport must have positive dimensions (received {width}x{height})")]
    EmptyViewport {
        /// Requested viewport width.
        width: u32,
        /// Requested viewport height.
        height: u32,
    },
    /// A run without animals completes before it starts.
    #[error("herd must contain at least one animal")]
    EmptyHerd,
    /// Without follower capacity no animal can ever be escorted.
    #[error("hero must allow at least one follower")]
    NoFollowerCapacity,
    /// A length or speed knob was zero, negative, or not finite.
    #[error("{field} must be positive and finite (received {value})")]
    NonPositive {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A margin knob was negative or not finite.
    #[error("{field} must be finite and non-negative (received {value})")]
    Negative {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The yard height fraction left the unit interval.
    #[error("yard.height_fraction must lie in (0, 1] (received {value})")]
    FractionOutOfRange {
        /// Rejected value.
        value: f32,
    },
    /// A retry or lag budget was zero.
    #[error("{field} must be at least one")]
    ZeroBudget {
        /// Dotted path of the offending knob.
        field: &'static str,
    },
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn ensure_budget(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroBudget { field })
    } else {
        Ok(())
    }
}

const fn patrol_seed(seed: u64) -> u64 {
    seed ^ PATROL_STREAM_SALT
}

/// Drives one game run from boot to completion.
pub struct Session {
    config: SessionConfig,
    world: World,
    input: Input,
    follow: Follow,
    auto_deliver: AutoDeliver,
    patrol: Patrol,
    collision: Collision,
    score: Score,
    phase: SessionPhase,
    elapsed_ms: f64,
}

impl Session {
    /// Validates the configuration and builds a session in the boot phase.
    ///
    /// The herd stays empty until [`Session::start`] spawns it.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new(config.tuning.clone());
        // Layout runs before any observer attaches; the boot events are not
        // replayed to anyone.
        let mut boot_events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureViewport {
                width: config.width,
                height: config.height,
            },
            &mut boot_events,
        );

        let follow = Follow::new(FollowConfig::from_tuning(&config.tuning));
        let patrol = Patrol::new(PatrolConfig::from_tuning(
            &config.tuning,
            patrol_seed(config.seed),
        ));

        Ok(Self {
            config,
            world,
            input: Input::new(),
            follow,
            auto_deliver: AutoDeliver::new(),
            patrol,
            collision: Collision::new(),
            score: Score::new(),
            phase: SessionPhase::Boot,
            elapsed_ms: 0.0,
        })
    }

    /// Spawns the herd and begins running. Ignored outside the boot phase.
    pub fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Boot {
            debug!("start ignored in phase {:?}", self.phase);
            return;
        }
        world::apply(
            &mut self.world,
            Command::ResetHerd {
                seed: self.config.seed,
            },
            out_events,
        );
        self.set_phase(SessionPhase::Running, out_events);
    }

    /// Returns the session to the boot phase from anywhere.
    ///
    /// The same seed respawns the identical herd, the patrol stream rewinds,
    /// and the score and clock return to zero, so a following
    /// [`Session::start`] replays exactly like the first one. Key latches
    /// survive so a held key releases cleanly afterwards.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) {
        info!("session reset with seed {}", self.config.seed);
        world::apply(
            &mut self.world,
            Command::ResetHerd {
                seed: self.config.seed,
            },
            out_events,
        );
        self.patrol = Patrol::new(PatrolConfig::from_tuning(
            &self.config.tuning,
            patrol_seed(self.config.seed),
        ));
        self.auto_deliver.reset();
        self.score.reset(out_events);
        self.elapsed_ms = 0.0;
        self.set_phase(SessionPhase::Boot, out_events);
    }

    /// Applies a new viewport, relayouting the yard in any phase.
    pub fn resize(&mut self, width: u32, height: u32, out_events: &mut Vec<Event>) {
        self.config.width = width;
        self.config.height = height;
        world::apply(
            &mut self.world,
            Command::ConfigureViewport { width, height },
            out_events,
        );
    }

    /// Advances the run by one frame.
    ///
    /// Input is translated first so the key latches stay truthful even while
    /// frozen, and a pause request toggles the gate before anything else. In
    /// any phase but running the remaining guidance is then discarded and the
    /// simulation does not advance.
    pub fn tick(&mut self, frame: &InputFrame, dt_ms: f32, out_events: &mut Vec<Event>) {
        let dt_ms = if dt_ms.is_finite() && dt_ms >= 0.0 {
            dt_ms
        } else {
            warn!("discarding invalid frame delta of {} ms", dt_ms);
            0.0
        };

        let mut guidance = Vec::new();
        let signals = self.input.handle(frame, &mut guidance);
        let mut batch = Vec::new();

        if signals.pause_requested {
            let was_frozen = self.phase == SessionPhase::Paused;
            self.toggle_pause(&mut batch);
            if was_frozen && self.phase == SessionPhase::Running {
                // Releases during the freeze only updated the latches.
                world::apply(&mut self.world, self.input.steer_command(), &mut batch);
            }
        }

        if self.phase != SessionPhase::Running {
            if !guidance.is_empty() {
                debug!(
                    "dropping {} guidance commands in phase {:?}",
                    guidance.len(),
                    self.phase
                );
            }
            out_events.append(&mut batch);
            return;
        }

        for command in guidance {
            world::apply(&mut self.world, command, &mut batch);
        }

        world::apply(&mut self.world, Command::Tick { dt_ms }, &mut batch);
        self.elapsed_ms += f64::from(dt_ms);

        let mut commands = Vec::new();

        {
            let hero = world::query::hero_view(&self.world);
            let animals = world::query::animal_view(&self.world);
            self.follow.handle(&hero, &animals, &mut commands);
        }
        self.run_commands(&mut commands, &mut batch);

        {
            let hero = world::query::hero_view(&self.world);
            let yard = world::query::yard_view(&self.world);
            let animals = world::query::animal_view(&self.world);
            self.auto_deliver.handle(&hero, &yard, &animals, &mut commands);
        }
        self.run_commands(&mut commands, &mut batch);

        {
            let viewport = world::query::viewport(&self.world);
            let hero = world::query::hero_view(&self.world);
            let yard = world::query::yard_view(&self.world);
            let animals = world::query::animal_view(&self.world);
            self.patrol
                .handle(viewport, &hero, &yard, &animals, &mut commands);
        }
        self.run_commands(&mut commands, &mut batch);

        {
            let yard = world::query::yard_view(&self.world);
            let animals = world::query::animal_view(&self.world);
            self.collision.handle(&yard, &animals, &mut commands);
        }
        self.run_commands(&mut commands, &mut batch);

        let mut scored = Vec::new();
        self.score.handle(&batch, &mut scored);
        batch.append(&mut scored);

        if self.score.total() >= self.herd_size() {
            info!(
                "herd complete: {} animals delivered after {:.1} ms",
                self.herd_size(),
                self.elapsed_ms
            );
            self.set_phase(SessionPhase::Completed, &mut batch);
        }

        out_events.append(&mut batch);
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Animals delivered since the run began.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score.total()
    }

    /// Animals spawned per run.
    #[must_use]
    pub fn herd_size(&self) -> u32 {
        self.config.tuning.animal.count
    }

    /// Simulated time accumulated while running, in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Active viewport dimensions.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        world::query::viewport(&self.world)
    }

    /// Read-only access to the world for snapshot queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn run_commands(&mut self, commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }

    fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        match self.phase {
            SessionPhase::Running => {
                out_events.push(Event::PauseRequested);
                self.set_phase(SessionPhase::Paused, out_events);
            }
            SessionPhase::Paused => {
                out_events.push(Event::PauseRequested);
                self.set_phase(SessionPhase::Running, out_events);
            }
            SessionPhase::Boot | SessionPhase::Completed => {
                debug!("pause request ignored in phase {:?}", self.phase);
            }
        }
    }

    fn set_phase(&mut self, to: SessionPhase, out_events: &mut Vec<Event>) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        info!("session phase changed from {:?} to {:?}", from, to);
        out_events.push(Event::PhaseChanged { from, to });
    }
}
