#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recruitment and lagged pursuit for the herdsman simulation.
//!
//! Idle animals close enough to the hero are recruited into the following
//! chain until the follower cap is reached. Each follower then chases a point
//! from the hero's recorded trail, offset by its rank, which strings the
//! chain out along the hero's recent path instead of clumping everyone onto
//! the hero itself.

use glam::Vec2;

use herdsman_core::{AnimalState, AnimalView, Command, HeroView};

/// Fraction of the hero's realized speed granted to followers.
///
/// Keeping followers slightly slower than the hero prevents the chain from
/// overtaking it during slow or clamped movement.
const FOLLOW_SPEED_FACTOR: f32 = 0.8;

/// Tuning for recruitment and pursuit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    trigger_distance: f32,
    max_followers: u32,
    lag_frames_per_follower: u32,
    min_gap: f32,
}

impl Config {
    /// Creates a config from explicit values.
    #[must_use]
    pub const fn new(
        trigger_distance: f32,
        max_followers: u32,
        lag_frames_per_follower: u32,
        min_gap: f32,
    ) -> Self {
        Self {
            trigger_distance,
            max_followers,
            lag_frames_per_follower,
            min_gap,
        }
    }

    /// Derives the config from the aggregated game tuning.
    ///
    /// The stand-off gap is half the animal radius, which leaves a visible
    /// seam between consecutive followers.
    #[must_use]
    pub fn from_tuning(tuning: &herdsman_core::GameTuning) -> Self {
        Self::new(
            tuning.hero.follow_trigger_distance,
            tuning.hero.max_followers,
            tuning.trail.lag_frames_per_follower,
            tuning.animal.radius / 2.0,
        )
    }
}

/// Recruits idle animals and steers the following chain.
#[derive(Debug)]
pub struct Follow {
    config: Config,
}

impl Follow {
    /// Creates the system with the provided tuning.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs one recruitment-and-pursuit pass over the herd.
    ///
    /// Recruits enter the chain through [`Command::StartFollowing`] and begin
    /// stepping on the next pass, once the world has applied the transition.
    /// Ranks derive from the view's iteration order, so they stay stable for
    /// as long as the membership of the chain is unchanged.
    pub fn handle(&mut self, hero: &HeroView, animals: &AnimalView, out: &mut Vec<Command>) {
        let mut follower_count = animals
            .iter()
            .filter(|animal| animal.state == AnimalState::Following)
            .count() as u32;

        for animal in animals.iter() {
            if follower_count >= self.config.max_followers {
                break;
            }
            if animal.state == AnimalState::Idle
                && animal.position.distance(hero.position) <= self.config.trigger_distance
            {
                out.push(Command::StartFollowing { animal: animal.id });
                follower_count = follower_count.saturating_add(1);
            }
        }

        let max_step_base = hero.actual_speed * FOLLOW_SPEED_FACTOR;
        let mut rank: u32 = 0;
        for animal in animals.iter() {
            if animal.state != AnimalState::Following {
                continue;
            }
            let lag = (rank + 1).saturating_mul(self.config.lag_frames_per_follower);
            let target = trail_target(hero, lag as usize);
            let distance = animal.position.distance(target);
            let max_step = max_step_base.min(distance - self.config.min_gap);
            if max_step > 0.0 {
                out.push(Command::StepFollower {
                    animal: animal.id,
                    target,
                    max_step,
                });
            }
            rank += 1;
        }
    }
}

/// Picks the trail entry `lag` frames behind the newest, falling back to the
/// hero's position while the trail is still shorter than the lag.
fn trail_target(hero: &HeroView, lag: usize) -> Vec2 {
    let len = hero.trail.len();
    if len > lag {
        hero.trail[len - 1 - lag]
    } else {
        hero.position
    }
}
