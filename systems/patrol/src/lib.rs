#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Idle wander targeting for the herdsman simulation.
//!
//! Idle animals drift between random targets while staying clear of the
//! yard's exclusion buffer and the hero. The system only assigns
//! destinations; the world performs the actual stepping during its tick.
//! Target searches draw from a seeded [`SampleStream`], so a given seed
//! always produces the same wander pattern.

use glam::Vec2;
use log::debug;

use herdsman_core::{
    AnimalState, AnimalView, Command, HeroView, SampleStream, Viewport, YardView,
    PATROL_ARRIVE_DISTANCE,
};

/// Tuning for wander target selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    patrol_speed: f32,
    min_spawn_distance: f32,
    edge_margin: f32,
    retry_budget: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a config from explicit values.
    #[must_use]
    pub const fn new(
        patrol_speed: f32,
        min_spawn_distance: f32,
        edge_margin: f32,
        retry_budget: u32,
        rng_seed: u64,
    ) -> Self {
        Self {
            patrol_speed,
            min_spawn_distance,
            edge_margin,
            retry_budget,
            rng_seed,
        }
    }

    /// Derives the config from the aggregated game tuning and a seed.
    #[must_use]
    pub fn from_tuning(tuning: &herdsman_core::GameTuning, rng_seed: u64) -> Self {
        Self::new(
            tuning.animal.patrol_speed,
            tuning.animal.min_spawn_distance,
            tuning.sampling.edge_margin,
            tuning.sampling.patrol_attempts,
            rng_seed,
        )
    }
}

/// Assigns wander destinations to idle animals.
#[derive(Debug)]
pub struct Patrol {
    config: Config,
    sampler: SampleStream,
}

impl Patrol {
    /// Creates the system, seeding its sampling stream from the config.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            sampler: SampleStream::new(config.rng_seed),
            config,
        }
    }

    /// Runs one targeting pass over the idle animals.
    ///
    /// An animal needs a fresh destination when it sits inside the yard
    /// buffer, has no destination, already arrived, or when its next step
    /// would land inside the buffer. The search rejection-samples the screen
    /// with a bounded budget, skipping candidates near the yard buffer or
    /// the hero; on exhaustion the animal is aimed at its own position,
    /// which parks it for this frame and retries on the next.
    pub fn handle(
        &mut self,
        viewport: Viewport,
        hero: &HeroView,
        yard: &YardView,
        animals: &AnimalView,
        out: &mut Vec<Command>,
    ) {
        for animal in animals.iter() {
            if animal.state != AnimalState::Idle {
                continue;
            }

            let evicted = yard.buffered.contains(animal.position);
            let needs_target = match animal.patrol_target {
                None => true,
                Some(target) => {
                    let distance = animal.position.distance(target);
                    distance < PATROL_ARRIVE_DISTANCE
                        || self.blocked_ahead(animal.position, target, yard)
                }
            };

            if evicted || needs_target {
                let target = self
                    .sample_target(viewport, hero.position, yard)
                    .unwrap_or(animal.position);
                out.push(Command::AssignPatrol {
                    animal: animal.id,
                    target,
                });
            }
        }
    }

    /// Reports whether the next wander step would land inside the buffer.
    fn blocked_ahead(&self, position: Vec2, target: Vec2, yard: &YardView) -> bool {
        let offset = target - position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return false;
        }
        let step = self.config.patrol_speed.min(distance);
        let ahead = position + offset / distance * step;
        yard.buffered.contains(ahead)
    }

    fn sample_target(&mut self, viewport: Viewport, hero: Vec2, yard: &YardView) -> Option<Vec2> {
        let size = viewport.size();
        let margin = self.config.edge_margin;
        for _ in 0..self.config.retry_budget {
            let candidate = Vec2::new(
                self.sampler.next_in_range(margin, size.x - margin),
                self.sampler.next_in_range(margin, size.y - margin),
            );
            let clear_of_yard =
                yard.buffered.distance_to(candidate) >= self.config.min_spawn_distance;
            let clear_of_hero = candidate.distance(hero) >= self.config.min_spawn_distance;
            if clear_of_yard && clear_of_hero {
                return Some(candidate);
            }
        }
        debug!(
            "patrol target search exhausted after {} attempts",
            self.config.retry_budget
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herdsman_core::{AnimalId, AnimalSnapshot, Bounds, HeroMode};

    fn yard() -> YardView {
        let bounds = Bounds::new(300.0, 480.0, 500.0, 600.0);
        YardView {
            bounds,
            buffered: bounds.expanded(50.0),
            center: bounds.center(),
            scale: 0.5,
        }
    }

    fn hero_at(position: Vec2) -> HeroView {
        HeroView {
            position,
            velocity: Vec2::ZERO,
            mode: HeroMode::Idle,
            target: None,
            dragging: false,
            radius: 30.0,
            actual_speed: 0.0,
            trail: Vec::new(),
        }
    }

    fn idle_animal(id: u32, position: Vec2, patrol_target: Option<Vec2>) -> AnimalSnapshot {
        AnimalSnapshot {
            id: AnimalId::new(id),
            position,
            state: AnimalState::Idle,
            patrol_target,
            auto_target: None,
            radius: 20.0,
        }
    }

    fn config(seed: u64) -> Config {
        Config::new(0.2, 50.0, 12.0, 50, seed)
    }

    fn assigned_target(out: &[Command]) -> Option<Vec2> {
        out.iter().find_map(|command| match command {
            Command::AssignPatrol { target, .. } => Some(*target),
            _ => None,
        })
    }

    #[test]
    fn animal_without_a_target_receives_one_clear_of_the_yard() {
        let mut patrol = Patrol::new(config(11));
        let hero = hero_at(Vec2::new(400.0, 150.0));
        let animals =
            AnimalView::from_snapshots(vec![idle_animal(0, Vec2::new(100.0, 100.0), None)]);

        let mut out = Vec::new();
        patrol.handle(Viewport::new(800, 600), &hero, &yard(), &animals, &mut out);

        let target = assigned_target(&out).expect("a target is assigned");
        assert!(yard().buffered.distance_to(target) >= 50.0);
        assert!(target.distance(hero.position) >= 50.0);
        assert!((12.0..=788.0).contains(&target.x));
        assert!((12.0..=588.0).contains(&target.y));
    }

    #[test]
    fn animal_with_a_distant_valid_target_is_left_alone() {
        let mut patrol = Patrol::new(config(11));
        let animals = AnimalView::from_snapshots(vec![idle_animal(
            0,
            Vec2::new(100.0, 100.0),
            Some(Vec2::new(700.0, 100.0)),
        )]);

        let mut out = Vec::new();
        patrol.handle(
            Viewport::new(800, 600),
            &hero_at(Vec2::new(400.0, 150.0)),
            &yard(),
            &animals,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn arrival_forces_a_new_target() {
        let mut patrol = Patrol::new(config(11));
        let animals = AnimalView::from_snapshots(vec![idle_animal(
            0,
            Vec2::new(100.0, 100.0),
            Some(Vec2::new(102.0, 100.0)),
        )]);

        let mut out = Vec::new();
        patrol.handle(
            Viewport::new(800, 600),
            &hero_at(Vec2::new(400.0, 150.0)),
            &yard(),
            &animals,
            &mut out,
        );
        assert!(assigned_target(&out).is_some());
    }

    #[test]
    fn animal_inside_the_buffer_is_evicted() {
        let mut patrol = Patrol::new(config(11));
        // Inside the buffered rectangle, outside the yard proper.
        let animals = AnimalView::from_snapshots(vec![idle_animal(
            0,
            Vec2::new(280.0, 460.0),
            Some(Vec2::new(100.0, 100.0)),
        )]);

        let mut out = Vec::new();
        patrol.handle(
            Viewport::new(800, 600),
            &hero_at(Vec2::new(400.0, 150.0)),
            &yard(),
            &animals,
            &mut out,
        );
        let target = assigned_target(&out).expect("eviction assigns a fresh target");
        assert!(yard().buffered.distance_to(target) >= 50.0);
    }

    #[test]
    fn step_about_to_enter_the_buffer_abandons_the_target() {
        let mut patrol = Patrol::new(config(11));
        // Sitting just left of the buffer edge at x = 250, walking right.
        let animals = AnimalView::from_snapshots(vec![idle_animal(
            0,
            Vec2::new(249.9, 500.0),
            Some(Vec2::new(400.0, 500.0)),
        )]);

        let mut out = Vec::new();
        patrol.handle(
            Viewport::new(800, 600),
            &hero_at(Vec2::new(400.0, 150.0)),
            &yard(),
            &animals,
            &mut out,
        );
        assert!(
            assigned_target(&out).is_some(),
            "the lookahead replaces the doomed target"
        );
    }

    #[test]
    fn targets_stay_clear_of_the_hero() {
        let mut patrol = Patrol::new(config(3));
        let hero = hero_at(Vec2::new(150.0, 150.0));
        let animals =
            AnimalView::from_snapshots(vec![idle_animal(0, Vec2::new(700.0, 100.0), None)]);

        for _ in 0..200 {
            let mut out = Vec::new();
            patrol.handle(Viewport::new(800, 600), &hero, &yard(), &animals, &mut out);
            let target = assigned_target(&out).expect("a target is assigned");
            assert!(
                target.distance(hero.position) >= 50.0,
                "target {:?} inside the hero clearance",
                target
            );
        }
    }

    #[test]
    fn assignments_are_deterministic_per_seed() {
        let hero = hero_at(Vec2::new(400.0, 150.0));
        let animals =
            AnimalView::from_snapshots(vec![idle_animal(0, Vec2::new(100.0, 100.0), None)]);

        let mut first = Patrol::new(config(77));
        let mut second = Patrol::new(config(77));
        let mut lhs = Vec::new();
        let mut rhs = Vec::new();
        first.handle(Viewport::new(800, 600), &hero, &yard(), &animals, &mut lhs);
        second.handle(Viewport::new(800, 600), &hero, &yard(), &animals, &mut rhs);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn exhausted_search_parks_the_animal_in_place() {
        // A yard buffer covering the whole screen leaves no valid samples.
        let bounds = Bounds::new(-400.0, -400.0, 1_200.0, 1_000.0);
        let saturated = YardView {
            bounds,
            buffered: bounds.expanded(50.0),
            center: bounds.center(),
            scale: 1.0,
        };
        let position = Vec2::new(100.0, 100.0);
        let animals = AnimalView::from_snapshots(vec![idle_animal(0, position, None)]);

        let mut patrol = Patrol::new(config(5));
        let mut out = Vec::new();
        patrol.handle(
            Viewport::new(800, 600),
            &hero_at(Vec2::new(400.0, 300.0)),
            &saturated,
            &animals,
            &mut out,
        );
        assert_eq!(assigned_target(&out), Some(position));
    }
}
