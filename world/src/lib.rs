#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the herdsman simulation.
//!
//! The world owns the hero, the yard, and the animal herd. All mutation goes
//! through [`apply`], which executes one [`Command`] and broadcasts the
//! resulting [`Event`] values. Systems never touch the world directly; they
//! read the snapshots exposed by [`query`] and answer with command batches.

use std::collections::VecDeque;

use glam::Vec2;
use log::debug;

use herdsman_core::{
    AnimalId, AnimalState, Bounds, Command, Event, GameTuning, HeroMode, SampleStream, Viewport,
    YardTuning, PATROL_ARRIVE_DISTANCE,
};

/// Distance at which click guidance counts as arrived.
const CLICK_ARRIVE_EPSILON: f32 = 0.001;

/// Represents the authoritative herdsman world state.
#[derive(Debug)]
pub struct World {
    viewport: Viewport,
    tuning: GameTuning,
    hero: Hero,
    yard: Yard,
    animals: Vec<Animal>,
    next_animal_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world laid out for the default viewport.
    ///
    /// The herd is empty until a [`Command::ResetHerd`] arrives.
    #[must_use]
    pub fn new(tuning: GameTuning) -> Self {
        let viewport = Viewport::default();
        let yard = Yard::laid_out(viewport, &tuning.yard);
        let trail_capacity = tuning.trail.capacity(tuning.hero.max_followers);
        let hero = Hero::centered(viewport.size() / 2.0, trail_capacity);
        Self {
            viewport,
            tuning,
            hero,
            yard,
            animals: Vec::new(),
            next_animal_id: 0,
            tick_index: 0,
        }
    }

    fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animals.iter_mut().find(|animal| animal.id == id)
    }

    fn animal_index(&self, id: AnimalId) -> Option<usize> {
        self.animals.iter().position(|animal| animal.id == id)
    }

    fn buffered_yard(&self) -> Bounds {
        self.yard
            .bounds()
            .expanded(self.tuning.animal.min_spawn_distance)
    }

    fn set_hero_mode(&mut self, mode: HeroMode, out_events: &mut Vec<Event>) {
        if self.hero.mode != mode {
            self.hero.mode = mode;
            out_events.push(Event::HeroModeChanged { mode });
        }
    }

    fn relayout(&mut self, out_events: &mut Vec<Event>) {
        self.yard = Yard::laid_out(self.viewport, &self.tuning.yard);
        self.hero.position = self
            .viewport
            .clamp_inset(self.hero.position, self.tuning.hero.radius);

        let buffered = self.buffered_yard();
        let min_distance = self.tuning.animal.min_spawn_distance;
        for animal in self.animals.iter_mut() {
            let stale = animal
                .patrol_target
                .is_some_and(|target| buffered.distance_to(target) < min_distance);
            if stale {
                animal.patrol_target = None;
            }
        }

        out_events.push(Event::ViewportChanged {
            width: self.viewport.width(),
            height: self.viewport.height(),
        });
    }

    fn reset_herd(&mut self, seed: u64, out_events: &mut Vec<Event>) {
        let was_mode = self.hero.mode;
        self.hero.reset(self.viewport.size() / 2.0);
        if was_mode != HeroMode::Idle {
            out_events.push(Event::HeroModeChanged {
                mode: HeroMode::Idle,
            });
        }

        self.animals.clear();
        self.next_animal_id = 0;
        let count = self.tuning.animal.count;
        out_events.push(Event::HerdReset { animals: count });

        let mut sampler = SampleStream::new(seed);
        let buffered = self.buffered_yard();
        for _ in 0..count {
            let position = self.sample_spawn(&mut sampler, buffered);
            let id = AnimalId::new(self.next_animal_id);
            self.next_animal_id = self.next_animal_id.saturating_add(1);
            self.animals.push(Animal::at(id, position));
            out_events.push(Event::AnimalSpawned {
                animal: id,
                position,
            });
        }
    }

    fn sample_spawn(&self, sampler: &mut SampleStream, buffered_yard: Bounds) -> Vec2 {
        let size = self.viewport.size();
        let min_distance = self.tuning.animal.min_spawn_distance;
        let budget = self.tuning.sampling.spawn_attempts.max(1);

        let mut attempts = 0;
        loop {
            let candidate = Vec2::new(
                sampler.next_in_range(0.0, size.x),
                sampler.next_in_range(0.0, size.y),
            );
            attempts += 1;

            let clear_of_hero = candidate.distance(self.hero.position) >= min_distance;
            let clear_of_yard = buffered_yard.distance_to(candidate) >= min_distance;
            let clear_of_herd = self
                .animals
                .iter()
                .all(|animal| animal.position.distance(candidate) >= min_distance);
            if clear_of_hero && clear_of_yard && clear_of_herd {
                return candidate;
            }

            if attempts >= budget {
                debug!(
                    "herd spawn sampling exhausted after {} attempts; accepting crowded placement",
                    attempts
                );
                return candidate;
            }
        }
    }

    fn advance_hero(&mut self, out_events: &mut Vec<Event>) {
        let before = self.hero.position;
        let speed = self.tuning.hero.speed;

        match self.hero.mode {
            HeroMode::Idle => {
                self.hero.velocity = Vec2::ZERO;
            }
            HeroMode::Click | HeroMode::Drag => {
                if let Some(target) = self.hero.target {
                    let offset = target - self.hero.position;
                    let distance = offset.length();
                    if distance > speed {
                        self.hero.velocity = offset / distance * speed;
                        self.hero.position += self.hero.velocity;
                    } else {
                        self.hero.velocity = offset;
                        self.hero.position = target;
                    }

                    let arrived =
                        self.hero.position.distance(target) <= CLICK_ARRIVE_EPSILON;
                    if arrived && self.hero.mode == HeroMode::Click {
                        self.hero.target = None;
                        self.set_hero_mode(HeroMode::Idle, out_events);
                    }
                } else {
                    self.hero.velocity = Vec2::ZERO;
                }
            }
            HeroMode::Keyboard => {
                let axes = Vec2::new(f32::from(self.hero.steer.0), f32::from(self.hero.steer.1));
                self.hero.velocity = axes.normalize_or_zero() * speed;
                self.hero.position += self.hero.velocity;
            }
        }

        self.hero.position = self
            .viewport
            .clamp_inset(self.hero.position, self.tuning.hero.radius);
        self.hero.last_displacement = self.hero.position - before;
        self.hero.trail.record(self.hero.position);
    }

    fn advance_animals(&mut self) {
        let patrol_speed = self.tuning.animal.patrol_speed;
        let deliver_speed = self.tuning.animal.auto_deliver_speed;

        for animal in self.animals.iter_mut() {
            match animal.state {
                AnimalState::Idle => {
                    if let Some(target) = animal.patrol_target {
                        if animal.position.distance(target) < PATROL_ARRIVE_DISTANCE {
                            animal.patrol_target = None;
                        } else {
                            animal.position = step_toward(animal.position, target, patrol_speed);
                        }
                    }
                }
                // Followers only move on explicit step commands.
                AnimalState::Following => {}
                AnimalState::AutoDeliver => {
                    if let Some(target) = animal.auto_target {
                        animal.position = step_toward(animal.position, target, deliver_speed);
                    }
                }
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureViewport { width, height } => {
            world.viewport = Viewport::new(width, height);
            world.relayout(out_events);
        }
        Command::ResetHerd { seed } => {
            world.reset_herd(seed, out_events);
        }
        Command::PressAt { position } => {
            world.hero.dragging = true;
            world.hero.target = Some(position);
            world.set_hero_mode(HeroMode::Drag, out_events);
        }
        Command::DragTo { position } => {
            if world.hero.dragging {
                world.hero.target = Some(position);
            }
        }
        Command::Release => {
            world.hero.dragging = false;
            if world.hero.mode == HeroMode::Drag {
                world.hero.target = None;
                world.set_hero_mode(HeroMode::Idle, out_events);
            }
        }
        Command::TapAt { position } => {
            if world.hero.mode != HeroMode::Keyboard && !world.hero.dragging {
                world.hero.target = Some(position);
                world.set_hero_mode(HeroMode::Click, out_events);
            }
        }
        Command::EngageKeyboard => {
            world.hero.dragging = false;
            world.hero.target = None;
            world.set_hero_mode(HeroMode::Keyboard, out_events);
        }
        Command::Steer { x, y } => {
            world.hero.steer = (x.clamp(-1, 1), y.clamp(-1, 1));
        }
        Command::StartFollowing { animal } => {
            if let Some(recruit) = world.animal_mut(animal) {
                if recruit.state == AnimalState::Idle && !recruit.delivered {
                    recruit.enter_following();
                    out_events.push(Event::AnimalStateChanged {
                        animal,
                        state: AnimalState::Following,
                    });
                }
            }
        }
        Command::StepFollower {
            animal,
            target,
            max_step,
        } => {
            if let Some(follower) = world.animal_mut(animal) {
                if follower.state == AnimalState::Following && max_step > 0.0 {
                    follower.position = step_toward(follower.position, target, max_step);
                }
            }
        }
        Command::BeginDelivery { animal, target } => {
            if let Some(deliverer) = world.animal_mut(animal) {
                match deliverer.state {
                    AnimalState::Following => {
                        deliverer.enter_auto_deliver(target);
                        out_events.push(Event::AnimalStateChanged {
                            animal,
                            state: AnimalState::AutoDeliver,
                        });
                    }
                    AnimalState::AutoDeliver => {
                        deliverer.auto_target = Some(target);
                    }
                    AnimalState::Idle => {}
                }
            }
        }
        Command::AssignPatrol { animal, target } => {
            if let Some(wanderer) = world.animal_mut(animal) {
                if wanderer.state == AnimalState::Idle {
                    wanderer.patrol_target = Some(target);
                }
            }
        }
        Command::DeliverAnimal { animal } => {
            if let Some(index) = world.animal_index(animal) {
                if !world.animals[index].delivered {
                    world.animals[index].delivered = true;
                    out_events.push(Event::AnimalDelivered { animal });
                    let _ = world.animals.remove(index);
                }
            }
        }
        Command::Tick { dt_ms } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt_ms });
            world.advance_hero(out_events);
            world.advance_animals();
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use herdsman_core::{AnimalSnapshot, AnimalView, HeroView, Viewport, YardView};

    /// Returns the active viewport dimensions.
    #[must_use]
    pub fn viewport(world: &World) -> Viewport {
        world.viewport
    }

    /// Returns the number of ticks applied since construction.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only snapshot of the hero.
    #[must_use]
    pub fn hero_view(world: &World) -> HeroView {
        HeroView {
            position: world.hero.position,
            velocity: world.hero.velocity,
            mode: world.hero.mode,
            target: world.hero.target,
            dragging: world.hero.dragging,
            radius: world.tuning.hero.radius,
            actual_speed: world.hero.last_displacement.length(),
            trail: world.hero.trail.points().collect(),
        }
    }

    /// Captures the yard layout together with its exclusion buffer.
    #[must_use]
    pub fn yard_view(world: &World) -> YardView {
        let bounds = world.yard.bounds();
        YardView {
            bounds,
            buffered: world.buffered_yard(),
            center: bounds.center(),
            scale: world.yard.scale(),
        }
    }

    /// Captures a read-only view of the animals on the field.
    #[must_use]
    pub fn animal_view(world: &World) -> AnimalView {
        let snapshots: Vec<AnimalSnapshot> = world
            .animals
            .iter()
            .map(|animal| AnimalSnapshot {
                id: animal.id,
                position: animal.position,
                state: animal.state,
                patrol_target: animal.patrol_target,
                auto_target: animal.auto_target,
                radius: world.tuning.animal.radius,
            })
            .collect();
        AnimalView::from_snapshots(snapshots)
    }
}

/// Moves `position` toward `target` by at most `max_step`, snapping on arrival.
fn step_toward(position: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let offset = target - position;
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        target
    } else {
        position + offset / distance * max_step
    }
}

#[derive(Debug)]
struct Hero {
    position: Vec2,
    velocity: Vec2,
    target: Option<Vec2>,
    mode: HeroMode,
    dragging: bool,
    steer: (i8, i8),
    last_displacement: Vec2,
    trail: Trail,
}

impl Hero {
    fn centered(position: Vec2, trail_capacity: usize) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            target: None,
            mode: HeroMode::Idle,
            dragging: false,
            steer: (0, 0),
            last_displacement: Vec2::ZERO,
            trail: Trail::new(trail_capacity),
        }
    }

    fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.target = None;
        self.mode = HeroMode::Idle;
        self.dragging = false;
        self.steer = (0, 0);
        self.last_displacement = Vec2::ZERO;
        self.trail.clear();
    }
}

#[derive(Debug)]
struct Yard {
    bounds: Bounds,
    scale: f32,
}

impl Yard {
    /// Scales the yard art to cover the configured viewport fraction and
    /// anchors it bottom-center.
    fn laid_out(viewport: Viewport, tuning: &YardTuning) -> Self {
        let size = viewport.size();
        let height_scale = (size.y * tuning.height_fraction) / tuning.base_height;
        let width_scale = (size.x - tuning.margin) / tuning.base_width;
        let scale = height_scale.min(width_scale).max(0.0);
        let width = tuning.base_width * scale;
        let height = tuning.base_height * scale;
        let left = (size.x - width) / 2.0;
        Self {
            bounds: Bounds::new(left, size.y - height, left + width, size.y),
            scale,
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn scale(&self) -> f32 {
        self.scale
    }
}

#[derive(Clone, Debug)]
struct Animal {
    id: AnimalId,
    position: Vec2,
    state: AnimalState,
    patrol_target: Option<Vec2>,
    auto_target: Option<Vec2>,
    delivered: bool,
}

impl Animal {
    fn at(id: AnimalId, position: Vec2) -> Self {
        Self {
            id,
            position,
            state: AnimalState::Idle,
            patrol_target: None,
            auto_target: None,
            delivered: false,
        }
    }

    fn enter_following(&mut self) {
        self.state = AnimalState::Following;
        self.patrol_target = None;
        self.auto_target = None;
    }

    fn enter_auto_deliver(&mut self, target: Vec2) {
        self.state = AnimalState::AutoDeliver;
        self.patrol_target = None;
        self.auto_target = Some(target);
    }
}

#[derive(Debug)]
struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn record(&mut self, position: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            let _ = self.points.pop_front();
        }
        self.points.push_back(position);
    }

    fn clear(&mut self) {
        self.points.clear();
    }

    fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }
}
