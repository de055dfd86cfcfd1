#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hand-off from following to self-delivery for the herdsman simulation.
//!
//! The system watches for the hero entering the yard. On that rising edge
//! every current follower is released toward the yard center and walks itself
//! in, freeing the hero to gather the next group. Sustained overlap does not
//! re-trigger; the hero has to leave the yard and come back.

use herdsman_core::{AnimalState, AnimalView, Command, HeroView, YardView};

/// Converts followers into self-delivering animals.
#[derive(Debug, Default)]
pub struct AutoDeliver {
    was_overlapping: bool,
}

impl AutoDeliver {
    /// Creates the system with no overlap recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one overlap-edge pass.
    ///
    /// Overlap tests the hero circle against the yard rectangle. Animals
    /// already delivering that somehow lost their destination are re-aimed at
    /// the yard center.
    pub fn handle(
        &mut self,
        hero: &HeroView,
        yard: &YardView,
        animals: &AnimalView,
        out: &mut Vec<Command>,
    ) {
        let overlapping = yard.bounds.overlaps_circle(hero.position, hero.radius);
        let rising_edge = overlapping && !self.was_overlapping;
        self.was_overlapping = overlapping;

        for animal in animals.iter() {
            let release = rising_edge && animal.state == AnimalState::Following;
            let stranded = animal.state == AnimalState::AutoDeliver && animal.auto_target.is_none();
            if release || stranded {
                out.push(Command::BeginDelivery {
                    animal: animal.id,
                    target: yard.center,
                });
            }
        }
    }

    /// Clears the overlap edge detector, for session resets.
    pub fn reset(&mut self) {
        self.was_overlapping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use herdsman_core::{AnimalId, AnimalSnapshot, Bounds, HeroMode};

    fn hero_at(position: Vec2) -> HeroView {
        HeroView {
            position,
            velocity: Vec2::ZERO,
            mode: HeroMode::Drag,
            target: None,
            dragging: true,
            radius: 30.0,
            actual_speed: 8.0,
            trail: Vec::new(),
        }
    }

    fn yard() -> YardView {
        let bounds = Bounds::new(300.0, 480.0, 500.0, 600.0);
        YardView {
            bounds,
            buffered: bounds.expanded(50.0),
            center: bounds.center(),
            scale: 0.5,
        }
    }

    fn animal(id: u32, state: AnimalState, auto_target: Option<Vec2>) -> AnimalSnapshot {
        AnimalSnapshot {
            id: AnimalId::new(id),
            position: Vec2::new(100.0, 100.0),
            state,
            patrol_target: None,
            auto_target,
            radius: 20.0,
        }
    }

    #[test]
    fn entering_the_yard_releases_every_follower() {
        let mut system = AutoDeliver::new();
        let yard = yard();
        let animals = AnimalView::from_snapshots(vec![
            animal(0, AnimalState::Following, None),
            animal(1, AnimalState::Idle, None),
            animal(2, AnimalState::Following, None),
        ]);

        let mut out = Vec::new();
        system.handle(&hero_at(Vec2::new(400.0, 500.0)), &yard, &animals, &mut out);
        assert_eq!(
            out,
            vec![
                Command::BeginDelivery {
                    animal: AnimalId::new(0),
                    target: yard.center,
                },
                Command::BeginDelivery {
                    animal: AnimalId::new(2),
                    target: yard.center,
                },
            ]
        );
    }

    #[test]
    fn sustained_overlap_does_not_retrigger() {
        let mut system = AutoDeliver::new();
        let yard = yard();
        let animals = AnimalView::from_snapshots(vec![animal(0, AnimalState::Following, None)]);

        let mut out = Vec::new();
        system.handle(&hero_at(Vec2::new(400.0, 500.0)), &yard, &animals, &mut out);
        assert_eq!(out.len(), 1);

        out.clear();
        system.handle(&hero_at(Vec2::new(410.0, 510.0)), &yard, &animals, &mut out);
        assert!(out.is_empty(), "second overlapping frame is not an edge");
    }

    #[test]
    fn leaving_and_returning_triggers_again() {
        let mut system = AutoDeliver::new();
        let yard = yard();
        let animals = AnimalView::from_snapshots(vec![animal(0, AnimalState::Following, None)]);

        let mut out = Vec::new();
        system.handle(&hero_at(Vec2::new(400.0, 500.0)), &yard, &animals, &mut out);
        out.clear();
        system.handle(&hero_at(Vec2::new(100.0, 100.0)), &yard, &animals, &mut out);
        assert!(out.is_empty());
        system.handle(&hero_at(Vec2::new(400.0, 500.0)), &yard, &animals, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn grazing_contact_counts_as_overlap() {
        let mut system = AutoDeliver::new();
        let yard = yard();
        let animals = AnimalView::from_snapshots(vec![animal(0, AnimalState::Following, None)]);

        // Hero circle touches the yard's left edge exactly.
        let mut out = Vec::new();
        system.handle(&hero_at(Vec2::new(270.0, 500.0)), &yard, &animals, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn stranded_deliverer_is_reaimed_at_the_center() {
        let mut system = AutoDeliver::new();
        let yard = yard();
        let animals = AnimalView::from_snapshots(vec![
            animal(0, AnimalState::AutoDeliver, None),
            animal(1, AnimalState::AutoDeliver, Some(Vec2::new(400.0, 540.0))),
        ]);

        let mut out = Vec::new();
        system.handle(&hero_at(Vec2::new(100.0, 100.0)), &yard, &animals, &mut out);
        assert_eq!(
            out,
            vec![Command::BeginDelivery {
                animal: AnimalId::new(0),
                target: yard.center,
            }]
        );
    }

    #[test]
    fn reset_rearms_the_edge_detector() {
        let mut system = AutoDeliver::new();
        let yard = yard();
        let animals = AnimalView::from_snapshots(vec![animal(0, AnimalState::Following, None)]);

        let mut out = Vec::new();
        system.handle(&hero_at(Vec2::new(400.0, 500.0)), &yard, &animals, &mut out);
        out.clear();
        system.reset();
        system.handle(&hero_at(Vec2::new(400.0, 500.0)), &yard, &animals, &mut out);
        assert_eq!(out.len(), 1, "reset forgets the previous overlap");
    }
}
