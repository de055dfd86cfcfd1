#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Yard arrival detection.
//!
//! Scans escorted animals against the yard rectangle every tick. Any animal
//! in [`AnimalState::Following`] or [`AnimalState::AutoDeliver`] whose centre
//! lies inside the yard bounds is handed over with [`Command::DeliverAnimal`]
//! in the same tick it crossed the edge. Idle animals are never delivered by
//! contact; keeping them clear of the yard is the patrol system's job.
//!
//! The system keeps no state of its own. The world latches each delivery, so
//! repeat scans of an already delivered animal cannot double-count.

use herdsman_core::{AnimalState, AnimalView, Command, YardView};

/// Stateless arrival scanner.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates the scanner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one [`Command::DeliverAnimal`] per escorted animal inside the
    /// yard bounds.
    pub fn handle(&mut self, yard: &YardView, animals: &AnimalView, out: &mut Vec<Command>) {
        for animal in animals.iter() {
            let escorted = matches!(
                animal.state,
                AnimalState::Following | AnimalState::AutoDeliver
            );
            if escorted && yard.bounds.contains(animal.position) {
                out.push(Command::DeliverAnimal { animal: animal.id });
            }
        }
    }
}
