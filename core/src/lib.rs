#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the herdsman simulation.
//!
//! Everything that crosses a crate boundary lives here: the closed
//! [`Command`] and [`Event`] enums, the snapshot views systems read instead
//! of reaching into the world, and the tuning tables the session validates
//! at boot. Adapters submit commands describing desired mutations, the world
//! applies them and broadcasts typed events, and systems answer exclusively
//! with fresh command batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Multiplier for the linear congruential sampling stream.
const SAMPLE_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
/// Increment for the linear congruential sampling stream.
const SAMPLE_INCREMENT: u64 = 1;

/// Distance at which a patrol target counts as reached.
///
/// Shared by the world, which drops reached targets, and the patrol system,
/// which assigns replacements.
pub const PATROL_ARRIVE_DISTANCE: f32 = 4.0;

/// Lifecycle phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Initial phase before the first run starts; also restored on reset.
    Boot,
    /// Simulation is ticking and accepting hero guidance.
    Running,
    /// Simulation is frozen; only a pause toggle is honored.
    Paused,
    /// Every spawned animal was delivered; the session is over.
    Completed,
}

/// Active guidance mode for the hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeroMode {
    /// No guidance; the hero stands still.
    Idle,
    /// Moving toward a tapped point, stopping on arrival.
    Click,
    /// Tracking the pointer while the button is held.
    Drag,
    /// Steered by directional keys until further notice.
    Keyboard,
}

/// Behavioral state of an animal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimalState {
    /// Wandering between patrol targets away from the yard.
    Idle,
    /// Recruited into the hero's trail-following chain.
    Following,
    /// Walking itself into the yard after the hero reached it.
    AutoDeliver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the viewport and relayouts the yard.
    ConfigureViewport {
        /// Viewport width in world units.
        width: u32,
        /// Viewport height in world units.
        height: u32,
    },
    /// Recenters the hero and respawns the full animal herd.
    ResetHerd {
        /// Seed for the deterministic spawn-sampling stream.
        seed: u64,
    },
    /// Reports a pointer press, entering drag guidance.
    PressAt {
        /// Pointer position in viewport space.
        position: Vec2,
    },
    /// Reports pointer motion while the button is held.
    DragTo {
        /// Pointer position in viewport space.
        position: Vec2,
    },
    /// Reports the pointer button being released.
    Release,
    /// Reports a tap, entering click guidance toward the tapped point.
    TapAt {
        /// Tapped position in viewport space.
        position: Vec2,
    },
    /// Switches the hero to keyboard guidance, clearing pointer targets.
    EngageKeyboard,
    /// Updates the keyboard steering axes for subsequent ticks.
    Steer {
        /// Horizontal axis in {-1, 0, 1}.
        x: i8,
        /// Vertical axis in {-1, 0, 1}.
        y: i8,
    },
    /// Recruits an idle animal into the following chain.
    StartFollowing {
        /// Identifier of the recruited animal.
        animal: AnimalId,
    },
    /// Requests a capped movement step for a following animal.
    StepFollower {
        /// Identifier of the follower to move.
        animal: AnimalId,
        /// Point the follower should move toward.
        target: Vec2,
        /// Upper bound on the step length for this tick.
        max_step: f32,
    },
    /// Sends a following animal to deliver itself to the given point.
    BeginDelivery {
        /// Identifier of the animal entering auto-delivery.
        animal: AnimalId,
        /// Destination inside the yard.
        target: Vec2,
    },
    /// Assigns or replaces an idle animal's patrol target.
    AssignPatrol {
        /// Identifier of the patrolling animal.
        animal: AnimalId,
        /// New wander destination.
        target: Vec2,
    },
    /// Marks an animal as delivered and removes it from the field.
    DeliverAnimal {
        /// Identifier of the delivered animal.
        animal: AnimalId,
    },
    /// Advances entity-local motion by one frame.
    Tick {
        /// Frame delta in milliseconds.
        dt_ms: f32,
    },
}

/// Events broadcast by the world and session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the viewport changed and layout was recomputed.
    ViewportChanged {
        /// New viewport width in world units.
        width: u32,
        /// New viewport height in world units.
        height: u32,
    },
    /// Confirms that the herd was respawned from scratch.
    HerdReset {
        /// Number of animals placed by the spawn pass.
        animals: u32,
    },
    /// Confirms that a single animal was placed on the field.
    AnimalSpawned {
        /// Identifier assigned to the animal.
        animal: AnimalId,
        /// Position the animal occupies after spawning.
        position: Vec2,
    },
    /// Announces that the hero switched guidance mode.
    HeroModeChanged {
        /// Mode that became active after processing commands.
        mode: HeroMode,
    },
    /// Announces that an animal transitioned between behavioral states.
    AnimalStateChanged {
        /// Identifier of the animal that transitioned.
        animal: AnimalId,
        /// State the animal is in after the transition.
        state: AnimalState,
    },
    /// Confirms that an animal was delivered into the yard.
    AnimalDelivered {
        /// Identifier of the delivered animal.
        animal: AnimalId,
    },
    /// Reports the running score after a change.
    ScoreChanged {
        /// Total deliveries counted so far this session.
        total: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Frame delta in milliseconds that elapsed in the tick.
        dt_ms: f32,
    },
    /// Announces a session phase transition.
    PhaseChanged {
        /// Phase the session left.
        from: SessionPhase,
        /// Phase the session entered.
        to: SessionPhase,
    },
    /// Reports that the player asked to toggle pause.
    PauseRequested,
}

/// Unique identifier for an animal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct AnimalId(u32);

impl AnimalId {
    /// Creates a new identifier from a raw index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw index backing the identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Viewport dimensions in world units.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport from its dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the viewport width.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Returns the viewport height.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a vector.
    #[must_use]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Clamps a point so a circle of `inset` radius stays fully on screen.
    ///
    /// When the viewport is narrower than the circle, the far edge wins.
    #[must_use]
    pub fn clamp_inset(self, point: Vec2, inset: f32) -> Vec2 {
        let size = self.size();
        Vec2::new(
            point.x.max(inset).min(size.x - inset),
            point.y.max(inset).min(size.y - inset),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Axis-aligned rectangle in world space.
///
/// Construction normalizes the edges so `left <= right` and `top <= bottom`
/// always hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Bounds {
    /// Creates a rectangle from its edges, swapping them if reversed.
    #[must_use]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Returns the left edge.
    #[must_use]
    pub const fn left(self) -> f32 {
        self.left
    }

    /// Returns the top edge.
    #[must_use]
    pub const fn top(self) -> f32 {
        self.top
    }

    /// Returns the right edge.
    #[must_use]
    pub const fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom edge.
    #[must_use]
    pub const fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the rectangle width.
    #[must_use]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    /// Returns the rectangle height.
    #[must_use]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Returns the rectangle grown outward by `margin` on every edge.
    #[must_use]
    pub fn expanded(self, margin: f32) -> Self {
        Self::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }

    /// Returns the Euclidean distance from the point to the rectangle.
    ///
    /// Points inside the rectangle are at distance zero.
    #[must_use]
    pub fn distance_to(self, point: Vec2) -> f32 {
        let dx = (self.left - point.x).max(point.x - self.right).max(0.0);
        let dy = (self.top - point.y).max(point.y - self.bottom).max(0.0);
        Vec2::new(dx, dy).length()
    }

    /// Reports whether a circle overlaps the rectangle.
    #[must_use]
    pub fn overlaps_circle(self, center: Vec2, radius: f32) -> bool {
        self.distance_to(center) <= radius
    }
}

/// Deterministic pseudo-random stream for spawn and patrol sampling.
///
/// A fixed linear congruential generator keeps placement reproducible for a
/// given seed without pulling a full RNG crate into the simulation crates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleStream {
    state: u64,
}

impl SampleStream {
    /// Creates a stream seeded with the provided value.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advances the stream and returns the next raw sample.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(SAMPLE_MULTIPLIER)
            .wrapping_add(SAMPLE_INCREMENT);
        (self.state >> 32) as u32
    }

    /// Returns the next sample scaled into `[0, 1]`.
    pub fn next_unit(&mut self) -> f32 {
        (f64::from(self.next_u32()) / f64::from(u32::MAX)) as f32
    }

    /// Returns the next sample scaled into `[lo, hi]`.
    pub fn next_in_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }
}

/// Read-only snapshot describing the hero.
#[derive(Clone, Debug)]
pub struct HeroView {
    /// Current position after the latest clamp.
    pub position: Vec2,
    /// Step vector commanded for the last tick, before clamping.
    pub velocity: Vec2,
    /// Active guidance mode.
    pub mode: HeroMode,
    /// Active guidance target, if any.
    pub target: Option<Vec2>,
    /// Whether a pointer drag is in progress.
    pub dragging: bool,
    /// Collision and clamping radius.
    pub radius: f32,
    /// Euclidean norm of the last realized displacement.
    pub actual_speed: f32,
    /// Recorded positions, oldest first.
    pub trail: Vec<Vec2>,
}

/// Read-only snapshot describing the yard layout.
#[derive(Clone, Copy, Debug)]
pub struct YardView {
    /// Yard rectangle in world space.
    pub bounds: Bounds,
    /// Yard rectangle grown by the spawn clearance margin.
    pub buffered: Bounds,
    /// Center of the yard rectangle.
    pub center: Vec2,
    /// Scale applied to the yard art by layout.
    pub scale: f32,
}

/// Read-only snapshot describing all animals on the field.
#[derive(Clone, Debug, Default)]
pub struct AnimalView {
    snapshots: Vec<AnimalSnapshot>,
}

impl AnimalView {
    /// Builds a view from raw snapshots, sorting them into id order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AnimalSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic id order.
    pub fn iter(&self) -> impl Iterator<Item = &AnimalSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AnimalSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single animal's state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimalSnapshot {
    /// Unique identifier assigned at spawn.
    pub id: AnimalId,
    /// Current field position.
    pub position: Vec2,
    /// Behavioral state.
    pub state: AnimalState,
    /// Wander destination, populated only while idle.
    pub patrol_target: Option<Vec2>,
    /// Delivery destination, populated only while auto-delivering.
    pub auto_target: Option<Vec2>,
    /// Visual and stand-off radius.
    pub radius: f32,
}

/// Tuning for the hero entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroTuning {
    /// Collision and clamping radius in world units.
    pub radius: f32,
    /// Movement speed in world units per frame.
    pub speed: f32,
    /// Distance at which idle animals start following the hero.
    pub follow_trigger_distance: f32,
    /// Maximum number of simultaneous followers.
    pub max_followers: u32,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            radius: 30.0,
            speed: 8.0,
            follow_trigger_distance: 80.0,
            max_followers: 5,
        }
    }
}

/// Tuning for the animal herd.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalTuning {
    /// Visual and stand-off radius in world units.
    pub radius: f32,
    /// Wander speed in world units per frame.
    pub patrol_speed: f32,
    /// Self-delivery speed in world units per frame; defaults to hero speed.
    pub auto_deliver_speed: f32,
    /// Minimum clearance from hero, yard buffer, and other spawns.
    pub min_spawn_distance: f32,
    /// Number of animals in a full herd.
    pub count: u32,
}

impl Default for AnimalTuning {
    fn default() -> Self {
        Self {
            radius: 20.0,
            patrol_speed: 0.2,
            auto_deliver_speed: 8.0,
            min_spawn_distance: 50.0,
            count: 10,
        }
    }
}

/// Tuning for the yard layout.
///
/// The yard art has a natural size; layout scales it so its height covers
/// `height_fraction` of the viewport, capping the width at the viewport
/// width minus `margin`, and anchors it bottom-center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YardTuning {
    /// Natural art width in world units before scaling.
    pub base_width: f32,
    /// Natural art height in world units before scaling.
    pub base_height: f32,
    /// Fraction of the viewport height the yard should cover.
    pub height_fraction: f32,
    /// Width headroom reserved when the viewport caps the yard.
    pub margin: f32,
}

impl Default for YardTuning {
    fn default() -> Self {
        Self {
            base_width: 400.0,
            base_height: 240.0,
            height_fraction: 0.2,
            margin: 12.0,
        }
    }
}

/// Tuning for the hero trail used by lagged pursuit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailTuning {
    /// Trail entries of lag applied per follower rank.
    pub lag_frames_per_follower: u32,
    /// Extra capacity kept beyond the deepest follower's lag index.
    pub safety_margin: u32,
}

impl TrailTuning {
    /// Returns the bounded trail capacity for the given follower cap.
    #[must_use]
    pub const fn capacity(&self, max_followers: u32) -> usize {
        (max_followers * self.lag_frames_per_follower + self.safety_margin) as usize
    }
}

impl Default for TrailTuning {
    fn default() -> Self {
        Self {
            lag_frames_per_follower: 12,
            safety_margin: 5,
        }
    }
}

/// Tuning for randomized placement searches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingTuning {
    /// Attempt budget per animal when spawning the herd.
    pub spawn_attempts: u32,
    /// Attempt budget per patrol-target search.
    pub patrol_attempts: u32,
    /// Inset from the viewport edges for patrol targets.
    pub edge_margin: f32,
}

impl Default for SamplingTuning {
    fn default() -> Self {
        Self {
            spawn_attempts: 100,
            patrol_attempts: 50,
            edge_margin: 12.0,
        }
    }
}

/// Aggregated tuning consumed by the world and derived system configs.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Hero movement and recruitment knobs.
    pub hero: HeroTuning,
    /// Herd size, speeds, and clearances.
    pub animal: AnimalTuning,
    /// Yard art size and layout rule.
    pub yard: YardTuning,
    /// Trail depth behind the hero.
    pub trail: TrailTuning,
    /// Retry budgets for placement sampling.
    pub sampling: SamplingTuning,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_round_trip<T>(value: &T)
    where
        T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let decoded: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&decoded, value);
    }

    #[test]
    fn animal_id_round_trips_through_bincode() {
        assert_round_trip(&AnimalId::new(7));
    }

    #[test]
    fn viewport_round_trips_through_bincode() {
        assert_round_trip(&Viewport::new(1_280, 720));
    }

    #[test]
    fn bounds_round_trips_through_bincode() {
        assert_round_trip(&Bounds::new(300.0, 500.0, 500.0, 600.0));
    }

    #[test]
    fn tuning_round_trips_through_bincode() {
        assert_round_trip(&GameTuning::default());
    }

    #[test]
    fn bounds_normalizes_reversed_edges() {
        let bounds = Bounds::new(500.0, 600.0, 300.0, 500.0);
        assert_eq!(bounds.left(), 300.0);
        assert_eq!(bounds.top(), 500.0);
        assert_eq!(bounds.right(), 500.0);
        assert_eq!(bounds.bottom(), 600.0);
    }

    #[test]
    fn bounds_contains_is_edge_inclusive() {
        let bounds = Bounds::new(300.0, 500.0, 500.0, 600.0);
        assert!(bounds.contains(Vec2::new(300.0, 500.0)));
        assert!(bounds.contains(Vec2::new(500.0, 600.0)));
        assert!(bounds.contains(Vec2::new(400.0, 550.0)));
        assert!(!bounds.contains(Vec2::new(299.9, 550.0)));
    }

    #[test]
    fn bounds_distance_is_zero_inside_and_euclidean_outside() {
        let bounds = Bounds::new(300.0, 500.0, 500.0, 600.0);
        assert_eq!(bounds.distance_to(Vec2::new(400.0, 550.0)), 0.0);
        assert_eq!(bounds.distance_to(Vec2::new(250.0, 550.0)), 50.0);
        let corner = bounds.distance_to(Vec2::new(297.0, 496.0));
        assert!((corner - 5.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_expansion_grows_every_edge() {
        let bounds = Bounds::new(300.0, 500.0, 500.0, 600.0).expanded(50.0);
        assert_eq!(bounds.left(), 250.0);
        assert_eq!(bounds.top(), 450.0);
        assert_eq!(bounds.right(), 550.0);
        assert_eq!(bounds.bottom(), 650.0);
    }

    #[test]
    fn circle_overlap_matches_point_distance() {
        let bounds = Bounds::new(300.0, 500.0, 500.0, 600.0);
        assert!(bounds.overlaps_circle(Vec2::new(270.0, 550.0), 30.0));
        assert!(!bounds.overlaps_circle(Vec2::new(269.0, 550.0), 30.0));
        assert!(bounds.overlaps_circle(Vec2::new(400.0, 550.0), 1.0));
    }

    #[test]
    fn viewport_clamp_keeps_circle_on_screen() {
        let viewport = Viewport::new(800, 600);
        let clamped = viewport.clamp_inset(Vec2::new(-40.0, 700.0), 30.0);
        assert_eq!(clamped, Vec2::new(30.0, 570.0));
        let inside = viewport.clamp_inset(Vec2::new(400.0, 300.0), 30.0);
        assert_eq!(inside, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn sample_stream_is_deterministic_per_seed() {
        let mut first = SampleStream::new(42);
        let mut second = SampleStream::new(42);
        for _ in 0..16 {
            assert_eq!(first.next_u32(), second.next_u32());
        }
        let mut baseline = SampleStream::new(42);
        let mut other = SampleStream::new(43);
        let from_42: Vec<u32> = (0..8).map(|_| baseline.next_u32()).collect();
        let from_43: Vec<u32> = (0..8).map(|_| other.next_u32()).collect();
        assert_ne!(from_42, from_43);
    }

    #[test]
    fn sample_stream_range_stays_within_bounds() {
        let mut stream = SampleStream::new(7);
        for _ in 0..256 {
            let value = stream.next_in_range(12.0, 788.0);
            assert!((12.0..=788.0).contains(&value));
        }
    }

    #[test]
    fn trail_capacity_follows_follower_cap() {
        let trail = TrailTuning::default();
        assert_eq!(trail.capacity(5), 65);
        assert_eq!(trail.capacity(0), 5);
    }
}
