#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Herdsman front ends.
//!
//! The simulation emits read-only views; this crate turns them into
//! declarative scene and HUD descriptors that any backend can draw without
//! touching world state.

use glam::Vec2;
use herdsman_core::{
    AnimalId, AnimalState, AnimalView, Bounds, HeroView, SessionPhase, Viewport, YardView,
};

pub mod clock;
pub mod records;
pub mod strings;

use clock::format_time;
use strings::{Catalog, StringKey};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white, the neutral sprite tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Pasture green used to clear each frame.
pub const FIELD_COLOR: Color = Color::from_rgb_u8(120, 168, 96);

/// Warm highlight applied to animals walking in the hero's trail.
pub const FOLLOWING_TINT: Color = Color::from_rgb_u8(255, 228, 150);

/// Cool highlight applied to animals delivering themselves to the yard.
pub const DELIVERING_TINT: Color = Color::from_rgb_u8(168, 214, 255);

/// Identifies the texture a backend should bind for a scene element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Full-screen pasture backdrop.
    Background,
    /// The herdsman sprite.
    Hero,
    /// A herd animal sprite.
    Animal,
    /// The destination yard sprite.
    Yard,
}

impl TextureKey {
    /// Stable asset name used for lookup tables and log lines.
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Hero => "hero",
            Self::Animal => "animal",
            Self::Yard => "yard",
        }
    }
}

/// Hero drawn as a circle sprite at its clamped world position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroPresentation {
    /// World-space center of the sprite.
    pub position: Vec2,
    /// Sprite radius in world units.
    pub radius: f32,
    /// Multiplicative sprite tint.
    pub tint: Color,
    /// Texture bound when drawing the hero.
    pub texture: TextureKey,
}

impl HeroPresentation {
    /// Creates a new hero descriptor.
    #[must_use]
    pub const fn new(position: Vec2, radius: f32, tint: Color, texture: TextureKey) -> Self {
        Self {
            position,
            radius,
            tint,
            texture,
        }
    }
}

/// Single herd animal drawn at its world position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimalPresentation {
    /// Identifier assigned to the animal at spawn.
    pub id: AnimalId,
    /// World-space center of the sprite.
    pub position: Vec2,
    /// Sprite radius in world units.
    pub radius: f32,
    /// Behavioral state driving the tint.
    pub state: AnimalState,
    /// Multiplicative sprite tint.
    pub tint: Color,
    /// Texture bound when drawing the animal.
    pub texture: TextureKey,
}

impl AnimalPresentation {
    /// Creates a new animal descriptor.
    #[must_use]
    pub const fn new(
        id: AnimalId,
        position: Vec2,
        radius: f32,
        state: AnimalState,
        tint: Color,
        texture: TextureKey,
    ) -> Self {
        Self {
            id,
            position,
            radius,
            state,
            tint,
            texture,
        }
    }
}

/// Destination yard drawn as a scaled rectangle sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YardPresentation {
    /// Yard rectangle in world space.
    pub bounds: Bounds,
    /// Scale applied to the yard art by layout.
    pub scale: f32,
    /// Multiplicative sprite tint.
    pub tint: Color,
    /// Texture bound when drawing the yard.
    pub texture: TextureKey,
}

impl YardPresentation {
    /// Creates a new yard descriptor.
    #[must_use]
    pub const fn new(bounds: Bounds, scale: f32, tint: Color, texture: TextureKey) -> Self {
        Self {
            bounds,
            scale,
            tint,
            texture,
        }
    }
}

/// Scene description combining the field, the yard and all inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewport the scene was composed for.
    pub viewport: Viewport,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Texture stretched across the viewport behind everything else.
    pub backdrop: TextureKey,
    /// Destination yard, drawn above the backdrop.
    pub yard: YardPresentation,
    /// The herdsman, drawn above the animals.
    pub hero: HeroPresentation,
    /// Herd animals in ascending id order.
    pub animals: Vec<AnimalPresentation>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(
        viewport: Viewport,
        clear_color: Color,
        backdrop: TextureKey,
        yard: YardPresentation,
        hero: HeroPresentation,
        animals: Vec<AnimalPresentation>,
    ) -> Self {
        Self {
            viewport,
            clear_color,
            backdrop,
            yard,
            hero,
            animals,
        }
    }
}

/// Tint applied to an animal sprite for its behavioral state.
#[must_use]
pub const fn state_tint(state: AnimalState) -> Color {
    match state {
        AnimalState::Idle => Color::WHITE,
        AnimalState::Following => FOLLOWING_TINT,
        AnimalState::AutoDeliver => DELIVERING_TINT,
    }
}

/// Composes a drawable scene from the simulation's read-only views.
///
/// Animals keep the deterministic id order of [`AnimalView`], so backends can
/// diff consecutive scenes without re-sorting.
#[must_use]
pub fn compose_scene(
    viewport: Viewport,
    hero: &HeroView,
    yard: &YardView,
    animals: &AnimalView,
) -> Scene {
    let animals = animals
        .iter()
        .map(|snapshot| {
            AnimalPresentation::new(
                snapshot.id,
                snapshot.position,
                snapshot.radius,
                snapshot.state,
                state_tint(snapshot.state),
                TextureKey::Animal,
            )
        })
        .collect();

    Scene::new(
        viewport,
        FIELD_COLOR,
        TextureKey::Background,
        YardPresentation::new(yard.bounds, yard.scale, Color::WHITE, TextureKey::Yard),
        HeroPresentation::new(hero.position, hero.radius, Color::WHITE, TextureKey::Hero),
        animals,
    )
}

/// Pause overlay composed when the simulation freezes.
///
/// Mirrors the front end's pause modal: a title, one trivia line picked from
/// the catalog, and the resume control label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PauseOverlay {
    /// Overlay title.
    pub title: String,
    /// Trivia line shown while the player rests.
    pub fun_fact: String,
    /// Label of the resume control.
    pub resume_label: String,
}

/// Composes the pause overlay, selecting a trivia line by `pick`.
///
/// Callers supply whatever source of variety they like for `pick`; the
/// overlay is a pure function of it, so replays repeat the same fact.
#[must_use]
pub fn compose_pause_overlay(catalog: &Catalog, pick: u64) -> PauseOverlay {
    let facts = StringKey::FUN_FACTS;
    let fact = facts[(pick % facts.len() as u64) as usize];
    PauseOverlay {
        title: catalog.translate(StringKey::Pause).to_owned(),
        fun_fact: catalog.translate(fact).to_owned(),
        resume_label: catalog.translate(StringKey::Resume).to_owned(),
    }
}

/// Localized HUD text composed for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudModel {
    /// Score counter, e.g. `Score: 3/10`.
    pub score_line: String,
    /// Running clock in minutes, seconds and tenths.
    pub clock_line: String,
    /// Overlay banner shown while the simulation is not running.
    pub banner: Option<String>,
    /// Completion summary lines, present only after the herd is delivered.
    pub results: Vec<String>,
}

/// Composes the HUD text for the current session state.
///
/// `elapsed_ms` and `best_ms` are wall-clock milliseconds; the best time is
/// omitted from the results when no record exists yet.
#[must_use]
pub fn compose_hud(
    catalog: &Catalog,
    phase: SessionPhase,
    score: u32,
    herd_size: u32,
    elapsed_ms: u64,
    best_ms: Option<u64>,
) -> HudModel {
    let score_line = format!("{}: {}/{}", catalog.translate(StringKey::Score), score, herd_size);
    let clock_line = format_time(elapsed_ms);

    let banner = match phase {
        SessionPhase::Boot => Some(catalog.translate(StringKey::StartGame).to_owned()),
        SessionPhase::Running => None,
        SessionPhase::Paused => Some(catalog.translate(StringKey::Pause).to_owned()),
        SessionPhase::Completed => Some(catalog.translate(StringKey::GameCompleted).to_owned()),
    };

    let mut results = Vec::new();
    if phase == SessionPhase::Completed {
        results.push(catalog.translate(StringKey::Congratulations).to_owned());
        results.push(format!(
            "{}: {}",
            catalog.translate(StringKey::YourTime),
            format_time(elapsed_ms)
        ));
        if let Some(best_ms) = best_ms {
            results.push(format!(
                "{}: {}",
                catalog.translate(StringKey::BestTime),
                format_time(best_ms)
            ));
        }
        results.push(catalog.translate(StringKey::PlayAgain).to_owned());
    }

    HudModel {
        score_line,
        clock_line,
        banner,
        results,
    }
}
