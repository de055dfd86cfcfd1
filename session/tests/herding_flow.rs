use glam::Vec2;
use herdsman_core::{AnimalId, AnimalState, Event, SessionPhase};
use herdsman_session::{Session, SessionConfig};
use herdsman_system_input::{InputEvent, InputFrame};
use herdsman_world::query;

const FRAME_MS: f32 = 16.0;

fn session_with_herd(count: u32, seed: u64) -> (Session, Vec<Event>) {
    let mut config = SessionConfig::default();
    config.tuning.animal.count = count;
    config.seed = seed;
    let mut session = Session::new(config).expect("config is valid");
    let mut events = Vec::new();
    session.start(&mut events);
    (session, events)
}

fn press_frame(position: Vec2) -> InputFrame {
    let mut frame = InputFrame::new();
    frame.push(InputEvent::PointerDown { position });
    frame
}

fn animal_snapshot(session: &Session, id: AnimalId) -> Option<(Vec2, AnimalState)> {
    query::animal_view(session.world())
        .iter()
        .find(|snapshot| snapshot.id == id)
        .map(|snapshot| (snapshot.position, snapshot.state))
}

fn nearest_animal(session: &Session) -> AnimalId {
    let hero = query::hero_view(session.world()).position;
    query::animal_view(session.world())
        .iter()
        .min_by(|lhs, rhs| {
            let lhs_distance = lhs.position.distance(hero);
            let rhs_distance = rhs.position.distance(hero);
            lhs_distance.partial_cmp(&rhs_distance).unwrap()
        })
        .map(|snapshot| snapshot.id)
        .expect("herd is not empty")
}

/// Drags the hero onto the animal until recruitment flips it to following.
fn chase_until_following(session: &mut Session, id: AnimalId, log: &mut Vec<Event>) {
    for _ in 0..400 {
        let (position, state) = animal_snapshot(session, id).expect("animal on field");
        if state == AnimalState::Following {
            return;
        }
        session.tick(&press_frame(position), FRAME_MS, log);
    }
    panic!("animal was never recruited");
}

/// Drags the hero to the yard center until it overlaps the yard.
fn drive_into_yard(session: &mut Session, log: &mut Vec<Event>) {
    let center = query::yard_view(session.world()).center;
    for _ in 0..200 {
        session.tick(&press_frame(center), FRAME_MS, log);
        let hero = query::hero_view(session.world());
        let yard = query::yard_view(session.world());
        if yard.bounds.overlaps_circle(hero.position, hero.radius) {
            return;
        }
    }
    panic!("hero never reached the yard");
}

fn wait_for_delivery(session: &mut Session, id: AnimalId, log: &mut Vec<Event>) {
    for _ in 0..400 {
        if animal_snapshot(session, id).is_none() {
            return;
        }
        session.tick(&InputFrame::new(), FRAME_MS, log);
    }
    panic!("animal was never delivered");
}

fn spawn_positions(events: &[Event]) -> Vec<Vec2> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AnimalSpawned { position, .. } => Some(*position),
            _ => None,
        })
        .collect()
}

#[test]
fn hero_within_trigger_distance_recruits_the_animal() {
    let (mut session, _) = session_with_herd(1, 11);
    let id = query::animal_view(session.world()).into_vec()[0].id;

    let mut events = Vec::new();
    let mut recruited_at = None;
    for _ in 0..400 {
        let (position, state) = animal_snapshot(&session, id).expect("animal on field");
        if state == AnimalState::Following {
            let hero = query::hero_view(session.world()).position;
            recruited_at = Some(hero.distance(position));
            break;
        }
        session.tick(&press_frame(position), FRAME_MS, &mut events);
    }

    let distance = recruited_at.expect("animal was never recruited");
    let trigger = SessionConfig::default().tuning.hero.follow_trigger_distance;
    assert!(
        distance <= trigger + 1e-3,
        "recruited at {distance}, beyond the {trigger} trigger"
    );

    let recruitments = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::AnimalStateChanged {
                    state: AnimalState::Following,
                    ..
                }
            )
        })
        .count();
    assert_eq!(recruitments, 1);
}

#[test]
fn yard_overlap_releases_the_follower_which_delivers_itself() {
    let (mut session, _) = session_with_herd(1, 13);
    let id = query::animal_view(session.world()).into_vec()[0].id;
    let mut events = Vec::new();
    chase_until_following(&mut session, id, &mut events);

    let center = query::yard_view(session.world()).center;
    let mut released_on_entry = false;
    for _ in 0..200 {
        session.tick(&press_frame(center), FRAME_MS, &mut events);
        let hero = query::hero_view(session.world());
        let yard = query::yard_view(session.world());
        if yard.bounds.overlaps_circle(hero.position, hero.radius) {
            let (_, state) = animal_snapshot(&session, id).expect("follower on field");
            assert_eq!(
                state,
                AnimalState::AutoDeliver,
                "entering the yard must release the follower in the same tick"
            );
            released_on_entry = true;
            break;
        }
    }
    assert!(released_on_entry, "hero never reached the yard");

    wait_for_delivery(&mut session, id, &mut events);

    let deliveries: Vec<AnimalId> = events
        .iter()
        .filter_map(|event| match event {
            Event::AnimalDelivered { animal } => Some(*animal),
            _ => None,
        })
        .collect();
    assert_eq!(deliveries, vec![id], "exactly one delivery per animal");
    assert!(events.contains(&Event::ScoreChanged { total: 1 }));
    assert_eq!(session.phase(), SessionPhase::Completed);

    let completions = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::PhaseChanged {
                    to: SessionPhase::Completed,
                    ..
                }
            )
        })
        .count();
    assert_eq!(completions, 1, "the win fires exactly once");

    // A completed session ignores further frames entirely.
    let elapsed = session.elapsed_ms();
    events.clear();
    for _ in 0..20 {
        session.tick(&press_frame(center), FRAME_MS, &mut events);
    }
    assert!(events.is_empty());
    assert_eq!(session.elapsed_ms(), elapsed);
}

#[test]
fn reset_mid_run_restores_the_initial_herd_and_zeroes_progress() {
    let (mut session, start_events) = session_with_herd(10, 21);
    let initial_spawns = spawn_positions(&start_events);
    assert_eq!(initial_spawns.len(), 10);

    let mut log = Vec::new();
    let id = nearest_animal(&session);
    chase_until_following(&mut session, id, &mut log);
    drive_into_yard(&mut session, &mut log);
    wait_for_delivery(&mut session, id, &mut log);
    assert!(session.score() >= 1);
    assert!(session.elapsed_ms() > 0.0);

    let totals: Vec<u32> = log
        .iter()
        .filter_map(|event| match event {
            Event::ScoreChanged { total } => Some(*total),
            _ => None,
        })
        .collect();
    assert!(
        totals.windows(2).all(|pair| pair[0] < pair[1]),
        "score totals must count up"
    );

    let mut reset_events = Vec::new();
    session.reset(&mut reset_events);

    assert_eq!(spawn_positions(&reset_events), initial_spawns);
    assert_eq!(query::animal_view(session.world()).iter().count(), 10);
    assert_eq!(session.score(), 0);
    assert!(reset_events.contains(&Event::ScoreChanged { total: 0 }));
    assert_eq!(session.elapsed_ms(), 0.0);
    assert_eq!(session.phase(), SessionPhase::Boot);
    assert!(query::hero_view(session.world()).trail.is_empty());

    let mut restart_events = Vec::new();
    session.start(&mut restart_events);
    assert_eq!(spawn_positions(&restart_events), initial_spawns);
    assert_eq!(session.phase(), SessionPhase::Running);
}
