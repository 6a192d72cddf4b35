//! Per-frame simulation tick
//!
//! Core game loop that advances a run by one animation frame.

use super::collision::hitboxes_collide;
use super::rng::RandomSource;
use super::state::{GameEvent, Obstacle, ObstacleKind, Player, RunPhase, RunState};
use crate::tuning::Tuning;

/// Advance the run by one frame
///
/// `now_ms` is the frame timestamp (as handed out by `requestAnimationFrame`);
/// only differences between timestamps matter. Does nothing unless the run is
/// active.
pub fn tick<R: RandomSource + ?Sized>(
    state: &mut RunState,
    tuning: &Tuning,
    rng: &mut R,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) {
    if state.phase != RunPhase::Active {
        return;
    }

    state.time_ticks += 1;

    // Difficulty ramp; score accrues faster as the game speeds up
    state.speed += tuning.speed_increment;
    state.score += tuning.score_rate * (state.speed / tuning.initial_speed);
    events.push(GameEvent::ScoreChanged(state.score));

    integrate_player(&mut state.player, tuning);
    maybe_spawn(state, tuning, rng, now_ms);

    // Move, collide, recycle. Back-to-front so removal keeps indices valid.
    let player_box = state.player.bounds();
    for i in (0..state.obstacles.len()).rev() {
        let obstacle = &mut state.obstacles[i];
        obstacle.pos.x -= state.speed;

        if hitboxes_collide(&player_box, &obstacle.bounds(), tuning.hitbox_margin) {
            let (kind, id) = (obstacle.kind, obstacle.id);
            let score = state.display_score();
            log::info!(
                "Game over: hit {:?} #{} at tick {} (score {}, speed {:.2})",
                kind,
                id,
                state.time_ticks,
                score,
                state.speed
            );
            state.phase = RunPhase::Ended;
            events.push(GameEvent::GameOver { score });
            return;
        }

        if obstacle.is_off_field() {
            state.obstacles.remove(i);
        }
    }
}

/// Gravity, landing and the grounded duck clamp
pub fn integrate_player(player: &mut Player, tuning: &Tuning) {
    let floor = tuning.floor_for(player.size.y);

    if player.is_jumping {
        let gravity = if player.is_ducking {
            tuning.gravity * tuning.fast_fall_multiplier
        } else {
            tuning.gravity
        };
        player.vy += gravity;
        player.pos.y += player.vy;

        // Bump the top of the field
        if player.pos.y < tuning.field_top {
            player.pos.y = tuning.field_top;
            player.vy = player.vy.max(0.0);
        }

        if player.pos.y >= floor {
            player.pos.y = floor;
            player.vy = 0.0;
            player.is_jumping = false;
        }
    } else if player.is_ducking {
        player.pos.y = floor;
    }
}

/// Spawn an obstacle at the right edge once the current gap has elapsed
fn maybe_spawn<R: RandomSource + ?Sized>(
    state: &mut RunState,
    tuning: &Tuning,
    rng: &mut R,
    now_ms: f64,
) {
    // The spawn clock starts with the first frame of the run
    let last_spawn = *state.last_spawn_ms.get_or_insert(now_ms);
    if ((now_ms - last_spawn) as f32) <= state.next_gap_ms {
        return;
    }

    let kind = if rng.chance(tuning.aerial_chance) {
        ObstacleKind::AerialHazard
    } else {
        ObstacleKind::GroundHazard
    };
    let id = state.next_entity_id();
    state
        .obstacles
        .push(Obstacle::spawn(id, kind, tuning, state.speed));
    state.last_spawn_ms = Some(now_ms);

    let raw_gap = rng.range(tuning.min_gap_ms, tuning.max_gap_ms);
    state.next_gap_ms = tuning.scaled_gap(raw_gap, state.speed);

    log::debug!(
        "Spawned {:?} #{} at tick {}, next in {:.0} ms",
        kind,
        id,
        state.time_ticks,
        state.next_gap_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rng::ScriptedRandom;
    use glam::Vec2;
    use proptest::prelude::*;

    fn active_state(tuning: &Tuning) -> RunState {
        let mut state = RunState::new(tuning, OBSTACLE_MIN_GAP);
        state.phase = RunPhase::Active;
        state
    }

    #[test]
    fn test_idle_and_ended_do_not_tick() {
        let tuning = Tuning::default();
        let mut rng = ScriptedRandom::new(&[0.5]);
        let mut events = Vec::new();

        for phase in [RunPhase::Idle, RunPhase::Ended] {
            let mut state = RunState::new(&tuning, OBSTACLE_MIN_GAP);
            state.phase = phase;
            tick(&mut state, &tuning, &mut rng, 1000.0, &mut events);
            assert_eq!(state.time_ticks, 0);
            assert_eq!(state.score, 0.0);
            assert_eq!(state.speed, INITIAL_SPEED);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn test_ramp_and_score() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        let mut rng = ScriptedRandom::new(&[0.5]);
        let mut events = Vec::new();

        tick(&mut state, &tuning, &mut rng, 0.0, &mut events);

        let speed = INITIAL_SPEED + SPEED_INCREMENT;
        assert_eq!(state.speed, speed);
        assert_eq!(state.score, SCORE_RATE * (speed / INITIAL_SPEED));
        assert_eq!(events, vec![GameEvent::ScoreChanged(state.score)]);
    }

    #[test]
    fn test_spawn_waits_for_gap() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        // Kind roll above the aerial chance (trash can), then the shortest gap
        let mut rng = ScriptedRandom::new(&[0.9, 0.0]);
        let mut events = Vec::new();

        // First frame only starts the spawn clock
        tick(&mut state, &tuning, &mut rng, 5_000.0, &mut events);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.last_spawn_ms, Some(5_000.0));

        // Exactly at the gap is not enough
        tick(&mut state, &tuning, &mut rng, 5_000.0 + OBSTACLE_MIN_GAP as f64, &mut events);
        assert!(state.obstacles.is_empty());

        tick(&mut state, &tuning, &mut rng, 5_001.0 + OBSTACLE_MIN_GAP as f64, &mut events);
        assert_eq!(state.obstacles.len(), 1);
        let spawned = &state.obstacles[0];
        assert_eq!(spawned.kind, ObstacleKind::GroundHazard);
        // Spawned at the right edge, then moved once this tick
        assert_eq!(spawned.pos.x, FIELD_WIDTH - state.speed);
        assert_eq!(spawned.speed, state.speed);
        assert_eq!(state.last_spawn_ms, Some(5_001.0 + OBSTACLE_MIN_GAP as f64));

        // Next gap: min gap scaled by reference / current speed
        let expected = OBSTACLE_MIN_GAP * (REFERENCE_SPEED / state.speed);
        assert!((state.next_gap_ms - expected).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_kind_follows_chance() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        state.next_gap_ms = 0.0;
        state.last_spawn_ms = Some(0.0);
        let mut rng = ScriptedRandom::new(&[0.1, 0.0]);
        let mut events = Vec::new();

        tick(&mut state, &tuning, &mut rng, 1.0, &mut events);
        assert_eq!(state.obstacles[0].kind, ObstacleKind::AerialHazard);
        assert_eq!(state.obstacles[0].pos.y, CAT_FLYING_Y);
    }

    #[test]
    fn test_offscreen_obstacle_is_recycled() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        state.next_gap_ms = f32::MAX;
        let mut rng = ScriptedRandom::new(&[0.5]);
        let mut events = Vec::new();

        let id = state.next_entity_id();
        let mut obstacle = Obstacle::spawn(id, ObstacleKind::GroundHazard, &tuning, state.speed);
        // Right edge just right of the field's left edge
        obstacle.pos.x = -TRASH_CAN_WIDTH + 1.0;
        state.obstacles.push(obstacle);

        tick(&mut state, &tuning, &mut rng, 0.0, &mut events);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, RunPhase::Active);
    }

    #[test]
    fn test_collision_ends_run_once() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        state.next_gap_ms = f32::MAX;
        let mut rng = ScriptedRandom::new(&[0.5]);
        let mut events = Vec::new();

        let id = state.next_entity_id();
        let mut can = Obstacle::spawn(id, ObstacleKind::GroundHazard, &tuning, state.speed);
        can.pos.x = state.player.pos.x + state.speed;
        state.obstacles.push(can);

        tick(&mut state, &tuning, &mut rng, 0.0, &mut events);
        assert_eq!(state.phase, RunPhase::Ended);
        let score_at_collision = state.score;

        // Frozen afterwards
        tick(&mut state, &tuning, &mut rng, 16.0, &mut events);
        tick(&mut state, &tuning, &mut rng, 32.0, &mut events);
        assert_eq!(state.score, score_at_collision);

        let game_overs: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver { score } => Some(*score),
                _ => None,
            })
            .collect();
        assert_eq!(game_overs, vec![score_at_collision.floor() as u32]);
    }

    #[test]
    fn test_ducking_passes_under_cat() {
        let tuning = Tuning::default();
        let mut state = active_state(&tuning);
        state.next_gap_ms = f32::MAX;
        state.player.duck(&tuning);
        let mut rng = ScriptedRandom::new(&[0.5]);
        let mut events = Vec::new();

        let id = state.next_entity_id();
        let mut cat = Obstacle::spawn(id, ObstacleKind::AerialHazard, &tuning, state.speed);
        cat.pos.x = state.player.pos.x;
        state.obstacles.push(cat);

        tick(&mut state, &tuning, &mut rng, 0.0, &mut events);
        assert_eq!(state.phase, RunPhase::Active);

        // Standing up under the cat is fatal
        state.player.stand(&tuning);
        tick(&mut state, &tuning, &mut rng, 16.0, &mut events);
        assert_eq!(state.phase, RunPhase::Ended);
    }

    #[test]
    fn test_jump_clamps_at_field_top() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.jump(&tuning);
        player.pos.y = tuning.field_top + 1.0;

        integrate_player(&mut player, &tuning);
        assert_eq!(player.pos.y, tuning.field_top);
        assert_eq!(player.vy, 0.0);

        integrate_player(&mut player, &tuning);
        assert!(player.pos.y > tuning.field_top);
    }

    /// Ticks from takeoff until landing
    fn airtime(duck_after: Option<u32>) -> u32 {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.jump(&tuning);
        let mut ticks = 0;
        while player.is_jumping {
            if duck_after == Some(ticks) {
                player.duck(&tuning);
            }
            integrate_player(&mut player, &tuning);
            ticks += 1;
            assert!(ticks < 1_000, "jump never landed");
        }
        ticks
    }

    #[test]
    fn test_fast_fall_lands_sooner() {
        let plain = airtime(None);
        for duck_at in [1, 10, 20, 30] {
            assert!(airtime(Some(duck_at)) < plain, "ducking at tick {duck_at}");
        }
    }

    #[test]
    fn test_single_jump_is_single_peaked() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let ground = GROUND_Y - GRANNY_HEIGHT;
        player.jump(&tuning);

        let mut ys = vec![player.pos.y];
        while player.is_jumping {
            integrate_player(&mut player, &tuning);
            assert!(player.pos.y <= ground);
            assert!(player.pos.y >= tuning.field_top);
            ys.push(player.pos.y);
        }

        let peak = ys
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak > 0 && peak < ys.len() - 1);
        assert!(ys[..=peak].windows(2).all(|w| w[1] < w[0]));
        assert!(ys[peak..].windows(2).all(|w| w[1] > w[0]));

        // Landed exactly on the ground, at rest
        assert_eq!(player.pos.y, ground);
        assert_eq!(player.vy, 0.0);
    }

    proptest! {
        #[test]
        fn prop_score_and_speed_never_decrease(seed in any::<u64>(), frames in 1usize..600) {
            use rand::SeedableRng;
            let tuning = Tuning::default();
            let mut state = active_state(&tuning);
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let mut events = Vec::new();

            let (mut score, mut speed) = (state.score, state.speed);
            for frame in 0..frames {
                tick(&mut state, &tuning, &mut rng, frame as f64 * FRAME_MS, &mut events);
                prop_assert!(state.score >= score);
                prop_assert!(state.speed >= speed);
                prop_assert!(state.obstacles.iter().all(|o| !o.is_off_field()));
                score = state.score;
                speed = state.speed;
            }
        }

        #[test]
        fn prop_grounded_standing_pose(frames in 1usize..200, duck_toggles in proptest::collection::vec(any::<bool>(), 1..20)) {
            let tuning = Tuning::default();
            let mut player = Player::new(&tuning);
            for (i, duck) in duck_toggles.iter().cycle().take(frames).enumerate() {
                if *duck { player.duck(&tuning) } else { player.stand(&tuning) }
                if i % 37 == 0 && player.is_grounded() {
                    player.jump(&tuning);
                }
                integrate_player(&mut player, &tuning);
                let floor = tuning.floor_for(player.size.y);
                prop_assert!(player.pos.y <= floor);
                prop_assert!(player.pos.y >= tuning.field_top);
                if player.is_grounded() && !player.is_ducking {
                    prop_assert_eq!(player.size.y, GRANNY_HEIGHT);
                    prop_assert_eq!(player.pos, Vec2::new(GRANNY_X, GROUND_Y - GRANNY_HEIGHT));
                }
                if player.is_ducking {
                    prop_assert_eq!(player.size.y, GRANNY_DUCK_HEIGHT);
                }
            }
        }
    }
}
