//! Frame advance
//!
//! Drives one frame of a level: splits the frame delta into bounded
//! substeps, moves the player from input, lets every other actor act, and
//! resolves what the player touched.

use super::actor::{ActorId, ActorType};
use super::level::{Level, LevelStatus, Obstacle, Touch};
use super::vector::Vector;
use crate::settings::Settings;

/// Input held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    CoinCollected { remaining: usize },
    LevelWon,
    LevelLost { cause: Touch },
}

/// Advance `level` by `dt` seconds
///
/// Finished levels are left untouched. A decided but unfinished level keeps
/// animating while its finish delay runs down. At most
/// `settings.max_substeps` substeps run; the rest of `dt` is dropped.
pub fn tick(level: &mut Level, input: &TickInput, settings: &Settings, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    if level.is_finished() || !dt.is_finite() || dt <= 0.0 {
        return events;
    }

    let max_step = settings.effective_max_step(dt);
    let max_substeps = settings.effective_max_substeps();
    let mut remaining = dt;
    let mut substeps = 0;
    while remaining > 0.0 && substeps < max_substeps && !level.is_finished() {
        let step = remaining.min(max_step);
        substep(level, input, settings, step, &mut events);
        remaining -= step;
        substeps += 1;
    }
    if remaining > 0.0 && substeps == max_substeps {
        log::debug!("Dropped {:.3}s past the substep cap", remaining);
    }
    events
}

fn substep(
    level: &mut Level,
    input: &TickInput,
    settings: &Settings,
    step: f32,
    events: &mut Vec<SimEvent>,
) {
    level.act_actors(step);
    let blocked_by = move_player(level, input, settings, step);

    // Contact is resolved after every actor has moved
    if let Some(player) = level.player().cloned() {
        let obstacle = blocked_by.or_else(|| level.obstacle_at(player.pos, player.size));
        if let Some(obstacle) = obstacle {
            touch(level, obstacle.into(), None, events);
        }
        if let Some((actor_type, id)) = level.actor_at(&player).map(|a| (a.actor_type(), a.id())) {
            touch(level, actor_type.into(), Some(id), events);
        }
    }

    level.count_down(step);
}

/// Run and fall from input; returns lava the player ran into
fn move_player(
    level: &mut Level,
    input: &TickInput,
    settings: &Settings,
    step: f32,
) -> Option<Obstacle> {
    let player = level.player()?;
    let size = player.size;
    let mut pos = player.pos;
    let mut speed = player.speed;
    let mut touched = None;

    speed.x = 0.0;
    if input.left {
        speed.x -= settings.player_x_speed;
    }
    if input.right {
        speed.x += settings.player_x_speed;
    }
    let next = pos.plus(Vector::new(speed.x * step, 0.0));
    match level.obstacle_at(next, size) {
        None => pos = next,
        Some(Obstacle::Lava) => touched = Some(Obstacle::Lava),
        Some(Obstacle::Wall) => {}
    }

    speed.y += step * settings.gravity;
    let next = pos.plus(Vector::new(0.0, speed.y * step));
    match level.obstacle_at(next, size) {
        None => pos = next,
        Some(obstacle) => {
            if obstacle == Obstacle::Lava {
                touched = Some(Obstacle::Lava);
            }
            // Landing with jump held bounces straight back up
            speed.y = if input.jump && speed.y > 0.0 {
                -settings.jump_speed
            } else {
                0.0
            };
        }
    }

    if let Some(player) = level.player_mut() {
        player.pos = pos;
        player.speed = speed;
    }
    touched
}

fn touch(level: &mut Level, contact: Touch, actor: Option<ActorId>, events: &mut Vec<SimEvent>) {
    let decided = level.status();
    let actor_count = level.actors.len();

    level.player_touched(contact, actor);

    if contact == Touch::Actor(ActorType::Coin) && level.actors.len() < actor_count {
        let remaining = level
            .actors
            .iter()
            .filter(|a| a.actor_type() == ActorType::Coin)
            .count();
        events.push(SimEvent::CoinCollected { remaining });
    }
    if decided.is_none() {
        match level.status() {
            Some(LevelStatus::Won) => events.push(SimEvent::LevelWon),
            Some(LevelStatus::Lost) => events.push(SimEvent::LevelLost { cause: contact }),
            None => {}
        }
    }
}
