//! Level: static obstacle grid plus the live actor list
//!
//! The grid has no border cells. Anything left of column 0, right of the
//! widest row or above row 0 counts as wall; anything below the last row is
//! lava, so falling off the level is lethal rather than blocking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId, ActorType};
use super::vector::Vector;
use crate::consts::FINISH_DELAY;

/// Static obstacle stored in a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Obstacle {
    /// Fully blocking
    Wall,
    /// Lethal on touch
    Lava,
}

impl Obstacle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Obstacle::Wall => "wall",
            Obstacle::Lava => "lava",
        }
    }
}

/// Outcome of a level; assigned once, never reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    Won,
    Lost,
}

/// What the player ran into this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Touch {
    Obstacle(Obstacle),
    Actor(ActorType),
}

impl Touch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Touch::Obstacle(obstacle) => obstacle.as_str(),
            Touch::Actor(actor_type) => actor_type.as_str(),
        }
    }
}

impl From<Obstacle> for Touch {
    fn from(obstacle: Obstacle) -> Self {
        Touch::Obstacle(obstacle)
    }
}

impl From<ActorType> for Touch {
    fn from(actor_type: ActorType) -> Self {
        Touch::Actor(actor_type)
    }
}

/// Row-major obstacle cells; rows may differ in length
pub type Grid = Vec<Vec<Option<Obstacle>>>;

/// Serializable as a snapshot; not loadable, since actor ids are process-local
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub grid: Grid,
    /// Live actors in insertion order
    pub actors: Vec<Actor>,
    /// Length of the longest row
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Seconds left to play once the status is decided
    pub finish_delay: f32,
    status: Option<LevelStatus>,
    player: Option<ActorId>,
}

impl Default for Level {
    fn default() -> Self {
        Self::new(Grid::new(), Vec::new())
    }
}

impl Level {
    pub fn new(grid: Grid, actors: Vec<Actor>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let height = grid.len();
        let player = actors
            .iter()
            .find(|a| a.actor_type() == ActorType::Player)
            .map(Actor::id);

        Self {
            grid,
            actors,
            width,
            height,
            finish_delay: FINISH_DELAY,
            status: None,
            player,
        }
    }

    /// Override the post-decision delay
    pub fn with_finish_delay(mut self, finish_delay: f32) -> Self {
        self.finish_delay = finish_delay;
        self
    }

    pub fn status(&self) -> Option<LevelStatus> {
        self.status
    }

    /// True once a status is set and the finish delay has run out
    pub fn is_finished(&self) -> bool {
        self.status.is_some() && self.finish_delay < 0.0
    }

    /// Run the finish delay down by `dt` (no-op while undecided)
    pub fn count_down(&mut self, dt: f32) {
        if self.status.is_some() {
            self.finish_delay -= dt;
        }
    }

    pub fn player_id(&self) -> Option<ActorId> {
        self.player
    }

    /// The player, if it is still in the actor list
    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actor(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        let id = self.player?;
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// First actor (in list order) intersecting `actor`
    pub fn actor_at(&self, actor: &Actor) -> Option<&Actor> {
        self.actors.iter().find(|candidate| actor.is_intersect(candidate))
    }

    /// First obstacle covered by the box at `pos` with `size`
    pub fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle> {
        let start = Vec2::from(pos).floor();
        let end = Vec2::from(pos.plus(size)).ceil();

        if start.x < 0.0 || end.x > self.width as f32 || start.y < 0.0 {
            return Some(Obstacle::Wall);
        }
        if end.y > self.height as f32 {
            return Some(Obstacle::Lava);
        }

        let (x_start, x_end) = (start.x as usize, end.x as usize);
        let (y_start, y_end) = (start.y as usize, end.y as usize);
        for y in y_start..y_end {
            for x in x_start..x_end {
                // Cells past the end of a short row are empty
                if let Some(Some(obstacle)) = self.grid.get(y).and_then(|row| row.get(x)) {
                    return Some(*obstacle);
                }
            }
        }
        None
    }

    /// Remove the actor with this id; no-op if absent
    pub fn remove_actor(&mut self, id: ActorId) {
        if let Some(index) = self.actors.iter().position(|a| a.id() == id) {
            self.actors.remove(index);
        }
    }

    pub fn no_more_actors(&self, actor_type: ActorType) -> bool {
        !self.actors.iter().any(|a| a.actor_type() == actor_type)
    }

    /// React to the player touching an obstacle or an actor
    ///
    /// Lava and fireballs lose the level. Touching a coin (identified by
    /// `actor`) collects it, and collecting the last coin wins. Ignored once
    /// the status is decided.
    pub fn player_touched(&mut self, touch: impl Into<Touch>, actor: Option<ActorId>) {
        if self.status.is_some() {
            return;
        }

        let touch = touch.into();
        log::debug!("Player touched {}", touch.as_str());
        match touch {
            Touch::Obstacle(Obstacle::Lava) | Touch::Actor(ActorType::Fireball) => {
                self.decide(LevelStatus::Lost);
            }
            Touch::Actor(ActorType::Coin) => {
                let Some(id) = actor else { return };
                if self
                    .actor(id)
                    .is_some_and(|a| a.actor_type() == ActorType::Coin)
                {
                    self.remove_actor(id);
                    log::debug!("Coin {} collected", id.get());
                    if self.no_more_actors(ActorType::Coin) {
                        self.decide(LevelStatus::Won);
                    }
                }
            }
            _ => {}
        }
    }

    fn decide(&mut self, status: LevelStatus) {
        log::info!("Level decided: {:?}", status);
        self.status = Some(status);
    }

    /// Call `act` on every actor in insertion order
    ///
    /// Each actor reads the level as left by the actors before it and writes
    /// only its own slot once its update is complete.
    pub fn act_actors(&mut self, time: f32) {
        for index in 0..self.actors.len() {
            let mut actor = self.actors[index].clone();
            actor.act(time, self);
            self.actors[index] = actor;
        }
    }
}
