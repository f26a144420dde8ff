//! Actors: every movable or typed entity living in a level
//!
//! The variant set is closed. Behaviour differs only in `act` and in how an
//! actor reacts to running into an obstacle, so all variants share one struct
//! and a tagged `ActorKind`.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::Level;
use super::vector::Vector;
use crate::consts::*;

static NEXT_ACTOR_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of an actor. Two actors are "the same instance" iff their ids match.
///
/// Ids only come from the allocator; a deserialized actor gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActorId(u32);

impl ActorId {
    fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Type tag reported to the level when the player touches an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    Actor,
    Fireball,
    Coin,
    Player,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Actor => "actor",
            ActorType::Fireball => "fireball",
            ActorType::Coin => "coin",
            ActorType::Player => "player",
        }
    }
}

/// Fireball flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireballKind {
    /// Free speed, bounces off obstacles
    Plain,
    /// Patrols left/right
    Horizontal,
    /// Patrols up/down
    Vertical,
    /// Falls, then restarts from its spawn point
    Rain,
}

/// Oscillation state of a coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinState {
    /// Rest position the coin bobs around
    pub anchor: Vector,
    /// Current phase (radians)
    pub spring: f32,
    pub spring_speed: f32,
    pub spring_dist: f32,
}

impl CoinState {
    pub fn update_spring(&mut self, time: f32) {
        self.spring += self.spring_speed * time;
    }

    pub fn spring_vector(&self) -> Vector {
        Vector::new(0.0, self.spring.sin() * self.spring_dist)
    }

    /// Position after advancing the phase by `time`, without committing it
    pub fn next_position(&self, time: f32) -> Vector {
        let mut next = *self;
        next.update_spring(time);
        self.anchor.plus(next.spring_vector())
    }
}

/// Per-variant behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    Generic,
    Fireball { kind: FireballKind, spawn: Vector },
    Coin(CoinState),
    /// Moved by the tick driver from input, never by `act`
    Player,
}

/// A game entity with an axis-aligned bounding box
///
/// Cloning keeps the id, so a clone is still the same instance as far as
/// `is_intersect` and the level are concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(skip_deserializing, default = "ActorId::next")]
    id: ActorId,
    pub pos: Vector,
    pub size: Vector,
    pub speed: Vector,
    pub kind: ActorKind,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(Vector::ZERO, ACTOR_SIZE.into(), Vector::ZERO)
    }
}

impl Actor {
    /// Create a generic actor (no behaviour of its own)
    pub fn new(pos: Vector, size: Vector, speed: Vector) -> Self {
        Self::with_kind(pos, size, speed, ActorKind::Generic)
    }

    fn with_kind(pos: Vector, size: Vector, speed: Vector, kind: ActorKind) -> Self {
        Self {
            id: ActorId::next(),
            pos,
            size,
            speed,
            kind,
        }
    }

    pub fn fireball(pos: Vector, speed: Vector) -> Self {
        Self::fireball_of(FireballKind::Plain, pos, speed)
    }

    pub fn horizontal_fireball(pos: Vector) -> Self {
        Self::fireball_of(FireballKind::Horizontal, pos, HORIZONTAL_FIREBALL_SPEED.into())
    }

    pub fn vertical_fireball(pos: Vector) -> Self {
        Self::fireball_of(FireballKind::Vertical, pos, VERTICAL_FIREBALL_SPEED.into())
    }

    pub fn fire_rain(pos: Vector) -> Self {
        Self::fireball_of(FireballKind::Rain, pos, FIRE_RAIN_SPEED.into())
    }

    fn fireball_of(kind: FireballKind, pos: Vector, speed: Vector) -> Self {
        Self::with_kind(
            pos,
            FIREBALL_SIZE.into(),
            speed,
            ActorKind::Fireball { kind, spawn: pos },
        )
    }

    /// Coin on the given tile with a random phase
    pub fn coin<R: Rng + ?Sized>(tile: Vector, rng: &mut R) -> Self {
        Self::coin_with_phase(tile, rng.random_range(0.0..TAU))
    }

    /// Coin on the given tile with a fixed phase
    pub fn coin_with_phase(tile: Vector, spring: f32) -> Self {
        let anchor = tile.plus(COIN_OFFSET.into());
        Self::with_kind(
            anchor,
            COIN_SIZE.into(),
            Vector::ZERO,
            ActorKind::Coin(CoinState {
                anchor,
                spring,
                spring_speed: COIN_SPRING_SPEED,
                spring_dist: COIN_SPRING_DIST,
            }),
        )
    }

    pub fn player(tile: Vector) -> Self {
        Self::with_kind(
            tile.plus(PLAYER_OFFSET.into()),
            PLAYER_SIZE.into(),
            Vector::ZERO,
            ActorKind::Player,
        )
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn actor_type(&self) -> ActorType {
        match self.kind {
            ActorKind::Generic => ActorType::Actor,
            ActorKind::Fireball { .. } => ActorType::Fireball,
            ActorKind::Coin(_) => ActorType::Coin,
            ActorKind::Player => ActorType::Player,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test between two bounding boxes
    ///
    /// An actor never intersects itself, boxes that only share an edge do not
    /// intersect, and a box with a negative extent intersects nothing. Edges
    /// are compared with exact float equality.
    pub fn is_intersect(&self, other: &Actor) -> bool {
        if self.id == other.id {
            return false;
        }
        if other.size.x < 0.0 || other.size.y < 0.0 || self.size.x < 0.0 || self.size.y < 0.0 {
            return false;
        }
        // Shared edges fall on the `<=` side
        !(self.right() <= other.left()
            || other.right() <= self.left()
            || self.bottom() <= other.top()
            || other.bottom() <= self.top())
    }

    /// Where the actor would be after `time` seconds of its own motion
    pub fn next_position(&self, time: f32) -> Vector {
        match &self.kind {
            ActorKind::Coin(coin) => coin.next_position(time),
            _ => self.pos.plus(self.speed.times(time)),
        }
    }

    /// Reaction to the next position being blocked
    pub fn handle_obstacle(&mut self) {
        match self.kind {
            ActorKind::Fireball {
                kind: FireballKind::Rain,
                spawn,
            } => self.pos = spawn,
            _ => self.speed = -self.speed,
        }
    }

    /// Advance this actor by `time` seconds
    ///
    /// Only the actor's own state is written, after the level has been read.
    pub fn act(&mut self, time: f32, level: &Level) {
        match self.kind {
            ActorKind::Generic | ActorKind::Player => {}
            ActorKind::Fireball { .. } => {
                let next = self.next_position(time);
                if level.obstacle_at(next, self.size).is_some() {
                    self.handle_obstacle();
                } else {
                    self.pos = next;
                }
            }
            ActorKind::Coin(ref mut coin) => {
                coin.update_spring(time);
                self.pos = coin.anchor.plus(coin.spring_vector());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Obstacle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Actor {
        Actor::new(Vector::new(x, y), Vector::new(w, h), Vector::ZERO)
    }

    fn open_level(w: usize, h: usize) -> Level {
        Level::new(vec![vec![None; w]; h], Vec::new())
    }

    #[test]
    fn test_default_actor() {
        let actor = Actor::default();
        assert_eq!(actor.pos, Vector::ZERO);
        assert_eq!(actor.size, Vector::new(1.0, 1.0));
        assert_eq!(actor.speed, Vector::ZERO);
        assert_eq!(actor.actor_type(), ActorType::Actor);
        assert_eq!(actor.actor_type().as_str(), "actor");
    }

    #[test]
    fn test_bounds() {
        let actor = boxed(1.0, 2.0, 3.0, 4.0);
        assert_eq!(actor.left(), 1.0);
        assert_eq!(actor.right(), 4.0);
        assert_eq!(actor.top(), 2.0);
        assert_eq!(actor.bottom(), 6.0);
    }

    #[test]
    fn test_not_intersecting_self_or_clone() {
        let actor = boxed(0.0, 0.0, 1.0, 1.0);
        assert!(!actor.is_intersect(&actor));
        assert!(!actor.is_intersect(&actor.clone()));
    }

    #[test]
    fn test_shared_edge_does_not_intersect() {
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(1.0, 0.0, 1.0, 1.0);
        let c = boxed(0.0, 1.0, 1.0, 1.0);
        assert!(!a.is_intersect(&b));
        assert!(!b.is_intersect(&a));
        assert!(!a.is_intersect(&c));
        assert!(!c.is_intersect(&a));
    }

    #[test]
    fn test_overlap_intersects() {
        let a = boxed(0.0, 0.0, 2.0, 2.0);
        let b = boxed(1.0, 1.0, 2.0, 2.0);
        assert!(a.is_intersect(&b));
        assert!(b.is_intersect(&a));
    }

    #[test]
    fn test_contained_box_intersects() {
        let outer = boxed(0.0, 0.0, 4.0, 4.0);
        let inner = boxed(1.0, 1.0, 0.5, 0.5);
        assert!(outer.is_intersect(&inner));
        assert!(inner.is_intersect(&outer));
    }

    #[test]
    fn test_near_equal_edges_intersect() {
        // Edge equality is exact: a hair of overlap counts
        let a = boxed(0.0, 0.0, 1.0, 1.0);
        let b = boxed(0.999_99, 0.0, 1.0, 1.0);
        assert!(a.is_intersect(&b));
    }

    #[test]
    fn test_negative_size_never_intersects() {
        let a = boxed(0.0, 0.0, 4.0, 4.0);
        let neg = boxed(2.0, 2.0, -1.0, 1.0);
        assert!(!a.is_intersect(&neg));
        assert!(!neg.is_intersect(&a));
    }

    #[test]
    fn test_deserialized_actor_gets_fresh_id() {
        let original = boxed(0.0, 0.0, 2.0, 2.0);
        let json = serde_json::to_string(&original).unwrap();
        let loaded: Actor = serde_json::from_str(&json).unwrap();
        let later = Actor::default();

        assert_ne!(loaded.id(), original.id());
        assert_ne!(loaded.id(), later.id());
        assert_eq!(loaded.pos, original.pos);
        assert_eq!(loaded.kind, original.kind);
        // Distinct instances at the same spot overlap
        assert!(loaded.is_intersect(&original));
    }

    #[test]
    fn test_variant_shapes() {
        let tile = Vector::new(3.0, 4.0);

        let player = Actor::player(tile);
        assert_eq!(player.actor_type(), ActorType::Player);
        assert_eq!(player.pos, Vector::new(3.0, 3.5));
        assert_eq!(player.size, Vector::new(0.8, 1.5));

        let coin = Actor::coin_with_phase(tile, 0.0);
        assert_eq!(coin.actor_type(), ActorType::Coin);
        assert_eq!(coin.pos, Vector::new(3.2, 4.1));
        assert_eq!(coin.size, Vector::new(0.6, 0.6));

        assert_eq!(Actor::horizontal_fireball(tile).speed, Vector::new(2.0, 0.0));
        assert_eq!(Actor::vertical_fireball(tile).speed, Vector::new(0.0, 2.0));
        let rain = Actor::fire_rain(tile);
        assert_eq!(rain.speed, Vector::new(0.0, 3.0));
        assert_eq!(rain.size, Vector::new(1.0, 1.0));
        assert_eq!(rain.actor_type(), ActorType::Fireball);
    }

    #[test]
    fn test_coin_phase_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let coin = Actor::coin(Vector::ZERO, &mut rng);
            let ActorKind::Coin(state) = coin.kind else {
                panic!("expected coin");
            };
            assert!((0.0..TAU).contains(&state.spring));
        }
    }

    #[test]
    fn test_coin_bobs_around_anchor() {
        let level = open_level(5, 5);
        let mut coin = Actor::coin_with_phase(Vector::new(1.0, 1.0), 0.0);
        let anchor = coin.pos;

        let predicted = coin.next_position(0.1);
        coin.act(0.1, &level);
        assert_eq!(coin.pos, predicted);

        let expected_dy = (0.8f32).sin() * COIN_SPRING_DIST;
        assert!((coin.pos.x - anchor.x).abs() < 1e-6);
        assert!((coin.pos.y - anchor.y - expected_dy).abs() < 1e-6);

        // Never drifts further than the spring distance
        for _ in 0..50 {
            coin.act(0.037, &level);
            assert!((coin.pos.y - anchor.y).abs() <= COIN_SPRING_DIST + 1e-6);
        }
    }

    #[test]
    fn test_fireball_moves_when_free() {
        let level = open_level(10, 10);
        let mut fireball = Actor::fireball(Vector::new(2.0, 2.0), Vector::new(1.0, 0.5));
        fireball.act(2.0, &level);
        assert_eq!(fireball.pos, Vector::new(4.0, 3.0));
        assert_eq!(fireball.speed, Vector::new(1.0, 0.5));
    }

    #[test]
    fn test_fireball_bounces_off_wall() {
        let mut grid = vec![vec![None; 5]; 3];
        grid[1][3] = Some(Obstacle::Wall);
        let level = Level::new(grid, Vec::new());

        let mut fireball = Actor::horizontal_fireball(Vector::new(1.0, 1.0));
        fireball.act(0.5, &level);
        assert_eq!(fireball.pos, Vector::new(2.0, 1.0));

        // Next step would enter the wall at column 3
        fireball.act(0.5, &level);
        assert_eq!(fireball.pos, Vector::new(2.0, 1.0));
        assert_eq!(fireball.speed, Vector::new(-2.0, 0.0));
    }

    #[test]
    fn test_fireball_bounces_off_lava() {
        let mut grid = vec![vec![None; 3]; 5];
        grid[3][1] = Some(Obstacle::Lava);
        let level = Level::new(grid, Vec::new());

        let mut fireball = Actor::vertical_fireball(Vector::new(1.0, 1.0));
        fireball.act(1.0, &level);
        assert_eq!(fireball.speed, Vector::new(0.0, -2.0));
        assert_eq!(fireball.pos, Vector::new(1.0, 1.0));
    }

    #[test]
    fn test_fire_rain_restarts_from_spawn() {
        let level = open_level(3, 4);
        let spawn = Vector::new(1.0, 0.0);
        let mut rain = Actor::fire_rain(spawn);

        rain.act(0.5, &level);
        assert_eq!(rain.pos, Vector::new(1.0, 1.5));

        rain.act(0.5, &level);
        assert_eq!(rain.pos, Vector::new(1.0, 3.0));

        // Falling below the level hits lava; rain restarts instead of bouncing
        rain.act(0.5, &level);
        assert_eq!(rain.pos, spawn);
        assert_eq!(rain.speed, Vector::new(0.0, 3.0));
    }

    #[test]
    fn test_generic_and_player_do_not_act() {
        let level = open_level(4, 4);
        let mut actor = Actor::new(Vector::new(1.0, 1.0), Vector::new(1.0, 1.0), Vector::new(1.0, 1.0));
        actor.act(1.0, &level);
        assert_eq!(actor.pos, Vector::new(1.0, 1.0));

        let mut player = Actor::player(Vector::new(1.0, 2.0));
        player.speed = Vector::new(3.0, 0.0);
        let before = player.pos;
        player.act(1.0, &level);
        assert_eq!(player.pos, before);
    }

    proptest! {
        #[test]
        fn never_intersects_itself(
            x in -100f32..100.0, y in -100f32..100.0,
            w in -5f32..5.0, h in -5f32..5.0,
        ) {
            let actor = boxed(x, y, w, h);
            prop_assert!(!actor.is_intersect(&actor));
        }

        #[test]
        fn negative_box_never_intersects(
            x in -10f32..10.0, y in -10f32..10.0,
            w in -5f32..-0.001, h in -5f32..5.0,
            ox in -10f32..10.0, oy in -10f32..10.0,
            ow in -5f32..5.0, oh in -5f32..5.0,
        ) {
            let neg = boxed(x, y, w, h);
            let other = boxed(ox, oy, ow, oh);
            prop_assert!(!neg.is_intersect(&other));
            prop_assert!(!other.is_intersect(&neg));
        }

        #[test]
        fn intersection_is_symmetric(
            ax in -10f32..10.0, ay in -10f32..10.0, aw in 0f32..5.0, ah in 0f32..5.0,
            bx in -10f32..10.0, by in -10f32..10.0, bw in 0f32..5.0, bh in 0f32..5.0,
        ) {
            let a = boxed(ax, ay, aw, ah);
            let b = boxed(bx, by, bw, bh);
            prop_assert_eq!(a.is_intersect(&b), b.is_intersect(&a));
        }
    }
}
