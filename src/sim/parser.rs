//! Level construction from text maps
//!
//! A map is a list of rows; each character is one tile. `'x'` is wall, `'!'`
//! is lava and any symbol registered in the `ActorRegistry` spawns an actor
//! on that tile. Everything else is empty terrain.

use std::collections::HashMap;
use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::Actor;
use super::level::{Grid, Level, Obstacle};
use super::vector::Vector;
use crate::consts::DEFAULT_SEED;

/// Builds an actor standing on the given tile `(column, row)`
pub type ActorFactory = Box<dyn Fn(Vector, &mut Pcg32) -> Actor>;

/// Symbol to actor factory mapping, supplied by the caller
#[derive(Default)]
pub struct ActorRegistry {
    factories: HashMap<char, ActorFactory>,
}

impl fmt::Debug for ActorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols: Vec<_> = self.factories.keys().collect();
        symbols.sort();
        f.debug_struct("ActorRegistry")
            .field("symbols", &symbols)
            .finish()
    }
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock cast: player, coin and the three fireball kinds
    pub fn standard() -> Self {
        Self::new()
            .with('@', |tile, _| Actor::player(tile))
            .with('o', |tile, rng| Actor::coin(tile, rng))
            .with('=', |tile, _| Actor::horizontal_fireball(tile))
            .with('|', |tile, _| Actor::vertical_fireball(tile))
            .with('v', |tile, _| Actor::fire_rain(tile))
    }

    /// Register (or replace) the factory for `symbol`
    pub fn insert<F>(&mut self, symbol: char, factory: F)
    where
        F: Fn(Vector, &mut Pcg32) -> Actor + 'static,
    {
        self.factories.insert(symbol, Box::new(factory));
    }

    pub fn with<F>(mut self, symbol: char, factory: F) -> Self
    where
        F: Fn(Vector, &mut Pcg32) -> Actor + 'static,
    {
        self.insert(symbol, factory);
        self
    }

    pub fn get(&self, symbol: char) -> Option<&ActorFactory> {
        self.factories.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Turns text maps into levels
#[derive(Debug)]
pub struct LevelParser {
    registry: ActorRegistry,
    rng: Pcg32,
}

impl Default for LevelParser {
    fn default() -> Self {
        Self::new(ActorRegistry::default())
    }
}

impl LevelParser {
    pub fn new(registry: ActorRegistry) -> Self {
        log::debug!("Level parser with {} actor symbols", registry.len());
        Self {
            registry,
            rng: Pcg32::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Reseed the RNG handed to actor factories
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    pub fn actor_from_symbol(&self, symbol: char) -> Option<&ActorFactory> {
        self.registry.get(symbol)
    }

    pub fn obstacle_from_symbol(symbol: char) -> Option<Obstacle> {
        match symbol {
            'x' => Some(Obstacle::Wall),
            '!' => Some(Obstacle::Lava),
            _ => None,
        }
    }

    /// One cell per character; row lengths are kept as given
    pub fn create_grid<S: AsRef<str>>(rows: &[S]) -> Grid {
        rows.iter()
            .map(|row| {
                row.as_ref()
                    .chars()
                    .map(Self::obstacle_from_symbol)
                    .collect()
            })
            .collect()
    }

    /// Actors for every registered symbol, in row-major order
    pub fn create_actors<S: AsRef<str>>(&mut self, rows: &[S]) -> Vec<Actor> {
        let mut actors = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.as_ref().chars().enumerate() {
                if let Some(factory) = self.registry.get(symbol) {
                    let tile = Vector::new(x as f32, y as f32);
                    actors.push(factory(tile, &mut self.rng));
                }
            }
        }
        actors
    }

    pub fn parse<S: AsRef<str>>(&mut self, rows: &[S]) -> Level {
        let grid = Self::create_grid(rows);
        let actors = self.create_actors(rows);
        log::debug!(
            "Parsed level: {} rows, {} actors",
            grid.len(),
            actors.len()
        );
        Level::new(grid, actors)
    }
}
