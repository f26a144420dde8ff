//! Level packs and the play-through driver
//!
//! A pack is an ordered list of text maps. The campaign plays them in order:
//! a won level advances to the next one, a lost level is parsed again from
//! scratch, and winning the last level completes the run.

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::settings::Settings;
use crate::sim::{ActorRegistry, Level, LevelParser, LevelStatus, TickInput, tick};

/// Ordered list of level maps (each map is a list of rows)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPack {
    levels: Vec<Vec<String>>,
}

impl LevelPack {
    /// Build a pack, rejecting empty packs and empty maps
    pub fn new(levels: Vec<Vec<String>>) -> Result<Self, LoadError> {
        if levels.is_empty() {
            return Err(LoadError::EmptyPack);
        }
        if let Some(index) = levels.iter().position(Vec::is_empty) {
            return Err(LoadError::EmptyLevel { index });
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of maps: `[["row", "row"], ["row"]]`
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let levels: Vec<Vec<String>> = serde_json::from_str(json)?;
        let pack = Self::new(levels)?;
        log::info!("Loaded level pack with {} levels", pack.len());
        Ok(pack)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Two small levels using the standard symbols
    pub fn builtin() -> Self {
        let levels = [
            vec![
                "                  ",
                "                  ",
                "                  ",
                "  o           o   ",
                "  x    |      x   ",
                "@           = x   ",
                "xxxxx!!!!!!xxxx   ",
                "                  ",
            ],
            vec![
                "      v           ",
                "                  ",
                "   o        o     ",
                "  xxx      xxx    ",
                "                o ",
                "@      =      xxxx",
                "xxxx!!!!!!xxxx    ",
            ],
        ];
        Self {
            levels: levels
                .iter()
                .map(|rows| rows.iter().map(|row| row.to_string()).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.levels.get(index).map(Vec::as_slice)
    }
}

/// Result of advancing the campaign by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignProgress {
    /// Current level still running
    Playing,
    /// Level `index` was won; the next one is loaded
    LevelWon { index: usize },
    /// Level `index` was lost and has been reloaded
    LevelRestarted { index: usize },
    /// Every level has been won
    Completed,
}

/// Plays a level pack from the first level to the last
#[derive(Debug)]
pub struct Campaign {
    pack: LevelPack,
    parser: LevelParser,
    settings: Settings,
    index: usize,
    level: Level,
    completed: bool,
}

impl Campaign {
    pub fn new(pack: LevelPack, registry: ActorRegistry, settings: Settings) -> Self {
        let mut parser = LevelParser::new(registry).with_seed(settings.seed);
        let level = Self::load(&pack, &mut parser, &settings, 0);
        Self {
            pack,
            parser,
            settings,
            index: 0,
            level,
            completed: false,
        }
    }

    fn load(pack: &LevelPack, parser: &mut LevelParser, settings: &Settings, index: usize) -> Level {
        log::info!("Starting level {}", index);
        let rows = pack.get(index).unwrap_or_default();
        parser.parse(rows).with_finish_delay(settings.finish_delay)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Mutable access for drivers that steer actors directly
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Advance the current level by `dt` and handle a finished level
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> CampaignProgress {
        if self.completed {
            return CampaignProgress::Completed;
        }

        tick(&mut self.level, input, &self.settings, dt);
        if !self.level.is_finished() {
            return CampaignProgress::Playing;
        }

        match self.level.status() {
            Some(LevelStatus::Won) => {
                let won = self.index;
                if won + 1 >= self.pack.len() {
                    log::info!("Campaign complete");
                    self.completed = true;
                    return CampaignProgress::Completed;
                }
                self.index += 1;
                self.level = Self::load(&self.pack, &mut self.parser, &self.settings, self.index);
                CampaignProgress::LevelWon { index: won }
            }
            Some(LevelStatus::Lost) | None => {
                log::info!("Level {} lost, restarting", self.index);
                self.level = Self::load(&self.pack, &mut self.parser, &self.settings, self.index);
                CampaignProgress::LevelRestarted { index: self.index }
            }
        }
    }
}
