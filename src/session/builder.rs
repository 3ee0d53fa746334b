//! Session construction.

use crate::ai::{OpponentConfig, OpponentPolicy, RuleBasedOpponent};
use crate::bazi::Chart;
use crate::cards::{CardCatalog, CardId};
use crate::core::{ConfigError, EngineConfig, SideId, SideMap};

use super::controller::Session;

/// Builder for a `Session`.
///
/// Defaults: the standard catalog, the default charts, and the full
/// 25-card pool as each side's deck.
pub struct SessionBuilder {
    config: EngineConfig,
    opponent_config: OpponentConfig,
    catalog: Option<CardCatalog>,
    charts: SideMap<Chart>,
    decks: SideMap<Option<Vec<CardId>>>,
    policy: Option<Box<dyn OpponentPolicy>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            opponent_config: OpponentConfig::default(),
            catalog: None,
            charts: SideMap::new(|side| match side {
                SideId::Player => Chart::default_player(),
                SideId::Opponent => Chart::default_opponent(),
            }),
            decks: SideMap::with_default(),
            policy: None,
        }
    }
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[must_use]
    pub fn with_opponent_config(mut self, config: OpponentConfig) -> Self {
        self.opponent_config = config;
        self
    }

    /// Use a custom catalog instead of the standard pool.
    #[must_use]
    pub fn with_catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Assign a side's chart, e.g. one loaded from a saved profile.
    #[must_use]
    pub fn with_chart(mut self, side: SideId, chart: Chart) -> Self {
        self.charts[side] = chart;
        self
    }

    /// Assign a side's deck list.
    #[must_use]
    pub fn with_deck(mut self, side: SideId, deck: Vec<CardId>) -> Self {
        self.decks[side] = Some(deck);
        self
    }

    /// Replace the opponent policy. The opponent config is then only
    /// stored for saves.
    #[must_use]
    pub fn with_policy(mut self, policy: impl OpponentPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Validate and deal the opening hands.
    pub fn build(self) -> Result<Session, ConfigError> {
        self.config.validate()?;

        let catalog = self.catalog.unwrap_or_else(CardCatalog::standard);
        let decks = self
            .decks
            .map(|_, deck| deck.clone().unwrap_or_else(|| catalog.full_deck_list()));
        for (_, deck) in decks.iter() {
            if let Some(&unknown) = deck.iter().find(|id| !catalog.contains(**id)) {
                return Err(ConfigError::UnknownCard(unknown));
            }
        }

        let policy = self
            .policy
            .unwrap_or_else(|| Box::new(RuleBasedOpponent::new(self.opponent_config.clone())));
        let state = Session::fresh_state(&self.config, &catalog, &self.charts, &decks);

        Ok(Session::from_parts(
            self.config,
            self.opponent_config,
            catalog,
            self.charts,
            decks,
            policy,
            state,
        ))
    }
}
