//! Everything one engine instance owns: configuration, tables and RNG.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use rensa_core::{Color, EvaluationSet, TableStore};

use crate::config::EngineConfig;
use crate::error::EngineError;

fn seeded_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

/// Engine state passed by `&mut` to every learning and ranking operation.
#[derive(Debug)]
pub struct EngineState {
    config: EngineConfig,
    store: TableStore,
    /// One evaluation set per color, indexed by [`Color::index`].
    sets: Option<[EvaluationSet; Color::COUNT]>,
    rng: StdRng,
}

impl EngineState {
    /// A state without loaded tables.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: config.table_store(),
            rng: seeded_rng(config.seed),
            sets: None,
            config,
        }
    }

    /// A state using the given tables instead of loading them.
    pub fn with_sets(config: EngineConfig, black: EvaluationSet, white: EvaluationSet) -> Self {
        let mut state = Self::new(config);
        state.sets = Some([black, white]);
        state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Apply a new configuration.
    ///
    /// When the table location changes, loaded tables are saved to the old
    /// location and unloaded. A new seed reseeds the RNG.
    pub fn reconfigure(&mut self, config: EngineConfig) -> Result<(), EngineError> {
        let store = config.table_store();
        if store != self.store && self.sets.is_some() {
            self.save_tables()?;
            self.sets = None;
            info!(dir = %store.dir().display(), engine_id = store.engine_id(), "table store changed, tables unloaded");
        }
        if config.seed != self.config.seed {
            self.rng = seeded_rng(config.seed);
        }
        self.store = store;
        self.config = config;
        Ok(())
    }

    /// Load both colors' tables unless already loaded.
    pub fn load_tables(&mut self) -> Result<(), EngineError> {
        if self.sets.is_some() {
            return Ok(());
        }
        let black = EvaluationSet::load_or_init(&self.store, Color::Black, &mut self.rng)?;
        let white = EvaluationSet::load_or_init(&self.store, Color::White, &mut self.rng)?;
        self.sets = Some([black, white]);
        Ok(())
    }

    pub fn tables_loaded(&self) -> bool {
        self.sets.is_some()
    }

    /// Persist dirty tables of both colors, returning how many were written.
    pub fn save_tables(&mut self) -> Result<usize, EngineError> {
        let Some(sets) = self.sets.as_mut() else {
            return Ok(0);
        };
        let mut written = 0;
        for set in sets.iter_mut() {
            written += set.save_if_dirty(&self.store)?;
        }
        if written > 0 {
            info!(written, "saved dirty relation tables");
        }
        Ok(written)
    }

    /// The tables learned for `color`.
    pub fn evaluation(&self, color: Color) -> Result<&EvaluationSet, EngineError> {
        self.sets
            .as_ref()
            .map(|sets| &sets[color.index()])
            .ok_or(EngineError::TablesNotLoaded)
    }

    /// The tables learned for `color` together with the RNG, for edits.
    pub fn evaluation_and_rng(
        &mut self,
        color: Color,
    ) -> Result<(&mut EvaluationSet, &mut StdRng), EngineError> {
        let sets = self.sets.as_mut().ok_or(EngineError::TablesNotLoaded)?;
        Ok((&mut sets[color.index()], &mut self.rng))
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
