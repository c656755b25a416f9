//! The four relation tables of one side, with file naming and dirty tracking.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use crate::color::Color;
use crate::error::TableError;
use crate::relation::RelationKind;
use crate::relation_table::RelationTable;

/// File name of the table of `kind` learned for `color`.
///
/// ```
/// use rensa_core::{Color, RelationKind, table_file_name};
///
/// assert_eq!(
///     table_file_name("rensa", RelationKind::Kp, Color::White),
///     "data[rensa]_n1_eval_kp_second.bin"
/// );
/// ```
pub fn table_file_name(engine_id: &str, kind: RelationKind, color: Color) -> String {
    format!(
        "data[{engine_id}]_n1_eval_{}_{}.bin",
        kind.tag(),
        color.file_tag()
    )
}

/// Where an engine keeps its relation table files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStore {
    dir: PathBuf,
    engine_id: String,
}

impl TableStore {
    /// A store for `engine_id` rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, engine_id: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            engine_id: engine_id.into(),
        }
    }

    /// The directory holding the table files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The engine id embedded in every file name.
    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    /// Full path of the table of `kind` learned for `color`.
    pub fn path(&self, kind: RelationKind, color: Color) -> PathBuf {
        self.dir.join(table_file_name(&self.engine_id, kind, color))
    }
}

#[derive(Clone)]
struct Slot {
    table: RelationTable,
    dirty: bool,
}

/// The KK, KP, PK and PP tables learned for one color.
#[derive(Clone)]
pub struct EvaluationSet {
    color: Color,
    /// One slot per kind, in [`RelationKind::ALL`] order.
    slots: Vec<Slot>,
}

impl EvaluationSet {
    fn from_fn(color: Color, make: impl FnMut(RelationKind) -> Slot) -> Self {
        Self {
            color,
            slots: RelationKind::ALL.into_iter().map(make).collect(),
        }
    }

    /// A set with every relation cleared. Nothing is dirty.
    pub fn new_zeroed(color: Color) -> Self {
        Self::from_fn(color, |kind| {
            let (rows, cols) = kind.dims();
            Slot {
                table: RelationTable::new_zeroed(rows, cols),
                dirty: false,
            }
        })
    }

    /// A set of fresh random tables, all marked dirty.
    pub fn new_random<R: Rng + ?Sized>(color: Color, rng: &mut R) -> Self {
        Self::from_fn(color, |kind| {
            let (rows, cols) = kind.dims();
            Slot {
                table: RelationTable::new_random(rows, cols, rng),
                dirty: true,
            }
        })
    }

    /// Load the four tables of `color` from `store`.
    ///
    /// A missing file is replaced by a random table that is marked dirty, so
    /// the next save point writes it out.
    pub fn load_or_init<R: Rng + ?Sized>(
        store: &TableStore,
        color: Color,
        rng: &mut R,
    ) -> Result<Self, TableError> {
        let mut slots = Vec::with_capacity(RelationKind::ALL.len());
        for kind in RelationKind::ALL {
            let (rows, cols) = kind.dims();
            let path = store.path(kind, color);
            let slot = match RelationTable::load(&path, rows, cols)? {
                Some(table) => {
                    info!(%kind, %color, path = %path.display(), "loaded relation table");
                    Slot {
                        table,
                        dirty: false,
                    }
                }
                None => {
                    info!(%kind, %color, path = %path.display(), "no table file, starting from random bits");
                    Slot {
                        table: RelationTable::new_random(rows, cols, rng),
                        dirty: true,
                    }
                }
            };
            slots.push(slot);
        }
        Ok(Self { color, slots })
    }

    /// Write every dirty table to `store` and clear its flag.
    ///
    /// The store directory is created if needed. Returns how many tables
    /// were written. A failed write leaves that table dirty.
    pub fn save_if_dirty(&mut self, store: &TableStore) -> Result<usize, TableError> {
        if !self.any_dirty() {
            return Ok(0);
        }
        std::fs::create_dir_all(store.dir())?;
        let color = self.color;
        let mut written = 0;
        for (kind, slot) in RelationKind::ALL.into_iter().zip(self.slots.iter_mut()) {
            if !slot.dirty {
                continue;
            }
            let path = store.path(kind, color);
            slot.table.save(&path)?;
            slot.dirty = false;
            written += 1;
            info!(%kind, %color, path = %path.display(), "saved relation table");
        }
        Ok(written)
    }

    /// The color these tables were learned for.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The table of `kind`.
    #[inline]
    pub fn table(&self, kind: RelationKind) -> &RelationTable {
        &self.slots[kind.index()].table
    }

    /// Read one relation of the table of `kind`.
    #[inline]
    pub fn get(&self, kind: RelationKind, self_index: usize, other_index: usize) -> Result<bool, TableError> {
        self.table(kind).get(self_index, other_index)
    }

    /// Write one relation, marking the table dirty only if the bit changed.
    pub fn set(
        &mut self,
        kind: RelationKind,
        self_index: usize,
        other_index: usize,
        bit: bool,
    ) -> Result<bool, TableError> {
        let slot = &mut self.slots[kind.index()];
        let changed = slot.table.set(self_index, other_index, bit)?;
        slot.dirty |= changed;
        Ok(changed)
    }

    /// Whether the table of `kind` has unsaved changes.
    #[inline]
    pub fn is_dirty(&self, kind: RelationKind) -> bool {
        self.slots[kind.index()].dirty
    }

    /// Whether any table has unsaved changes.
    pub fn any_dirty(&self) -> bool {
        self.slots.iter().any(|slot| slot.dirty)
    }
}

impl fmt::Debug for EvaluationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_map();
        for kind in RelationKind::ALL {
            list.entry(&kind.tag(), self.table(kind));
        }
        list.finish()
    }
}
