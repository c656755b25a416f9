//! Integration tests for the play and learn cycle.
//!
//! Plays toy games with ranked move selection, learns from them, and checks
//! that the tables written to disk are exactly the ones held in memory.

use rensa_core::{Color, EvaluationSet, RelationKind};
use rensa_engine::fixture::ToyPosition;
use rensa_engine::{EngineConfig, EngineState, Position, learn, rank_all, select_best};

fn scratch_dir(label: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("rensa-engine-{label}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn config(label: &str, seed: u64) -> EngineConfig {
    EngineConfig {
        engine_id: label.to_string(),
        data_dir: scratch_dir(label),
        max_learn_plies: 6,
        max_playout_depth: 8,
        save_interval: 2,
        seed,
        ..EngineConfig::default()
    }
}

/// Play a game choosing every move from the side-to-move's best tier.
fn self_play(state: &mut EngineState, position: &mut ToyPosition) {
    while position.outcome().is_none() {
        let color = position.side_to_move();
        let config = state.config().clone();
        let ranking = rank_all(
            state.evaluation(color).unwrap(),
            position,
            config.ranking_resolution,
            config.empty_reply,
        )
        .unwrap();
        let mv = select_best(&ranking, state.rng_mut()).expect("toy games always have a move");
        position.push(mv);
    }
}

// ── Table lifecycle ───────────────────────────────────────────────────────────

#[test]
fn fresh_tables_are_written_on_first_save() {
    let mut state = EngineState::new(config("fresh", 1));
    state.load_tables().unwrap();
    assert_eq!(state.save_tables().unwrap(), 8, "all eight random tables are new");
    assert_eq!(state.save_tables().unwrap(), 0);

    let store = state.store().clone();
    for color in Color::ALL {
        for kind in RelationKind::ALL {
            assert!(store.path(kind, color).exists(), "{kind} {color:?} missing");
        }
    }
}

#[test]
fn learned_tables_survive_a_reload() {
    let config = config("reload", 7);
    let mut state = EngineState::new(config.clone());
    state.load_tables().unwrap();

    let mut position = ToyPosition::startpos();
    self_play(&mut state, &mut position);
    let report = learn(&mut state, &mut position).unwrap();
    assert!(report.steps > 0);

    let mut reloaded = EngineState::new(config);
    reloaded.load_tables().unwrap();
    for color in Color::ALL {
        let ours: &EvaluationSet = state.evaluation(color).unwrap();
        let theirs = reloaded.evaluation(color).unwrap();
        assert!(!theirs.any_dirty(), "every table was on disk");
        for kind in RelationKind::ALL {
            assert_eq!(ours.table(kind), theirs.table(kind), "{kind} for {color:?}");
        }
    }
}

#[test]
fn repeated_learning_keeps_the_game_intact() {
    let mut state = EngineState::new(config("repeat", 11));
    state.load_tables().unwrap();

    for _ in 0..3 {
        let mut position = ToyPosition::startpos();
        self_play(&mut state, &mut position);
        let terminal = position.sfen();
        let plies = position.ply();
        learn(&mut state, &mut position).unwrap();
        assert_eq!(position.sfen(), terminal);
        assert_eq!(position.ply(), plies);
    }
}
