#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use picobot::render::event_frame;
use picobot::Simulator;

const UPDATE_VAR: &str = "PICOBOT_UPDATE_SNAPSHOTS";

fn snapshot_path(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "snapshots", name]
        .iter()
        .collect()
}

/// Compare `actual` with `tests/snapshots/<name>`, or rewrite it when
/// `PICOBOT_UPDATE_SNAPSHOTS` is set.
pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_path(name);
    if std::env::var_os(UPDATE_VAR).is_some() {
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("snapshot {} missing; set {}=1 to create it", path.display(), UPDATE_VAR));
    let expected = expected.replace("\r\n", "\n");
    assert_eq!(
        expected, actual,
        "snapshot {} differs; set {}=1 to regenerate",
        path.display(),
        UPDATE_VAR
    );
}

/// Run to the end, rendering every event with the grid it left behind
pub fn render_trace(simulator: &mut Simulator) -> String {
    let mut out = String::new();
    while let Some(event) = simulator.next() {
        out.push_str(&event_frame(simulator.grid(), &event));
    }
    out
}
