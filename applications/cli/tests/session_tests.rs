//! Integration tests for the CLI session, config and track loading

use std::io::Write;
use tempo_cli::{library, CliConfig, CliError, Command, Flow, Session};
use tempo_playback::{NoopRecorder, PlayerConfig, PlayerState};
use tempfile::NamedTempFile;

// ===== Helpers =====

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

const TRACKS: &str = r#"{
    "songs": [
        { "id": "1", "title": "Intro", "artist": "Band", "storage_url": "/songs/1.mp3" },
        { "id": "2", "title": "Middle", "artist": "Band", "storage_url": "/songs/2.mp3" },
        { "id": "3", "title": "Outro", "artist": "Band", "storage_url": "/songs/3.mp3" }
    ]
}"#;

fn session() -> Session {
    let file = write_temp(".json", TRACKS);
    let tracks = library::load_tracks(file.path()).unwrap();
    Session::new(tracks, NoopRecorder, PlayerConfig::default(), 60.0)
}

fn run(session: &mut Session, line: &str) -> (Flow, String) {
    let mut out = Vec::new();
    let flow = session
        .execute(line.parse::<Command>().unwrap(), &mut out)
        .unwrap();
    (flow, String::from_utf8(out).unwrap())
}

// ===== Session =====

#[test]
fn test_select_and_play_through_queue() {
    let mut session = session();

    let (_, output) = run(&mut session, "select 1");
    assert!(output.contains("now playing [1] Intro - Band"));
    assert_eq!(session.player().state(), PlayerState::Playing);

    let (_, output) = run(&mut session, "tick 60");
    assert!(output.contains("finished 1"));
    assert!(output.contains("now playing [2] Middle - Band"));
    assert_eq!(session.player().active_index(), Some(1));
}

#[test]
fn test_status_line_reports_transport() {
    let mut session = session();
    run(&mut session, "select 3");
    run(&mut session, "tick 15.5");
    run(&mut session, "vol 0.5");
    run(&mut session, "repeat on");

    let line = session.status_line();
    assert!(line.starts_with("Playing [3] Outro - Band"), "{}", line);
    assert!(line.contains("0:15/1:00"), "{}", line);
    assert!(line.contains("vol 50%"));
    assert!(line.contains("repeat:on"));
    assert!(line.contains("shuffle:off"));
}

#[test]
fn test_playback_errors_leave_session_usable() {
    let mut session = session();
    let mut out = Vec::new();

    let result = session.execute(Command::Next, &mut out);
    assert!(matches!(result, Err(CliError::Playback(_))));

    let result = session.execute(Command::Select(9), &mut out);
    assert!(matches!(result, Err(CliError::Playback(_))));

    let (flow, _) = run(&mut session, "select 1");
    assert_eq!(flow, Flow::Continue);
    assert_eq!(session.player().state(), PlayerState::Playing);
}

#[test]
fn test_queue_listing_marks_active_track() {
    let mut session = session();
    run(&mut session, "select 2");

    let (_, output) = run(&mut session, "queue");
    assert!(output.contains(">   2. Middle - Band"), "{}", output);
    assert!(output.contains("    1. Intro - Band"), "{}", output);
}

#[test]
fn test_quit_closes_player() {
    let mut session = session();
    run(&mut session, "select 1");

    let (flow, output) = run(&mut session, "quit");
    assert_eq!(flow, Flow::Quit);
    assert!(output.contains("player closed"));
    assert_eq!(session.player().state(), PlayerState::Idle);
    assert!(!session.clock().is_running());
}

// ===== Config =====

#[test]
fn test_config_loads_from_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
[player]
volume = 0.4
shuffle = true
history_limit = 10

[analytics]
enabled = true
base_url = "https://music.example.com"
access_token = "secret"

[simulation]
default_duration_secs = 90.0
"#,
    );

    let config = CliConfig::load(Some(file.path())).unwrap();
    config.validate().unwrap();

    assert_eq!(config.player.volume, 0.4);
    assert!(config.player.shuffle);
    assert_eq!(config.player.history_limit, 10);
    assert!(config.analytics.enabled);
    assert_eq!(config.analytics.access_token.as_deref(), Some("secret"));
    assert_eq!(config.analytics.timeout_secs, 10);
    assert_eq!(config.simulation.default_duration_secs, 90.0);
}

#[test]
fn test_config_partial_file_uses_defaults() {
    let file = write_temp(".toml", "[player]\nrepeat = true\n");

    let config = CliConfig::load(Some(file.path())).unwrap();
    assert!(config.player.repeat);
    assert_eq!(config.player.volume, 1.0);
    assert!(!config.analytics.enabled);
    assert_eq!(config.simulation.default_duration_secs, 180.0);
}

#[test]
fn test_config_missing_explicit_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = CliConfig::load(Some(&dir.path().join("missing.toml")));
    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn test_config_validation_rejects_bad_duration() {
    let file = write_temp(".toml", "[simulation]\ndefault_duration_secs = 0.0\n");

    let config = CliConfig::load(Some(file.path())).unwrap();
    assert!(matches!(config.validate(), Err(CliError::Config(_))));
}

// ===== Track Library =====

#[test]
fn test_missing_track_file_is_library_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = library::load_tracks(&dir.path().join("tracks.json"));
    assert!(matches!(result, Err(CliError::Library(_))));
}
