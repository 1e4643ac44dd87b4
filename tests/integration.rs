//! Integration tests for the hyperion-codec binary.
//!
//! Tests the full protocol session flow by spawning the codec process,
//! sending commands via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the codec and collects stdout lines.
fn run_codec(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_hyperion-codec");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start hyperion-codec");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

#[test]
fn codec_handshake() {
    let lines = run_codec(&["codec", "quit"]);

    assert!(lines.iter().any(|l| l == "id name hyperion-codec"));
    assert!(lines
        .iter()
        .any(|l| l == "option name StrictCastling type check default false"));
    assert_eq!(lines.last().map(String::as_str), Some("codecok"));
}

#[test]
fn isready_response() {
    let lines = run_codec(&["isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_codec(&["hello", "", "decode abc", "isready", "quit"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn encode_and_decode_from_startpos() {
    let lines = run_codec(&[
        "position startpos",
        "encode e2e4",
        "encode g1f3",
        "decode 877",
        "quit",
    ]);
    assert_eq!(
        lines,
        vec!["index 877 type 1", "index 501 type 63", "move e2e4"]
    );
}

#[test]
fn black_underpromotion_session() {
    let lines = run_codec(&[
        "position fen 4k3/8/8/8/8/8/3p4/4K3 b - - 0 1",
        "encode d2c1n",
        "encode d2d1r",
        "quit",
    ]);
    // d2 = 11; knight slot 0 right diagonal (2), rook slot 2 straight (0).
    assert_eq!(
        lines,
        vec![
            format!("index {} type 66", 11 * 73 + 66),
            format!("index {} type 70", 11 * 73 + 70),
        ]
    );
}

#[test]
fn decode_round_trips_encode() {
    let lines = run_codec(&[
        "position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        "encode e1g1",
        "encode e1c1",
        "encode a1a8",
        "quit",
    ]);
    let indices: Vec<String> = lines
        .iter()
        .map(|l| l.split_whitespace().nth(1).unwrap().to_string())
        .collect();

    let mut cmds = vec!["position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".to_string()];
    cmds.extend(indices.iter().map(|i| format!("decode {}", i)));
    cmds.push("quit".to_string());
    let cmd_refs: Vec<&str> = cmds.iter().map(String::as_str).collect();
    let lines = run_codec(&cmd_refs);
    assert_eq!(lines, vec!["move e1g1", "move e1c1", "move a1a8"]);
}

#[test]
fn errors_are_reported_and_session_continues() {
    let lines = run_codec(&[
        "encode e2e4",
        "position fen 8/8/8 w - - 0 1",
        "position startpos",
        "encode e2e9",
        "encode e4e5",
        "decode 4672",
        "isready",
        "quit",
    ]);
    assert_eq!(lines.len(), 6, "got: {:?}", lines);
    assert!(lines[..5].iter().all(|l| l.starts_with("error ")), "got: {:?}", lines);
    assert_eq!(lines[5], "readyok");
}

#[test]
fn strict_castling_option() {
    let fen = "position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkqZ - 0 1";
    let lenient = run_codec(&[fen, "isready", "quit"]);
    assert_eq!(lenient, vec!["readyok"]);

    let strict = run_codec(&[
        "setoption name StrictCastling value true",
        fen,
        "isready",
        "quit",
    ]);
    assert_eq!(strict.len(), 2);
    assert!(strict[0].starts_with("error "));
    assert_eq!(strict[1], "readyok");
}

#[test]
fn planes_reports_twenty_sums() {
    let lines = run_codec(&["position startpos", "planes", "quit"]);
    assert_eq!(lines.len(), 1);
    let sums: Vec<f32> = lines[0]
        .strip_prefix("planes ")
        .unwrap()
        .split(' ')
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(sums.len(), 20);
    // Knights, bishops, rooks: two each per side.
    for plane in [1, 2, 3, 7, 8, 9] {
        assert_eq!(sums[plane], 2.0);
    }
    // Queens and kings: one each per side.
    for plane in [4, 5, 10, 11] {
        assert_eq!(sums[plane], 1.0);
    }
}

#[test]
fn quit_stops_processing() {
    let lines = run_codec(&["isready", "quit", "isready"]);
    assert_eq!(lines, vec!["readyok"]);
}

#[test]
fn eof_without_quit_exits_cleanly() {
    let lines = run_codec(&["position startpos", "encode e2e4"]);
    assert_eq!(lines, vec!["index 877 type 1"]);
}
