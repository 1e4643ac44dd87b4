//! hyperion-codec -- chess position and move codec over a line protocol.
//!
//! Reads commands from stdin and writes responses to stdout. Diagnostics go
//! to stderr through `env_logger` (`RUST_LOG=debug` for detail).

use std::io::{self, BufRead};

use log::error;

use hyperion_codec::protocol::parser::{parse_command, Command};
use hyperion_codec::session::Session;

/// Runs the protocol loop until `quit` or end of input.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result = match cmd {
            Command::Codec => session.handle_codec(&mut out),
            Command::IsReady => session.handle_isready(&mut out),
            Command::SetOption { name, value } => {
                session.set_option(name, value);
                Ok(())
            }
            Command::Position(spec) => session.handle_position(&spec, &mut out),
            Command::Encode { uci } => session.handle_encode(&uci, &mut out),
            Command::Decode { index } => session.handle_decode(index, &mut out),
            Command::Planes => session.handle_planes(&mut out),
            Command::Quit => break,
        };

        if let Err(e) = result {
            error!("failed to write response: {}", e);
            break;
        }
    }
}
