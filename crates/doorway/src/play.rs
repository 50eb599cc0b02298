//! Interactive loop
//!
//! Reads one command per line and runs it against an in-memory store, so
//! several sessions can be played side by side and switched between.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::warn;

use dw_core::{RoomReport, SessionId, SessionOptions, SessionStore};

use crate::commands::{self, Context};

const HELP: &str = "commands: map | move <n> | <n> | reveal | new [seed] | switch <id> | \
                    sessions | save | help | quit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Map,
    Move(usize),
    Reveal,
    New(Option<u64>),
    Switch(String),
    Sessions,
    Save,
    Help,
    Quit,
    Empty,
}

/// Parse an input line, or explain why it was not understood
pub fn parse_line(input: &str) -> Result<Line, String> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Line::Empty);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for {head:?}"));
    }

    let index = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| format!("{s:?} is not a connection number"))
    };

    match (head.to_ascii_lowercase().as_str(), arg) {
        ("map" | "m", None) => Ok(Line::Map),
        ("move" | "go", Some(n)) => index(n).map(Line::Move),
        ("move" | "go", None) => Err("move needs a connection number".to_string()),
        ("reveal", None) => Ok(Line::Reveal),
        ("new", None) => Ok(Line::New(None)),
        ("new", Some(seed)) => seed
            .parse()
            .map(|s| Line::New(Some(s)))
            .map_err(|_| format!("{seed:?} is not a seed")),
        ("switch", Some(id)) => Ok(Line::Switch(id.to_string())),
        ("sessions", None) => Ok(Line::Sessions),
        ("save", None) => Ok(Line::Save),
        ("help" | "?", None) => Ok(Line::Help),
        ("quit" | "q" | "exit", None) => Ok(Line::Quit),
        (word, None) if word.bytes().all(|b| b.is_ascii_digit()) => index(word).map(Line::Move),
        _ => Err(format!("unknown command {input:?}, try help")),
    }
}

/// Run the loop until `quit` or end of input, then save every session
pub fn run<R: BufRead, W: Write>(
    store: &mut SessionStore,
    start: Context,
    options: SessionOptions,
    input: R,
    mut out: W,
) -> Result<()> {
    let mut ctx = start;
    commands::open_or_create(store, &ctx, options)?;
    announce(&mut out, commands::show_map(store, &ctx), store, &ctx)?;
    writeln!(out, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        let parsed = match parse_line(&line) {
            Ok(parsed) => parsed,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };
        match parsed {
            Line::Empty => {}
            Line::Map => announce(&mut out, commands::show_map(store, &ctx), store, &ctx)?,
            Line::Move(n) => announce(&mut out, commands::move_to(store, &ctx, n), store, &ctx)?,
            Line::Reveal => announce(&mut out, commands::reveal(store, &ctx), store, &ctx)?,
            Line::New(seed) => {
                let options = seed.map_or(options, |s| options.with_seed(s));
                announce(&mut out, commands::new_game(store, &ctx, options), store, &ctx)?;
            }
            Line::Switch(id) => {
                let next = ctx.with_session(SessionId::new(id));
                match commands::open_or_create(store, &next, options) {
                    Ok(()) => {
                        ctx = next;
                        announce(&mut out, commands::show_map(store, &ctx), store, &ctx)?;
                    }
                    Err(e) => {
                        warn!(session = %next.session, error = %e, "switch failed");
                        writeln!(out, "{e:#}")?;
                    }
                }
            }
            Line::Sessions => {
                let mut ids: Vec<_> = store.ids().map(SessionId::to_string).collect();
                ids.sort_unstable();
                writeln!(out, "{}", ids.join(", "))?;
            }
            Line::Save => {
                commands::persist(store, &ctx)?;
                writeln!(out, "saved {}", ctx.save_path().display())?;
            }
            Line::Help => writeln!(out, "{HELP}")?,
            Line::Quit => break,
        }
    }

    let ids: Vec<SessionId> = store.ids().cloned().collect();
    for id in ids {
        commands::persist(store, &ctx.with_session(id))?;
    }
    Ok(())
}

/// Print the outcome of an action and write its frame
fn announce<W: Write>(
    out: &mut W,
    result: Result<RoomReport>,
    store: &SessionStore,
    ctx: &Context,
) -> Result<()> {
    match result {
        Ok(report) => {
            writeln!(out, "{report}")?;
            let path = commands::write_frame(store, ctx, None)?;
            writeln!(out, "map: {}", path.display())?;
        }
        Err(e) => {
            warn!(session = %ctx.session, error = %e, "command failed");
            writeln!(out, "{e}")?;
        }
    }
    Ok(())
}
