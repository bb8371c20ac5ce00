/*!
 * ignix-lite Shell
 *
 * Interactive front end for the embedded engine. Reads one command per
 * line from stdin, runs it against an in-process `Store` and prints the
 * reply. `MULTI` starts queueing commands, `EXEC` runs the queue as one
 * isolated batch and `DISCARD` drops it.
 */

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use ignix_lite::*;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // RUST_LOG=debug shows reaper lifecycle
    env_logger::init();

    let config = StoreConfig::from_env();
    let store = Store::new(config);
    log::info!("ignix-lite ready (sweep interval {} ms)", config.sweep_interval_ms);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut queued: Option<Vec<Cmd>> = None;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("QUIT") {
            break;
        } else if line.eq_ignore_ascii_case("MULTI") {
            if queued.is_some() {
                writeln!(stdout, "(error) ERR MULTI calls can not be nested")?;
            } else {
                queued = Some(Vec::new());
                writeln!(stdout, "OK")?;
            }
        } else if line.eq_ignore_ascii_case("DISCARD") {
            match queued.take() {
                Some(_) => writeln!(stdout, "OK")?,
                None => writeln!(stdout, "(error) ERR DISCARD without MULTI")?,
            }
        } else if line.eq_ignore_ascii_case("EXEC") {
            match queued.take() {
                Some(cmds) => {
                    let replies = store.execute(cmds);
                    if replies.is_empty() {
                        writeln!(stdout, "(empty array)")?;
                    }
                    for (i, reply) in replies.iter().enumerate() {
                        write!(stdout, "{}) ", i + 1)?;
                        print_reply(&mut stdout, reply)?;
                    }
                }
                None => writeln!(stdout, "(error) ERR EXEC without MULTI")?,
            }
        } else {
            match parse_line(line) {
                Ok(cmd) => match queued.as_mut() {
                    Some(q) => {
                        q.push(cmd);
                        writeln!(stdout, "QUEUED")?;
                    }
                    None => {
                        let reply = store.execute(vec![cmd]).pop();
                        match reply {
                            Some(r) => print_reply(&mut stdout, &r)?,
                            None => writeln!(stdout, "(nil)")?,
                        }
                    }
                },
                Err(e) => writeln!(stdout, "(error) ERR {:#}", e)?,
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

fn print_reply(out: &mut impl Write, reply: &ignix_lite::Result<Reply>) -> io::Result<()> {
    match reply {
        Ok(r) => writeln!(out, "{}", r),
        Err(e) => writeln!(out, "(error) {}", e),
    }
}
