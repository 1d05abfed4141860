use anyhow::Result;
use std::io::{BufRead, Write};
use xpf_common::ServiceManager;

/// One menu iteration's worth of operator intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Status,
    TailLogs,
    Start,
    Stop,
    Restart,
    Quit,
}

/// Decode one line of operator input. Anything outside 1-5/q/Q is `None`.
pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Status),
        "2" => Some(MenuChoice::TailLogs),
        "3" => Some(MenuChoice::Start),
        "4" => Some(MenuChoice::Stop),
        "5" => Some(MenuChoice::Restart),
        "q" | "Q" => Some(MenuChoice::Quit),
        _ => None,
    }
}

fn render_menu(out: &mut impl Write, service: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "==== {} operations ====", service)?;
    writeln!(out, " 1) Service status")?;
    writeln!(out, " 2) Tail logs")?;
    writeln!(out, " 3) Start service")?;
    writeln!(out, " 4) Stop service")?;
    writeln!(out, " 5) Restart service")?;
    writeln!(out, " q) Quit")?;
    write!(out, "Select an option: ")?;
    out.flush()?;
    Ok(())
}

fn pause(input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    write!(out, "Press Enter to return to the menu...")?;
    out.flush()?;
    let mut ack = String::new();
    input.read_line(&mut ack)?;
    Ok(())
}

/// Interactive read-eval loop over a bounded choice set. Unrecognized input
/// re-renders the menu without touching the service; `q` returns Ok so the
/// process exits 0. Privilege is checked by the caller once per invocation.
pub fn run_menu<M: ServiceManager>(
    service: &str,
    manager: &M,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    loop {
        render_menu(&mut out, service)?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // Input closed; treat like quit.
            writeln!(out)?;
            return Ok(());
        }

        let Some(choice) = parse_choice(&line) else {
            writeln!(out, "Unrecognized option '{}'", line.trim())?;
            continue;
        };

        match choice {
            MenuChoice::Quit => {
                writeln!(out, "Bye.")?;
                return Ok(());
            }
            MenuChoice::Status => {
                if let Err(e) = manager.status(service) {
                    writeln!(out, "Could not query status: {:#}", e)?;
                }
            }
            MenuChoice::TailLogs => {
                writeln!(out, "Tailing logs; press Ctrl+C to return to the menu.")?;
                match manager.tail_logs(service) {
                    Ok(tail) => {
                        if let Err(e) = tail.wait() {
                            writeln!(out, "Log tail ended abnormally: {:#}", e)?;
                        }
                    }
                    Err(e) => writeln!(out, "Could not tail logs: {:#}", e)?,
                }
            }
            MenuChoice::Start => {
                if let Err(e) = manager.start(service) {
                    writeln!(out, "Start failed: {:#}", e)?;
                } else if let Err(e) = manager.status(service) {
                    writeln!(out, "Started, but could not confirm status: {:#}", e)?;
                }
            }
            MenuChoice::Stop => {
                if let Err(e) = manager.stop(service) {
                    writeln!(out, "Stop failed: {:#}", e)?;
                }
            }
            MenuChoice::Restart => {
                if let Err(e) = manager.restart(service) {
                    writeln!(out, "Restart failed: {:#}", e)?;
                } else if let Err(e) = manager.status(service) {
                    writeln!(out, "Restarted, but could not confirm status: {:#}", e)?;
                }
            }
        }

        pause(&mut input, &mut out)?;
    }
}
