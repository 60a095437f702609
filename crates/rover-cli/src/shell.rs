//! Interactive command shell.
//!
//! Reads `<command-name>:<value>` lines, resolves them through the opcode
//! table, validates the value against the matching symbolic table, and
//! forwards the frame through the shared [`CommandSink`]. `help` and
//! `quit` are handled locally and never transmitted.

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use rover_control::{CommandSink, Shutdown, ShutdownHandle};
use rover_proto::{OPCODES, Opcode, decimal_value};
use rover_types::{Move, OperatingState, Turn};

/// What one input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    /// Validated frame, ready to transmit.
    Send(Opcode, u8),
    /// Show help, optionally for one command name.
    Help(Option<String>),
    /// Terminate the process.
    Quit,
    /// Invalid input; print the message, send nothing.
    Reject(&'static str),
}

/// Resolve one input line. Pure, so every command form is testable.
pub(crate) fn interpret(line: &str) -> Action {
    let line = line.trim();
    let (cmd_str, val_str) = match line.split_once(':') {
        Some((cmd, val)) => (cmd, Some(val)),
        None => (line, None),
    };

    match Opcode::from_name(Some(cmd_str)) {
        Opcode::Unknown => Action::Reject("unknown command!"),

        op @ (Opcode::Mode | Opcode::State) => {
            let state = OperatingState::from_name(val_str);
            if state == OperatingState::Unknown {
                Action::Reject("unknown state!")
            } else {
                Action::Send(op, state.wire())
            }
        }

        op @ (Opcode::HardTurn | Opcode::SoftTurn) => {
            let turn = Turn::from_name(val_str);
            if turn == Turn::Unknown {
                Action::Reject("unknown turn!")
            } else {
                Action::Send(op, turn.wire())
            }
        }

        Opcode::SetDirection => {
            let mv = Move::from_name(val_str);
            if mv == Move::Unknown {
                Action::Reject("unknown move direction!")
            } else {
                Action::Send(Opcode::SetDirection, mv.wire())
            }
        }

        op @ (Opcode::DistCenter | Opcode::DistLeft | Opcode::DistRight | Opcode::Speed) => {
            Action::Send(op, decimal_value(val_str))
        }

        Opcode::Help => Action::Help(val_str.map(str::to_string)),
        Opcode::Quit => Action::Quit,
    }
}

/// Run the shell until `quit`, EOF, or an external shutdown.
///
/// Blocking by design: runs on the main thread while the control tasks own
/// the runtime's workers. `runtime` is used to drive the async sink.
pub fn run(
    sink: Arc<dyn CommandSink>,
    runtime: tokio::runtime::Handle,
    shutdown_handle: &ShutdownHandle,
    shutdown: Shutdown,
) {
    print_syntax();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.is_triggered() {
            break;
        }

        print!("{} ", "cmd>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF: treat like quit so the tasks wind down.
                shutdown_handle.trigger();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "read error".red(), e);
                shutdown_handle.trigger();
                break;
            }
        }

        if line.trim().is_empty() {
            continue;
        }

        match interpret(&line) {
            Action::Send(opcode, value) => {
                if let Err(e) = runtime.block_on(sink.send(opcode, value)) {
                    println!("{}: {}", "transmission failed".red(), e);
                }
            }
            Action::Help(topic) => print_help(topic.as_deref()),
            Action::Quit => {
                println!("{}", "shutting down.".green());
                shutdown_handle.trigger();
                break;
            }
            Action::Reject(msg) => println!("{}", msg.red()),
        }
    }
}

pub fn print_syntax() {
    println!("command syntax: {}", "<command>:<value>".bold());
    print_command_list();
}

fn print_command_list() {
    for op in OPCODES {
        println!("\t{}", op.name());
    }
}

fn print_help(topic: Option<&str>) {
    match Opcode::from_name(topic) {
        Opcode::State | Opcode::Mode => {
            println!("state:<state>, where <state> is one of the following:");
            println!("nothing, basic, orders, dance.");
        }
        _ => print_syntax(),
    }
}
