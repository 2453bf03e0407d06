//! `atparse` — a command-line harness for the `atcmd_core` lexer and
//! streaming parser. Reads an AT command/response buffer (file or stdin),
//! drives the line parser to exhaustion, and prints the resulting token
//! stream.

mod render;

use std::fs;
use std::io::Read;
use std::process;

use anyhow::Result;
use atcmd_core::{AtError, LineEnd, Token, TokenKind, command_type, line_parse};
use clap::{Parser, Subcommand};

use crate::render::{Format, render_error, render_tokens};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "atparse",
    version,
    about = "Tokenize 3GPP 27.007 AT command/response text"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Tokenize an AT buffer, one logical line at a time, to exhaustion.
    Parse {
        /// File to read, or `-` for stdin.
        #[arg(value_name = "FILE", default_value = "-")]
        file: String,
    },

    /// Classify a single command line's header without tokenizing the rest.
    Classify {
        /// The command text, e.g. `AT+CFUN=1`.
        #[arg(value_name = "COMMAND")]
        command: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let run_result = match cli.cmd {
        Cmd::Parse { file } => cmd_parse(&file, format),
        Cmd::Classify { command } => cmd_classify(&command, format),
    };

    if let Err(err) = run_result {
        emit_cli_error(format, &err);
        process::exit(1);
    }
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let filename = if file == "-" { "<stdin>" } else { file };

    let sentinel = Token {
        kind: TokenKind::Invalid,
        text: "",
        comma: atcmd_core::TrailingComma::Absent,
        offset: 0,
    };
    let mut scratch = vec![sentinel; 64];
    let mut rest: &str = &input;
    let mut first_call = true;

    loop {
        if rest.is_empty() && !first_call {
            break;
        }
        first_call = false;
        scratch.fill(sentinel);

        match line_parse(rest, &mut scratch) {
            Ok(result) => {
                render_tokens(&scratch[..result.count], format);
                match result.end {
                    LineEnd::Resp => {
                        if result.next_cursor >= rest.len() {
                            break;
                        }
                        rest = &rest[result.next_cursor..];
                    }
                    LineEnd::Exhausted => break,
                }
            }
            Err(AtError::TryAgain) => {
                // A new notification line started after `line_parse` had
                // already written some tokens this call; `scratch` holds
                // them up to (but not including) the first untouched
                // sentinel slot. Render what's pending and resume at the
                // byte offset right after the last one written.
                let written = scratch.iter().take_while(|t| t.kind != TokenKind::Invalid).count();
                render_tokens(&scratch[..written], format);
                let resume = scratch
                    .get(written.saturating_sub(1))
                    .filter(|_| written > 0)
                    .map_or(0, |t| t.offset + t.text.len());
                if resume == 0 || resume >= rest.len() {
                    break;
                }
                rest = &rest[resume..];
            }
            Err(e) => {
                if format == Format::Pretty {
                    render_error(rest, filename, &e, format);
                }
                anyhow::bail!("{e}");
            }
        }
    }

    Ok(())
}

fn cmd_classify(command: &str, format: Format) -> Result<()> {
    let kind = command_type(command);
    match format {
        Format::Json => {
            let out = serde_json::json!({ "command": command, "kind": kind });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{command:?} => {kind:?}");
        }
    }
    Ok(())
}

// ── Shared plumbing ───────────────────────────────────────────────────────

fn emit_cli_error(format: Format, err: &anyhow::Error) {
    let message = format!("{err:#}");
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": message,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("error envelope JSON serialization cannot fail")
            );
        }
        Format::Pretty => {
            eprintln!("error: {message}");
        }
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        Ok(fs::read_to_string(file)?)
    }
}
