//! Text rendering of a program
//!
//! Draws the event list as a tree: one line per event, its commands below it
//! indented by nesting depth, with highlight markers for whatever the
//! interpreter reported as running.

use crate::config::DisplayConfig;
use chrono::{DateTime, Local};
use program_engine::{Command, EventList, HighlightState, Parameters};
use std::fmt::Write;
use std::path::Path;

/// Report banner with source path and generation time
pub fn render_header(source: &Path, generated: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "═══════════════════════════════════════════════");
    let _ = writeln!(out, "  Robot Program: {}", source.display());
    let _ = writeln!(
        out,
        "  program-cli v{} / program-engine v{}",
        env!("CARGO_PKG_VERSION"),
        program_engine::VERSION
    );
    let _ = writeln!(out, "  Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "═══════════════════════════════════════════════");
    out
}

/// Render every event and its command list.
///
/// The selected event is marked with `*`. Highlighted rows get the configured
/// marker; other rows get padding of the same width so columns stay aligned.
pub fn render_program(events: &EventList, highlights: &HighlightState, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let blank = " ".repeat(display.highlight_marker.chars().count());
    let selected = events.selected();

    if events.is_empty() {
        let _ = writeln!(out, "(empty program)");
        return out;
    }

    for (index, (handle, event)) in events.iter().enumerate() {
        let marker = if highlights.is_event_highlighted(handle) {
            display.highlight_marker.as_str()
        } else {
            blank.as_str()
        };
        let star = if Some(handle) == selected { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {}[{}] {}{}",
            marker,
            star,
            index,
            event.kind(),
            format_parameters(event.parameters())
        );

        for (position, (command_handle, command)) in event.commands().iter().enumerate() {
            let marker = if highlights.is_command_highlighted(handle, command_handle) {
                display.highlight_marker.as_str()
            } else {
                blank.as_str()
            };
            let _ = writeln!(
                out,
                "{}     {:>3}  {}{}",
                marker,
                position,
                " ".repeat(command.indent() * display.indent_width),
                format_command(command)
            );
        }
    }
    out
}

/// One-line summary of a program for the log
pub fn summarize(events: &EventList) -> String {
    let commands: usize = events.iter().map(|(_, e)| e.commands().len()).sum();
    format!("{} event(s), {} command(s)", events.len(), commands)
}

fn format_command(command: &Command) -> String {
    format!("{}{}", command.kind(), format_parameters(command.parameters()))
}

fn format_parameters(parameters: Option<&Parameters>) -> String {
    match parameters {
        Some(map) if !map.is_empty() => {
            let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!(" ({})", pairs.join(", "))
        }
        _ => String::new(),
    }
}
