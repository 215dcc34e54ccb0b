//! Line-oriented command front-end.
//!
//! Stands in for the map page's radio buttons, time slider and layer menu.
//! Each line parses into one [`Command`]; the session executes it.

use std::str::FromStr;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use flood_common::{display_label, PartitionedLayers, UiState, ViewMode};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::session::ViewerEvent;

pub const HELP: &str = "\
Commands:
  mode max|timeseries      switch display mode (resets step and selection)
  step <n>                 set the time step
  pick <number|layer>      show a catalog layer by menu number or name
  layers                   list available layers
  status                   show the current selection
  help                     show this help
  quit                     exit";

/// Which catalog layer a `pick` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickTarget {
    /// 1-based position in the `layers` menu
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(ViewMode),
    Step(u32),
    Pick(PickTarget),
    Layers,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("'{command}' needs an argument: {usage}")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    #[error("Invalid argument '{value}' for '{command}'")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "mode" => parse_mode(rest).map(Command::Mode),
            "step" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "step",
                        usage: "step <n>",
                    });
                }
                rest.parse::<u32>()
                    .map(Command::Step)
                    .map_err(|_| CommandParseError::InvalidArgument {
                        command: "step",
                        value: rest.to_string(),
                    })
            }
            "pick" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "pick",
                        usage: "pick <number|layer>",
                    });
                }
                // Layer names always carry letters, so a bare number is a
                // menu position.
                Ok(Command::Pick(match rest.parse::<usize>() {
                    Ok(index) => PickTarget::Index(index),
                    Err(_) => PickTarget::Name(rest.to_string()),
                }))
            }
            "layers" | "ls" => Ok(Command::Layers),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

fn parse_mode(arg: &str) -> Result<ViewMode, CommandParseError> {
    match arg.to_lowercase().as_str() {
        "" => Err(CommandParseError::MissingArgument {
            command: "mode",
            usage: "mode max|timeseries",
        }),
        "max" | "maxdepth" | "max_depth" => Ok(ViewMode::MaxDepth),
        "timeseries" | "time" | "ts" => Ok(ViewMode::TimeSeries),
        _ => Err(CommandParseError::InvalidArgument {
            command: "mode",
            value: arg.to_string(),
        }),
    }
}

/// Categorized layer menu with running numbers for `pick <n>`.
pub fn layers_table(layers: &PartitionedLayers, selected: Option<&str>) -> String {
    if layers.is_empty() {
        return "Loading...".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["#", "Group", "Layer", "Identifier", ""]);

    let groups = [
        ("Max Depth", &layers.max_depth),
        ("Time Series", &layers.time_series),
    ];
    let mut number = 1;
    for (group, ids) in groups {
        for id in ids {
            let marker = if selected == Some(id.as_str()) { "*" } else { "" };
            table.add_row(vec![
                number.to_string(),
                group.to_string(),
                display_label(id),
                id.clone(),
                marker.to_string(),
            ]);
            number += 1;
        }
    }

    table.to_string()
}

/// One-line summary of the selection.
pub fn status_line(state: &UiState, max_time_step: u32) -> String {
    let mode = match state.active_mode {
        ViewMode::MaxDepth => "Max Depth",
        ViewMode::TimeSeries => "Time Series",
    };
    let layer = state.selected_dynamic_layer.as_deref().unwrap_or("(default)");
    let loading = if state.is_loading { "  [loading]" } else { "" };
    format!(
        "Mode: {}  Layer: {}  Time Step: {} / {}{}",
        mode, layer, state.time_step, max_time_step, loading
    )
}

/// Forward parsed lines to the session until EOF or `quit`.
///
/// Parse errors are printed and reading continues.
pub async fn read_commands<R>(input: R, events: UnboundedSender<ViewerEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Command input closed");
                break;
            }
        };

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if events.send(ViewerEvent::Command(command)).is_err() {
                    return;
                }
            }
            Err(CommandParseError::Empty) => {}
            Err(e) => println!("{}", e),
        }
    }

    let _ = events.send(ViewerEvent::Shutdown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_common::catalog::partition;
    use flood_common::TimeStep;

    #[test]
    fn test_parse_commands() {
        assert_eq!("mode max".parse::<Command>(), Ok(Command::Mode(ViewMode::MaxDepth)));
        assert_eq!(
            "MODE TimeSeries".parse::<Command>(),
            Ok(Command::Mode(ViewMode::TimeSeries))
        );
        assert_eq!("  step 12 ".parse::<Command>(), Ok(Command::Step(12)));
        assert_eq!("pick 2".parse::<Command>(), Ok(Command::Pick(PickTarget::Index(2))));
        assert_eq!(
            "pick flood_event_a_timeseries".parse::<Command>(),
            Ok(Command::Pick(PickTarget::Name("flood_event_a_timeseries".into())))
        );
        assert_eq!("layers".parse::<Command>(), Ok(Command::Layers));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandParseError::Empty));
        assert!(matches!(
            "zoom 3".parse::<Command>(),
            Err(CommandParseError::Unknown(_))
        ));
        assert!(matches!(
            "step".parse::<Command>(),
            Err(CommandParseError::MissingArgument { command: "step", .. })
        ));
        assert!(matches!(
            "step -1".parse::<Command>(),
            Err(CommandParseError::InvalidArgument { command: "step", .. })
        ));
        assert!(matches!(
            "mode satellite".parse::<Command>(),
            Err(CommandParseError::InvalidArgument { command: "mode", .. })
        ));
    }

    #[test]
    fn test_layers_table() {
        assert_eq!(layers_table(&PartitionedLayers::default(), None), "Loading...");

        let layers = partition(&[
            "b_max_depth".to_string(),
            "a_max_depth".to_string(),
            "z_timeseries".to_string(),
        ]);
        let table = layers_table(&layers, Some("z_timeseries"));
        assert!(table.contains("a_max_depth"));
        assert!(table.contains("Time Series"));
        assert!(table.contains('*'));

        let a = table.find("a_max_depth").unwrap();
        let b = table.find("b_max_depth").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_status_line() {
        let mut state = UiState::with_mode(ViewMode::TimeSeries, TimeStep::new(3).unwrap());
        assert_eq!(
            status_line(&state, 25),
            "Mode: Time Series  Layer: (default)  Time Step: 3 / 25"
        );
        state.is_loading = true;
        assert!(status_line(&state, 25).ends_with("[loading]"));
    }

    #[tokio::test]
    async fn test_read_commands_forwards_until_quit() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let input: &[u8] = b"mode timeseries\nbogus\n\nstep 4\nquit\nstatus\n";

        read_commands(input, tx).await;

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        assert_eq!(
            received,
            vec![
                ViewerEvent::Command(Command::Mode(ViewMode::TimeSeries)),
                ViewerEvent::Command(Command::Step(4)),
                ViewerEvent::Shutdown,
            ]
        );
    }
}
