//! Interactive driver: one alien moves per command read from the terminal.
//!
//! Aliens take turns in id order, wrapping around, skipping the fallen.
//! The session ends on `quit`, at end of input, or when no live alien is
//! left.

use std::io::{BufRead, Write};

use invasion_core::{AlienId, MoveOutcome, Orchestrator};
use tracing::warn;

use crate::error::EngineError;

const HELP: &str = "\
commands:
  step, s, <enter>  move the next alien
  round, r          move every live alien once
  map, m            print the surviving cities
  status            print alien and city counts
  help, h           show this help
  quit, q           stop";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Step,
    Round,
    Map,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" | "step" | "s" => Self::Step,
            "round" | "r" => Self::Round,
            "map" | "m" => Self::Map,
            "status" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// The live alien whose turn follows `last`.
fn next_alien(orchestrator: &Orchestrator, last: Option<AlienId>) -> Option<AlienId> {
    let ids = orchestrator.live_ids();
    ids.iter()
        .copied()
        .find(|id| last.is_none_or(|last| *id > last))
        .or_else(|| ids.first().copied())
}

fn describe(id: AlienId, outcome: &MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Idle => format!("alien {id} has nothing to do"),
        MoveOutcome::Trapped { city } => format!("alien {id} is trapped in {city}"),
        MoveOutcome::Moved { from, to } => format!("alien {id} moved from {from} to {to}"),
        MoveOutcome::Collided { city, casualties } => {
            let names: Vec<String> = casualties.iter().map(ToString::to_string).collect();
            format!(
                "alien {id} destroyed {city}; fallen: {}",
                names.join(", ")
            )
        }
    }
}

/// Run the interactive session. Returns the number of single-alien steps
/// taken.
pub fn run_interactive<R: BufRead, W: Write>(
    orchestrator: &mut Orchestrator,
    input: R,
    output: &mut W,
) -> Result<u64, EngineError> {
    writeln!(output, "{} aliens ready. Type help for commands.", orchestrator.live_count())?;

    let mut last: Option<AlienId> = None;
    let mut steps: u64 = 0;
    let mut lines = input.lines();

    while orchestrator.live_count() > 0 {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };

        match Command::parse(&line?) {
            Command::Step => {
                let Some(id) = next_alien(orchestrator, last) else {
                    break;
                };
                last = Some(id);
                steps = steps.saturating_add(1);
                match orchestrator.step(id) {
                    Ok(outcome) => writeln!(output, "{}", describe(id, &outcome))?,
                    Err(e) => {
                        warn!(alien = id.get(), error = %e, "Move refused");
                        writeln!(output, "alien {id} cannot move: {e}")?;
                    }
                }
            }
            Command::Round => {
                orchestrator.run_round();
                writeln!(
                    output,
                    "round {} done, {} aliens left",
                    orchestrator.rounds_completed(),
                    orchestrator.live_count()
                )?;
            }
            Command::Map => write!(output, "{}", orchestrator.world())?,
            Command::Status => writeln!(
                output,
                "{} aliens alive, {} fallen, {} cities standing, {} destroyed",
                orchestrator.live_count(),
                orchestrator.fallen().len(),
                orchestrator.world().city_count(),
                orchestrator.world().destroyed().len()
            )?,
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => break,
            Command::Unknown(other) => writeln!(output, "unknown command {other:?}\n{HELP}")?,
        }
    }

    if orchestrator.live_count() == 0 {
        writeln!(output, "no aliens left")?;
    }
    Ok(steps)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use invasion_core::NullSink;
    use invasion_world::{Topology, WorldMap, parse_document};

    use super::*;

    fn orchestrator(map: &str, placements: &[&str]) -> Orchestrator {
        let world = WorldMap::from_records(&parse_document(map).unwrap(), Topology::Undirected);
        let mut builder = Orchestrator::builder().world(world).sink(NullSink);
        for city in placements {
            builder = builder.place(*city);
        }
        builder.build().unwrap()
    }

    fn session(orchestrator: &mut Orchestrator, input: &str) -> (u64, String) {
        let mut output = Vec::new();
        let steps = run_interactive(orchestrator, Cursor::new(input), &mut output).unwrap();
        (steps, String::from_utf8(output).unwrap())
    }

    #[test]
    fn commands_parse() {
        assert_eq!(Command::parse("\n"), Command::Step);
        assert_eq!(Command::parse(" r "), Command::Round);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(Command::parse("dance"), Command::Unknown("dance".to_owned()));
    }

    #[test]
    fn turns_rotate_in_id_order() {
        let mut orch = orchestrator("A east=B\nC east=D", &["A", "C"]);
        let (steps, out) = session(&mut orch, "s\ns\ns\nq\n");
        assert_eq!(steps, 3);
        assert!(out.contains("alien 1 moved from A to B"), "{out}");
        assert!(out.contains("alien 2 moved from C to D"), "{out}");
        assert!(out.contains("alien 1 moved from B to A"), "{out}");
    }

    #[test]
    fn session_ends_when_everyone_has_fallen() {
        let mut orch = orchestrator("A east=B", &["A", "B"]);
        let (steps, out) = session(&mut orch, "\n\n\n\n");
        assert_eq!(steps, 1);
        assert!(out.contains("alien 1 destroyed B; fallen: 1, 2"), "{out}");
        assert!(out.ends_with("no aliens left\n"), "{out}");
    }

    #[test]
    fn end_of_input_stops_the_session() {
        let mut orch = orchestrator("A east=B", &["A"]);
        let (steps, out) = session(&mut orch, "map\nstatus\n");
        assert_eq!(steps, 0);
        assert!(out.contains("A east=B\n"), "{out}");
        assert!(out.contains("1 aliens alive, 0 fallen, 2 cities standing"), "{out}");
        assert_eq!(orch.live_count(), 1);
    }

    #[test]
    fn next_alien_wraps_and_skips_the_fallen() {
        let orch = orchestrator("A east=B\nC east=D", &["A", "C", "D"]);
        assert_eq!(next_alien(&orch, None), Some(AlienId(1)));
        assert_eq!(next_alien(&orch, Some(AlienId(1))), Some(AlienId(2)));
        assert_eq!(next_alien(&orch, Some(AlienId(3))), Some(AlienId(1)));
        assert_eq!(next_alien(&orch, Some(AlienId(9))), Some(AlienId(1)));
    }
}
