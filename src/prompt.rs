//! KoggeChess - Interactive Prompt Module
//!
//! Line based command loop for playing against the engine in a terminal.
//! Reads commands from any `BufRead` and writes replies to any `Write`, so
//! the loop can be driven by stdin/stdout or by a test.
//!
//! Before every prompt the engine plays its move if it owns the side to
//! move. The game ends when a king is captured.

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::engine::Engine;
use crate::types::Move;

const HELP: &str = "\
print_board (print for short) - prints out the current state of the board
move (mv for short)           - makes a move if legal. 'move' and 'mv' can be omitted
undo [n]                      - takes back the last move, or the last n moves
restart                       - starts a new match from the initial position
set_depth (depth for short)   - sets the search depth, higher is stronger and slower
list                          - prints the legal moves in the expected format
hint                          - prints the move the engine would make
history                       - prints the moves played so far
fen                           - prints the current position in FEN
perft [n]                     - counts the leaf nodes n plies deep
help                          - prints this message
exit (or quit)                - exits the game";

/// Interactive game session around one engine
pub struct Prompt {
    engine: Engine,
    running: bool,
}

impl Prompt {
    pub fn new(engine: Engine) -> Self {
        Prompt { engine, running: true }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run the loop until `exit`, end of input or a captured king
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        let mut lines = input.lines();
        self.running = true;

        while self.running {
            if self.engine.engine_to_move() {
                self.play_engine_move(out)?;
                if self.report_game_over(out)? {
                    break;
                }
                if !self.running {
                    break;
                }
            }

            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                self.process_command(line, out)?;
            }

            if self.report_game_over(out)? {
                break;
            }
        }

        Ok(())
    }

    /// Execute a single command line
    pub fn process_command<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(());
        };
        let args = &parts[1..];

        debug!("Command: {}", line);

        match command {
            "print" | "print_board" => self.cmd_print(out),
            "move" | "mv" => match args.first() {
                Some(mv) => self.cmd_move(mv, out),
                None => writeln!(out, "Usage: move <from><to>[n|b|r|q]"),
            },
            "undo" => self.cmd_undo(args, out),
            "restart" => {
                self.engine.restart();
                writeln!(out, "Board reset to the initial position")
            }
            "depth" | "set_depth" => self.cmd_depth(args, out),
            "list" => self.cmd_list(out),
            "hint" => self.cmd_hint(out),
            "history" => self.cmd_history(out),
            "fen" => writeln!(out, "{}", self.engine.fen()),
            "perft" => self.cmd_perft(args, out),
            "help" => writeln!(out, "{}", HELP),
            "exit" | "quit" => {
                self.running = false;
                Ok(())
            }
            _ if command.parse::<Move>().is_ok() => self.cmd_move(command, out),
            _ => writeln!(out, "'{}' is not a valid command.", command),
        }
    }

    fn play_engine_move<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let color = self.engine.engine_color();
        let depth = self.engine.depth();
        let verbose = self.engine.is_verbose();

        if verbose {
            info!("Searching for the next move...");
        }

        let Some(mv) = self.engine.best_move(depth, color) else {
            writeln!(out, "{} has no move left", color)?;
            self.running = false;
            return Ok(());
        };

        match self.engine.make_move(&mv, false, verbose) {
            Ok(notation) => {
                writeln!(out, "{}", notation)?;
                self.cmd_print(out)
            }
            Err(e) => {
                writeln!(out, "{}", e)?;
                self.running = false;
                Ok(())
            }
        }
    }

    /// Print the game-over line once a king is gone
    fn report_game_over<W: Write>(&self, out: &mut W) -> io::Result<bool> {
        match self.engine.winner() {
            Some(winner) => {
                writeln!(out)?;
                writeln!(out, "Game over! {} wins", winner)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    fn cmd_print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.engine.board().display())?;
        writeln!(out)
    }

    fn cmd_move<W: Write>(&mut self, mv: &str, out: &mut W) -> io::Result<()> {
        let verbose = self.engine.is_verbose();
        match self.engine.make_move(mv, true, verbose) {
            Ok(notation) => {
                writeln!(out, "{}", notation)?;
                self.cmd_print(out)
            }
            Err(e) => writeln!(out, "{}", e),
        }
    }

    fn cmd_undo<W: Write>(&mut self, args: &[&str], out: &mut W) -> io::Result<()> {
        let count = args.first().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);

        for _ in 0..count {
            if !self.engine.take_move() {
                writeln!(out, "Move history is empty!")?;
                break;
            }
        }

        Ok(())
    }

    fn cmd_depth<W: Write>(&mut self, args: &[&str], out: &mut W) -> io::Result<()> {
        match args.first().and_then(|s| s.parse::<u32>().ok()) {
            Some(depth) if depth > 0 => {
                self.engine.set_depth(depth);
                writeln!(out, "Search depth set to {}", depth)
            }
            _ => writeln!(out, "Usage: depth <n> with n > 0 (currently {})", self.engine.depth()),
        }
    }

    fn cmd_list<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for mv in self.engine.legal_moves() {
            writeln!(out, "{}", mv)?;
        }
        Ok(())
    }

    fn cmd_hint<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let depth = self.engine.depth();
        let color = self.engine.to_move();

        match self.engine.best_move(depth, color) {
            Some(mv) => writeln!(out, "{}", mv),
            None => writeln!(out, "No move available"),
        }
    }

    fn cmd_history<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let history = self.engine.move_history();
        if history.is_empty() {
            return writeln!(out, "No moves yet");
        }
        writeln!(out, "{}", history.join(" "))
    }

    fn cmd_perft<W: Write>(&mut self, args: &[&str], out: &mut W) -> io::Result<()> {
        let depth = args.first().and_then(|s| s.parse::<u32>().ok()).unwrap_or(1);
        let nodes = self.engine.perft(depth);
        writeln!(out, "Nodes: {}", nodes)
    }
}
