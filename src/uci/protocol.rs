use crate::config::EngineConfig;
use crate::core::Board;
use crate::engine::eval::evaluate;
use crate::engine::perft::{self, PerftScheduler};
use crate::engine::search::{SearchLimits, Searcher};
use crate::error::Result;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use vampirc_uci::uci::{UciSearchControl, UciTimeControl};
use vampirc_uci::{parser, UciMessage};

const ENGINE_NAME: &str = "Coco 0.1.0";
const ENGINE_AUTHOR: &str = "Coco developers";

/// Granularity of the clock watcher and of `go infinite` waiting for `stop`
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// UCI front-end. Searches run on a background thread that owns the
/// [`Searcher`] while it works; output goes to a shared writer.
pub struct Uci<W: Write + Send + 'static> {
    board: Board,
    /// Hashes of the positions before `board`, oldest first
    history: Vec<u64>,
    config: EngineConfig,
    searcher: Option<Searcher>,
    search_thread: Option<JoinHandle<Searcher>>,
    stop: Arc<AtomicBool>,
    out: Arc<Mutex<W>>,
}

impl Uci<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> Uci<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, EngineConfig::default())
    }

    pub fn with_config(out: W, config: EngineConfig) -> Self {
        let searcher = Searcher::with_hash_mb(config.hash_mb);
        let stop = searcher.stop_flag();
        Uci {
            board: Board::startpos(),
            history: Vec::new(),
            config,
            searcher: Some(searcher),
            search_thread: None,
            stop,
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Game positions preceding the current one
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Shared handle to the output writer
    pub fn output(&self) -> Arc<Mutex<W>> {
        self.out.clone()
    }

    /// Read commands from stdin until `quit` or end of input
    pub fn run(&mut self) {
        let stdin = io::stdin();
        self.run_with(stdin.lock());
    }

    pub fn run_with<R: BufRead>(&mut self, input: R) {
        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    break;
                }
            };
            if !self.handle_line(&line) {
                break;
            }
        }
        self.stop_search();
    }

    /// Process one command line. Returns false on `quit`.
    pub fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }
        debug!(command = line, "uci input");

        match parser::parse_one(line) {
            UciMessage::Uci => self.cmd_uci(),
            UciMessage::IsReady => self.send("readyok"),
            UciMessage::SetOption { name, value } => {
                self.apply_setoption(name.trim(), value.as_deref().unwrap_or(""));
            }
            UciMessage::UciNewGame => self.cmd_ucinewgame(),
            UciMessage::Position {
                startpos,
                fen,
                moves,
            } => {
                let fen_str = fen.as_ref().map(|f| f.as_str());
                let move_strs: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                let refs: Vec<&str> = move_strs.iter().map(String::as_str).collect();
                if let Err(e) = self.apply_position(startpos, fen_str, &refs) {
                    warn!(error = %e, "rejected position");
                }
            }
            UciMessage::Go {
                time_control,
                search_control,
            } => {
                let limits = go_to_limits(time_control.as_ref(), search_control.as_ref());
                self.do_go(limits);
            }
            UciMessage::Stop => self.stop.store(true, Ordering::Relaxed),
            UciMessage::Quit => {
                self.stop_search();
                return false;
            }
            UciMessage::Unknown(ref s, _) => {
                let parts: Vec<&str> = s.split_whitespace().collect();
                match parts.first().copied() {
                    Some("d") | Some("display") => self.cmd_display(),
                    Some("eval") => self.cmd_eval(),
                    Some("perft") => self.cmd_perft(&parts, false),
                    Some("divide") => self.cmd_perft(&parts, true),
                    _ => warn!(command = line, "unknown command"),
                }
            }
            _ => debug!(command = line, "ignored command"),
        }
        true
    }

    fn send(&self, line: &str) {
        send_line(&self.out, line);
    }

    /// Block until a running search has handed the searcher back
    pub fn wait_for_search(&mut self) {
        let Some(handle) = self.search_thread.take() else {
            return;
        };
        match handle.join() {
            Ok(searcher) => self.searcher = Some(searcher),
            Err(_) => {
                warn!("search thread panicked, starting a fresh searcher");
                self.install_searcher(Searcher::with_hash_mb(self.config.hash_mb));
            }
        }
    }

    /// Abort any running search and wait for it
    pub fn stop_search(&mut self) {
        if self.search_thread.is_some() {
            self.stop.store(true, Ordering::Relaxed);
            self.wait_for_search();
        }
    }

    fn install_searcher(&mut self, searcher: Searcher) {
        self.stop = searcher.stop_flag();
        self.searcher = Some(searcher);
    }

    fn cmd_uci(&self) {
        self.send(&format!("id name {}", ENGINE_NAME));
        self.send(&format!("id author {}", ENGINE_AUTHOR));
        self.send("");
        self.send(&format!(
            "option name Hash type spin default {} min {} max {}",
            EngineConfig::default().hash_mb,
            EngineConfig::MIN_HASH_MB,
            EngineConfig::MAX_HASH_MB
        ));
        self.send(&format!(
            "option name Threads type spin default {} min 1 max {}",
            EngineConfig::default().threads,
            EngineConfig::MAX_THREADS
        ));
        self.send(&format!(
            "option name PerftSplitDepth type spin default {} min 1 max 16",
            EngineConfig::default().perft_split_depth
        ));
        self.send("uciok");
    }

    fn apply_setoption(&mut self, name: &str, value: &str) {
        if !self.config.set_option(name, value) {
            warn!(name, value, "unsupported option");
            return;
        }
        info!(name, value, "option set");
        if name.eq_ignore_ascii_case("hash") {
            self.stop_search();
            if let Some(searcher) = self.searcher.as_mut() {
                searcher.set_hash_size(self.config.hash_mb);
            }
        }
    }

    fn cmd_ucinewgame(&mut self) {
        self.stop_search();
        self.board = Board::startpos();
        self.history.clear();
        if let Some(searcher) = self.searcher.as_mut() {
            searcher.clear();
        }
    }

    /// Set the position, replaying `moves` from it. On error the current
    /// position is left untouched.
    pub fn apply_position(
        &mut self,
        startpos: bool,
        fen: Option<&str>,
        moves: &[&str],
    ) -> Result<()> {
        let mut board = match (startpos, fen) {
            (false, Some(fen)) => Board::from_fen(fen)?,
            _ => Board::startpos(),
        };
        let mut history = Vec::with_capacity(moves.len());
        for text in moves {
            let mv = board.parse_uci_move(text)?;
            history.push(board.hash());
            board.apply_move(mv);
        }
        self.board = board;
        self.history = history;
        Ok(())
    }

    fn do_go(&mut self, limits: SearchLimits) {
        self.stop_search();
        let Some(mut searcher) = self.searcher.take() else {
            warn!("no searcher available");
            return;
        };

        let budget = limits.time_budget(self.board.side_to_move());
        debug!(?limits, ?budget, "go");

        self.stop.store(false, Ordering::Relaxed);
        let done = Arc::new(AtomicBool::new(false));
        if let Some(budget) = budget {
            spawn_timer(budget, self.stop.clone(), done.clone());
        }

        let out = self.out.clone();
        searcher.set_history(self.history.clone());
        searcher.set_reporter(Box::new({
            let out = out.clone();
            move |info| send_line(&out, &info.to_string())
        }));

        let board = self.board.clone();
        let stop = self.stop.clone();
        let spawned = thread::Builder::new()
            .name("search".to_string())
            .spawn(move || {
                let best = searcher.search(&board, &limits);
                if limits.infinite {
                    while !stop.load(Ordering::Relaxed) {
                        thread::sleep(POLL_INTERVAL);
                    }
                }
                done.store(true, Ordering::Relaxed);
                searcher.clear_reporter();
                let line = match best {
                    Some(mv) => format!("bestmove {}", mv),
                    None => "bestmove 0000".to_string(),
                };
                send_line(&out, &line);
                searcher
            });

        match spawned {
            Ok(handle) => self.search_thread = Some(handle),
            Err(e) => {
                warn!(error = %e, "failed to spawn search thread");
                self.install_searcher(Searcher::with_hash_mb(self.config.hash_mb));
            }
        }
    }

    fn cmd_display(&self) {
        self.send(&format!("{}", self.board));
    }

    fn cmd_eval(&self) {
        self.send(&format!("Evaluation: {} cp (White's view)", evaluate(&self.board)));
    }

    fn cmd_perft(&mut self, parts: &[&str], per_move: bool) {
        let depth: u32 = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
        self.stop_search();

        let scheduler = match PerftScheduler::from_config(&self.config) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "perft pool unavailable, counting sequentially");
                None
            }
        };

        let start = Instant::now();
        let total: u64 = if per_move {
            let counts = match &scheduler {
                Some(s) => s.divide(&self.board, depth),
                None => perft::divide(&self.board, depth),
            };
            for (mv, n) in &counts {
                self.send(&format!("{}: {}", mv, n));
            }
            self.send("");
            counts.iter().map(|(_, n)| n).sum()
        } else {
            match &scheduler {
                Some(s) => s.count_leaves(&self.board, depth),
                None => perft::count_leaves(&self.board, depth),
            }
        };

        let elapsed = start.elapsed();
        let nps = if elapsed.as_millis() > 0 {
            total as u128 * 1000 / elapsed.as_millis()
        } else {
            0
        };
        self.send(&format!(
            "Nodes: {} ({} ms, {} nps)",
            total,
            elapsed.as_millis(),
            nps
        ));
    }
}

impl Default for Uci<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

fn send_line<W: Write>(out: &Mutex<W>, line: &str) {
    let mut out = match out.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if writeln!(out, "{}", line).and_then(|_| out.flush()).is_err() {
        warn!("failed to write uci output");
    }
}

/// Raise `stop` once `budget` has elapsed, unless the search finished first
fn spawn_timer(budget: Duration, stop: Arc<AtomicBool>, done: Arc<AtomicBool>) {
    let spawned = thread::Builder::new()
        .name("search-timer".to_string())
        .spawn(move || {
            let start = Instant::now();
            while !done.load(Ordering::Relaxed) {
                let elapsed = start.elapsed();
                if elapsed >= budget {
                    stop.store(true, Ordering::Relaxed);
                    debug!(budget_ms = budget.as_millis() as u64, "time budget spent");
                    return;
                }
                thread::sleep(POLL_INTERVAL.min(budget - elapsed));
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to spawn search timer");
    }
}

/// Build SearchLimits from vampirc-parsed go command (time_control, search_control).
fn go_to_limits(
    time_control: Option<&UciTimeControl>,
    search_control: Option<&UciSearchControl>,
) -> SearchLimits {
    let mut limits = SearchLimits::default();

    if let Some(sc) = search_control {
        limits.depth = sc.depth.map(i32::from);
    }

    if let Some(tc) = time_control {
        match tc {
            UciTimeControl::Infinite => limits.infinite = true,
            UciTimeControl::MoveTime(d) => {
                limits.movetime = Some(duration_to_millis(d));
            }
            UciTimeControl::TimeLeft {
                white_time,
                black_time,
                white_increment,
                black_increment,
                moves_to_go,
            } => {
                limits.wtime = white_time.as_ref().map(duration_to_millis);
                limits.btime = black_time.as_ref().map(duration_to_millis);
                limits.winc = white_increment.as_ref().map(duration_to_millis);
                limits.binc = black_increment.as_ref().map(duration_to_millis);
                limits.movestogo = moves_to_go.map(u32::from);
            }
            _ => {}
        }
    }

    limits
}

fn duration_to_millis(d: &chrono::Duration) -> u64 {
    d.num_milliseconds().max(0) as u64
}
