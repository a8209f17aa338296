// Replay module for analyzing decision logs and debugging the policy
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run the policy on the logged inputs and pre-tick state
// 3. Compare logged vs replayed moves
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::debug_logger::DecisionLogEntry;
use crate::grid::Grid;
use crate::policy::{Policy, Status, TickInput};
use crate::types::Coord;

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub seed: u64,
    pub tick: u64,
    pub original_move: Coord,
    pub replayed_move: Coord,
    pub original_status: Status,
    pub replayed_status: Status,
    pub matches: bool,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DecisionLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DecisionLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the policy on one logged tick and compares the result.
    /// Board dimensions come from the entry; thresholds from the engine's config.
    pub fn replay_entry(&self, entry: &DecisionLogEntry) -> Result<ReplayResult, String> {
        let policy = Policy::new(Grid::new(entry.cols, entry.rows), self.config.policy.clone());
        let mut state = entry.state.clone();
        let input = TickInput {
            body: &entry.body,
            food: entry.food,
            score: entry.score,
        };

        let decision = policy
            .decide(&mut state, &input)
            .ok_or_else(|| format!("Tick {} has an empty body", entry.tick))?;

        let matches = decision.next == entry.chosen && decision.status == entry.status;
        let result = ReplayResult {
            seed: entry.seed,
            tick: entry.tick,
            original_move: entry.chosen,
            replayed_move: decision.next,
            original_status: entry.status,
            replayed_status: decision.status,
            matches,
        };

        if self.verbose {
            if matches {
                info!(
                    "Game {} tick {}: ✓ MATCH - {:?} ({})",
                    entry.seed, entry.tick, decision.next, decision.status
                );
            } else {
                warn!(
                    "Game {} tick {}: ✗ MISMATCH - Original: {:?} ({}), Replayed: {:?} ({})",
                    entry.seed,
                    entry.tick,
                    entry.chosen,
                    entry.status,
                    decision.next,
                    decision.status
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[DecisionLogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay tick {}: {}", entry.tick, e);
                }
            }
        }

        results
    }

    /// Replays specific ticks from a log file
    pub fn replay_ticks(
        &self,
        entries: &[DecisionLogEntry],
        ticks: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for tick in ticks {
            let matching: Vec<&DecisionLogEntry> =
                entries.iter().filter(|e| e.tick == *tick).collect();
            if matching.is_empty() {
                return Err(format!("Tick {} not found in log file", tick));
            }

            for entry in matching {
                match self.replay_entry(entry) {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        warn!("Failed to replay tick {}: {}", tick, e);
                    }
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_ticks,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Game {} tick {}: {:?} ({}) → {:?} ({})",
                    result.seed,
                    result.tick,
                    result.original_move,
                    result.original_status,
                    result.replayed_move,
                    result.replayed_status
                );
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_logger::timestamp;
    use crate::policy::PolicyState;

    fn logged(chosen: Coord, status: Status) -> DecisionLogEntry {
        let body = vec![
            Coord::new(5, 5),
            Coord::new(4, 5),
            Coord::new(3, 5),
            Coord::new(2, 5),
        ];
        let food = Some(Coord::new(8, 5));
        DecisionLogEntry {
            seed: 0,
            tick: 0,
            cols: 10,
            rows: 10,
            state: PolicyState::new(body[0], food, 0),
            body,
            food,
            score: 0,
            chosen,
            chosen_move: "right".to_string(),
            status,
            timestamp: timestamp(),
        }
    }

    #[test]
    fn test_replay_matches_logged_decision() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = engine
            .replay_entry(&logged(Coord::new(6, 5), Status::ShortestToFood))
            .expect("replayable entry");
        assert!(result.matches);
    }

    #[test]
    fn test_replay_flags_mismatch() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = engine
            .replay_entry(&logged(Coord::new(5, 6), Status::ToTailSafe))
            .expect("replayable entry");
        assert!(!result.matches);
        assert_eq!(result.replayed_move, Coord::new(6, 5));

        let stats = engine.generate_stats(&[result]);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.match_rate, 0.0);
    }

    #[test]
    fn test_replay_missing_tick_is_error() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![logged(Coord::new(6, 5), Status::ShortestToFood)];
        assert!(engine.replay_ticks(&entries, &[3]).is_err());
        assert_eq!(engine.replay_ticks(&entries, &[0]).map(|r| r.len()), Ok(1));
    }
}
