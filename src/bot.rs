// Session driver: pairs the game rules with the decision policy
//
// A Bot holds static configuration and plays complete headless sessions.
// Each session owns its own seeded random source, Game and PolicyState, so
// sessions are independent and can run in parallel.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::config::Config;
use crate::debug_logger::{timestamp, DebugLogger, DecisionLogEntry};
use crate::game::{CollisionType, Game, StepOutcome};
use crate::policy::{Decision, Policy, PolicyState, Status, TickInput};
use crate::types::Direction;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The snake filled the whole board
    Cleared,
    Died(CollisionType),
    /// The policy had no move to offer (the snake has no body)
    NoMove,
    /// Stopped after `session.max_ticks` ticks
    TickLimit,
}

/// Summary of one finished session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub seed: u64,
    pub score: u32,
    pub ticks: u64,
    pub length: usize,
    pub outcome: SessionOutcome,
    /// How often each tier fired on completed ticks
    pub status_counts: HashMap<Status, u64>,
}

/// Autopilot with OOP-style API
/// Takes static configuration dependencies and plays sessions on demand
pub struct Bot {
    config: Config,
    policy: Policy,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot; opens the debug log if `config.debug.enabled`
    pub fn new(config: Config) -> Self {
        let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path);
        Self::with_logger(config, logger)
    }

    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        let policy = Policy::new(config.board.grid(), config.policy.clone());
        Bot {
            config,
            policy,
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Plays one session to completion from `seed`
    pub fn play(&self, seed: u64) -> SessionReport {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new(&self.config.board, &mut rng);
        let mut state = PolicyState::new(game.head().unwrap_or_default(), game.food(), game.score());
        let mut status_counts = HashMap::new();
        let mut ticks = 0u64;

        info!(
            "Game {} start: {}x{} board, food at {:?}",
            seed,
            self.config.board.cols,
            self.config.board.rows,
            game.food()
        );

        let outcome = loop {
            if game.is_cleared() {
                break SessionOutcome::Cleared;
            }
            if ticks >= self.config.session.max_ticks {
                break SessionOutcome::TickLimit;
            }

            let decision = match self.tick(&mut game, &mut state, &mut rng, seed, ticks) {
                Ok(decision) => decision,
                Err(outcome) => break outcome,
            };
            *status_counts.entry(decision.status).or_insert(0) += 1;
            ticks += 1;
        };

        info!(
            "Game {} over: {:?} after {} ticks (score: {}, length: {})",
            seed,
            outcome,
            ticks,
            game.score(),
            game.len()
        );

        SessionReport {
            seed,
            score: game.score(),
            ticks,
            length: game.len(),
            outcome,
            status_counts,
        }
    }

    /// Plays `session.games` sessions with consecutive seeds, in parallel
    pub fn play_many(&self) -> Vec<SessionReport> {
        let first = self.config.session.seed;
        (0..self.config.session.games as u64)
            .into_par_iter()
            .map(|i| self.play(first.wrapping_add(i)))
            .collect()
    }

    /// Runs one real tick: decide, log, apply.
    /// Returns the decision, or the outcome that ended the game.
    pub fn tick(
        &self,
        game: &mut Game,
        state: &mut PolicyState,
        rng: &mut StdRng,
        seed: u64,
        tick: u64,
    ) -> Result<Decision, SessionOutcome> {
        let body = game.body();
        let food = game.food();
        let score = game.score();
        let state_before = if self.logger.is_enabled() {
            Some(state.clone())
        } else {
            None
        };

        let input = TickInput {
            body: &body,
            food,
            score,
        };
        let decision = self
            .policy
            .decide(state, &input)
            .ok_or(SessionOutcome::NoMove)?;

        let direction = Direction::between(body[0], decision.next)
            .map(|d| d.as_str())
            .unwrap_or("none");
        debug!(
            "Game {} tick {}: {} -> {:?} ({})",
            seed, tick, direction, decision.next, decision.status
        );

        if let Some(state_before) = state_before {
            let grid = self.policy.grid();
            self.logger.log_decision(&DecisionLogEntry {
                seed,
                tick,
                cols: grid.cols,
                rows: grid.rows,
                body: body.clone(),
                food,
                score,
                state: state_before,
                chosen: decision.next,
                chosen_move: direction.to_string(),
                status: decision.status,
                timestamp: timestamp(),
            });
        }

        match game.step(decision.next, rng) {
            StepOutcome::Died(collision) => Err(SessionOutcome::Died(collision)),
            StepOutcome::Moved | StepOutcome::Ate => Ok(decision),
        }
    }
}
