use serde::{Deserialize, Serialize};

use super::roller::Roller;
use super::types::{GameError, MoveOutcome, PlayerId, SessionId};

pub const CODE_LENGTH: usize = 4;

pub type Code = [u8; CODE_LENGTH];
pub type Guess = [i64; CODE_LENGTH];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub guess: Guess,
    pub cows: u8,
    pub bulls: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MastermindSession {
    session_id: SessionId,
    player: Option<PlayerId>,
    target: Code,
    guesses: Vec<GuessRecord>,
    done: bool,
    move_counter: u32,
}

impl MastermindSession {
    #[tracing::instrument(skip(roller))]
    pub fn new(player: Option<PlayerId>, roller: &mut impl Roller) -> Self {
        let target = draw_target(roller);
        let session = Self {
            session_id: SessionId::new(),
            player,
            target,
            guesses: Vec::new(),
            done: false,
            move_counter: 0,
        };
        tracing::debug!(session_id = %session.session_id, "Mastermind target drawn.");
        session
    }

    pub fn get_id(&self) -> SessionId {
        self.session_id
    }

    pub fn get_player(&self) -> Option<&PlayerId> {
        self.player.as_ref()
    }

    pub fn get_target(&self) -> &Code {
        &self.target
    }

    pub fn get_guesses(&self) -> &[GuessRecord] {
        &self.guesses
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn get_move_counter(&self) -> u32 {
        self.move_counter
    }

    #[tracing::instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn apply_move(&mut self, guess: Guess) -> MoveOutcome {
        if self.done {
            return MoveOutcome::Rejected {
                reason: GameError::GameFinished,
            };
        }

        let (cows, bulls) = score_guess(&self.target, &guess);
        self.guesses.push(GuessRecord { guess, cows, bulls });
        self.move_counter += 1;

        if usize::from(bulls) == CODE_LENGTH {
            self.done = true;
            tracing::info!(moves = self.move_counter, "Code broken.");
            return MoveOutcome::Won {
                winner: self.player.clone(),
                moves: self.move_counter,
            };
        }
        MoveOutcome::Continue
    }
}

/// Draws digits until `CODE_LENGTH` distinct ones are collected.
fn draw_target(roller: &mut impl Roller) -> Code {
    let mut target = [0; CODE_LENGTH];
    let mut filled = 0;
    while filled < CODE_LENGTH {
        let digit = roller.roll_digit();
        if !target[..filled].contains(&digit) {
            target[filled] = digit;
            filled += 1;
        }
    }
    target
}

/// Returns `(cows, bulls)`.
///
/// Cows are counted by membership: every leftover guess value found anywhere in
/// the leftover target counts, even if another guess value already matched the
/// same target digit.
pub fn score_guess(target: &Code, guess: &Guess) -> (u8, u8) {
    let (bulls, leftovers): (Vec<_>, Vec<_>) = target
        .iter()
        .zip(guess)
        .partition(|&(wanted, given)| i64::from(*wanted) == *given);

    let remaining_target: Vec<i64> = leftovers
        .iter()
        .map(|&(wanted, _)| i64::from(*wanted))
        .collect();
    let cows = leftovers
        .iter()
        .filter(|&&(_, given)| remaining_target.contains(given))
        .count();

    (cows as u8, bulls.len() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedRoller(VecDeque<u8>);

    impl Roller for ScriptedRoller {
        fn roll_digit(&mut self) -> u8 {
            self.0.pop_front().expect("script ran out of digits")
        }
    }

    fn scripted(digits: &[u8]) -> ScriptedRoller {
        ScriptedRoller(digits.iter().copied().collect())
    }

    fn setup_game(target: &[u8]) -> MastermindSession {
        MastermindSession::new(Some(PlayerId::new("solver")), &mut scripted(target))
    }

    #[test]
    fn test_new_game_draws_distinct_digits() {
        let game = setup_game(&[3, 3, 5, 1, 5, 9]);

        assert_eq!(game.get_target(), &[3, 5, 1, 9]);
        assert!(game.get_guesses().is_empty());
        assert_eq!(game.get_move_counter(), 0);
        assert!(!game.is_done());
    }

    #[test]
    fn test_random_targets_are_valid_codes() {
        let mut roller = crate::game::roller::ThreadRngRoller::new();
        for _ in 0..50 {
            let game = MastermindSession::new(None, &mut roller);
            let target = game.get_target();
            assert!(target.iter().all(|digit| (1..=9).contains(digit)));
            for i in 0..CODE_LENGTH {
                assert!(!target[i + 1..].contains(&target[i]));
            }
        }
    }

    #[test]
    fn test_exact_guess_breaks_the_code() {
        let mut game = setup_game(&[1, 2, 3, 4]);

        let outcome = game.apply_move([1, 2, 3, 4]);

        assert_eq!(
            outcome,
            MoveOutcome::Won {
                winner: Some(PlayerId::new("solver")),
                moves: 1
            }
        );
        assert!(game.is_done());
        assert_eq!(
            game.get_guesses(),
            &[GuessRecord {
                guess: [1, 2, 3, 4],
                cows: 0,
                bulls: 4
            }]
        );
    }

    #[test]
    fn test_guesses_accumulate_in_order() {
        let mut game = setup_game(&[1, 2, 3, 4]);

        assert_eq!(game.apply_move([4, 3, 2, 1]), MoveOutcome::Continue);
        assert_eq!(game.apply_move([1, 2, 7, 8]), MoveOutcome::Continue);
        assert_eq!(game.apply_move([9, 9, 9, 9]), MoveOutcome::Continue);

        let feedback: Vec<(u8, u8)> = game
            .get_guesses()
            .iter()
            .map(|record| (record.cows, record.bulls))
            .collect();
        assert_eq!(feedback, vec![(4, 0), (0, 2), (0, 0)]);
        assert_eq!(game.get_move_counter(), 3);
        assert!(!game.is_done());
    }

    #[test]
    fn test_cows_are_counted_by_membership() {
        assert_eq!(score_guess(&[1, 2, 3, 4], &[5, 1, 1, 6]), (2, 0));
        assert_eq!(score_guess(&[1, 2, 3, 4], &[1, 1, 1, 1]), (0, 1));
    }

    #[test]
    fn test_out_of_range_values_score_nothing() {
        assert_eq!(score_guess(&[1, 2, 3, 4], &[-1, 0, 10, 260]), (0, 0));
    }

    #[test]
    fn test_finished_game_rejects_guesses() {
        let mut game = setup_game(&[1, 2, 3, 4]);
        game.apply_move([1, 2, 3, 4]);
        let before = game.clone();

        let outcome = game.apply_move([1, 2, 3, 4]);

        assert_eq!(
            outcome,
            MoveOutcome::Rejected {
                reason: GameError::GameFinished
            }
        );
        assert_eq!(game, before);
    }
}
