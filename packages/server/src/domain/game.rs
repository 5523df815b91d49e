//! Number-guessing game (strikes and balls).
//!
//! The host picks a 3-digit answer with pairwise distinct digits; the other
//! members guess until someone scores three strikes.

use super::{ConnectionId, DisplayName};

/// Number of digits in an answer
pub const ANSWER_LEN: usize = 3;

/// Result of comparing a guess against the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    /// Digits matching in value and position
    pub strikes: usize,
    /// Digits present in the answer at another position
    pub balls: usize,
}

impl Score {
    pub fn is_solved(&self) -> bool {
        self.strikes == ANSWER_LEN
    }
}

/// Check that `input` is exactly three ASCII digits, pairwise distinct.
pub fn is_valid_number(input: &str) -> bool {
    let digits = input.as_bytes();
    if digits.len() != ANSWER_LEN || !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    digits[0] != digits[1] && digits[1] != digits[2] && digits[0] != digits[2]
}

/// Count strikes and balls of `guess` against `answer`.
///
/// Both inputs are expected to satisfy [`is_valid_number`].
pub fn evaluate_guess(guess: &str, answer: &str) -> Score {
    let answer = answer.as_bytes();
    guess
        .bytes()
        .zip(answer.iter())
        .fold(
            Score {
                strikes: 0,
                balls: 0,
            },
            |mut score, (g, a)| {
                if g == *a {
                    score.strikes += 1;
                } else if answer.contains(&g) {
                    score.balls += 1;
                }
                score
            },
        )
}

/// State of a running game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    host: ConnectionId,
    host_name: DisplayName,
    answer: Option<String>,
}

impl GameState {
    pub fn new(host: ConnectionId, host_name: DisplayName) -> Self {
        Self {
            host,
            host_name,
            answer: None,
        }
    }

    pub fn host(&self) -> ConnectionId {
        self.host
    }

    pub fn host_name(&self) -> &DisplayName {
        &self.host_name
    }

    /// The answer, once the host has submitted one
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.answer.is_none()
    }

    /// Store the host's answer if it is a valid number.
    ///
    /// Returns `false` and leaves the state untouched otherwise.
    pub fn submit_answer(&mut self, input: &str) -> bool {
        if !is_valid_number(input) {
            return false;
        }
        self.answer = Some(input.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_number() {
        // テスト項目: 3 桁かつ各桁が異なる数字のみ有効と判定される
        // given (前提条件):
        let valid = ["482", "012", "987"];
        let invalid = ["", "12", "1234", "112", "121", "211", "12a", "１２３"];

        // when (操作) / then (期待する結果):
        for input in valid {
            assert!(is_valid_number(input), "{input} should be valid");
        }
        for input in invalid {
            assert!(!is_valid_number(input), "{input} should be invalid");
        }
    }

    #[test]
    fn test_evaluate_guess_mixed() {
        // テスト項目: 正解 123 に対して 321 は 1 ストライク 2 ボール
        // given (前提条件):
        let answer = "123";

        // when (操作):
        let score = evaluate_guess("321", answer);

        // then (期待する結果):
        assert_eq!((score.strikes, score.balls), (1, 2));
        assert!(!score.is_solved());
    }

    #[test]
    fn test_evaluate_guess_exact_match() {
        // テスト項目: 正解と同じ推測は 3 ストライク 0 ボールで正解となる
        // given (前提条件):
        let answer = "482";

        // when (操作):
        let score = evaluate_guess("482", answer);

        // then (期待する結果):
        assert_eq!((score.strikes, score.balls), (3, 0));
        assert!(score.is_solved());
    }

    #[test]
    fn test_evaluate_guess_no_match() {
        // テスト項目: 共通の数字がない場合は 0 ストライク 0 ボール
        // given (前提条件):
        let answer = "123";

        // when (操作):
        let score = evaluate_guess("456", answer);

        // then (期待する結果):
        assert_eq!((score.strikes, score.balls), (0, 0));
    }

    #[test]
    fn test_submit_answer_rejects_invalid_input() {
        // テスト項目: 無効な正解は保存されず、有効な正解のみ保存される
        // given (前提条件):
        let mut game = GameState::new(ConnectionId::new(1), DisplayName::new("host").unwrap());

        // when (操作):
        let rejected = game.submit_answer("113");
        let still_waiting = game.is_awaiting_answer();
        let accepted = game.submit_answer("482");

        // then (期待する結果):
        assert!(!rejected);
        assert!(still_waiting);
        assert!(accepted);
        assert_eq!(game.answer(), Some("482"));
    }
}
