//! Poll (voting) state machine.
//!
//! Stages only move forward: the host declares how many items there are,
//! then names each item, then every member votes once. The room returns to
//! chat mode when the last current member has voted.

use std::collections::HashMap;

use super::{
    ConnectionId, MAX_POLL_ITEMS, RENDER_CAPACITY,
    messages::{self, BoundedText},
};

/// Parse a whole line as a decimal integer, ignoring surrounding whitespace.
///
/// Trailing garbage (`"3x"`) is rejected.
pub fn parse_valid_int(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// Read the leading integer of a line the way a ballot is read.
///
/// Leading whitespace and a sign are accepted, parsing stops at the first
/// non-digit, and a line without digits reads as 0 (`"2abc"` is 2).
pub fn parse_leading_int(input: &str) -> i64 {
    let rest = input.trim_start();
    let (negative, digits) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, push_digit);
    if negative { -value } else { value }
}

fn push_digit(acc: i64, digit: u8) -> i64 {
    let shifted = acc.saturating_mul(10);
    shifted.saturating_add(i64::from(digit - b'0'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStage {
    CollectingCount,
    CollectingItems,
    Voting,
}

/// Progress after the host supplied an item label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemProgress {
    /// More labels are needed; carries the 1-based number of the next one
    Next(usize),
    /// All labels are in and voting has begun
    Ready,
}

/// Outcome of a vote attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Accepted,
    AlreadyVoted,
    InvalidChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    host: ConnectionId,
    stage: PollStage,
    declared: usize,
    items: Vec<String>,
    tally: Vec<u32>,
    ballots: HashMap<ConnectionId, usize>,
}

impl PollState {
    pub fn new(host: ConnectionId) -> Self {
        Self {
            host,
            stage: PollStage::CollectingCount,
            declared: 0,
            items: Vec::new(),
            tally: Vec::new(),
            ballots: HashMap::new(),
        }
    }

    pub fn host(&self) -> ConnectionId {
        self.host
    }

    pub fn stage(&self) -> PollStage {
        self.stage
    }

    pub fn declared_count(&self) -> usize {
        self.declared
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn tally(&self) -> &[u32] {
        &self.tally
    }

    /// Accept the number of items if it lies in `1..=MAX_POLL_ITEMS`.
    ///
    /// Returns the declared count, or `None` when the input is rejected.
    pub fn declare_count(&mut self, input: &str) -> Option<usize> {
        if self.stage != PollStage::CollectingCount {
            return None;
        }
        let count = parse_valid_int(input)?;
        if count < 1 || count > MAX_POLL_ITEMS as i64 {
            return None;
        }
        let count = count as usize;
        self.declared = count;
        self.items = Vec::with_capacity(count);
        self.stage = PollStage::CollectingItems;
        Some(count)
    }

    /// Store the next item label.
    ///
    /// Once every declared item is named the poll moves to voting with every
    /// ballot cleared.
    pub fn push_item(&mut self, label: &str) -> ItemProgress {
        self.items.push(label.to_string());
        if self.items.len() < self.declared {
            return ItemProgress::Next(self.items.len() + 1);
        }
        self.tally = vec![0; self.declared];
        self.ballots.clear();
        self.stage = PollStage::Voting;
        ItemProgress::Ready
    }

    pub fn has_voted(&self, voter: ConnectionId) -> bool {
        self.ballots.contains_key(&voter)
    }

    /// Record `voter`'s choice; `input` starts with the 1-based item number.
    pub fn cast_vote(&mut self, voter: ConnectionId, input: &str) -> VoteOutcome {
        if self.has_voted(voter) {
            return VoteOutcome::AlreadyVoted;
        }
        let choice = match parse_leading_int(input) {
            n if n >= 1 && n <= self.declared as i64 => (n - 1) as usize,
            _ => return VoteOutcome::InvalidChoice,
        };
        self.tally[choice] += 1;
        self.ballots.insert(voter, choice);
        VoteOutcome::Accepted
    }

    /// Whether every one of `members` has a recorded vote
    pub fn all_voted(&self, mut members: impl Iterator<Item = ConnectionId>) -> bool {
        members.all(|member| self.ballots.contains_key(&member))
    }

    /// Numbered item list sent when voting begins
    pub fn render_items(&self) -> String {
        let mut list = BoundedText::new(messages::POLL_LIST_HEADER, RENDER_CAPACITY);
        for (index, label) in self.items.iter().enumerate() {
            list.push_line(&messages::poll_item_line(index + 1, label));
        }
        list.into_string()
    }

    /// Final tally sent when the poll ends
    pub fn render_result(&self) -> String {
        let mut result = BoundedText::new(messages::POLL_RESULT_HEADER, RENDER_CAPACITY);
        for (label, votes) in self.items.iter().zip(self.tally.iter()) {
            result.push_line(&messages::poll_tally_line(label, *votes));
        }
        result.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    fn voting_poll(labels: &[&str]) -> PollState {
        let mut poll = PollState::new(id(1));
        poll.declare_count(&labels.len().to_string()).unwrap();
        for label in labels {
            poll.push_item(label);
        }
        poll
    }

    #[test]
    fn test_parse_valid_int() {
        // テスト項目: 行全体が整数の場合のみ数値として解釈される
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(parse_valid_int("3"), Some(3));
        assert_eq!(parse_valid_int(" -2 "), Some(-2));
        assert_eq!(parse_valid_int("3x"), None);
        assert_eq!(parse_valid_int(""), None);
    }

    #[test]
    fn test_parse_leading_int() {
        // テスト項目: 投票の番号は先頭の数字だけが読まれ、数字がなければ 0 になる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(parse_leading_int("2abc"), 2);
        assert_eq!(parse_leading_int("  +1 "), 1);
        assert_eq!(parse_leading_int("-3"), -3);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int(""), 0);
    }

    #[test]
    fn test_declare_count_boundaries() {
        // テスト項目: 項目数は 1 と 10 を受け付け、0 と 11 は拒否する
        // given (前提条件):
        let fresh = || PollState::new(id(1));

        // when (操作) / then (期待する結果):
        assert_eq!(fresh().declare_count("0"), None);
        assert_eq!(fresh().declare_count("11"), None);
        assert_eq!(fresh().declare_count("abc"), None);
        assert_eq!(fresh().declare_count("1"), Some(1));
        assert_eq!(fresh().declare_count("10"), Some(10));
    }

    #[test]
    fn test_rejected_count_keeps_stage() {
        // テスト項目: 拒否された項目数では段階が進まない
        // given (前提条件):
        let mut poll = PollState::new(id(1));

        // when (操作):
        poll.declare_count("11");

        // then (期待する結果):
        assert_eq!(poll.stage(), PollStage::CollectingCount);
        assert_eq!(poll.declared_count(), 0);
    }

    #[test]
    fn test_push_item_advances_to_voting() {
        // テスト項目: 宣言した数の項目が揃うと投票段階に進む
        // given (前提条件):
        let mut poll = PollState::new(id(1));
        poll.declare_count("2").unwrap();

        // when (操作):
        let first = poll.push_item("Pizza");
        let second = poll.push_item("Burger");

        // then (期待する結果):
        assert_eq!(first, ItemProgress::Next(2));
        assert_eq!(second, ItemProgress::Ready);
        assert_eq!(poll.stage(), PollStage::Voting);
        assert_eq!(poll.items(), ["Pizza".to_string(), "Burger".to_string()]);
    }

    #[test]
    fn test_cast_vote_counts_once_per_member() {
        // テスト項目: 1 人 1 票のみ集計され、範囲外の番号は拒否される
        // given (前提条件):
        let mut poll = voting_poll(&["Pizza", "Burger"]);

        // when (操作):
        let invalid = poll.cast_vote(id(2), "3");
        let accepted = poll.cast_vote(id(2), "1");
        let again = poll.cast_vote(id(2), "2");

        // then (期待する結果):
        assert_eq!(invalid, VoteOutcome::InvalidChoice);
        assert_eq!(accepted, VoteOutcome::Accepted);
        assert_eq!(again, VoteOutcome::AlreadyVoted);
        assert_eq!(poll.tally(), [1, 0]);
    }

    #[test]
    fn test_cast_vote_reads_leading_digits() {
        // テスト項目: 数字の後ろに文字が続く投票は先頭の番号として集計され、数字のない投票は拒否される
        // given (前提条件):
        let mut poll = voting_poll(&["Pizza", "Burger"]);

        // when (操作):
        let wordy = poll.cast_vote(id(2), "2abc");
        let no_digits = poll.cast_vote(id(3), "pizza");

        // then (期待する結果):
        assert_eq!(wordy, VoteOutcome::Accepted);
        assert_eq!(no_digits, VoteOutcome::InvalidChoice);
        assert_eq!(poll.tally(), [0, 1]);
    }

    #[test]
    fn test_all_voted_tracks_current_members() {
        // テスト項目: 現在のメンバー全員が投票した時のみ完了と判定される
        // given (前提条件):
        let mut poll = voting_poll(&["Pizza", "Burger"]);
        poll.cast_vote(id(1), "1");

        // when (操作):
        let partial = poll.all_voted([id(1), id(2)].into_iter());
        poll.cast_vote(id(2), "2");
        let complete = poll.all_voted([id(1), id(2)].into_iter());

        // then (期待する結果):
        assert!(!partial);
        assert!(complete);
    }

    #[test]
    fn test_render_result_shows_tally() {
        // テスト項目: 結果に各項目の得票数が表示される
        // given (前提条件):
        let mut poll = voting_poll(&["Pizza", "Burger"]);
        poll.cast_vote(id(1), "1");
        poll.cast_vote(id(2), "2");

        // when (操作):
        let result = poll.render_result();
        let items = poll.render_items();

        // then (期待する結果):
        assert!(result.starts_with(messages::POLL_RESULT_HEADER));
        assert!(result.contains("Pizza : 1 표\n"));
        assert!(result.contains("Burger : 1 표\n"));
        assert!(items.contains("1. Pizza\n"));
        assert!(items.contains("2. Burger\n"));
    }
}
