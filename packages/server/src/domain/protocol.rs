//! Per-room protocol engine.
//!
//! A room reacts to each line from one of its members by changing its own
//! state and producing the messages to deliver. Delivery itself is left to
//! the caller, so everything here is synchronous and runs under the room
//! lock.
//!
//! Priority for each line: `quit`, `info`, `game` (chat mode only), game
//! handling, `poll` (chat mode only), poll handling, plain chat.

use super::{
    ConnectionId, GameState, ItemProgress, Member, PollStage, PollState, Room, RoomMode,
    VoteOutcome, evaluate_guess, is_valid_number, messages,
};

/// A message addressed to one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub text: String,
}

/// Everything a room produced in response to one event
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reaction {
    /// Messages in delivery order
    pub outbound: Vec<Outbound>,
    /// Set when the sender left the room
    pub departed: Option<Member>,
}

impl Reaction {
    fn reply(&mut self, to: ConnectionId, text: impl Into<String>) {
        self.outbound.push(Outbound {
            to,
            text: text.into(),
        });
    }

    fn broadcast<I>(&mut self, targets: I, text: &str)
    where
        I: IntoIterator<Item = ConnectionId>,
    {
        for to in targets {
            self.reply(to, text);
        }
    }

    /// Texts addressed to `to`, in order
    pub fn texts_for(&self, to: ConnectionId) -> Vec<&str> {
        self.outbound
            .iter()
            .filter(|o| o.to == to)
            .map(|o| o.text.as_str())
            .collect()
    }
}

/// Why a member is being removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Departure {
    Quit,
    Disconnected,
}

impl Room {
    /// Apply one line sent by `sender`
    ///
    /// Lines from connections that are not members are ignored.
    pub fn handle_line(&mut self, sender: ConnectionId, line: &str) -> Reaction {
        let mut reaction = Reaction::default();
        let Some(member) = self.members.get(sender).cloned() else {
            tracing::warn!("[{}] line from non-member {}", self.title, sender);
            return reaction;
        };
        tracing::info!("[{}] {}의 메시지 : {}", self.title, member.name, line);

        if line == "quit" {
            tracing::info!("[{}] {}가 채팅방에서 나감", self.title, member.name);
            self.remove_member(sender, Departure::Quit, &mut reaction);
            reaction.reply(sender, messages::MENU);
            return reaction;
        }

        if line == "info" {
            reaction.reply(
                sender,
                messages::room_info(&self.title, self.members.len(), self.mode.label()),
            );
            tracing::info!("[{}] {} 채팅방 정보 조회.", self.title, member.name);
            return reaction;
        }

        if line == "game" && self.mode == RoomMode::Chat {
            self.mode = RoomMode::Game(GameState::new(sender, member.name.clone()));
            reaction.reply(sender, messages::GAME_ASK_ANSWER);
            tracing::info!(
                "[GAME-{}] 숫자 야구 게임 호스트: {}",
                self.title,
                member.name
            );
            return reaction;
        }

        if matches!(self.mode, RoomMode::Game(_)) {
            self.handle_game_line(&member, line, &mut reaction);
            return reaction;
        }

        if line == "poll" && self.mode == RoomMode::Chat {
            self.mode = RoomMode::Poll(PollState::new(sender));
            reaction.reply(sender, messages::POLL_ASK_COUNT);
            tracing::info!(
                "[POLL-{}] 사용자 {} - 투표 시작 요청",
                self.title,
                member.name
            );
            return reaction;
        }

        let in_poll = matches!(self.mode, RoomMode::Poll(_));
        if in_poll && self.handle_poll_line(&member, line, &mut reaction) {
            return reaction;
        }

        self.handle_chat_line(&member, line, &mut reaction);
        reaction
    }

    /// Remove a member whose connection dropped
    ///
    /// Returns an empty reaction if `handle` is not a member.
    pub fn disconnect(&mut self, handle: ConnectionId) -> Reaction {
        let mut reaction = Reaction::default();
        self.remove_member(handle, Departure::Disconnected, &mut reaction);
        reaction
    }

    fn handle_game_line(&mut self, member: &Member, line: &str, reaction: &mut Reaction) {
        let RoomMode::Game(game) = &mut self.mode else {
            return;
        };
        let sender = member.handle;

        if game.is_awaiting_answer() {
            if sender != game.host() {
                reaction.reply(sender, messages::GAME_NOT_READY);
            } else if game.submit_answer(line) {
                tracing::info!("[GAME-{}] 숫자 야구 정답: {}", self.title, line);
                let banner = messages::game_started(game.host_name());
                reaction.broadcast(self.members.handles(), &banner);
            } else {
                reaction.reply(sender, messages::GAME_INVALID_ANSWER);
            }
            return;
        }

        // The host cannot guess their own answer.
        if sender == game.host() {
            return;
        }
        let Some(answer) = game.answer() else {
            return;
        };
        if !is_valid_number(line) {
            reaction.reply(sender, messages::GAME_RETRY_GUESS);
            return;
        }

        let score = evaluate_guess(line, answer);
        tracing::info!(
            "[GAME-{}] {} -> {}의 결과: {} 스트라이크, {} 볼",
            self.title,
            member.name,
            line,
            score.strikes,
            score.balls
        );
        let handles = self.members.handles();
        reaction.broadcast(
            handles.iter().copied(),
            &messages::guess_result(&member.name, line, score),
        );

        if score.is_solved() {
            reaction.broadcast(handles, &messages::game_won(&member.name));
            self.reset_to_chat();
            tracing::info!("[GAME-{}] {}님 정답 게임 종료.", self.title, member.name);
        }
    }

    /// Returns `false` when the line is not part of the poll and should be
    /// treated as chat.
    fn handle_poll_line(&mut self, member: &Member, line: &str, reaction: &mut Reaction) -> bool {
        let RoomMode::Poll(poll) = &mut self.mode else {
            return false;
        };
        let sender = member.handle;

        match poll.stage() {
            PollStage::CollectingCount if sender == poll.host() => {
                match poll.declare_count(line) {
                    Some(_) => reaction.reply(sender, messages::poll_ask_item(1)),
                    None => reaction.reply(sender, messages::POLL_INVALID_COUNT),
                }
                true
            }
            PollStage::CollectingItems if sender == poll.host() => {
                match poll.push_item(line) {
                    ItemProgress::Next(number) => {
                        reaction.reply(sender, messages::poll_ask_item(number))
                    }
                    ItemProgress::Ready => {
                        tracing::info!("[POLL-{}] 투표 시작", self.title);
                        let list = poll.render_items();
                        reaction.broadcast(self.members.handles(), &list);
                    }
                }
                true
            }
            PollStage::CollectingCount | PollStage::CollectingItems => false,
            PollStage::Voting => {
                match poll.cast_vote(sender, line) {
                    VoteOutcome::AlreadyVoted => {}
                    VoteOutcome::InvalidChoice => {
                        reaction.reply(sender, messages::POLL_INVALID_CHOICE)
                    }
                    VoteOutcome::Accepted => {
                        reaction.reply(sender, messages::POLL_VOTE_ACCEPTED);
                        self.finish_poll_if_complete(reaction);
                    }
                }
                true
            }
        }
    }

    /// Broadcast the tally and return to chat once every current member voted
    fn finish_poll_if_complete(&mut self, reaction: &mut Reaction) {
        let RoomMode::Poll(poll) = &self.mode else {
            return;
        };
        if poll.stage() != PollStage::Voting || self.members.is_empty() {
            return;
        }
        if !poll.all_voted(self.members.iter().map(|m| m.handle)) {
            return;
        }

        let result = poll.render_result();
        reaction.broadcast(self.members.handles(), &result);
        self.reset_to_chat();
        tracing::info!(
            "[POLL-{}] 모든 사용자가 투표를 완료했습니다. 투표 종료",
            self.title
        );
    }

    fn handle_chat_line(&mut self, member: &Member, line: &str, reaction: &mut Reaction) {
        match self.members.len() {
            0 => {
                tracing::warn!("[{}] chat line while the room has no members", self.title);
            }
            1 => reaction.reply(member.handle, messages::ALONE),
            _ => {
                let own = messages::chat_own(line);
                let other = messages::chat_from(&member.name, line);
                for target in self.members.handles() {
                    if target == member.handle {
                        reaction.reply(target, own.as_str());
                    } else {
                        reaction.reply(target, other.as_str());
                    }
                }
            }
        }
    }

    fn remove_member(
        &mut self,
        handle: ConnectionId,
        departure: Departure,
        reaction: &mut Reaction,
    ) {
        let Some(member) = self.members.remove(handle) else {
            tracing::warn!("[{}] {} is not a member", self.title, handle);
            return;
        };

        let notice = match departure {
            Departure::Quit => messages::member_quit(&member.name),
            Departure::Disconnected => messages::member_disconnected(&member.name),
        };
        reaction.broadcast(self.members.handles(), &notice);

        let host_left = match &self.mode {
            RoomMode::Game(game) if game.host() == handle => Some(messages::GAME_HOST_LEFT),
            RoomMode::Poll(poll) if poll.host() == handle && poll.stage() != PollStage::Voting => {
                Some(messages::POLL_HOST_LEFT)
            }
            _ => None,
        };
        if let Some(host_notice) = host_left {
            tracing::info!(
                "[{}] 호스트 {} 퇴장, {} 모드 종료",
                self.title,
                member.name,
                self.mode.label()
            );
            self.reset_to_chat();
            reaction.broadcast(self.members.handles(), host_notice);
        }

        if self.members.is_empty() {
            self.reset_to_chat();
        } else {
            self.finish_poll_if_complete(reaction);
        }

        reaction.departed = Some(member);
    }
}
