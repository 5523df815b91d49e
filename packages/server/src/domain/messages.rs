//! Texts sent to connected clients.
//!
//! Every message ends with a newline so that line-oriented peers can split
//! the stream.

use super::{DisplayName, RENDER_CAPACITY, RoomId, RoomSummary, RoomTitle, Score};

pub const MENU: &str = "\n=== MENU ===\n\
1: 사용자 이름 설정\n\
2: 채팅방 입장\n\
3: 채팅방 개설\n\
4: 접속 종료\n\
0: 메뉴 재표시\n";

pub const SERVER_FULL: &str = "서버에 인원이 가득 찼습니다.\n";
pub const EMPTY_MENU: &str = "메뉴를 비워둘 수 없습니다.\n";
pub const UNKNOWN_COMMAND: &str = "잘못된 명령입니다.\n";

pub const RENAME_PROMPT: &str = "새로운 이름을 입력하세요.\n";
pub const RENAME_EMPTY: &str = "이름은 비워둘 수 없습니다. 다시 입력해주세요.\n";
pub const RENAME_DONE: &str = "이름이 성공적으로 변경되었습니다.\n";

pub const NO_ROOMS: &str = "개설된 채팅방이 없습니다.\n";
pub const JOIN_EMPTY: &str = "입장할 채팅방 번호를 입력하세요.\n";
pub const JOIN_NOT_A_NUMBER: &str = "유효한 숫자를 입력해주세요.\n";
pub const JOIN_ROOM_FULL: &str = "해당 채팅방은 인원이 가득 찼습니다.\n";
pub const JOIN_NO_SUCH_ROOM: &str = "존재하지 않는 채팅방입니다.\n";

pub const CREATE_TABLE_FULL: &str = "더 이상 채팅방을 개설할 수 없습니다.\n";
pub const CREATE_PROMPT: &str = "개설할 채팅방 이름을 입력하세요.\n";
pub const CREATE_EMPTY: &str = "채팅방 이름은 비워둘 수 없습니다.\n";

pub const ALONE: &str = "[NOTICE] 현재 채팅방에 혼자 있습니다.\n";

pub const GAME_ASK_ANSWER: &str = "[GAME] 호스트는 3자리 숫자를 입력하세요 (중복 없음):\n";
pub const GAME_INVALID_ANSWER: &str = "[GAME] 유효하지 않은 숫자입니다. 다시 입력하세요.\n";
pub const GAME_NOT_READY: &str = "[GAME] 호스트가 정답을 정하는 중입니다. 잠시 기다려주세요.\n";
pub const GAME_RETRY_GUESS: &str = "[GAME] 3자리 숫자를 입력하세요. (중복 없음)\n";
pub const GAME_HOST_LEFT: &str = "[GAME] 호스트가 나가 게임이 종료되었습니다.\n";

pub const POLL_ASK_COUNT: &str = "[POLL] 호스트는 항목개수를 입력하세요 (1 ~ 10)\n";
pub const POLL_INVALID_COUNT: &str = "[POLL] 유효한 숫자를 입력하세요 (1~10)\n";
pub const POLL_INVALID_CHOICE: &str = "[POLL] 올바른 번호를 입력하세요\n";
pub const POLL_VOTE_ACCEPTED: &str = "선택 완료!\n";
pub const POLL_HOST_LEFT: &str = "[POLL] 호스트가 나가 투표가 취소되었습니다.\n";
pub const POLL_LIST_HEADER: &str = "===== [POLL_LIST] =====\n";
pub const POLL_RESULT_HEADER: &str = "====== [POLL_RESULT] ======\n";

const ROOM_LIST_HEADER: &str = "\n채팅방 번호 입력 (되돌아가기: b)\n\n=== ChatRoom info ===\n";

/// Text aggregate with a fixed byte capacity.
///
/// Lines that would not fit are dropped instead of growing the text.
#[derive(Debug, Clone)]
pub struct BoundedText {
    text: String,
    capacity: usize,
}

impl BoundedText {
    pub fn new(header: &str, capacity: usize) -> Self {
        let mut text = String::with_capacity(capacity);
        if header.len() < capacity {
            text.push_str(header);
        }
        Self { text, capacity }
    }

    /// Append `line` if the result stays below the capacity.
    ///
    /// Returns whether the line was kept.
    pub fn push_line(&mut self, line: &str) -> bool {
        if self.text.len() + line.len() < self.capacity {
            self.text.push_str(line);
            true
        } else {
            false
        }
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

pub fn room_list(rooms: &[RoomSummary], max_room_users: usize) -> String {
    if rooms.is_empty() {
        return NO_ROOMS.to_string();
    }
    let mut list = BoundedText::new(ROOM_LIST_HEADER, RENDER_CAPACITY);
    for room in rooms {
        list.push_line(&format!(
            "{}: {} ({}/{})\n",
            room.id, room.title, room.members, max_room_users
        ));
    }
    list.into_string()
}

pub fn joined(title: &RoomTitle, id: RoomId) -> String {
    format!("채팅방 {} ({})에 입장했습니다.\n", title, id)
}

pub fn room_created(title: &RoomTitle) -> String {
    format!("채팅방 {}이 개설되었습니다.\n", title)
}

pub fn room_info(title: &RoomTitle, members: usize, mode: &str) -> String {
    let mut info = BoundedText::new(&format!("<<<<< {} >>>>>\n", title), RENDER_CAPACITY);
    info.push_line(&format!("참여인원: {}\n", members));
    info.push_line(&format!("모드: {}\n", mode));
    info.into_string()
}

pub fn member_quit(name: &DisplayName) -> String {
    format!("[NOTICE] {}님이 채팅방에서 나갔습니다.\n", name)
}

pub fn member_disconnected(name: &DisplayName) -> String {
    format!("[NOTICE] 사용자 {}님이 채팅방을 나갔습니다.\n", name)
}

pub fn chat_own(text: &str) -> String {
    format!("[ME] {}\n", text)
}

pub fn chat_from(name: &DisplayName, text: &str) -> String {
    format!("[{}] {}\n", name, text)
}

pub fn game_started(host: &DisplayName) -> String {
    format!(
        "====== 숫자 야구 게임이 시작되었습니다! ======\n===== HOST : {} =====\n",
        host
    )
}

pub fn guess_result(name: &DisplayName, guess: &str, score: Score) -> String {
    format!(
        "[{}] {}의 결과: {} 스트라이크, {} 볼\n",
        name, guess, score.strikes, score.balls
    )
}

pub fn game_won(name: &DisplayName) -> String {
    format!("[GAME] {}님이 정답을 맞췄습니다! 게임 종료.\n", name)
}

pub fn poll_ask_item(number: usize) -> String {
    format!("[POLL] 항목 {}을 입력하세요.\n", number)
}

pub fn poll_item_line(number: usize, label: &str) -> String {
    format!("{}. {}\n", number, label)
}

pub fn poll_tally_line(label: &str, votes: u32) -> String {
    format!("{} : {} 표\n", label, votes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_text_drops_lines_that_overflow() {
        // テスト項目: 容量を超える行は捨てられ、収まる行は追加される
        // given (前提条件):
        let mut text = BoundedText::new("head\n", 12);

        // when (操作):
        let too_long = text.push_line("0123456789\n");
        let fits = text.push_line("ok\n");

        // then (期待する結果):
        assert!(!too_long);
        assert!(fits);
        assert_eq!(text.into_string(), "head\nok\n");
    }

    #[test]
    fn test_room_list_renders_occupancy() {
        // テスト項目: ルーム一覧に番号・名前・人数が表示される
        // given (前提条件):
        let rooms = vec![
            RoomSummary {
                id: RoomId::new(0),
                title: RoomTitle::numbered(0),
                members: 2,
            },
            RoomSummary {
                id: RoomId::new(3),
                title: RoomTitle::new("Study").unwrap(),
                members: 0,
            },
        ];

        // when (操作):
        let list = room_list(&rooms, 10);

        // then (期待する結果):
        assert!(list.contains("=== ChatRoom info ===\n"));
        assert!(list.contains("0: Chatroom-0 (2/10)\n"));
        assert!(list.contains("3: Study (0/10)\n"));
    }

    #[test]
    fn test_room_list_without_rooms() {
        // テスト項目: ルームがない場合は専用のメッセージになる
        // given (前提条件):

        // when (操作):
        let list = room_list(&[], 10);

        // then (期待する結果):
        assert_eq!(list, NO_ROOMS);
    }

    #[test]
    fn test_room_info_lists_title_count_and_mode() {
        // テスト項目: ルーム情報にタイトル・人数・モードが含まれる
        // given (前提条件):
        let title = RoomTitle::numbered(1);

        // when (操作):
        let info = room_info(&title, 3, "Poll");

        // then (期待する結果):
        assert_eq!(info, "<<<<< Chatroom-1 >>>>>\n참여인원: 3\n모드: Poll\n");
    }
}
