//! Bounded, newline-delimited line reader.
//!
//! Lines longer than the limit are truncated and the rest of that line is
//! discarded. A truncated line is cut back to the last whole UTF-8
//! character. A trailing `\r` is removed and invalid UTF-8 is replaced.

use tokio::io::{self, AsyncBufReadExt, AsyncRead, BufReader};

use crate::domain::MAX_LINE_BYTES;

pub struct LineReader<R> {
    reader: BufReader<R>,
    max_bytes: usize,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_limit(inner, MAX_LINE_BYTES)
    }

    pub fn with_limit(inner: R, max_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(inner),
            max_bytes,
        }
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` once the peer closed the stream. A final line
    /// without a newline is still returned.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        let mut received = false;
        let mut truncated = false;

        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(received.then(|| finish(line, truncated)));
            }
            received = true;

            let newline = available.iter().position(|b| *b == b'\n');
            let chunk_end = newline.unwrap_or(available.len());
            let room = self.max_bytes.saturating_sub(line.len());
            if chunk_end > room {
                truncated = true;
            }
            line.extend_from_slice(&available[..chunk_end.min(room)]);

            match newline {
                Some(pos) => {
                    self.reader.consume(pos + 1);
                    return Ok(Some(finish(line, truncated)));
                }
                None => {
                    self.reader.consume(chunk_end);
                }
            }
        }
    }
}

fn finish(mut line: Vec<u8>, truncated: bool) -> String {
    if truncated {
        drop_split_char(&mut line);
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8_lossy(&line).into_owned()
}

/// Remove an incomplete multi-byte sequence left at the end by truncation.
fn drop_split_char(line: &mut Vec<u8>) {
    let floor = line.len().saturating_sub(4);
    let Some(lead) = (floor..line.len()).rfind(|&i| line[i] & 0xC0 != 0x80) else {
        return;
    };
    let width = match line[lead] {
        b if b & 0xE0 == 0xC0 => 2,
        b if b & 0xF0 == 0xE0 => 3,
        b if b & 0xF8 == 0xF0 => 4,
        _ => 1,
    };
    if line.len() - lead < width {
        line.truncate(lead);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_lines_and_strips_carriage_return() {
        // テスト項目: 改行区切りで行を読み取り、末尾の \r を取り除く
        // given (前提条件):
        let input: &[u8] = b"alice\r\nhello\n";
        let mut reader = LineReader::new(input);

        // when (操作):
        let first = reader.next_line().await.unwrap();
        let second = reader.next_line().await.unwrap();
        let end = reader.next_line().await.unwrap();

        // then (期待する結果):
        assert_eq!(first.as_deref(), Some("alice"));
        assert_eq!(second.as_deref(), Some("hello"));
        assert_eq!(end, None);
    }

    #[tokio::test]
    async fn test_truncates_long_line_and_discards_rest() {
        // テスト項目: 上限を超える行は切り詰められ、残りは次の行に持ち越されない
        // given (前提条件):
        let input: &[u8] = b"abcdefghij\nnext\n";
        let mut reader = LineReader::with_limit(input, 4);

        // when (操作):
        let first = reader.next_line().await.unwrap();
        let second = reader.next_line().await.unwrap();

        // then (期待する結果):
        assert_eq!(first.as_deref(), Some("abcd"));
        assert_eq!(second.as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn test_empty_line_and_unterminated_tail() {
        // テスト項目: 空行は空文字列として、改行のない最後の行もそのまま返る
        // given (前提条件):
        let input: &[u8] = b"\ntail";
        let mut reader = LineReader::new(input);

        // when (操作):
        let empty = reader.next_line().await.unwrap();
        let tail = reader.next_line().await.unwrap();
        let end = reader.next_line().await.unwrap();

        // then (期待する結果):
        assert_eq!(empty.as_deref(), Some(""));
        assert_eq!(tail.as_deref(), Some("tail"));
        assert_eq!(end, None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        // テスト項目: 不正な UTF-8 は置換文字に変換される
        // given (前提条件):
        let input: &[u8] = b"a\xffb\n";
        let mut reader = LineReader::new(input);

        // when (操作):
        let line = reader.next_line().await.unwrap();

        // then (期待する結果):
        assert_eq!(line.as_deref(), Some("a\u{fffd}b"));
    }

    #[tokio::test]
    async fn test_truncation_keeps_whole_hangul_characters() {
        // テスト項目: 切り詰めで多バイト文字が分断されても置換文字は残らない
        // given (前提条件): 43 文字 × 3 バイト = 129 バイト
        let input = format!("{}\n", "가".repeat(43));
        let mut reader = LineReader::with_limit(input.as_bytes(), 127);

        // when (操作):
        let line = reader.next_line().await.unwrap().unwrap();

        // then (期待する結果):
        assert!(!line.contains('\u{fffd}'));
        assert_eq!(line, "가".repeat(42));
    }

    #[tokio::test]
    async fn test_untruncated_invalid_tail_is_still_replaced() {
        // テスト項目: 上限内の行の不完全な末尾は削らずに置換文字にする
        // given (前提条件):
        let input: &[u8] = b"ok\xea\xb0\n";
        let mut reader = LineReader::new(input);

        // when (操作):
        let line = reader.next_line().await.unwrap();

        // then (期待する結果):
        assert_eq!(line.as_deref(), Some("ok\u{fffd}"));
    }
}
