//! Terminal output helpers.

use std::io::Write;

/// Connection banner printed once the socket is open
pub fn banner(server_port: u16, server_ip: &str, name: &str, connected_at: &str) -> String {
    format!(
        " <<<< Chat Client >>>>\n Server Port : {server_port} \n Server IP   : {server_ip} \n Chat Name   : {name} \n Server Time : {connected_at} \n"
    )
}

/// Print server output as-is
pub fn print_raw(bytes: &[u8]) {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes).ok();
    stdout.flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_connection_details() {
        // テスト項目: バナーに接続先・名前・接続時刻が含まれる
        // given (前提条件):
        let connected_at = "2025-01-01 09:00:00";

        // when (操作):
        let banner = banner(8080, "127.0.0.1", "alice", connected_at);

        // then (期待する結果):
        assert!(banner.starts_with(" <<<< Chat Client >>>>\n"));
        assert!(banner.contains(" Server Port : 8080 \n"));
        assert!(banner.contains(" Server IP   : 127.0.0.1 \n"));
        assert!(banner.contains(" Chat Name   : alice \n"));
        assert!(banner.contains(" Server Time : 2025-01-01 09:00:00 \n"));
    }
}
