//! MessagePusher trait 定義
//!
//! 接続中のクライアントへテキストを届けるためのインターフェース。
//! 具体的な実装（TCP の書き込みキュー）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// 1 接続分の送信キュー
///
/// 受信側は接続ごとの writer タスクが保持し、キューが閉じられると
/// 残りを書き出してからソケットを閉じる。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、送信の具体的な方法には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信キューを登録
    async fn register_client(&self, handle: ConnectionId, sender: PusherChannel);

    /// クライアントの送信キューを登録解除（キューが閉じ、接続が閉じられる）
    async fn unregister_client(&self, handle: ConnectionId);

    /// 特定のクライアントにテキストを送信
    async fn push_to(&self, handle: ConnectionId, content: &str) -> Result<(), MessagePushError>;

    /// 全クライアントの送信キューを登録解除（シャットダウン用）
    async fn unregister_all(&self);
}
