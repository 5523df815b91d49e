//! TCP を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel` を管理
//! - クライアントへのテキスト送信（push_to）
//!
//! ## 設計ノート
//!
//! ソケットの書き込み側は writer タスク（`spawn_writer`）が所有します。
//! この実装は送信キューの sender だけを保持するため、ロック中に
//! ソケット I/O で待たされることはありません。
//!
//! - UI 層: 接続の受付、送信キューの生成、writer タスクの起動
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// TCP を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続中のクライアントと対応する送信キューのマップ
pub struct TcpMessagePusher {
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl TcpMessagePusher {
    /// 新しい TcpMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for TcpMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for TcpMessagePusher {
    async fn register_client(&self, handle: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(handle, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", handle);
    }

    async fn unregister_client(&self, handle: ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(&handle);
        tracing::debug!("Client '{}' unregistered from MessagePusher", handle);
    }

    async fn push_to(&self, handle: ConnectionId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(&handle) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::trace!("Pushed message to client '{}'", handle);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(handle))
        }
    }

    async fn unregister_all(&self) {
        let mut clients = self.clients.lock().await;
        let count = clients.len();
        clients.clear();
        tracing::debug!("{} clients unregistered from MessagePusher", count);
    }
}

/// 送信キューの内容をソケットに書き出す writer タスクを起動
///
/// キューの sender が全て drop されると、残りを書き出してから書き込み側を
/// shutdown する。
pub fn spawn_writer<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<String>) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = writer.write_all(text.as_bytes()).await {
                tracing::debug!("Failed to write to socket: {}", e);
                return;
            }
        }
        if let Err(e) = writer.shutdown().await {
            tracing::debug!("Failed to shut down socket: {}", e);
        }
    })
}
