//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `tcp`: TCP 接続ごとの送信キューと writer タスクを使った実装

pub mod tcp;

pub use tcp::{TcpMessagePusher, spawn_writer};
