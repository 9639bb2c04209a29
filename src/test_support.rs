//! テスト用の共有ヘルパー。
//!
//! カレントディレクトリ、環境変数、SIGINT の処置、fork はプロセス全体の状態なので、
//! これらに触れるテストは [`lock`] で直列化する。

use std::sync::{Mutex, MutexGuard};

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

/// グローバル状態のロックを取る。他のテストの panic で毒化していても続行する。
pub fn lock() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
