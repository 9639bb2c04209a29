//! 1 コマンド行をビルトインか外部コマンドに振り分ける。
//!
//! - 空の引数列 → 何もしない（[`CommandOutcome::Continue`]）
//! - 先頭トークンが [`builtins::BUILTINS`] にあればプロセス内で実行
//! - それ以外は [`executor::execute`] で子プロセスとして実行
//!
//! 外部コマンドの exec/fork 失敗は [`CommandOutcome::Failed`] として返すが、
//! 子の非ゼロ終了やシグナル終了はシェルの失敗ではないので `Continue` になる。

use crate::builtins;
use crate::error::ShellError;
use crate::executor;
use crate::signal::SignalController;
use crate::token::ArgVector;

/// 1 コマンド行のディスパッチ結果。
#[derive(Debug)]
pub enum CommandOutcome {
    /// 次の行へ進む。
    Continue,
    /// 読み取りループを終了する（`exit`）。
    Terminate,
    /// 失敗を報告して次の行へ進む。
    Failed(ShellError),
}

/// コマンドディスパッチャ。SIGINT 状態機械を所有する。
pub struct Dispatcher {
    signals: SignalController,
}

impl Dispatcher {
    pub fn new(signals: SignalController) -> Self {
        Self { signals }
    }

    pub fn dispatch(&mut self, argv: &ArgVector) -> CommandOutcome {
        let name = match argv.command() {
            Some(name) => name,
            None => return CommandOutcome::Continue,
        };

        if let Some(handler) = builtins::lookup(name) {
            let args = argv.to_vec();
            return handler(&args).unwrap_or_else(CommandOutcome::Failed);
        }

        match executor::execute(argv, &mut self.signals) {
            Ok(_) => CommandOutcome::Continue,
            Err(e) => {
                tracing::info!(
                    status = e.exit_status(),
                    command = ?name,
                    "external command failed"
                );
                CommandOutcome::Failed(e)
            }
        }
    }
}
