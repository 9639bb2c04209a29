//! シェル全体で使うエラー型。
//!
//! 分類:
//! - 資源枯渇（[`ShellError::ResourceExhausted`]）: 行バッファの拡張失敗。致命的でプロセスを終了する。
//! - ユーザー入力エラー（引数不足、存在しないパス、実行できないコマンド）: 報告してループ継続。
//! - 子プロセス生成失敗（[`ShellError::Fork`]）: 報告してループ継続。
//!
//! 子プロセスの非ゼロ終了やシグナル終了はエラーではなく
//! [`ChildStatus`](crate::executor::ChildStatus) として観測される。

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// バッファ拡張のためのメモリ確保に失敗した。
    #[error("out of memory while growing {what}")]
    ResourceExhausted { what: &'static str },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{command}: missing argument (usage: {usage})")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("cd: {}: {source}", .path.display())]
    ChangeDir { path: PathBuf, source: io::Error },

    /// 空、`=` を含む、または NUL を含む変数名・値。
    #[error("{name}: invalid environment variable")]
    InvalidVariable { name: String },

    #[error("empty command")]
    EmptyCommand,

    #[error("fork failed: {0}")]
    Fork(io::Error),

    /// `execvp` が失敗した。`errno` は子プロセスからステータスパイプ経由で受け取った値。
    #[error("{command}: {}", exec_reason(.errno))]
    Exec { command: String, errno: i32 },

    #[error("waitpid failed: {0}")]
    Wait(io::Error),

    #[error("{}: {source}", .path.display())]
    Script { path: PathBuf, source: io::Error },
}

fn exec_reason(errno: &i32) -> String {
    match *errno {
        libc::ENOENT => "command not found".to_string(),
        libc::EACCES => "permission denied".to_string(),
        _ => io::Error::from_raw_os_error(*errno).to_string(),
    }
}

impl ShellError {
    /// 致命的エラーか。`true` ならシェルは診断を出して終了しなければならない。
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::ResourceExhausted { .. })
    }

    /// エラーに対応する終了ステータス。
    /// 127 = command not found, 126 = permission denied, 1 = その他。
    pub fn exit_status(&self) -> i32 {
        match self {
            ShellError::Exec { errno, .. } => match *errno {
                libc::ENOENT => 127,
                libc::EACCES => 126,
                _ => 1,
            },
            _ => 1,
        }
    }
}
