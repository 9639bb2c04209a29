//! 外部コマンドの実行: fork/exec → exec 結果確認 → `waitpid` → 状態復帰。
//!
//! - [`execute`]: 1 コマンドを子プロセスとして実行し、終了を待って [`ChildResult`] を返す
//! - 同時に存在する子は高々 1 つ。待機が終わるまで次のプロンプトは出ない
//! - プロセステーブルは持たない。`ChildResult` は待機 1 回で生成され、呼び出し側が消費する

use std::fs::File;
use std::io::{self, Read};

use crate::error::{Result, ShellError};
use crate::signal::SignalController;
use crate::spawn;
use crate::token::ArgVector;

/// 子プロセスの終了のしかた。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// `exit(code)` で終了した。
    Exited(i32),
    /// シグナルで終了した。引数はシグナル番号。
    Signaled(i32),
}

impl ChildStatus {
    /// `waitpid` が返した raw status を解釈する。
    fn from_raw(raw: libc::c_int) -> Self {
        if libc::WIFEXITED(raw) {
            ChildStatus::Exited(libc::WEXITSTATUS(raw))
        } else if libc::WIFSIGNALED(raw) {
            ChildStatus::Signaled(libc::WTERMSIG(raw))
        } else {
            ChildStatus::Exited(1)
        }
    }

    /// シェル慣習の終了コード（シグナル終了は 128 + シグナル番号）。
    pub fn code(&self) -> i32 {
        match *self {
            ChildStatus::Exited(code) => code,
            ChildStatus::Signaled(sig) => 128 + sig,
        }
    }

    pub fn success(&self) -> bool {
        *self == ChildStatus::Exited(0)
    }
}

/// 終了した子プロセスの結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildResult {
    pub pid: libc::pid_t,
    pub status: ChildStatus,
}

/// `argv` を外部コマンドとして実行し、終了まで待つ。
///
/// 処理の流れ:
/// 1. [`spawn::fork_exec`] で子を生成（親はここで RunningChild に遷移）
/// 2. ステータスパイプを読み、exec が成功したか確認
/// 3. `waitpid(pid)` でその子だけを待つ（`EINTR` は再試行）
/// 4. AwaitingInput に戻してから結果を返す
///
/// exec 失敗は子を回収したうえで [`ShellError::Exec`] として返す。
pub fn execute(argv: &ArgVector, signals: &mut SignalController) -> Result<ChildResult> {
    if argv.is_empty() {
        return Err(ShellError::EmptyCommand);
    }
    let args = argv.to_vec();
    let spawned = spawn::fork_exec(&args, signals)?;

    let exec_errno = read_exec_errno(File::from(spawned.status_pipe));
    let waited = wait_for(spawned.pid);
    signals.leave_child();

    let status = waited?;
    if let Some(errno) = exec_errno {
        return Err(ShellError::Exec {
            command: args[0].to_string_lossy().into_owned(),
            errno,
        });
    }

    match status {
        ChildStatus::Exited(0) => tracing::debug!(pid = spawned.pid, "child exited"),
        ChildStatus::Exited(code) => tracing::info!(
            pid = spawned.pid,
            code,
            command = ?args[0],
            "child exited with non-zero status"
        ),
        ChildStatus::Signaled(sig) => tracing::info!(
            pid = spawned.pid,
            signal = sig,
            code = status.code(),
            command = ?args[0],
            "child killed by signal"
        ),
    }

    Ok(ChildResult {
        pid: spawned.pid,
        status,
    })
}

/// ステータスパイプから exec 失敗時の errno を読む。EOF（exec 成功）なら `None`。
fn read_exec_errno(mut pipe: File) -> Option<i32> {
    let mut buf = [0u8; 4];
    match pipe.read_exact(&mut buf) {
        Ok(()) => Some(i32::from_ne_bytes(buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read exec status pipe");
            None
        }
    }
}

/// 指定 PID の子が終了するまで待つ。
fn wait_for(pid: libc::pid_t) -> Result<ChildStatus> {
    let mut raw: libc::c_int = 0;
    loop {
        let ret = unsafe { libc::waitpid(pid, &mut raw, 0) };
        if ret == pid {
            return Ok(ChildStatus::from_raw(raw));
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            continue;
        }
        tracing::warn!(pid, error = %err, "waitpid failed");
        return Err(ShellError::Wait(err));
    }
}
