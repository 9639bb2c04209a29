//! `fork()` + `execvp()` の安全な Rust ラッパー。
//!
//! 子プロセスの生成と exec までを担当する。待機とステータス解釈は
//! [`executor`](crate::executor) が行う。
//!
//! ## 構成
//!
//! | 型 | 役割 |
//! |-----|------|
//! | [`CStringVec`] | argv 用の NULL 終端ポインタ配列 |
//! | [`Spawned`] | 生成した子の PID と exec 結果通知用パイプの読み端 |
//! | [`fork_exec`] | 上記を組み合わせて fork/exec する公開関数 |
//!
//! ## exec 失敗の通知
//!
//! close-on-exec のパイプを作ってから fork する。exec が成功すれば書き端は
//! カーネルが閉じ、親は EOF を読む。失敗した場合、子は `errno` を書き込んで
//! `_exit(127)` する。子が呼び出し元のスタックへ戻ることはない。

use std::ffi::{CString, OsStr};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;

use crate::error::{Result, ShellError};
use crate::signal::{self, InterruptBlock, SignalController};

/// exec 失敗時の子の終了ステータス。
const EXEC_FAILED_STATUS: libc::c_int = 127;

// ── CStringVec ────────────────────────────────────────────────────

/// argv 用の CString ベクタ。NULL 終端のポインタ配列を構築する。
///
/// fork 後の子でヒープ確保をしないよう、必ず fork 前に構築する。
pub struct CStringVec {
    _strings: Vec<CString>,
    ptrs: Vec<*const libc::c_char>,
}

impl CStringVec {
    /// 引数リストから構築する。バイト列はそのまま渡す。
    /// NUL を含む引数は `EINVAL` の exec エラーにする。
    pub fn from_args(args: &[&OsStr]) -> Result<Self> {
        let command = args.first().ok_or(ShellError::EmptyCommand)?;
        let strings = args
            .iter()
            .map(|s| CString::new(s.as_bytes()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ShellError::Exec {
                command: command.to_string_lossy().into_owned(),
                errno: libc::EINVAL,
            })?;
        let mut ptrs: Vec<*const libc::c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(std::ptr::null()); // 引数列の終端
        Ok(Self {
            _strings: strings,
            ptrs,
        })
    }

    /// プログラム名（`argv[0]`）。
    fn program(&self) -> *const libc::c_char {
        self.ptrs[0]
    }

    /// NULL 終端ポインタ配列を返す。
    fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }
}

// ── fork_exec ─────────────────────────────────────────────────────

/// 生成済みの子プロセス。
pub struct Spawned {
    pub pid: libc::pid_t,
    /// exec 結果通知用パイプの読み端。EOF なら exec 成功。
    pub status_pipe: OwnedFd,
}

/// 両端に `FD_CLOEXEC` を立てたパイプを作る。
fn cloexec_pipe() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut fds = [-1; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    let (reader, writer) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
    for fd in [&reader, &writer] {
        if unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok((reader, writer))
}

/// 子プロセスを生成して `args[0]` を `PATH` 検索付きで exec する。
///
/// 親側では戻る前に `signals` を RunningChild に遷移させる。
/// fork 自体が失敗した場合は [`ShellError::Fork`] を返し、状態は変えない。
pub fn fork_exec(args: &[&OsStr], signals: &mut SignalController) -> Result<Spawned> {
    let argv = CStringVec::from_args(args)?;
    let (reader, writer) = cloexec_pipe().map_err(ShellError::Fork)?;

    // fork をまたいで SIGINT を止め、各プロセスが自分のハンドラを設置してから解除する
    let mut block = InterruptBlock::new().map_err(ShellError::Fork)?;

    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(ShellError::Fork(io::Error::last_os_error()));
    }

    if pid == 0 {
        // ── 子 ──
        signal::arm_child();
        block.restore();
        unsafe {
            libc::execvp(argv.program(), argv.as_ptr());
        }
        let errno = io::Error::last_os_error().raw_os_error().unwrap_or(libc::ENOEXEC);
        let bytes = errno.to_ne_bytes();
        unsafe {
            libc::write(
                writer.as_raw_fd(),
                bytes.as_ptr() as *const libc::c_void,
                bytes.len(),
            );
            libc::_exit(EXEC_FAILED_STATUS);
        }
    }

    // ── 親 ──
    drop(writer);
    signals.enter_child();
    block.restore();
    tracing::debug!(pid, command = ?args[0], "spawned child");

    Ok(Spawned {
        pid,
        status_pipe: reader,
    })
}
