//! SIGINT の振る舞いを切り替える状態機械。
//!
//! | 状態 | 親（シェル） | 子 |
//! |------|-------------|-----|
//! | [`InterruptMode::AwaitingInput`] | 案内メッセージを出してループに戻る | — |
//! | [`InterruptMode::RunningChild`] | 無視（`waitpid` でブロック中） | 通知を出して 2 秒待ち、終了 |
//!
//! 遷移は子プロセス生成時（AwaitingInput → RunningChild）と、
//! その子の終了ステータス回収後（RunningChild → AwaitingInput）の 2 つだけ。
//! fork の前後は [`InterruptBlock`] で SIGINT をブロックし、親子それぞれが
//! 自分のハンドラを設置してから解除する。これにより割り込みが誤った状態の
//! ハンドラで処理される窓をなくす。
//!
//! ハンドラ内では async-signal-safe な呼び出し（`write`, `signal`, `sleep`, `_exit`）のみ使う。

use std::io;
use std::mem;
use std::ptr;

const PROMPT_NOTICE: &[u8] = concat!(
    "\nenter 'exit' or CTRL+D to kill kapish. ",
    "To continue, press enter and/or type your commands when the prompt resets\n",
)
.as_bytes();
const CHILD_NOTICE: &[u8] = b"\n terminating child process \n";

/// 子プロセスが終了前にメッセージを流し切るための待ち時間（秒）。
const CHILD_GRACE_SECS: libc::c_uint = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptMode {
    /// プロンプトで入力待ち。初期状態。
    AwaitingInput,
    /// 子プロセスの終了待ち。
    RunningChild,
}

/// プロセス全体の SIGINT 状態を所有するオブジェクト。
///
/// [`Dispatcher`](crate::dispatch::Dispatcher) が 1 つ所有し、
/// [`executor::execute`](crate::executor::execute) に `&mut` で渡す。
#[derive(Debug)]
pub struct SignalController {
    mode: InterruptMode,
}

impl SignalController {
    /// プロンプト用ハンドラを設置し、AwaitingInput 状態で開始する。
    pub fn install() -> Self {
        set_handler(prompt_handler as libc::sighandler_t);
        tracing::trace!("SIGINT: prompt handler installed");
        Self {
            mode: InterruptMode::AwaitingInput,
        }
    }

    pub fn mode(&self) -> InterruptMode {
        self.mode
    }

    /// 親側: 子プロセス生成直後に呼ぶ。割り込みは子に任せ、親は無視する。
    pub fn enter_child(&mut self) {
        debug_assert_eq!(self.mode, InterruptMode::AwaitingInput);
        set_handler(libc::SIG_IGN);
        self.mode = InterruptMode::RunningChild;
        tracing::trace!("SIGINT: mode -> RunningChild");
    }

    /// 親側: 子の終了ステータス回収後に呼ぶ。プロンプト用ハンドラを再設置する。
    pub fn leave_child(&mut self) {
        debug_assert_eq!(self.mode, InterruptMode::RunningChild);
        set_handler(prompt_handler as libc::sighandler_t);
        self.mode = InterruptMode::AwaitingInput;
        tracing::trace!("SIGINT: mode -> AwaitingInput");
    }
}

/// 子側: fork 直後、exec の前に呼ぶ。
///
/// exec 成功後はカーネルが捕捉ハンドラを `SIG_DFL` に戻すため、
/// このハンドラが効くのは exec までの間だけ。
pub fn arm_child() {
    set_handler(child_handler as libc::sighandler_t);
}

fn set_handler(handler: libc::sighandler_t) {
    unsafe {
        libc::signal(libc::SIGINT, handler);
    }
}

extern "C" fn prompt_handler(_sig: libc::c_int) {
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            PROMPT_NOTICE.as_ptr() as *const libc::c_void,
            PROMPT_NOTICE.len(),
        );
    }
    // 一度きりの配送でデフォルト（終了）に戻る環境のため、最後に自分を再登録する
    set_handler(prompt_handler as libc::sighandler_t);
}

extern "C" fn child_handler(_sig: libc::c_int) {
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            CHILD_NOTICE.as_ptr() as *const libc::c_void,
            CHILD_NOTICE.len(),
        );
        libc::sleep(CHILD_GRACE_SECS);
        libc::_exit(0);
    }
}

// ── InterruptBlock ────────────────────────────────────────────────

/// SIGINT をブロックし、解除時に元のシグナルマスクへ戻す RAII ガード。
///
/// fork の前に作り、親子それぞれがハンドラを設置した後で [`restore`](Self::restore) する。
/// fork 後の子は `Drop` を走らせず `restore` を明示的に呼ぶ（exec 前に必ず解除するため）。
pub struct InterruptBlock {
    previous: libc::sigset_t,
    restored: bool,
}

impl InterruptBlock {
    pub fn new() -> io::Result<Self> {
        unsafe {
            let mut set: libc::sigset_t = mem::zeroed();
            let mut previous: libc::sigset_t = mem::zeroed();
            libc::sigemptyset(&mut set);
            libc::sigaddset(&mut set, libc::SIGINT);
            let ret = libc::pthread_sigmask(libc::SIG_BLOCK, &set, &mut previous);
            if ret != 0 {
                return Err(io::Error::from_raw_os_error(ret));
            }
            Ok(Self {
                previous,
                restored: false,
            })
        }
    }

    /// 元のマスクに戻す。保留中の SIGINT はこの時点で現在のハンドラに配送される。
    pub fn restore(&mut self) {
        if !self.restored {
            unsafe {
                libc::pthread_sigmask(libc::SIG_SETMASK, &self.previous, ptr::null_mut());
            }
            self.restored = true;
        }
    }
}

impl Drop for InterruptBlock {
    fn drop(&mut self) {
        self.restore();
    }
}
