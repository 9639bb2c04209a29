//! ビルトインコマンドの実装。
//!
//! ビルトインは fork/exec を経由せずプロセス内で直接実行される。
//! [`lookup()`] が `Some(handler)` を返せばビルトイン、
//! `None` なら外部コマンドとして executor に委ねる。
//!
//! コマンド名 → ハンドラの表 [`BUILTINS`] に行を足すだけで拡張できる。

use std::env;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::dispatch::CommandOutcome;
use crate::error::{Result, ShellError};

/// ビルトインのハンドラ。`args[0]` はコマンド名。
pub type Builtin = fn(&[&OsStr]) -> Result<CommandOutcome>;

/// ビルトイン表。
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("cd", builtin_cd),
    ("setenv", builtin_setenv),
    ("unsetenv", builtin_unsetenv),
    ("exit", builtin_exit),
];

/// コマンド名に対応するビルトインを探す。
pub fn lookup(name: &OsStr) -> Option<Builtin> {
    // UTF-8 でない名前はどのビルトインとも一致しない
    let name = name.to_str()?;
    BUILTINS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, handler)| *handler)
}

/// `exit` — 残りの引数は無視してシェルを終了する。
fn builtin_exit(_args: &[&OsStr]) -> Result<CommandOutcome> {
    Ok(CommandOutcome::Terminate)
}

/// `cd [dir]` — カレントディレクトリを変更する。引数省略時は `$HOME` に移動。
fn builtin_cd(args: &[&OsStr]) -> Result<CommandOutcome> {
    let target = match args.get(1) {
        Some(dir) => PathBuf::from(dir),
        None => env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or(ShellError::HomeNotSet)?,
    };

    env::set_current_dir(&target).map_err(|source| ShellError::ChangeDir {
        path: target.clone(),
        source,
    })?;
    tracing::debug!(dir = %target.display(), "changed directory");
    Ok(CommandOutcome::Continue)
}

/// `setenv name [value]` — 環境変数を設定する。値の省略時は空文字列。既存の値は上書き。
fn builtin_setenv(args: &[&OsStr]) -> Result<CommandOutcome> {
    let name = args.get(1).ok_or(ShellError::MissingArgument {
        command: "setenv",
        usage: "setenv name [value]",
    })?;
    let value = args.get(2).copied().unwrap_or_else(|| OsStr::new(""));
    validate_name(name)?;
    if value.as_bytes().contains(&0) {
        return Err(ShellError::InvalidVariable {
            name: name.to_string_lossy().into_owned(),
        });
    }

    env::set_var(name, value);
    tracing::debug!(name = ?name, value = ?value, "setenv");
    Ok(CommandOutcome::Continue)
}

/// `unsetenv name` — 環境変数を削除する。
fn builtin_unsetenv(args: &[&OsStr]) -> Result<CommandOutcome> {
    let name = args.get(1).ok_or(ShellError::MissingArgument {
        command: "unsetenv",
        usage: "unsetenv name",
    })?;
    validate_name(name)?;

    env::remove_var(name);
    tracing::debug!(name = ?name, "unsetenv");
    Ok(CommandOutcome::Continue)
}

/// `std::env::set_var` が panic する名前を事前に弾く。
fn validate_name(name: &OsStr) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.contains(&b'=') || bytes.contains(&0) {
        return Err(ShellError::InvalidVariable {
            name: name.to_string_lossy().into_owned(),
        });
    }
    Ok(())
}
