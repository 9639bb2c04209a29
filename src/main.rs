//! kapish — 小さな対話シェル
//!
//! 起動の流れ: 引数解析 → ログ初期化 → SIGINT ハンドラ設置 → `~/.kapishrc` 実行 → REPL ループ
//!
//! 終了ステータス: `exit` または入力終端で 0、致命的エラーで 1。
//! 子プロセスの終了ステータスはシェルの終了ステータスに反映しない。

use std::io;
use std::path::Path;

use anyhow::Context;

use kapish::config::{Args, Config};
use kapish::dispatch::Dispatcher;
use kapish::logging;
use kapish::rc::Script;
use kapish::repl::{Interactive, Repl, RunEnd};
use kapish::signal::SignalController;

/// 起動スクリプトを実行する。スクリプト内で `exit` されたら `Some(RunEnd::Exit)`。
///
/// 開けない・途中で読めないスクリプトは診断を出して読み飛ばす。致命的エラーだけを返す。
fn load_rc(repl: &mut Repl, path: &Path, prompt: &str) -> anyhow::Result<Option<RunEnd>> {
    let mut script = match Script::open(path, prompt) {
        Ok(Some(script)) => script,
        Ok(None) => return Ok(None),
        Err(e) => {
            eprintln!("kapish: {}", e);
            return Ok(None);
        }
    };
    tracing::debug!(path = %path.display(), "running startup script");

    match repl.run(&mut script) {
        Ok(end) => Ok(Some(end)),
        Err(e) if e.is_fatal() => Err(e).context("startup script"),
        Err(e) => {
            eprintln!("kapish: {}", e);
            Ok(None)
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut repl = Repl::new(Dispatcher::new(SignalController::install()));

    if let Some(path) = &config.rc_path {
        if load_rc(&mut repl, path, &config.prompt)? == Some(RunEnd::Exit) {
            return Ok(());
        }
    }

    let mut source = Interactive::new(io::stdin().lock(), io::stdout(), config.prompt.as_str());
    let end = repl.run(&mut source).context("reading standard input")?;
    if end == RunEnd::EndOfInput {
        // Ctrl+D: プロンプトの行を閉じてから終了
        println!();
    }
    Ok(())
}

fn main() {
    let args: Args = argh::from_env();
    let config = Config::from_args(args);
    logging::init_logging(config.log_filter.as_deref());

    if let Err(e) = run(&config) {
        eprintln!("kapish: {:#}", e);
        std::process::exit(1);
    }
}
