//! tracing の初期化。
//!
//! ログは stderr に ANSI なしで出す（stdout はプロンプトと子プロセスの出力用）。
//! フィルタの優先順位: `--log` 引数 → 環境変数 `KAPISH_LOG` → `warn`。

use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "KAPISH_LOG";
const DEFAULT_FILTER: &str = "warn";

pub fn init_logging(filter: Option<&str>) {
    let env_filter = match filter {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(true);

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
}
