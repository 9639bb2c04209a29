//! コマンドライン引数と実行時設定。
//!
//! | フラグ | 意味 |
//! |--------|------|
//! | `--rc <path>` | 起動スクリプトのパス（既定 `$HOME/.kapishrc`） |
//! | `--no-rc` | 起動スクリプトを読まない（`--rc` より優先） |
//! | `--prompt <text>` | プロンプト文字列（既定 `? `） |
//! | `--log <filter>` | ログフィルタ（`KAPISH_LOG` より優先） |

use std::path::PathBuf;

use argh::FromArgs;

use crate::rc;

pub const DEFAULT_PROMPT: &str = "? ";

#[derive(FromArgs, Debug)]
/// kapish, a small interactive shell.
pub struct Args {
    /// startup script to run instead of ~/.kapishrc
    #[argh(option)]
    pub rc: Option<PathBuf>,

    /// do not run any startup script
    #[argh(switch)]
    pub no_rc: bool,

    /// prompt string
    #[argh(option, default = "String::from(DEFAULT_PROMPT)")]
    pub prompt: String,

    /// tracing filter directive, e.g. "debug" (overrides KAPISH_LOG)
    #[argh(option)]
    pub log: Option<String>,
}

/// 引数と環境から解決した設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 実行する起動スクリプト。`None` なら読まない。
    pub rc_path: Option<PathBuf>,
    pub prompt: String,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self::resolve(args, rc::default_path())
    }

    fn resolve(args: Args, default_rc: Option<PathBuf>) -> Self {
        let rc_path = if args.no_rc {
            None
        } else {
            args.rc.or(default_rc)
        };
        Self {
            rc_path,
            prompt: args.prompt,
            log_filter: args.log,
        }
    }
}
