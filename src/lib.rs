//! kapish ライブラリ — バイナリ・ベンチマーク・テストから使うモジュールを公開する。
//!
//! バイナリ本体は `main.rs`（引数解析、起動スクリプト、REPL ループの起動）。
//!
//! ## モジュール構成
//!
//! | モジュール | 役割 |
//! |-----------|------|
//! | [`line`] | 行バッファ（バイト単位読み取り、初期容量 1024 からの拡張、EOF 検出） |
//! | [`token`] | トークン化（スペース/改行区切り、行スナップショット + 範囲インデックス） |
//! | [`signal`] | SIGINT 状態機械（プロンプト待ち / 子プロセス実行中、fork 前後のブロック） |
//! | [`spawn`] | `fork` + `execvp` ラッパー（argv 構築、exec 失敗通知パイプ） |
//! | [`executor`] | 外部コマンド実行（exec 結果確認、`waitpid`、終了ステータス解釈） |
//! | [`builtins`] | ビルトイン表（`cd`, `setenv`, `unsetenv`, `exit`） |
//! | [`dispatch`] | ビルトイン / 外部コマンドの振り分けと結果（継続・終了・失敗） |
//! | [`repl`] | 読み取り → トークン化 → ディスパッチのループ、端末入力の供給元 |
//! | [`rc`] | 起動スクリプト `~/.kapishrc` の供給元 |
//! | [`config`] | コマンドライン引数（`argh`）と設定の解決 |
//! | [`logging`] | `tracing-subscriber` の初期化 |
//! | [`error`] | エラー型 [`ShellError`](error::ShellError) |

pub mod builtins;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod line;
pub mod logging;
pub mod rc;
pub mod repl;
pub mod signal;
pub mod spawn;
pub mod token;

#[cfg(test)]
mod test_support;
