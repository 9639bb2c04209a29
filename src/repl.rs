//! 読み取り → トークン化 → ディスパッチのループ。
//!
//! 行の供給元は [`LineSource`] で抽象化し、端末入力（[`Interactive`]）と
//! 起動スクリプト（[`Script`](crate::rc::Script)）を同じループで処理する。
//!
//! ループの終わり方は 2 通り:
//! - [`RunEnd::Exit`] — `exit` ビルトイン
//! - [`RunEnd::EndOfInput`] — 入力が尽きた（端末では Ctrl+D）
//!
//! どちらも対話シェルでは同じく正常終了になる。区別するのは診断のため。

use std::io::{Read, Write};

use crate::dispatch::{CommandOutcome, Dispatcher};
use crate::error::Result;
use crate::line::{Line, LineBuffer};
use crate::token;

/// 1 行ずつ行を供給するもの。`Ok(None)` で入力の終わり。
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<Line>>;
}

/// 端末（または任意のストリーム）からプロンプト付きで読む供給元。
pub struct Interactive<R, W> {
    reader: R,
    out: W,
    prompt: String,
    buffer: LineBuffer,
}

impl<R: Read, W: Write> Interactive<R, W> {
    pub fn new(reader: R, out: W, prompt: impl Into<String>) -> Self {
        Self {
            reader,
            out,
            prompt: prompt.into(),
            buffer: LineBuffer::new(),
        }
    }
}

impl<R: Read, W: Write> LineSource for Interactive<R, W> {
    fn next_line(&mut self) -> Result<Option<Line>> {
        write!(self.out, "{}", self.prompt)?;
        self.out.flush()?;
        self.buffer.read_line(&mut self.reader)
    }
}

/// ループが終わった理由。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    Exit,
    EndOfInput,
}

pub struct Repl {
    dispatcher: Dispatcher,
}

impl Repl {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// `source` が尽きるか `exit` されるまで行を処理する。
    ///
    /// 各行の失敗は stderr に報告して次の行へ進む。
    /// `Err` を返すのは供給元の読み取りエラーと致命的エラー（資源枯渇）だけ。
    pub fn run<S: LineSource>(&mut self, source: &mut S) -> Result<RunEnd> {
        loop {
            let line = match source.next_line()? {
                Some(line) => line,
                None => {
                    tracing::debug!("end of input");
                    return Ok(RunEnd::EndOfInput);
                }
            };

            let argv = token::tokenize(line)?;
            match self.dispatcher.dispatch(&argv) {
                CommandOutcome::Continue => {}
                CommandOutcome::Terminate => {
                    tracing::debug!("exit requested");
                    return Ok(RunEnd::Exit);
                }
                CommandOutcome::Failed(e) => eprintln!("kapish: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalController;
    use crate::test_support;
    use std::io::Cursor;

    fn repl() -> Repl {
        Repl::new(Dispatcher::new(SignalController::install()))
    }

    fn interactive(input: &str) -> Interactive<Cursor<Vec<u8>>, Vec<u8>> {
        Interactive::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), "? ")
    }

    #[test]
    fn exit_stops_the_loop() {
        let _g = test_support::lock();
        let mut src = interactive("exit\nsetenv KAPISH_TEST_AFTER_EXIT 1\n");
        assert_eq!(repl().run(&mut src).unwrap(), RunEnd::Exit);
        assert!(std::env::var_os("KAPISH_TEST_AFTER_EXIT").is_none());
        // プロンプトは 1 回だけ
        assert_eq!(src.out, b"? ");
    }

    #[test]
    fn end_of_input_stops_the_loop() {
        let _g = test_support::lock();
        let mut src = interactive("\n\n");
        assert_eq!(repl().run(&mut src).unwrap(), RunEnd::EndOfInput);
        assert_eq!(src.out, b"? ? ? ");
    }

    #[test]
    fn failures_do_not_stop_the_loop() {
        let _g = test_support::lock();
        let mut src = interactive(concat!(
            "cd /kapish/no/such/dir\n",
            "kapish-no-such-command-xyz\n",
            "setenv\n",
            "setenv KAPISH_TEST_LOOP ok\n",
        ));
        assert_eq!(repl().run(&mut src).unwrap(), RunEnd::EndOfInput);
        assert_eq!(std::env::var("KAPISH_TEST_LOOP").unwrap(), "ok");
        std::env::remove_var("KAPISH_TEST_LOOP");
    }

    #[test]
    fn external_command_then_next_prompt() {
        let _g = test_support::lock();
        let mut src = interactive("true\nexit\n");
        assert_eq!(repl().run(&mut src).unwrap(), RunEnd::Exit);
        assert_eq!(src.out, b"? ? ");
    }

    #[test]
    fn partial_line_at_eof_is_discarded() {
        let _g = test_support::lock();
        let mut src = interactive("setenv KAPISH_TEST_PARTIAL 1");
        assert_eq!(repl().run(&mut src).unwrap(), RunEnd::EndOfInput);
        assert!(std::env::var_os("KAPISH_TEST_PARTIAL").is_none());
    }
}
