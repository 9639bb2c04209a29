//! 起動スクリプト `~/.kapishrc` の読み込み。
//!
//! 各行を `? <行>` とエコーしてから、対話入力と同じトークン化 → ディスパッチ経路に流す。
//! ファイルが存在しなければサイレントスキップ、読めなければ診断を出して対話モードへ進む。
//! 末尾に改行のない最終行も 1 行として扱う。

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Stdout, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShellError};
use crate::line::Line;
use crate::repl::LineSource;

pub const RC_FILE_NAME: &str = ".kapishrc";

/// `$HOME/.kapishrc`。`$HOME` 未設定なら `None`。
pub fn default_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(RC_FILE_NAME))
}

/// スクリプトファイルを行の供給元にしたもの。
pub struct Script<R, W> {
    path: PathBuf,
    reader: R,
    echo: W,
    prompt: String,
}

impl Script<BufReader<File>, Stdout> {
    /// スクリプトを開く。ファイルが存在しなければ `Ok(None)`。
    pub fn open(path: &Path, prompt: &str) -> Result<Option<Self>> {
        match File::open(path) {
            Ok(file) => Ok(Some(Script::new(
                path,
                BufReader::new(file),
                io::stdout(),
                prompt,
            ))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no startup script");
                Ok(None)
            }
            Err(source) => Err(ShellError::Script {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl<R: BufRead, W: Write> Script<R, W> {
    pub fn new(path: &Path, reader: R, echo: W, prompt: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            reader,
            echo,
            prompt: prompt.to_string(),
        }
    }
}

impl<R: BufRead, W: Write> LineSource for Script<R, W> {
    fn next_line(&mut self) -> Result<Option<Line>> {
        // UTF-8 でない行もそのまま流す
        let mut bytes = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut bytes)
            .map_err(|source| ShellError::Script {
                path: self.path.clone(),
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        if bytes.last() != Some(&b'\n') {
            bytes.push(b'\n');
        }
        self.echo.write_all(self.prompt.as_bytes())?;
        self.echo.write_all(&bytes)?;
        self.echo.flush()?;
        Ok(Some(Line::from(bytes)))
    }
}
