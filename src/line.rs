//! 入力ストリームから 1 行を読み取る可変長バッファ。
//!
//! バイト単位で読み、改行を読んだ時点で行を確定する（改行は行末に残す）。
//! 改行の前にストリームが終わった場合は `None` を返し、呼び出し側はこれを `exit` と同じに扱う。
//!
//! ## 拡張ポリシー
//!
//! 初期容量は [`INITIAL_CAPACITY`] バイト。次の 1 バイトが収まらないときは
//! 初期容量ぶんを追加確保してから書き込む（既存内容は保持）。
//! 確保は `try_reserve_exact` で行い、失敗は [`ShellError::ResourceExhausted`] として返す。

use std::io::{self, Read};

use crate::error::{Result, ShellError};

/// 行バッファの初期容量（バイト）。拡張単位も兼ねる。
pub const INITIAL_CAPACITY: usize = 1024;

/// 読み取った 1 行。末尾の改行を含む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
}

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// 論理長（改行を含む）。
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 確保済み容量。常に `len()` 以上。
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// 改行だけ、または空の行か。
    pub fn is_blank(&self) -> bool {
        matches!(self.bytes.as_slice(), [] | [b'\n'])
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self {
            bytes: s.as_bytes().to_vec(),
        }
    }
}

impl From<Vec<u8>> for Line {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// ストリームから行を読み取るリーダー。
pub struct LineBuffer {
    initial_capacity: usize,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// 初期容量（= 拡張単位）を指定して作る。0 は 1 に切り上げる。
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity: initial_capacity.max(1),
        }
    }

    /// 1 行読み取る。
    ///
    /// 戻り値:
    /// - `Ok(Some(line))` — 改行まで読めた
    /// - `Ok(None)` — 改行の前にストリームが終わった（途中まで読んだ内容は捨てる）
    /// - `Err(_)` — 読み取りエラー、またはバッファ拡張失敗
    pub fn read_line<R: Read>(&self, reader: &mut R) -> Result<Option<Line>> {
        let mut bytes = Vec::new();
        grow(&mut bytes, self.initial_capacity)?;

        let mut byte = [0u8; 1];
        loop {
            match reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    if bytes.len() == bytes.capacity() {
                        grow(&mut bytes, self.initial_capacity)?;
                    }
                    bytes.push(byte[0]);
                    if byte[0] == b'\n' {
                        return Ok(Some(Line { bytes }));
                    }
                }
                // SIGINT ハンドラから戻った直後など
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn grow(bytes: &mut Vec<u8>, additional: usize) -> Result<()> {
    bytes
        .try_reserve_exact(additional)
        .map_err(|_| ShellError::ResourceExhausted { what: "line buffer" })
}
