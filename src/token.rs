//! 行を空白区切りの引数ベクタに分割する。
//!
//! 区切り文字はスペースと改行のみ（タブは通常文字として扱う）。
//! [`ArgVector`] は行のバイト列を所有し、各トークンはその中の `(start, end)` 範囲として
//! 保持する。トークンごとのコピーは作らず、UTF-8 でないバイトもそのまま exec まで届く。

use std::ffi::OsStr;
use std::ops::Range;
use std::os::unix::ffi::OsStrExt;

use crate::error::{Result, ShellError};
use crate::line::Line;

/// 範囲ストレージの初期容量。満杯になるたびに倍に拡張する。
const INITIAL_SPANS: usize = 1024;

fn is_delimiter(b: u8) -> bool {
    b == b' ' || b == b'\n'
}

/// トークン化済みの 1 行。
#[derive(Debug, Clone)]
pub struct ArgVector {
    bytes: Vec<u8>,
    spans: Vec<Range<usize>>,
}

impl ArgVector {
    /// 引数が 1 つもない（空行）か。
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// `i` 番目のトークン。範囲外なら `None`（= 引数列の終端）。
    pub fn get(&self, i: usize) -> Option<&OsStr> {
        self.spans.get(i).map(|r| OsStr::from_bytes(&self.bytes[r.clone()]))
    }

    /// コマンド名（先頭トークン）。
    pub fn command(&self) -> Option<&OsStr> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OsStr> + '_ {
        self.spans
            .iter()
            .map(move |r| OsStr::from_bytes(&self.bytes[r.clone()]))
    }

    /// ビルトインと exec に渡す引数列。
    pub fn to_vec(&self) -> Vec<&OsStr> {
        self.iter().collect()
    }
}

/// 行をトークンに分割する。
///
/// 連続する区切り文字は 1 つとみなすので、空文字列のトークンは生じない。
pub fn tokenize(line: Line) -> Result<ArgVector> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    if line.is_blank() {
        return Ok(ArgVector {
            bytes: Vec::new(),
            spans,
        });
    }
    reserve(&mut spans, INITIAL_SPANS)?;

    let bytes = line.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        while pos < bytes.len() && is_delimiter(bytes[pos]) {
            pos += 1;
        }
        if pos == bytes.len() {
            break;
        }
        let start = pos;
        while pos < bytes.len() && !is_delimiter(bytes[pos]) {
            pos += 1;
        }
        if spans.len() == spans.capacity() {
            let additional = spans.capacity();
            reserve(&mut spans, additional)?;
        }
        spans.push(start..pos);
    }

    Ok(ArgVector {
        bytes: line.into_bytes(),
        spans,
    })
}

fn reserve(spans: &mut Vec<Range<usize>>, additional: usize) -> Result<()> {
    spans
        .try_reserve_exact(additional)
        .map_err(|_| ShellError::ResourceExhausted { what: "argument vector" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        tokenize(Line::from(input))
            .unwrap()
            .iter()
            .map(|t| t.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn extra_whitespace() {
        assert_eq!(tokens("  ls   -la  \n"), vec!["ls", "-la"]);
    }

    #[test]
    fn empty_line() {
        assert!(tokens("\n").is_empty());
        assert!(tokens("").is_empty());
    }

    #[test]
    fn only_spaces() {
        assert!(tokens("     \n").is_empty());
    }

    #[test]
    fn order_is_preserved() {
        assert_eq!(tokens("a b c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn tab_is_not_a_delimiter() {
        assert_eq!(tokens("echo a\tb\n"), vec!["echo", "a\tb"]);
    }

    #[test]
    fn terminator_after_last_token() {
        let argv = tokenize(Line::from("cd /tmp\n")).unwrap();
        assert_eq!(argv.len(), 2);
        assert_eq!(argv.command(), Some(OsStr::new("cd")));
        assert_eq!(argv.get(1), Some(OsStr::new("/tmp")));
        assert_eq!(argv.get(2), None);
    }

    #[test]
    fn many_tokens_grow_span_storage() {
        let input = "x ".repeat(3000) + "\n";
        let argv = tokenize(Line::from(input.as_str())).unwrap();
        assert_eq!(argv.len(), 3000);
        assert!(argv.iter().all(|t| t == "x"));
    }

    #[test]
    fn multibyte_tokens() {
        assert_eq!(tokens("echo こんにちは 世界\n"), vec!["echo", "こんにちは", "世界"]);
    }

    #[test]
    fn non_utf8_bytes_are_kept_intact() {
        let argv = tokenize(Line::from(b"ls \xffname\n".to_vec())).unwrap();
        assert_eq!(argv.len(), 2);
        assert_eq!(argv.get(1).unwrap().as_bytes(), b"\xffname");
    }
}
