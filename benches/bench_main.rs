//! kapish ベンチマーク: 行読み取り、トークン化、ビルトイン、fork/exec、フルループの計測。
//!
//! `std::time::Instant` による手動計測（外部クレート不要）。
//!
//! 実行: `cargo bench`

use std::io::Cursor;
use std::time::{Duration, Instant};

use kapish::dispatch::Dispatcher;
use kapish::line::{Line, LineBuffer};
use kapish::repl::{Interactive, Repl};
use kapish::signal::SignalController;
use kapish::token::tokenize;

// ── ベンチマークインフラ ──────────────────────────────────────────

struct BenchResult {
    category: &'static str,
    name: &'static str,
    avg: Duration,
    iters: u64,
}

impl BenchResult {
    fn print(&self) {
        let avg_us = self.avg.as_nanos() as f64 / 1000.0;
        println!(
            "[{:<8}] {:<40}: avg {:>10.2}µs  ({} iters)",
            self.category, self.name, avg_us, self.iters,
        );
    }
}

fn bench<F: FnMut()>(
    category: &'static str,
    name: &'static str,
    iters: u64,
    mut f: F,
) -> BenchResult {
    // ウォームアップ
    for _ in 0..iters.min(100) {
        f();
    }

    let start = Instant::now();
    for _ in 0..iters {
        f();
    }
    let elapsed = start.elapsed();

    BenchResult {
        category,
        name,
        avg: elapsed / iters as u32,
        iters,
    }
}

fn print_all(results: &mut Vec<BenchResult>) {
    for r in results.iter() {
        r.print();
    }
    results.clear();
}

// ── メイン ────────────────────────────────────────────────────────

fn main() {
    println!("kapish benchmark suite");
    println!("{}", "=".repeat(80));

    let mut results = Vec::new();

    // ── 行バッファ ──
    println!("\n--- LineBuffer ---");

    let lb = LineBuffer::new();
    let short = b"ls -la /tmp\n".to_vec();
    let long = format!("{}\n", "x".repeat(5000)).into_bytes();

    results.push(bench("line", "short line", 10_000, || {
        let _ = lb.read_line(&mut Cursor::new(&short));
    }));

    results.push(bench("line", "5000-byte line (4 growths)", 1_000, || {
        let _ = lb.read_line(&mut Cursor::new(&long));
    }));

    print_all(&mut results);

    // ── トークン化 ──
    println!("\n--- Tokenizer ---");

    results.push(bench("token", "  ls   -la  ", 10_000, || {
        let _ = tokenize(Line::from("  ls   -la  \n"));
    }));

    let many = "arg ".repeat(2000) + "\n";
    results.push(bench("token", "2000 tokens (span growth)", 1_000, || {
        let _ = tokenize(Line::from(many.as_str()));
    }));

    print_all(&mut results);

    // ── ディスパッチ ──
    println!("\n--- Dispatch ---");

    let mut dispatcher = Dispatcher::new(SignalController::install());
    let setenv = tokenize(Line::from("setenv KAPISH_BENCH value\n")).unwrap();
    let empty = tokenize(Line::from("\n")).unwrap();
    let true_cmd = tokenize(Line::from("true\n")).unwrap();

    results.push(bench("builtin", "setenv KAPISH_BENCH value", 10_000, || {
        let _ = dispatcher.dispatch(&setenv);
    }));

    results.push(bench("builtin", "empty line", 10_000, || {
        let _ = dispatcher.dispatch(&empty);
    }));

    results.push(bench("spawn", "true (fork + execvp + waitpid)", 1_000, || {
        let _ = dispatcher.dispatch(&true_cmd);
    }));

    print_all(&mut results);

    // ── フルループ (read → tokenize → dispatch) ──
    println!("\n--- Full loop ---");

    let mut repl = Repl::new(Dispatcher::new(SignalController::install()));
    results.push(bench("full", "setenv x3 + exit", 1_000, || {
        let input = Cursor::new(b"setenv A 1\nsetenv B 2\nunsetenv A\nexit\n".to_vec());
        let mut source = Interactive::new(input, std::io::sink(), "? ");
        let _ = repl.run(&mut source);
    }));

    print_all(&mut results);

    println!("\n{}", "=".repeat(80));
    println!("done.");
}
