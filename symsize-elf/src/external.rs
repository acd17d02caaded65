//! 外部ツール（readelf, nm）によるシンボル抽出
//!
//! ツールを読み取り専用のサブプロセスとして起動し、カラム形式のテキスト出力を
//! 1行ずつ [`SymbolRecord`] に変換します。解析できない行はスキップします。

use crate::parse::parse_size;
use crate::{BackendUnavailable, BinaryImage, MalformedRecord, SymbolBackend, SymbolKind, SymbolRecord};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, trace};
use wait_timeout::ChildExt;

/// 外部ツールを実行して標準出力を返す
///
/// 起動できない、非0で終了した、タイムアウトした場合は [`BackendUnavailable`]。
/// タイムアウト時は子プロセスをkillしてから返ります。
fn run_tool(
    backend: &'static str,
    program: &str,
    args: &[&str],
    image: &BinaryImage,
    timeout: Duration,
) -> Result<String, BackendUnavailable> {
    debug!("Running {}: {} {:?} {}", backend, program, args, image.path().display());

    let mut child = Command::new(program)
        .args(args)
        .arg(image.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| BackendUnavailable::new(backend, format!("failed to run '{}': {}", program, e)))?;

    // 出力が大きいとパイプが詰まるので、待機前に読み取りスレッドを起動する
    let stdout_thread = spawn_capture_thread(child.stdout.take());
    let stderr_thread = spawn_capture_thread(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            let _ = join_capture_thread(stdout_thread);
            let _ = join_capture_thread(stderr_thread);
            return Err(BackendUnavailable::new(
                backend,
                format!("'{}' timed out after {}ms", program, timeout.as_millis()),
            ));
        }
        Err(e) => {
            let _ = child.kill();
            return Err(BackendUnavailable::new(backend, format!("failed to wait for '{}': {}", program, e)));
        }
    };

    let stdout = join_capture_thread(stdout_thread)
        .map_err(|e| BackendUnavailable::new(backend, format!("failed to read output: {}", e)))?;
    let stderr = join_capture_thread(stderr_thread).unwrap_or_default();

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        return Err(BackendUnavailable::new(
            backend,
            format!("'{}' exited with {}: {}", program, status, stderr.trim()),
        ));
    }

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

fn spawn_capture_thread<R>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn join_capture_thread(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> std::io::Result<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| std::io::Error::other("capture thread panicked"))?
}

/// 解析できた行だけを集める。失敗した行はtraceログに残してスキップする
fn collect_records<F>(output: &str, mut parse_line: F) -> Vec<SymbolRecord>
where
    F: FnMut(&str) -> Option<Result<SymbolRecord, MalformedRecord>>,
{
    let mut records = Vec::new();
    for line in output.lines() {
        match parse_line(line) {
            Some(Ok(record)) => records.push(record),
            Some(Err(malformed)) => trace!("{}", malformed),
            None => {}
        }
    }
    records
}

/// `readelf -s -W` の出力を読むバックエンド
#[derive(Debug, Clone)]
pub struct ReadelfReader {
    program: String,
    timeout: Duration,
}

impl ReadelfReader {
    pub const NAME: &'static str = "readelf";

    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// readelfのシンボルテーブル出力全体を解析する
    ///
    /// `.symtab` のエントリがあればそれだけを使い、なければ `.dynsym` を使います。
    /// 同じシンボルを2回数えないためです。
    pub fn parse_output(output: &str) -> Vec<SymbolRecord> {
        let mut symtab = Vec::new();
        let mut dynsym = Vec::new();
        let mut in_dynsym = false;

        for line in output.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("Symbol table '") {
                in_dynsym = rest.starts_with(".dynsym");
                continue;
            }
            match Self::parse_line(trimmed) {
                Some(Ok(record)) if in_dynsym => dynsym.push(record),
                Some(Ok(record)) => symtab.push(record),
                Some(Err(malformed)) => trace!("{}", malformed),
                None => {}
            }
        }

        if symtab.is_empty() {
            dynsym
        } else {
            symtab
        }
    }

    /// 1行を解析する
    ///
    /// 形式: `Num: Value Size Type Bind Vis Ndx Name...`
    /// エントリ行でなければ `None`、エントリ行だが解析できなければ `Some(Err)`。
    pub fn parse_line(line: &str) -> Option<Result<SymbolRecord, MalformedRecord>> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let first = parts.first()?;
        if *first == "Num:" || !first.ends_with(':') {
            return None;
        }
        if parts.len() < 8 {
            return Some(Err(MalformedRecord::new(line, "expected at least 8 columns")));
        }

        let Ok(size) = parse_size(parts[2]) else {
            return Some(Err(MalformedRecord::new(line, "invalid size column")));
        };
        let kind = SymbolKind::from_readelf_type(parts[3]);
        let name = parts[7..].join(" ");

        Some(Ok(SymbolRecord::new(name, size, kind)))
    }
}

impl SymbolBackend for ReadelfReader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, image: &BinaryImage) -> Result<Vec<SymbolRecord>, BackendUnavailable> {
        let output = run_tool(Self::NAME, &self.program, &["-s", "-W"], image, self.timeout)?;
        Ok(Self::parse_output(&output))
    }
}

/// `nm --print-size --size-sort --radix=d` の出力を読むバックエンド
#[derive(Debug, Clone)]
pub struct NmReader {
    program: String,
    timeout: Duration,
}

impl NmReader {
    pub const NAME: &'static str = "nm";

    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn parse_output(output: &str) -> Vec<SymbolRecord> {
        collect_records(output, Self::parse_line)
    }

    /// 1行を解析する
    ///
    /// 形式: `address size type name...`
    /// サイズを持たない行（未定義シンボルなど）は列数が足りないので `Some(Err)`。
    pub fn parse_line(line: &str) -> Option<Result<SymbolRecord, MalformedRecord>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() < 4 {
            return Some(Err(MalformedRecord::new(trimmed, "expected at least 4 columns")));
        }

        let Ok(size) = parse_size(parts[1]) else {
            return Some(Err(MalformedRecord::new(trimmed, "invalid size column")));
        };
        let kind = SymbolKind::from_nm_code(parts[2]);
        let name = parts[3..].join(" ");

        Some(Ok(SymbolRecord::new(name, size, kind)))
    }
}

impl SymbolBackend for NmReader {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn extract(&self, image: &BinaryImage) -> Result<Vec<SymbolRecord>, BackendUnavailable> {
        let output = run_tool(
            Self::NAME,
            &self.program,
            &["--print-size", "--size-sort", "--radix=d"],
            image,
            self.timeout,
        )?;
        Ok(Self::parse_output(&output))
    }
}
