//! パース関連のユーティリティ関数

use anyhow::Result;

/// サイズ列の文字列をu64にパース
///
/// 16進数（0xプレフィックス付き）または10進数をサポート
///
/// # Examples
/// ```
/// use symsize_elf::parse::parse_size;
///
/// assert_eq!(parse_size("0x40").unwrap(), 64);
/// assert_eq!(parse_size("0000000042").unwrap(), 42);
/// ```
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| anyhow::anyhow!("Invalid hexadecimal size '{}': {}", s, e))
    } else {
        // 10進数でもダメなら16進数として解釈を試みる
        s.parse::<u64>()
            .or_else(|_| u64::from_str_radix(s, 16))
            .map_err(|e| anyhow::anyhow!("Invalid size '{}': {}", s, e))
    }
}
