//! バイナリファイルの読み込み機能

use crate::Result;
use object::{Object, ObjectSection};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 解析対象のバイナリイメージ
///
/// ファイル全体をメモリに読み込んで保持します。objectクレートでのパースは
/// 借用ベースなので、必要になるたびに [`BinaryImage::parse`] で行います。
pub struct BinaryImage {
    path: PathBuf,
    data: Vec<u8>,
}

impl BinaryImage {
    /// ファイルを読み込む
    ///
    /// 開けない・読めない場合のみエラーになります。ELFとして解釈できるかどうかは
    /// ここでは問いません。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {:?}: {}", path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// メモリ上のバイト列からイメージを作成する
    pub fn from_bytes<P: AsRef<Path>>(path: P, data: Vec<u8>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// ファイルサイズ（バイト）
    pub fn file_size(&self) -> u64 {
        self.data.len() as u64
    }

    /// objectクレートでパースする
    pub fn parse(&self) -> object::Result<object::File<'_>> {
        object::File::parse(&*self.data)
    }

    /// 既知のバイナリ形式として認識できるかどうか
    pub fn is_recognized(&self) -> bool {
        self.parse().is_ok()
    }

    /// セクションヘッダテーブルからセクション名 -> サイズのマップを作る
    ///
    /// パースできないファイルでは空のマップを返します。
    /// シンボル由来のサイズとは独立した見方であり、両者を合算してはいけません。
    pub fn section_sizes(&self) -> HashMap<String, u64> {
        let mut sections = HashMap::new();

        let Ok(file) = self.parse() else {
            return sections;
        };

        for section in file.sections() {
            let Ok(name) = section.name() else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            // 同名セクションが複数ある場合（リンク前のオブジェクトなど）は合算する
            *sections.entry(name.to_string()).or_insert(0) += section.size();
        }

        sections
    }
}
