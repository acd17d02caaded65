//! デマングル結果

/// 名前空間が空のときに型キーで使う表示名
pub const NO_NAMESPACE: &str = "(no namespace)";

/// 1つの識別子から導いた (名前空間, 型, メンバ)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribution {
    /// 名前空間（空文字列の場合あり）
    pub namespace: String,
    pub type_name: String,
    pub member: String,
}

impl Attribution {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    /// 名前空間とも型とも同じ固定バケットに分類する
    pub fn bucket(sentinel: &str, identifier: &str) -> Self {
        Self::new(sentinel, sentinel, identifier)
    }

    /// `namespace.type` 形式の型キー
    ///
    /// 名前空間が空の場合は [`NO_NAMESPACE`] で修飾するので、キーは常に修飾済みです。
    pub fn type_key(&self) -> String {
        let namespace = if self.namespace.is_empty() {
            NO_NAMESPACE
        } else {
            &self.namespace
        };
        format!("{}.{}", namespace, self.type_name)
    }
}
