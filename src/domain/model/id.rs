use std::fmt;

/// Library内のレコード識別子。
/// ファイルには書き出さない。セッション（CatalogServiceの生存期間）内でのみ安定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(uuid::Uuid);

impl Default for BookId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl BookId {
    pub fn new() -> Self {
        Self::default()
    }

    /// 短縮ID（UUIDの先頭8文字）
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }

    /// Full UUID文字列から復元する。
    pub fn parse(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
