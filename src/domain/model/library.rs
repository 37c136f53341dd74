use std::str::FromStr;

use super::book::BookRecord;
use super::id::BookId;
use crate::domain::error::DomainError;

/// 検索対象フィールド。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Title,
    Author,
}

impl SearchMode {
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::Title => "by Title",
            SearchMode::Author => "by Author",
        }
    }

    fn target<'a>(&self, record: &'a BookRecord) -> &'a str {
        match self {
            SearchMode::Title => record.title(),
            SearchMode::Author => record.author(),
        }
    }
}

/// `"by Title"` / `"by Author"` の他、`title` / `author` / `1` / `2` も受け付ける。
impl FromStr for SearchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "by title" | "title" | "1" => Ok(SearchMode::Title),
            "by author" | "author" | "2" => Ok(SearchMode::Author),
            _ => Err(DomainError::UnknownSearchMode(s.to_string())),
        }
    }
}

/// LibraryにおけるIDつきレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    id: BookId,
    record: BookRecord,
}

impl LibraryEntry {
    pub(crate) fn new(id: BookId, record: BookRecord) -> Self {
        Self { id, record }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn record(&self) -> &BookRecord {
        &self.record
    }

    pub fn into_record(self) -> BookRecord {
        self.record
    }
}

/// 既読・未読で分割した一覧。各リストは元の順序を保つ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingLists {
    pub read: Vec<LibraryEntry>,
    pub unread: Vec<LibraryEntry>,
}

impl ReadingLists {
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.unread.is_empty()
    }
}

/// 蔵書統計
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryStats {
    pub total: usize,
    pub read: usize,
    /// 小数第2位で丸めた既読率。空なら0。
    pub percent_read: f64,
}

/// Library: 集約ルート。挿入順が唯一の順序で、重複を許す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    entries: Vec<LibraryEntry>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み込んだレコード列からLibraryを組み立てる。各レコードに新しいIDを振る。
    pub fn from_records(records: impl IntoIterator<Item = BookRecord>) -> Self {
        let mut library = Self::new();
        for record in records {
            library.push(record);
        }
        library
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &BookRecord> + '_ {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn get(&self, id: BookId) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 全IDのイテレータ
    pub fn ids(&self) -> impl Iterator<Item = BookId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// 末尾に追加する。
    pub fn push(&mut self, record: BookRecord) -> BookId {
        let id = BookId::new();
        self.entries.push(LibraryEntry::new(id, record));
        id
    }

    /// 複合キーに一致する最初のレコードを削除する。
    pub fn remove_first_by_key(&mut self, key: &str) -> Option<LibraryEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.record.display_key() == key)?;
        Some(self.entries.remove(pos))
    }

    pub fn remove_by_id(&mut self, id: BookId) -> Option<LibraryEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// 大文字小文字を区別しない部分一致検索。呼び出し毎に新しいイテレータを返す。
    pub fn search<'a>(
        &'a self,
        mode: SearchMode,
        query: &str,
    ) -> impl Iterator<Item = &'a LibraryEntry> + 'a {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| mode.target(&e.record).to_lowercase().contains(&needle))
    }

    pub fn reading_lists(&self) -> ReadingLists {
        let (read, unread): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .cloned()
            .partition(|e| e.record.is_read());
        ReadingLists { read, unread }
    }

    pub fn stats(&self) -> LibraryStats {
        let total = self.entries.len();
        let read = self.entries.iter().filter(|e| e.record.is_read()).count();
        let percent_read = if total == 0 {
            0.0
        } else {
            let raw = read as f64 / total as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };
        LibraryStats {
            total,
            read,
            percent_read,
        }
    }
}
