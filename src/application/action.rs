use crate::domain::model::book::AddBookRequest;
use crate::domain::model::id::BookId;
use crate::domain::model::library::{
    Library, LibraryEntry, LibraryStats, ReadingLists, SearchMode,
};

use super::error::AppError;

/// 短縮IDとして扱う最小の長さ
const MIN_ID_PREFIX: usize = 8;

/// カタログに対する操作。全操作は `CatalogService::execute` の1つのmatchで処理される。
pub enum CatalogAction {
    Add(AddBookRequest),
    Remove(RemoveSelector),
    Search { mode: SearchMode, query: String },
    ListAll,
    Stats,
}

/// 操作結果
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Added(LibraryEntry),
    /// 一致なしならNone（Libraryは変更されない）
    Removed(Option<LibraryEntry>),
    Found {
        mode: SearchMode,
        query: String,
        books: Vec<LibraryEntry>,
    },
    Listed(ReadingLists),
    Stats(LibraryStats),
}

/// 削除対象の指定方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveSelector {
    /// `"Title by Author"`。重複時は先頭の1件のみ。
    DisplayKey(String),
    Id(BookId),
}

impl RemoveSelector {
    /// 入力文字列を解決する。
    ///
    /// 優先順位:
    /// 1. Full UUID
    /// 2. 短縮IDプレフィックス（8文字以上、一意であること）
    /// 3. 複合キー `"Title by Author"`（前後の空白も含めて完全一致）
    pub fn resolve(input: &str, library: &Library) -> Result<Self, AppError> {
        let candidate = input.trim();

        if let Some(id) = BookId::parse(candidate) {
            return Ok(RemoveSelector::Id(id));
        }

        if candidate.len() >= MIN_ID_PREFIX
            && candidate.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
        {
            let matches: Vec<BookId> = library
                .ids()
                .filter(|id| id.to_string().starts_with(candidate))
                .collect();
            match matches.len() {
                0 => {}
                1 => return Ok(RemoveSelector::Id(matches[0])),
                count => {
                    return Err(AppError::AmbiguousId {
                        prefix: candidate.to_string(),
                        count,
                    })
                }
            }
        }

        Ok(RemoveSelector::DisplayKey(input.to_string()))
    }
}
