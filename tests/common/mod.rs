//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use bookshelf_mcp::application::service::CatalogService;
use bookshelf_mcp::domain::model::book::{AddBookRequest, BookRecord};
use bookshelf_mcp::domain::model::library::Library;
use bookshelf_mcp::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo: テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。save回数を数える。
pub struct InMemoryRepo {
    records: RefCell<Vec<BookRecord>>,
    saves: Cell<usize>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<BookRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            saves: Cell::new(0),
        }
    }

    pub fn stored(&self) -> Vec<BookRecord> {
        self.records.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Library, Self::Error> {
        Ok(Library::from_records(self.records.borrow().clone()))
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        *self.records.borrow_mut() = library.records().cloned().collect();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// 読み込みは成功し、保存は常に失敗するリポジトリ（ディスクフル等の再現）。
pub struct FailingRepo {
    records: Vec<BookRecord>,
}

impl FailingRepo {
    pub fn with_records(records: Vec<BookRecord>) -> Self {
        Self { records }
    }
}

impl LibraryRepository for FailingRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Library, Self::Error> {
        Ok(Library::from_records(self.records.clone()))
    }

    fn save(&self, _library: &Library) -> Result<(), Self::Error> {
        Err(InMemoryError)
    }
}

// =============================================================================
// TestLibrary: テスト用データ
// =============================================================================

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用Library:
    /// ```text
    /// Dune|Herbert|1965|SciFi|Read
    /// Emma|Austen|1815|Romance|Unread
    /// ```
    pub fn standard() -> Vec<BookRecord> {
        vec![
            BookRecord::new("Dune", "Herbert", 1965, "SciFi", true),
            BookRecord::new("Emma", "Austen", 1815, "Romance", false),
        ]
    }

    /// standard() + 重複・未読・ジャンル空を含む広めのLibrary
    pub fn extended() -> Vec<BookRecord> {
        let mut records = Self::standard();
        records.extend([
            BookRecord::new("Persuasion", "Austen", 1817, "Romance", true),
            BookRecord::new("Ulysses", "Joyce", 1922, "", false),
            BookRecord::new("Dune", "Herbert", 1984, "Film tie-in", false),
        ]);
        records
    }

    pub fn service_with(records: Vec<BookRecord>) -> CatalogService<InMemoryRepo> {
        CatalogService::open(InMemoryRepo::with_records(records)).unwrap()
    }

    pub fn add_request(title: &str, author: &str, year: u32, read: bool) -> AddBookRequest {
        AddBookRequest {
            title: title.into(),
            author: author.into(),
            year,
            genre: "Fiction".into(),
            read,
        }
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
#[allow(dead_code)]
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
