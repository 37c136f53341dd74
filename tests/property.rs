//! Property-based tests: invariant verification with proptest.

mod common;

use common::{InMemoryRepo, TestLibrary};
use proptest::prelude::*;

use bookshelf_mcp::application::action::RemoveSelector;
use bookshelf_mcp::application::service::CatalogService;
use bookshelf_mcp::domain::model::book::BookRecord;
use bookshelf_mcp::domain::model::library::{Library, SearchMode};
use bookshelf_mcp::domain::repository::LibraryRepository;
use bookshelf_mcp::infra::delimited_store::DelimitedLibraryRepository;

/// 区切り文字・改行を含まない任意のレコード
fn record_strategy() -> impl Strategy<Value = BookRecord> {
    (
        "[A-Za-z0-9][A-Za-z0-9 .,'!?-]{0,23}",
        "[A-Za-z][A-Za-z .'-]{0,23}",
        0u16..=9999,
        "[A-Za-z -]{0,12}",
        any::<bool>(),
    )
        .prop_map(|(title, author, year, genre, read)| {
            BookRecord::new(title, author, year, genre, read)
        })
}

fn library_strategy() -> impl Strategy<Value = Vec<BookRecord>> {
    prop::collection::vec(record_strategy(), 0..12)
}

// =============================================================================
// Record Store round-trip
// =============================================================================

proptest! {
    /// load(save(L)) == L（順序・全フィールド）
    #[test]
    fn load_after_save_returns_same_records(records in library_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let repo = DelimitedLibraryRepository::new(dir.path().join("library.txt"));

        repo.save(&Library::from_records(records.clone())).unwrap();
        let loaded: Vec<BookRecord> = repo.load().unwrap().records().cloned().collect();

        prop_assert_eq!(loaded, records);
    }

    /// save(load(save(L))) はバイト単位で save(L) と一致する。
    #[test]
    fn save_load_save_is_byte_identical(records in library_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let repo = DelimitedLibraryRepository::new(dir.path().join("library.txt"));

        repo.save(&Library::from_records(records)).unwrap();
        let first = std::fs::read(repo.path()).unwrap();

        let reloaded = repo.load().unwrap();
        repo.save(&reloaded).unwrap();
        let second = std::fs::read(repo.path()).unwrap();

        prop_assert_eq!(first, second);
    }
}

// =============================================================================
// Catalog Operations invariants
// =============================================================================

proptest! {
    /// title/authorのどちらかが空のaddは保存件数を変えない。
    #[test]
    fn add_with_blank_field_never_persists(
        records in library_strategy(),
        blank in "[ \t]{0,3}",
        blank_title in any::<bool>(),
    ) {
        let mut svc = CatalogService::open(InMemoryRepo::with_records(records.clone())).unwrap();
        let req = if blank_title {
            TestLibrary::add_request(&blank, "Author", 2000, false)
        } else {
            TestLibrary::add_request("Title", &blank, 2000, false)
        };

        prop_assert!(svc.add(req).is_err());
        prop_assert_eq!(svc.repository().stored().len(), records.len());
        prop_assert_eq!(svc.repository().save_count(), 0);
    }

    /// 一致しないキーでのremoveはLibraryもストアも変えない。
    #[test]
    fn remove_unmatched_key_is_noop(records in library_strategy()) {
        let mut svc = CatalogService::open(InMemoryRepo::with_records(records.clone())).unwrap();
        let before = svc.library().clone();

        // 生成される文字集合に '#' は含まれない
        let removed = svc.remove(&RemoveSelector::DisplayKey("#missing# by #nobody#".into())).unwrap();

        prop_assert!(removed.is_none());
        prop_assert_eq!(svc.library(), &before);
        prop_assert_eq!(svc.repository().save_count(), 0);
    }

    /// add → 複合キーでremove（重複なしの場合）で元に戻る。
    #[test]
    fn add_then_remove_restores_records(records in library_strategy(), extra in record_strategy()) {
        prop_assume!(!records.iter().any(|r| r.display_key() == extra.display_key()));
        let mut svc = CatalogService::open(InMemoryRepo::with_records(records.clone())).unwrap();

        svc.add(TestLibrary::add_request(
            extra.title(),
            extra.author(),
            u32::from(extra.year()),
            extra.is_read(),
        )).unwrap();
        prop_assert_eq!(svc.library().len(), records.len() + 1);

        svc.remove(&RemoveSelector::DisplayKey(extra.display_key())).unwrap();
        prop_assert_eq!(svc.repository().stored(), records);
    }

    /// 既読/未読の分割は全件を漏れなく、順序を保って含む。
    #[test]
    fn reading_lists_cover_library(records in library_strategy()) {
        let library = Library::from_records(records.clone());
        let lists = library.reading_lists();

        prop_assert_eq!(lists.read.len() + lists.unread.len(), records.len());
        prop_assert!(lists.read.iter().all(|e| e.record().is_read()));
        prop_assert!(lists.unread.iter().all(|e| !e.record().is_read()));

        let expected_read: Vec<&BookRecord> = records.iter().filter(|r| r.is_read()).collect();
        let actual_read: Vec<&BookRecord> = lists.read.iter().map(|e| e.record()).collect();
        prop_assert_eq!(actual_read, expected_read);
    }

    /// 既読率は0〜100に収まり、read/totalと整合する。
    #[test]
    fn stats_percent_in_range(records in library_strategy()) {
        let stats = Library::from_records(records.clone()).stats();

        prop_assert_eq!(stats.total, records.len());
        prop_assert!(stats.read <= stats.total);
        prop_assert!((0.0..=100.0).contains(&stats.percent_read));
        if stats.total > 0 {
            let exact = stats.read as f64 / stats.total as f64 * 100.0;
            prop_assert!((stats.percent_read - exact).abs() <= 0.005 + 1e-9);
        } else {
            prop_assert_eq!(stats.percent_read, 0.0);
        }
    }

    /// 検索結果は大文字小文字に依存しない。
    #[test]
    fn search_ignores_case(records in library_strategy(), query in "[A-Za-z]{0,3}") {
        let library = Library::from_records(records);
        let lower = library.search(SearchMode::Title, &query.to_lowercase()).count();
        let upper = library.search(SearchMode::Title, &query.to_uppercase()).count();
        prop_assert_eq!(lower, upper);
    }
}
