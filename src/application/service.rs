use crate::domain::model::book::{AddBookRequest, BookRecord};
use crate::domain::model::id::BookId;
use crate::domain::model::library::{
    Library, LibraryEntry, LibraryStats, ReadingLists, SearchMode,
};
use crate::domain::repository::LibraryRepository;

use super::action::{CatalogAction, CatalogOutcome, RemoveSelector};
use super::error::AppError;

/// カタログに対するユースケース。
/// セッション開始時に一度だけloadし、以降はLibraryを所有する。
/// 変更系は stage → save → commit の順で、保存に失敗したらメモリ上のLibraryは変わらない。
pub struct CatalogService<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> CatalogService<R> {
    /// 保存先からLibraryを読み込んでServiceを構築する。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let library = repo.load().map_err(|e| AppError::Storage(Box::new(e)))?;
        tracing::info!(books = library.len(), "catalog opened");
        Ok(Self { repo, library })
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 書籍を末尾に追加して永続化する。
    pub fn add(&mut self, req: AddBookRequest) -> Result<BookId, AppError> {
        self.add_entry(req).map(|entry| entry.id())
    }

    /// 指定された書籍を1件削除する。一致しなければ何もしない（保存もしない）。
    pub fn remove(&mut self, selector: &RemoveSelector) -> Result<Option<BookRecord>, AppError> {
        Ok(self.remove_entry(selector)?.map(LibraryEntry::into_record))
    }

    /// 部分一致検索。Libraryは変更しない。
    pub fn search<'a>(
        &'a self,
        mode: SearchMode,
        query: &str,
    ) -> impl Iterator<Item = &'a BookRecord> + 'a {
        self.library.search(mode, query).map(LibraryEntry::record)
    }

    /// 既読・未読に分けた全件一覧
    pub fn list_all(&self) -> ReadingLists {
        self.library.reading_lists()
    }

    pub fn stats(&self) -> LibraryStats {
        self.library.stats()
    }

    /// 操作を1つ実行する。
    pub fn execute(&mut self, action: CatalogAction) -> Result<CatalogOutcome, AppError> {
        match action {
            CatalogAction::Add(req) => self.add_entry(req).map(CatalogOutcome::Added),
            CatalogAction::Remove(selector) => {
                self.remove_entry(&selector).map(CatalogOutcome::Removed)
            }
            CatalogAction::Search { mode, query } => {
                let books = self.library.search(mode, &query).cloned().collect();
                Ok(CatalogOutcome::Found { mode, query, books })
            }
            CatalogAction::ListAll => Ok(CatalogOutcome::Listed(self.list_all())),
            CatalogAction::Stats => Ok(CatalogOutcome::Stats(self.stats())),
        }
    }

    // --- private ---

    fn add_entry(&mut self, req: AddBookRequest) -> Result<LibraryEntry, AppError> {
        let record = req.into_record().inspect_err(|e| {
            tracing::warn!(error = %e, "add rejected");
        })?;

        let mut staged = self.library.clone();
        let id = staged.push(record.clone());
        self.persist(&staged)?;
        self.library = staged;

        tracing::info!(%id, title = record.title(), "book added");
        Ok(LibraryEntry::new(id, record))
    }

    fn remove_entry(&mut self, selector: &RemoveSelector) -> Result<Option<LibraryEntry>, AppError> {
        let mut staged = self.library.clone();
        let removed = match selector {
            RemoveSelector::DisplayKey(key) => staged.remove_first_by_key(key),
            RemoveSelector::Id(id) => staged.remove_by_id(*id),
        };

        let Some(entry) = removed else {
            tracing::debug!(?selector, "remove matched nothing");
            return Ok(None);
        };

        self.persist(&staged)?;
        self.library = staged;

        tracing::info!(id = %entry.id(), title = entry.record().title(), "book removed");
        Ok(Some(entry))
    }

    fn persist(&self, library: &Library) -> Result<(), AppError> {
        self.repo
            .save(library)
            .map_err(|e| AppError::Storage(Box::new(e)))
    }
}
