use serde::{Deserialize, Serialize};

use crate::domain::model::library::{LibraryEntry, LibraryStats, ReadingLists, SearchMode};

use super::action::CatalogOutcome;
use super::error::AppError;

/// レポート出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// JSON出力用の書籍DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: u16,
    pub genre: String,
    pub status: String,
}

impl BookView {
    pub fn from_entry(entry: &LibraryEntry) -> Self {
        let record = entry.record();
        Self {
            id: entry.id().to_string(),
            title: record.title().to_string(),
            author: record.author().to_string(),
            year: record.year(),
            genre: record.genre().to_string(),
            status: record.status_label().to_string(),
        }
    }
}

/// JSON出力用の操作結果DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportView {
    Added {
        book: BookView,
    },
    Removed {
        book: Option<BookView>,
    },
    Found {
        mode: String,
        query: String,
        books: Vec<BookView>,
    },
    Listed {
        read: Vec<BookView>,
        unread: Vec<BookView>,
    },
    Stats {
        total: usize,
        read: usize,
        percent_read: f64,
    },
}

/// CatalogOutcome → 表示用テキストへの変換
pub struct CatalogReport;

impl CatalogReport {
    pub fn render(
        outcome: &CatalogOutcome,
        format: ReportFormat,
        include_ids: bool,
    ) -> Result<String, AppError> {
        match format {
            ReportFormat::Markdown => Ok(Self::render_markdown(outcome, include_ids)),
            ReportFormat::Json => Self::render_json(outcome),
        }
    }

    /// 操作結果をMarkdown文字列に変換する。
    /// `include_ids` が真なら各書籍に短縮IDを付ける（削除指定に使える）。
    pub fn render_markdown(outcome: &CatalogOutcome, include_ids: bool) -> String {
        match outcome {
            CatalogOutcome::Added(entry) => {
                let mut line = format!("\"{}\" has been added.", entry.record().title());
                if include_ids {
                    line.push_str(&format!(" [{}]", entry.id().short()));
                }
                line
            }
            CatalogOutcome::Removed(Some(entry)) => {
                format!("\"{}\" removed.", entry.record().title())
            }
            CatalogOutcome::Removed(None) => "No book matched. Library unchanged.".to_string(),
            CatalogOutcome::Found { mode, query, books } => {
                Self::render_found(*mode, query, books, include_ids)
            }
            CatalogOutcome::Listed(lists) => Self::render_listing(lists, include_ids),
            CatalogOutcome::Stats(stats) => Self::render_stats(stats),
        }
    }

    /// 操作結果をJSON文字列に変換する。
    pub fn render_json(outcome: &CatalogOutcome) -> Result<String, AppError> {
        let view = Self::build_view(outcome);
        Ok(serde_json::to_string_pretty(&view)?)
    }

    pub fn build_view(outcome: &CatalogOutcome) -> ReportView {
        let views = |entries: &[LibraryEntry]| -> Vec<BookView> {
            entries.iter().map(BookView::from_entry).collect()
        };
        match outcome {
            CatalogOutcome::Added(entry) => ReportView::Added {
                book: BookView::from_entry(entry),
            },
            CatalogOutcome::Removed(entry) => ReportView::Removed {
                book: entry.as_ref().map(BookView::from_entry),
            },
            CatalogOutcome::Found { mode, query, books } => ReportView::Found {
                mode: mode.label().to_string(),
                query: query.clone(),
                books: views(books),
            },
            CatalogOutcome::Listed(lists) => ReportView::Listed {
                read: views(&lists.read),
                unread: views(&lists.unread),
            },
            CatalogOutcome::Stats(stats) => ReportView::Stats {
                total: stats.total,
                read: stats.read,
                percent_read: stats.percent_read,
            },
        }
    }

    fn render_found(
        mode: SearchMode,
        query: &str,
        books: &[LibraryEntry],
        include_ids: bool,
    ) -> String {
        match mode {
            SearchMode::Title => {
                if books.is_empty() {
                    return "No matching books found.".to_string();
                }
                let mut buf = String::from("## Matching Books\n\n");
                for (i, entry) in books.iter().enumerate() {
                    let record = entry.record();
                    buf.push_str(&format!(
                        "{}. {} by {} ({}) - {} - {}{}\n",
                        i + 1,
                        record.title(),
                        record.author(),
                        record.year(),
                        record.genre(),
                        record.status_label(),
                        Self::id_suffix(entry, include_ids)
                    ));
                }
                buf
            }
            // 著者検索は既読・未読に分けて表示する
            SearchMode::Author => {
                if books.is_empty() {
                    return "No books found by this author.".to_string();
                }
                let (read, unread): (Vec<&LibraryEntry>, Vec<&LibraryEntry>) =
                    books.iter().partition(|e| e.record().is_read());

                let mut buf = format!("## Books by {}\n\n", title_case(query.trim()));
                for (heading, group, empty) in [
                    ("Read Books", &read, "No read books."),
                    ("Unread Books", &unread, "No unread books."),
                ] {
                    buf.push_str(&format!("### {heading}\n\n"));
                    if group.is_empty() {
                        buf.push_str(&format!("{empty}\n\n"));
                        continue;
                    }
                    for entry in group.iter() {
                        let record = entry.record();
                        buf.push_str(&format!(
                            "- **{}** ({}) - {}{}\n",
                            record.title(),
                            record.year(),
                            record.genre(),
                            Self::id_suffix(entry, include_ids)
                        ));
                    }
                    buf.push('\n');
                }
                buf
            }
        }
    }

    fn render_listing(lists: &ReadingLists, include_ids: bool) -> String {
        if lists.is_empty() {
            return "Library is empty.".to_string();
        }

        let mut buf = String::new();
        for (heading, group, empty) in [
            ("Read Books", &lists.read, "No books marked as read."),
            ("Unread Books", &lists.unread, "No unread books."),
        ] {
            buf.push_str(&format!("## {heading}\n\n"));
            if group.is_empty() {
                buf.push_str(&format!("{empty}\n\n"));
                continue;
            }
            for entry in group {
                let record = entry.record();
                buf.push_str(&format!(
                    "### {}{}\n\n- Author: {}\n- Year: {}\n- Genre: {}\n\n",
                    record.title(),
                    Self::id_suffix(entry, include_ids),
                    record.author(),
                    record.year(),
                    record.genre()
                ));
            }
        }
        buf
    }

    fn render_stats(stats: &LibraryStats) -> String {
        format!(
            "## Statistics\n\n- Total books: {}\n- Books read: {}\n- Percentage read: {:.2}%\n",
            stats.total, stats.read, stats.percent_read
        )
    }

    fn id_suffix(entry: &LibraryEntry, include_ids: bool) -> String {
        if include_ids {
            format!(" [{}]", entry.id().short())
        } else {
            String::new()
        }
    }
}

/// 大小文字を持つ文字の直後は小文字、それ以外の直後は大文字にする。空白はそのまま残す。
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}
