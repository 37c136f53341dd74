use std::path::{Path, PathBuf};

use crate::domain::model::book::{is_storable, BookRecord, MAX_YEAR};
use crate::domain::model::library::Library;
use crate::domain::repository::LibraryRepository;

/// フィールド区切り文字
pub const DELIMITER: char = '|';
const READ_LABEL: &str = "Read";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected 5 fields, found {found}")]
    FieldCount { line: usize, found: usize },
    #[error("line {line}: invalid publication year '{value}'")]
    InvalidYear { line: usize, value: String },
    #[error("{field} '{value}' cannot be stored: contains '|' or a line break")]
    InvalidField { field: &'static str, value: String },
}

impl StoreError {
    /// 読み込み時のレコード形式エラーかどうか
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            StoreError::FieldCount { .. } | StoreError::InvalidYear { .. }
        )
    }
}

/// `|`区切りテキストファイルによるLibraryRepository実装。
/// 1行 = 1レコード: `Title|Author|Year|Genre|Read|Unread`
pub struct DelimitedLibraryRepository {
    path: PathBuf,
}

impl DelimitedLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 1行をレコードに変換する。`line_no`は1始まり。
pub fn parse_line(line: &str, line_no: usize) -> Result<BookRecord, StoreError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [title, author, year, genre, status] = fields[..] else {
        return Err(StoreError::FieldCount {
            line: line_no,
            found: fields.len(),
        });
    };

    let year = year
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|y| *y <= MAX_YEAR)
        .ok_or_else(|| StoreError::InvalidYear {
            line: line_no,
            value: year.to_string(),
        })?;

    Ok(BookRecord::new(
        title,
        author,
        year,
        genre,
        status == READ_LABEL,
    ))
}

/// レコードを1行（改行なし）に変換する。
pub fn format_line(record: &BookRecord) -> Result<String, StoreError> {
    for (field, value) in [
        ("title", record.title()),
        ("author", record.author()),
        ("genre", record.genre()),
    ] {
        if !is_storable(value) {
            return Err(StoreError::InvalidField {
                field,
                value: value.to_string(),
            });
        }
    }
    Ok(format!(
        "{}|{}|{}|{}|{}",
        record.title(),
        record.author(),
        record.year(),
        record.genre(),
        record.status_label()
    ))
}

impl LibraryRepository for DelimitedLibraryRepository {
    type Error = StoreError;

    fn load(&self) -> Result<Library, Self::Error> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "library file not found, starting empty");
            return Ok(Library::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let records = content
            .lines()
            .enumerate()
            .map(|(i, line)| parse_line(line, i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "library loaded");
        Ok(Library::from_records(records))
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        let mut content = String::new();
        for record in library.records() {
            content.push_str(&format_line(record)?);
            content.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), records = library.len(), "library saved");
        Ok(())
    }
}
