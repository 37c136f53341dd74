use crate::domain::error::DomainError;

/// 出版年の上限。
pub const MAX_YEAR: u16 = 9999;

/// 書籍追加リクエスト。検証を通ったものだけがBookRecordになる。
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub year: u32,
    pub genre: String,
    pub read: bool,
}

impl AddBookRequest {
    /// 入力を検証してBookRecordに変換する。
    pub fn into_record(self) -> Result<BookRecord, DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::MissingTitle);
        }
        if self.author.trim().is_empty() {
            return Err(DomainError::MissingAuthor);
        }
        let year = u16::try_from(self.year)
            .ok()
            .filter(|y| *y <= MAX_YEAR)
            .ok_or(DomainError::YearOutOfRange(self.year))?;

        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
        ] {
            if !is_storable(value) {
                return Err(DomainError::DelimiterInField { field });
            }
        }

        Ok(BookRecord::new(
            self.title,
            self.author,
            year,
            self.genre,
            self.read,
        ))
    }
}

/// 区切り文字・改行を含まないフィールドだけが1行1レコードで保存できる。
pub fn is_storable(value: &str) -> bool {
    !value.contains(['|', '\n', '\r'])
}

/// 書籍レコード。Libraryの1要素。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    title: String,
    author: String,
    year: u16,
    genre: String,
    read: bool,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: u16,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    /// ファイル・表示で使う既読状態のラベル
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }

    /// 削除対象の指定に使う複合キー `"Title by Author"`。一意とは限らない。
    pub fn display_key(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }
}
