use super::model::library::Library;

/// 永続化の抽象。Infra層が実装する。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 保存先が存在しなければ空のLibraryを返す。
    fn load(&self) -> Result<Library, Self::Error>;
    /// 保存先をLibraryの内容で丸ごと置き換える。
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
