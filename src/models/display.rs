use serde::Serialize;

/// Display-ready summary of a catalog item
///
/// Always rebuilt wholesale from the backing items and taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayModel {
    pub id: u64,
    pub title: String,
    pub rating_text: String,
    pub year_text: String,
    pub genre_names: Vec<String>,
    pub poster_path: Option<String>,
}
