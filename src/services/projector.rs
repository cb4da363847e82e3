use crate::models::{CatalogItem, DisplayModel, GenreTaxonomy};

/// Projects catalog items into display models, preserving input order
///
/// Genre ids missing from the taxonomy are dropped silently. Pure and
/// deterministic: identical inputs always give identical output.
pub fn project(items: &[CatalogItem], taxonomy: &GenreTaxonomy) -> Vec<DisplayModel> {
    items.iter().map(|item| project_item(item, taxonomy)).collect()
}

fn project_item(item: &CatalogItem, taxonomy: &GenreTaxonomy) -> DisplayModel {
    let genre_names = item
        .genre_ids
        .iter()
        .filter_map(|id| taxonomy.name(*id))
        .map(str::to_string)
        .collect();

    DisplayModel {
        id: item.id,
        title: item.title.clone(),
        rating_text: format!("{:.1}", item.vote_average),
        year_text: year_text(item.release_date.as_deref()),
        genre_names,
        poster_path: item.poster_path.clone(),
    }
}

/// First four characters of the release date
fn year_text(release_date: Option<&str>) -> String {
    release_date
        .map(|date| date.chars().take(4).collect())
        .unwrap_or_default()
}
