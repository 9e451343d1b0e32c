use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Search Google Books. No authentication required.
    async fn search_google_books(&self, ctx: &Context<'_>, query: String) -> Result<Vec<Book>> {
        let search = ctx.data_unchecked::<Arc<dyn BookSearch>>();

        let books = search.search(&query).await.map_err(|e| {
            tracing::warn!(query = %query, error = %e, "Book search failed");
            AppError::from(e).extend()
        })?;

        Ok(books.into_iter().map(Book::from).collect())
    }
}
