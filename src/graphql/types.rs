//! GraphQL type definitions
//!
//! These types mirror our domain models but are decorated with async-graphql attributes.

use async_graphql::{ID, InputObject, SimpleObject};

use crate::db::{BookRecord, UserRecord};
use crate::services::AuthPayload;
use crate::services::google_books::authors_or_placeholder;

/// A book as returned by search or stored in a reading list
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Book {
    /// Google Books volume ID
    pub book_id: String,
    /// Never empty; a placeholder stands in when the source lists no authors
    pub authors: Vec<String>,
    pub description: Option<String>,
    /// Thumbnail URL, or empty string when there is none
    pub image: String,
    /// Link to the book's detail page
    pub link: String,
    pub title: String,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            book_id: r.book_id,
            authors: r.authors,
            description: r.description,
            image: r.image,
            link: r.link,
            title: r.title,
        }
    }
}

/// Book fields sent by the client when saving
#[derive(Debug, Clone, InputObject)]
pub struct BookInput {
    pub book_id: String,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub title: String,
}

impl From<BookInput> for BookRecord {
    fn from(input: BookInput) -> Self {
        Self {
            book_id: input.book_id,
            authors: authors_or_placeholder(input.authors),
            description: input.description,
            image: input.image.unwrap_or_default(),
            link: input.link.unwrap_or_default(),
            title: input.title,
        }
    }
}

/// A registered user. The password hash is never exposed.
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    #[graphql(name = "_id")]
    pub id: ID,
    pub username: String,
    pub email: String,
    /// Number of saved books
    pub book_count: i32,
    pub saved_books: Vec<Book>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: ID(r.id),
            username: r.username,
            email: r.email,
            book_count: r.saved_books.len() as i32,
            saved_books: r.saved_books.into_iter().map(Book::from).collect(),
        }
    }
}

/// Result of `addUser` and `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Auth {
    /// Bearer token for the `Authorization` header
    pub token: ID,
    pub user: User,
}

impl From<AuthPayload> for Auth {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: ID(payload.token),
            user: payload.user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::google_books::NO_AUTHOR_PLACEHOLDER;

    #[test]
    fn test_book_input_fills_defaults() {
        let record = BookRecord::from(BookInput {
            book_id: "x1".to_string(),
            authors: None,
            description: None,
            image: None,
            link: None,
            title: "Untitled".to_string(),
        });
        assert_eq!(record.authors, vec![NO_AUTHOR_PLACEHOLDER.to_string()]);
        assert_eq!(record.image, "");
        assert_eq!(record.link, "");
    }

    #[test]
    fn test_user_book_count() {
        let book = BookRecord {
            book_id: "a".to_string(),
            authors: vec!["A".to_string()],
            description: None,
            image: String::new(),
            link: String::new(),
            title: "A".to_string(),
        };
        let user = User::from(UserRecord {
            id: "u1".to_string(),
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            password_hash: "hash".to_string(),
            saved_books: vec![book.clone(), BookRecord { book_id: "b".to_string(), ..book }],
            created_at: String::new(),
            updated_at: String::new(),
        });
        assert_eq!(user.book_count, 2);
        assert_eq!(user.saved_books[1].book_id, "b");
        assert_eq!(user.id.as_str(), "u1");
    }
}
