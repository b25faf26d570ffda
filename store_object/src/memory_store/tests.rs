use crate::errors::StoreError;
use crate::id_type::{EntityId, EntityKey, KeyKind, KeyValue};
use crate::memory_store::MemoryDatabase;
use crate::metadata::{DeleteBehavior, ModelMetadata, Relationship};
use crate::query_builder::{QueryBuilder, QueryFilter};
use crate::traits::{Entity, EntityType, GraphMetadataProvider, KeyField, UnitOfWork};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Author {
    id: i64,
    name: String,
    hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Book {
    id: i64,
    author_id: Option<i64>,
    title: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Award {
    id: i64,
    author_id: i64,
}

macro_rules! test_entity {
    ($ty:ident, $name:literal, [$($field:ident),*]) => {
        impl EntityType for $ty {
            fn type_name() -> &'static str {
                $name
            }

            fn key_fields() -> Vec<KeyField> {
                vec![KeyField::new("id", KeyKind::Numeric)]
            }
        }

        impl Entity for $ty {
            fn entity_type(&self) -> &'static str {
                $name
            }

            fn key(&self) -> EntityKey {
                EntityKey::from(KeyValue::from(self.id))
            }

            fn contracts(&self) -> &'static [&'static str] {
                &[]
            }

            fn field(&self, name: &str) -> Option<Value> {
                match name {
                    "id" => Some(json!(self.id)),
                    $(stringify!($field) => serde_json::to_value(&self.$field).ok(),)*
                    _ => None,
                }
            }

            fn set_field(&mut self, name: &str, value: Value) -> Result<(), StoreError> {
                match name {
                    "id" => Err(StoreError::read_only_field($name, name)),
                    $(stringify!($field) => {
                        self.$field = serde_json::from_value(value)
                            .map_err(|e| StoreError::serialization($name, name, e))?;
                        Ok(())
                    })*
                    _ => Err(StoreError::unknown_field($name, name)),
                }
            }

            fn clone_entity(&self) -> Box<dyn Entity> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

test_entity!(Author, "authors", [name, hidden]);
test_entity!(Book, "books", [author_id, title]);
test_entity!(Award, "awards", [author_id]);

fn author_id(id: i64) -> EntityId {
    EntityId::new("authors", KeyValue::from(id))
}

fn book_id(id: i64) -> EntityId {
    EntityId::new("books", KeyValue::from(id))
}

async fn database(book_behavior: DeleteBehavior) -> Arc<MemoryDatabase> {
    let metadata = ModelMetadata::builder()
        .entity::<Author>()
        .entity::<Book>()
        .entity::<Award>()
        .relationship(
            Relationship::one_to_many::<Author, Book>("books", &["author_id"])
                .with_inverse("author")
                .on_delete(book_behavior),
        )
        .relationship(
            Relationship::one_to_many::<Author, Award>("awards", &["author_id"])
                .on_delete(DeleteBehavior::Restrict),
        )
        .build()
        .expect("valid model");

    let database = MemoryDatabase::new(metadata)
        .with_visibility_filter("authors", QueryFilter::eq("hidden", json!(false)));

    for (id, name, hidden) in [(1, "Ann", false), (2, "Bob", false), (3, "Cy", true)] {
        database
            .insert(Author {
                id,
                name: name.to_string(),
                hidden,
            })
            .await
            .expect("insert author");
    }
    for (id, author, title) in [(10, 1, "First"), (11, 1, "Second"), (12, 2, "Third")] {
        database
            .insert(Book {
                id,
                author_id: Some(author),
                title: title.to_string(),
            })
            .await
            .expect("insert book");
    }

    Arc::new(database)
}

#[tokio::test]
async fn test_load_by_keys_validates_keys() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();

    let count = session
        .load_by_keys("authors", &[KeyValue::from(1), KeyValue::from(2)], false)
        .await;
    assert!(matches!(
        count,
        Err(StoreError::KeyCountMismatch { provided: 2, expected: 1 })
    ));
    assert_eq!(
        count.unwrap_err().to_string(),
        "Mismatch in keys: your provided 2 key(s) and the entity has 1 key(s)"
    );

    let kind = session
        .load_by_keys("authors", &[KeyValue::from("1")], false)
        .await;
    assert!(matches!(
        kind,
        Err(StoreError::KeyTypeMismatch {
            position: 1,
            count: 1,
            provided: KeyKind::String,
            expected: KeyKind::Numeric,
        })
    ));

    let unknown = session.load_by_keys("readers", &[KeyValue::from(1)], false).await;
    assert!(matches!(unknown, Err(StoreError::UnknownEntityType(_))));
}

#[tokio::test]
async fn test_visibility_filter_and_bypass() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();

    let hidden = session.find::<Author>(&[KeyValue::from(3)]).await.expect("load");
    assert_eq!(hidden, None);

    let bypassed = session
        .load_by_keys("authors", &[KeyValue::from(3)], true)
        .await
        .expect("load");
    assert_eq!(bypassed, Some(author_id(3)));

    assert_eq!(database.count("authors", false).await, 2);
    assert_eq!(database.count("authors", true).await, 3);
    assert_eq!(session.query_count(), 2);
}

#[tokio::test]
async fn test_identity_map_returns_tracked_instance() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();

    let id = session
        .find::<Author>(&[KeyValue::from(1)])
        .await
        .expect("load")
        .expect("found");
    session
        .get_mut::<Author>(&id)
        .expect("tracked")
        .name = "Changed".to_string();

    let again = session
        .find::<Author>(&[KeyValue::from(1)])
        .await
        .expect("load")
        .expect("found");
    assert_eq!(again, id);
    assert_eq!(session.get::<Author>(&id).map(|a| a.name.as_str()), Some("Changed"));

    let committed = database.get::<Author>(&id).await.expect("row");
    assert_eq!(committed.name, "Ann");

    assert_eq!(session.commit().await.expect("commit"), 1);
    let committed = database.get::<Author>(&id).await.expect("row");
    assert_eq!(committed.name, "Changed");
}

#[tokio::test]
async fn test_query_matches_every_condition() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();

    let query = QueryBuilder::new()
        .filter(QueryFilter::eq("author_id", json!(1)))
        .filter(QueryFilter::is_not_null("title"));
    let found = session.query("books", &query, false).await.expect("query");
    assert_eq!(found, vec![book_id(10), book_id(11)]);

    let query = query.filter(QueryFilter::eq("title", json!("Second")));
    let found = session.query("books", &query, false).await.expect("query");
    assert_eq!(found, vec![book_id(11)]);
}

#[tokio::test]
async fn test_navigation_loading_and_fixup() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();
    let ann = session
        .find::<Author>(&[KeyValue::from(1)])
        .await
        .expect("load")
        .expect("found");

    assert_eq!(session.loaded_navigation(&ann, "books"), None);

    let edge = session.metadata().dependent_edges("authors")[0].clone();
    let filter = QueryFilter::eq("title", json!("Second"));
    let books = session
        .load_navigation(&ann, &edge, Some(&filter))
        .await
        .expect("navigation");
    assert_eq!(books, vec![book_id(11)]);
    assert_eq!(session.loaded_navigation(&ann, "books"), Some(vec![book_id(11)]));

    let author = session.include(&book_id(11), "author").await.expect("include");
    assert_eq!(author, vec![ann.clone()]);
    assert_eq!(
        session.loaded_navigation(&book_id(11), "author"),
        Some(vec![ann])
    );
}

#[tokio::test]
async fn test_cascade_delete_removes_dependents() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();
    let ann = session
        .find::<Author>(&[KeyValue::from(1)])
        .await
        .expect("load")
        .expect("found");

    session.remove(&ann).expect("remove");
    assert!(session.entity(&ann).is_none());
    assert_eq!(session.commit().await.expect("commit"), 3);

    assert_eq!(database.count("authors", true).await, 2);
    let books = database.rows::<Book>().await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, 12);
}

#[tokio::test]
async fn test_set_null_delete_keeps_dependents() {
    let database = database(DeleteBehavior::SetNull).await;
    let mut session = database.session();
    let ann = session
        .find::<Author>(&[KeyValue::from(1)])
        .await
        .expect("load")
        .expect("found");

    session.remove(&ann).expect("remove");
    session.commit().await.expect("commit");

    let orphan = database.get::<Book>(&book_id(10)).await.expect("row");
    assert_eq!(orphan.author_id, None);
}

#[tokio::test]
async fn test_restricted_delete_is_atomic() {
    let database = database(DeleteBehavior::Cascade).await;
    database
        .insert(Award { id: 1, author_id: 2 })
        .await
        .expect("insert award");

    let mut session = database.session();
    let bob = session
        .find::<Author>(&[KeyValue::from(2)])
        .await
        .expect("load")
        .expect("found");
    session.remove(&bob).expect("remove");

    let result = session.commit().await;
    assert!(matches!(result, Err(StoreError::Constraint(_))));
    assert_eq!(database.count("authors", true).await, 3);
    assert_eq!(database.rows::<Book>().await.len(), 3);
}

#[tokio::test]
async fn test_discard_changes_restores_committed_state() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();
    let ann = session
        .find::<Author>(&[KeyValue::from(1)])
        .await
        .expect("load")
        .expect("found");
    let bob = session
        .find::<Author>(&[KeyValue::from(2)])
        .await
        .expect("load")
        .expect("found");

    session.get_mut::<Author>(&ann).expect("tracked").name = "Changed".to_string();
    session.remove(&bob).expect("remove");
    assert!(session.has_changes());

    session.discard_changes().await;
    assert!(!session.has_changes());
    assert_eq!(session.get::<Author>(&ann).map(|a| a.name.as_str()), Some("Ann"));
    assert!(session.is_tracked(&bob));

    assert_eq!(session.commit().await.expect("commit"), 0);
    assert_eq!(database.count("authors", true).await, 3);
    assert_eq!(database.get::<Author>(&ann).await.expect("row").name, "Ann");
}

#[tokio::test]
async fn test_remove_untracked_entity_fails() {
    let database = database(DeleteBehavior::Cascade).await;
    let mut session = database.session();

    let result = session.remove(&author_id(1));
    assert!(matches!(result, Err(StoreError::NotTracked(_))));
    assert!(!session.has_changes());
}
