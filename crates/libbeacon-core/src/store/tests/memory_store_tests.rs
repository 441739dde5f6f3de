use crate::store::DataStore;
use crate::store::InMemoryStore;
use crate::store::Operator;
use crate::store::OrderDirection;
use crate::store::Relation;
use crate::store::StoreError;
use crate::test::blog_store;
use serde_json::json;

type Result<T> = std::result::Result<T, StoreError>;

mod queries {
    use super::*;

    #[tokio::test]
    async fn filters_and_orders_rows() -> Result<()> {
        let store = blog_store();
        let mut query = store.query("Post")?;
        query.add_where("user_id", Operator::Eq, json!("1"));
        query.order_by("title", OrderDirection::Desc);

        let titles: Vec<_> = query.get().await?
            .into_iter()
            .map(|row| row["title"].clone())
            .collect();
        assert_eq!(titles, vec![json!("Notes"), json!("Engines")]);
        Ok(())
    }

    #[tokio::test]
    async fn like_supports_both_wildcards() -> Result<()> {
        let store = blog_store();

        let mut query = store.query("Post")?;
        query.add_where("title", Operator::Like, json!("%o_"));
        let rows = query.get().await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], json!("COBOL"));

        let mut query = store.query("Post")?;
        query.add_where("title", Operator::NotLike, json!("c%"));
        assert_eq!(query.count().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn in_between_and_null_conditions() -> Result<()> {
        let store = InMemoryStore::new();
        store.seed("Item", vec![
            json!({"id": 1, "price": 5, "tag": null}),
            json!({"id": 2, "price": 15, "tag": "sale"}),
            json!({"id": 3, "price": 25}),
        ])?;

        let mut query = store.query("Item")?;
        query.where_in("id", vec![json!(1), json!(3)]);
        assert_eq!(query.count().await?, 2);

        let mut query = store.query("Item")?;
        query.where_between("price", json!(10), json!(25));
        assert_eq!(query.count().await?, 2);

        let mut query = store.query("Item")?;
        query.where_null("tag");
        assert_eq!(query.count().await?, 2);

        let mut query = store.query("Item")?;
        query.where_not_null("tag");
        query.where_not_in("id", vec![json!(1)]);
        assert_eq!(query.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn paginate_reports_total_and_slices() -> Result<()> {
        let store = blog_store();
        let query = store.query("Post")?;
        let page = query.paginate(3, 2).await?;
        assert_eq!(page.total, 4);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.last_page(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn paginate_far_past_the_end_is_empty() -> Result<()> {
        let store = blog_store();
        let query = store.query("Post")?;
        let page = query.paginate(u64::MAX, u64::MAX).await?;
        assert_eq!(page.total, 4);
        assert!(page.items.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn scopes_are_looked_up_per_model() -> Result<()> {
        let store = blog_store();
        store.define_scope("Post", "byUser", |query, args| {
            query.add_where("user_id", Operator::Eq, args["user"].clone());
            Ok(())
        })?;

        let mut query = store.query("Post")?;
        query.apply_scope("byUser", &json!({"user": 2}))?;
        assert_eq!(query.count().await?, 2);

        let mut query = store.query("User")?;
        assert_eq!(
            query.apply_scope("byUser", &json!({})),
            Err(StoreError::UnknownScope {
                model: "User".to_string(),
                scope: "byUser".to_string(),
            }),
        );
        Ok(())
    }

    #[tokio::test]
    async fn select_count_tracks_every_read() -> Result<()> {
        let store = blog_store();
        let query = store.query("User")?;
        query.get().await?;
        query.count().await?;
        assert_eq!(store.select_count()?, 2);
        store.reset_select_count()?;
        assert_eq!(store.select_count()?, 0);
        Ok(())
    }
}

mod writes {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_next_key() -> Result<()> {
        let store = blog_store();
        let row = store.insert("User", json!({"name": "Barbara"})
            .as_object()
            .cloned()
            .unwrap()).await?;
        assert_eq!(row["id"], json!(4));
        assert_eq!(store.rows("User")?.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn update_merges_columns() -> Result<()> {
        let store = blog_store();
        let changes = json!({"name": "Ada L."}).as_object().cloned().unwrap();
        let row = store.update("User", &json!("1"), changes).await?;
        assert_eq!(row["name"], json!("Ada L."));
        assert_eq!(row["email"], json!("ada@example.com"));
        Ok(())
    }

    #[tokio::test]
    async fn update_of_missing_row_fails() {
        let store = blog_store();
        let result = store.update("User", &json!(99), Default::default()).await;
        assert!(matches!(result, Err(StoreError::RowNotFound { .. })));
    }

    #[tokio::test]
    async fn delete_and_delete_where() -> Result<()> {
        let store = blog_store();
        assert!(store.delete("User", &json!(3)).await?.is_some());
        assert!(store.delete("User", &json!(3)).await?.is_none());

        let conditions = json!({"user_id": 1}).as_object().cloned().unwrap();
        assert_eq!(store.delete_where("Post", &conditions).await?, 2);
        assert_eq!(store.rows("Post")?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn rollback_restores_snapshot() -> Result<()> {
        let store = blog_store();
        store.begin().await?;
        store.delete("User", &json!(1)).await?;
        store.begin().await?;
        store.delete("User", &json!(2)).await?;
        store.commit().await?;
        store.rollback().await?;
        assert_eq!(store.rows("User")?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_one_transaction_stack() -> Result<()> {
        let store = blog_store();
        let clone = store.clone();
        store.begin().await?;
        clone.delete("User", &json!(1)).await?;
        clone.rollback().await?;
        assert_eq!(store.rows("User")?.len(), 3);
        assert_eq!(
            store.commit().await,
            Err(StoreError::NoTransaction { operation: "commit" }),
        );
        Ok(())
    }

    #[tokio::test]
    async fn commit_without_transaction_fails() {
        let store = InMemoryStore::new();
        assert_eq!(
            store.commit().await,
            Err(StoreError::NoTransaction { operation: "commit" }),
        );
    }
}

#[test]
fn relations_resolve_their_parent_key() -> Result<()> {
    let store = blog_store();
    assert_eq!(store.relation("User", "posts")?.parent_key(), "id");
    assert_eq!(store.relation("Post", "author")?.parent_key(), "user_id");
    assert!(store.relation("Post", "comments").is_err());
    assert!(Relation::has_one("Profile", "user_id").kind.is_single());
    Ok(())
}

#[test]
fn seeding_non_objects_is_rejected() {
    let store = InMemoryStore::new();
    assert!(store.seed("User", vec![json!([1, 2])]).is_err());
}
