//! Label and category business logic.
//!
//! Labels are the spending categories records are filed under; categories are
//! an optional grouping above them. Functions are generic over
//! [`ConnectionTrait`] so they also run inside a database transaction.

use crate::{
    entities::{Category, Label, category, label},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Name cannot be empty".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Creates a new category.
#[instrument(skip(db))]
pub async fn create_category<C>(db: &C, name: &str) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let model = category::ActiveModel {
        name: Set(validated_name(name)?),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!(id = created.id, "Created category");
    Ok(created)
}

/// Finds a category by its unique ID.
pub async fn get_category_by_id<C>(db: &C, category_id: i64) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new label, optionally grouped under an existing category.
///
/// The name is trimmed and must not be empty. A `category_id` that does not
/// exist is rejected with [`Error::CategoryNotFound`].
#[instrument(skip(db))]
pub async fn create_label<C>(db: &C, name: &str, category_id: Option<i64>) -> Result<label::Model>
where
    C: ConnectionTrait,
{
    let name = validated_name(name)?;

    if let Some(id) = category_id {
        if get_category_by_id(db, id).await?.is_none() {
            return Err(Error::CategoryNotFound { id });
        }
    }

    let model = label::ActiveModel {
        name: Set(name),
        category_id: Set(category_id),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!(id = created.id, "Created label");
    Ok(created)
}

/// Finds a label by its unique ID.
pub async fn get_label_by_id<C>(db: &C, label_id: i64) -> Result<Option<label::Model>>
where
    C: ConnectionTrait,
{
    Label::find_by_id(label_id).one(db).await.map_err(Into::into)
}

/// Finds a label by its exact name.
pub async fn get_label_by_name<C>(db: &C, name: &str) -> Result<Option<label::Model>>
where
    C: ConnectionTrait,
{
    Label::find()
        .filter(label::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the label called `name`, creating it first if it does not exist.
pub async fn find_or_create_label<C>(db: &C, name: &str) -> Result<label::Model>
where
    C: ConnectionTrait,
{
    match get_label_by_name(db, name).await? {
        Some(existing) => Ok(existing),
        None => create_label(db, name, None).await,
    }
}

/// Retrieves every label, ordered alphabetically by name.
pub async fn get_all_labels<C>(db: &C) -> Result<Vec<label::Model>>
where
    C: ConnectionTrait,
{
    Label::find()
        .order_by_asc(label::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the labels whose IDs are in `label_ids`. Unknown IDs are skipped.
pub async fn get_labels_by_ids<C>(db: &C, label_ids: &[i64]) -> Result<Vec<label::Model>>
where
    C: ConnectionTrait,
{
    if label_ids.is_empty() {
        return Ok(Vec::new());
    }

    Label::find()
        .filter(label::Column::Id.is_in(label_ids.iter().copied()))
        .order_by_asc(label::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_label_rejects_empty_name() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_label(&db, "   ", None).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = create_category(&db, "").await;
        assert!(matches!(result, Err(Error::Config { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_label_unknown_category() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();

        let result = create_label(&db, "Food", Some(42)).await;
        assert!(matches!(result, Err(Error::CategoryNotFound { id: 42 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_label() -> Result<()> {
        let db = setup_test_db().await?;

        let label = create_label(&db, "  Food ", None).await?;
        assert_eq!(label.name, "Food");
        assert_eq!(label.category_id, None);

        let found = get_label_by_id(&db, label.id).await?;
        assert_eq!(found, Some(label.clone()));

        let by_name = get_label_by_name(&db, "Food").await?;
        assert_eq!(by_name, Some(label));

        assert!(get_label_by_id(&db, 999).await?.is_none());
        assert!(get_label_by_name(&db, "Rent").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_label_with_category() -> Result<()> {
        let db = setup_test_db().await?;

        let category = create_category(&db, "Living").await?;
        let label = create_label(&db, "Rent", Some(category.id)).await?;
        assert_eq!(label.category_id, Some(category.id));

        let found = get_category_by_id(&db, category.id).await?.unwrap();
        assert_eq!(found.name, "Living");

        Ok(())
    }

    #[tokio::test]
    async fn test_find_or_create_label_reuses_existing() -> Result<()> {
        let db = setup_test_db().await?;

        let first = find_or_create_label(&db, "Study").await?;
        let second = find_or_create_label(&db, "Study").await?;
        assert_eq!(first, second);
        assert_eq!(get_all_labels(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_labels_sorted_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_label(&db, "Study").await?;
        create_test_label(&db, "Food").await?;
        create_test_label(&db, "Rent").await?;

        let names: Vec<String> = get_all_labels(&db)
            .await?
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent", "Study"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_labels_by_ids() -> Result<()> {
        let db = setup_test_db().await?;
        let food = create_test_label(&db, "Food").await?;
        let _study = create_test_label(&db, "Study").await?;
        let rent = create_test_label(&db, "Rent").await?;

        let found = get_labels_by_ids(&db, &[rent.id, food.id, 999]).await?;
        assert_eq!(found, vec![food, rent]);

        assert!(get_labels_by_ids(&db, &[]).await?.is_empty());

        Ok(())
    }
}
