//! Catalog listing order and featured reordering against the in-memory store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use herreria_core::{
    Category, Direction, FeaturedProductId, NewFeaturedProduct, NewProduct, ProductPatch,
};
use herreria_integration_tests::{
    at, featured_fields, memory_catalog, product_fields, seed_abc,
};
use herreria_site::catalog::MoveOutcome;
use herreria_site::store::{Collection, FieldValue};

fn names<T>(records: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
    records.iter().map(|r| name(r).to_string()).collect()
}

#[tokio::test]
async fn list_by_category_filters_and_sorts_newest_first() {
    let (catalog, store) = memory_catalog();
    store
        .insert(
            Collection::Products,
            "old",
            product_fields("Reja vieja", Category::Rejas, "Ventanas", at(1)),
        )
        .await;
    store
        .insert(
            Collection::Products,
            "new",
            product_fields("Reja nueva", Category::Rejas, "Balcones", at(30)),
        )
        .await;
    store
        .insert(
            Collection::Products,
            "door",
            product_fields("Puerta", Category::Puertas, "Entrada", at(45)),
        )
        .await;

    let rejas = catalog.list_by_category(Category::Rejas).await;
    assert_eq!(names(&rejas, |p| p.name.as_str()), ["Reja nueva", "Reja vieja"]);
    assert!(rejas.iter().all(|p| p.category == Category::Rejas));
    assert!(rejas.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn reads_are_idempotent() {
    let (catalog, store) = memory_catalog();
    seed_abc(&store).await;
    store
        .insert(
            Collection::Products,
            "p1",
            product_fields("Góndola", Category::Gondolas, "Simple", at(3)),
        )
        .await;

    assert_eq!(catalog.list_featured().await, catalog.list_featured().await);
    assert_eq!(
        catalog.list_by_category(Category::Gondolas).await,
        catalog.list_by_category(Category::Gondolas).await
    );
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn empty_category_lists_nothing() {
    let (catalog, _store) = memory_catalog();
    assert!(catalog.list_by_category(Category::Muebles).await.is_empty());
    assert!(catalog.list_subcategories(Category::Muebles).await.is_empty());
}

#[tokio::test]
async fn featured_orders_by_rank_then_newest() {
    let (catalog, store) = memory_catalog();
    store
        .insert(Collection::FeaturedProducts, "x", featured_fields("X", 1, at(5)))
        .await;
    store
        .insert(Collection::FeaturedProducts, "y", featured_fields("Y", 1, at(9)))
        .await;
    store
        .insert(Collection::FeaturedProducts, "z", featured_fields("Z", 0, at(1)))
        .await;

    let featured = catalog.list_featured().await;
    assert_eq!(names(&featured, |p| p.name.as_str()), ["Z", "Y", "X"]);
    assert!(featured.windows(2).all(|w| w[0].order <= w[1].order));
}

#[tokio::test]
async fn added_records_read_back_with_defaults() {
    let (catalog, _store) = memory_catalog();

    let id = catalog
        .add(NewProduct {
            name: "Escalera caracol".to_string(),
            image: "https://img.example/caracol.jpg".to_string(),
            category: Category::Escaleras,
            subcategory: "Caracol".to_string(),
            price: None,
            description: Some("Hierro macizo".to_string()),
        })
        .await
        .unwrap();

    let products = catalog.list_by_category(Category::Escaleras).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, id);
    assert_eq!(products[0].price, None);
    assert_eq!(products[0].description.as_deref(), Some("Hierro macizo"));

    catalog
        .add_featured(NewFeaturedProduct {
            name: "Estante".to_string(),
            image: "https://img.example/estante.jpg".to_string(),
            category: Category::Estanterias,
            price: None,
            description: None,
            order: None,
        })
        .await
        .unwrap();

    let featured = catalog.list_featured().await;
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].order, 0);
}

#[tokio::test]
async fn update_without_price_keeps_price() {
    let (catalog, store) = memory_catalog();
    let mut fields = product_fields("Portón", Category::Portones, "Corredizo", at(2));
    fields.insert("price".to_string(), "$ 900.000".into());
    store.insert(Collection::Products, "p1", fields).await;

    let patch = ProductPatch {
        name: Some("Portón doble".to_string()),
        ..ProductPatch::default()
    };
    assert!(catalog.update(&"p1".into(), patch).await);

    let products = catalog.list_by_category(Category::Portones).await;
    assert_eq!(products[0].name, "Portón doble");
    assert_eq!(products[0].price.as_deref(), Some("$ 900.000"));
}

#[tokio::test]
async fn move_up_swaps_with_previous() {
    let (catalog, store) = memory_catalog();
    seed_abc(&store).await;

    let displayed = catalog.list_featured().await;
    let outcome = catalog
        .move_featured(&displayed, &FeaturedProductId::new("B"), Direction::Up)
        .await;
    assert_eq!(outcome, MoveOutcome::Swapped);

    let featured = catalog.list_featured().await;
    assert_eq!(names(&featured, |p| p.name.as_str()), ["B", "A", "C"]);
    let orders: Vec<i64> = featured.iter().map(|p| p.order).collect();
    assert_eq!(orders, [0, 1, 2]);

    let a = store.get(Collection::FeaturedProducts, "A").await.unwrap();
    assert_eq!(a["order"], FieldValue::Integer(1));
    assert_eq!(store.write_count().await, 2);
}

#[tokio::test]
async fn move_down_swaps_with_next() {
    let (catalog, store) = memory_catalog();
    seed_abc(&store).await;

    let displayed = catalog.list_featured().await;
    let outcome = catalog
        .move_featured(&displayed, &FeaturedProductId::new("B"), Direction::Down)
        .await;
    assert_eq!(outcome, MoveOutcome::Swapped);

    let featured = catalog.list_featured().await;
    assert_eq!(names(&featured, |p| p.name.as_str()), ["A", "C", "B"]);
}

#[tokio::test]
async fn move_reorders_records_without_rank() {
    let (catalog, store) = memory_catalog();
    for (id, minute) in [("A", 0), ("B", 1), ("C", 2)] {
        store
            .insert(Collection::FeaturedProducts, id, featured_fields(id, 0, at(minute)))
            .await;
    }

    let displayed = catalog.list_featured().await;
    assert_eq!(names(&displayed, |p| p.name.as_str()), ["C", "B", "A"]);

    let outcome = catalog
        .move_featured(&displayed, &FeaturedProductId::new("A"), Direction::Up)
        .await;
    assert_eq!(outcome, MoveOutcome::Swapped);

    let featured = catalog.list_featured().await;
    assert_eq!(names(&featured, |p| p.name.as_str()), ["C", "A", "B"]);
    let a = store.get(Collection::FeaturedProducts, "A").await.unwrap();
    let b = store.get(Collection::FeaturedProducts, "B").await.unwrap();
    assert_eq!(a["order"], FieldValue::Integer(1));
    assert_eq!(b["order"], FieldValue::Integer(2));
    assert_eq!(store.write_count().await, 2);
}

#[tokio::test]
async fn newly_added_featured_can_be_moved() {
    let (catalog, _store) = memory_catalog();
    for name in ["Reja", "Puerta"] {
        catalog
            .add_featured(NewFeaturedProduct {
                name: name.to_string(),
                image: format!("https://img.example/{name}.jpg"),
                category: Category::Rejas,
                price: None,
                description: None,
                order: None,
            })
            .await
            .unwrap();
    }

    let displayed = catalog.list_featured().await;
    let last = displayed[1].id.clone();
    let outcome = catalog.move_featured(&displayed, &last, Direction::Up).await;
    assert_eq!(outcome, MoveOutcome::Swapped);

    let featured = catalog.list_featured().await;
    assert_eq!(featured[0].id, last);
    assert_ne!(
        names(&featured, |p| p.name.as_str()),
        names(&displayed, |p| p.name.as_str())
    );
}

#[tokio::test]
async fn move_separates_records_sharing_a_rank() {
    let (catalog, store) = memory_catalog();
    store
        .insert(Collection::FeaturedProducts, "x", featured_fields("X", 1, at(5)))
        .await;
    store
        .insert(Collection::FeaturedProducts, "y", featured_fields("Y", 1, at(9)))
        .await;
    store
        .insert(Collection::FeaturedProducts, "z", featured_fields("Z", 0, at(1)))
        .await;

    let displayed = catalog.list_featured().await;
    assert_eq!(names(&displayed, |p| p.name.as_str()), ["Z", "Y", "X"]);

    let outcome = catalog
        .move_featured(&displayed, &FeaturedProductId::new("x"), Direction::Up)
        .await;
    assert_eq!(outcome, MoveOutcome::Swapped);

    let featured = catalog.list_featured().await;
    assert_eq!(names(&featured, |p| p.name.as_str()), ["Z", "X", "Y"]);
    let orders: Vec<i64> = featured.iter().map(|p| p.order).collect();
    assert_eq!(orders, [0, 1, 2]);
}

#[tokio::test]
async fn moves_past_the_edges_write_nothing() {
    let (catalog, store) = memory_catalog();
    seed_abc(&store).await;
    let displayed = catalog.list_featured().await;

    let first_up = catalog
        .move_featured(&displayed, &FeaturedProductId::new("A"), Direction::Up)
        .await;
    let last_down = catalog
        .move_featured(&displayed, &FeaturedProductId::new("C"), Direction::Down)
        .await;
    let unknown = catalog
        .move_featured(&displayed, &FeaturedProductId::new("Q"), Direction::Up)
        .await;

    assert_eq!(first_up, MoveOutcome::Unchanged);
    assert_eq!(last_down, MoveOutcome::Unchanged);
    assert_eq!(unknown, MoveOutcome::Unchanged);
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn failed_second_write_leaves_duplicate_rank() {
    let (catalog, store) = memory_catalog();
    seed_abc(&store).await;
    let displayed = catalog.list_featured().await;

    store.fail_writes_after(1).await;
    let outcome = catalog
        .move_featured(&displayed, &FeaturedProductId::new("B"), Direction::Up)
        .await;

    assert_eq!(
        outcome,
        MoveOutcome::Incomplete {
            record_written: true,
            neighbour_written: false,
        }
    );
    assert_eq!(store.write_count().await, 2);

    let a = store.get(Collection::FeaturedProducts, "A").await.unwrap();
    let b = store.get(Collection::FeaturedProducts, "B").await.unwrap();
    assert_eq!(a["order"], FieldValue::Integer(0));
    assert_eq!(b["order"], FieldValue::Integer(0));
}

#[tokio::test]
async fn unavailable_store_reads_empty_and_writes_fail() {
    let (catalog, store) = memory_catalog();
    seed_abc(&store).await;
    store.set_unavailable(true).await;

    assert!(catalog.list_featured().await.is_empty());
    assert!(catalog.ping().await.is_err());
    assert!(!catalog.remove_featured(&FeaturedProductId::new("A")).await);

    store.set_unavailable(false).await;
    assert_eq!(catalog.list_featured().await.len(), 3);
}
