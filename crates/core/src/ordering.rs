//! Display ordering for catalog listings.
//!
//! The record store only supports equality filters and full scans, so every
//! listing is sorted here after it is read:
//!
//! - Category pages show products newest first.
//! - The featured list is sorted by `order` ascending, with ties broken by
//!   `createdAt` descending. `order` values are not unique, so the tiebreak is
//!   what makes the sort deterministic.
//!
//! Reordering the featured list never renumbers it. Moving a record one step
//! swaps its `order` value with its displayed neighbour's, which takes two
//! independent writes (see [`plan_move`]).

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{FeaturedProduct, FeaturedProductId, Product};

/// Compare two products so that the most recently created comes first.
#[must_use]
pub fn newest_first(a: &Product, b: &Product) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Compare two featured products in display order.
#[must_use]
pub fn featured_display_order(a: &FeaturedProduct, b: &FeaturedProduct) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort products newest first, in place.
pub fn sort_newest_first(products: &mut [Product]) {
    products.sort_by(newest_first);
}

/// Sort featured products into display order, in place.
pub fn sort_featured(products: &mut [FeaturedProduct]) {
    products.sort_by(featured_display_order);
}

/// Distinct subcategories in first-occurrence order.
///
/// Feed this a list already sorted for display; the result follows that order
/// rather than being alphabetical.
#[must_use]
pub fn distinct_subcategories(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|product| seen.insert(product.subcategory.as_str()))
        .map(|product| product.subcategory.clone())
        .collect()
}

/// Group products by subcategory, keeping first-occurrence order for both the
/// groups and the products inside each group.
#[must_use]
pub fn group_by_subcategory(products: Vec<Product>) -> Vec<(String, Vec<Product>)> {
    let mut groups: Vec<(String, Vec<Product>)> = Vec::new();
    for product in products {
        match groups
            .iter_mut()
            .find(|(name, _)| *name == product.subcategory)
        {
            Some((_, members)) => members.push(product),
            None => groups.push((product.subcategory.clone(), vec![product])),
        }
    }
    groups
}

/// Direction of a one-step move in the featured list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(format!("invalid direction: {s}")),
        }
    }
}

/// The two writes needed to move a featured record one step.
///
/// `record` takes `record_order` (its neighbour's old value) and `neighbour`
/// takes `neighbour_order` (the record's old value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSwap {
    pub record: FeaturedProductId,
    pub record_order: i64,
    pub neighbour: FeaturedProductId,
    pub neighbour_order: i64,
}

/// Plan a one-step move of `id` within the displayed featured list.
///
/// `displayed` must be the list as currently shown, i.e. already in display
/// order. Returns `None` when the record is not in the list, or when it is
/// already first (moving up) or last (moving down); callers must issue no
/// writes in that case.
///
/// An `order` of 0 counts as unset, and the record's displayed position is
/// used in its place. When the two ranks would not put the record on the
/// other side of its neighbour after a plain swap (shared rank, or a position
/// that disagrees with a neighbour's stored rank), the record takes the
/// neighbour's rank and the neighbour is pushed one past it.
#[must_use]
pub fn plan_move(
    displayed: &[FeaturedProduct],
    id: &FeaturedProductId,
    direction: Direction,
) -> Option<OrderSwap> {
    let index = displayed.iter().position(|product| &product.id == id)?;
    let target = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };

    let record = displayed.get(index)?;
    let neighbour = displayed.get(target)?;

    let record_rank = effective_rank(record, index);
    let neighbour_rank = effective_rank(neighbour, target);

    let (record_order, neighbour_order) = match direction {
        Direction::Up if neighbour_rank < record_rank => (neighbour_rank, record_rank),
        Direction::Down if neighbour_rank > record_rank => (neighbour_rank, record_rank),
        Direction::Up => (neighbour_rank, neighbour_rank.saturating_add(1)),
        Direction::Down => (neighbour_rank.saturating_add(1), neighbour_rank),
    };

    Some(OrderSwap {
        record: record.id.clone(),
        record_order,
        neighbour: neighbour.id.clone(),
        neighbour_order,
    })
}

/// Stored rank, or the displayed position when the rank is unset.
fn effective_rank(product: &FeaturedProduct, index: usize) -> i64 {
    if product.order == 0 {
        i64::try_from(index).unwrap_or(i64::MAX)
    } else {
        product.order
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::types::{Category, ProductId};

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(seconds)
    }

    fn product(id: &str, subcategory: &str, created: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            image: format!("https://img.example/{id}.jpg"),
            category: Category::Rejas,
            subcategory: subcategory.to_string(),
            price: None,
            description: None,
            created_at: at(created),
        }
    }

    fn featured(id: &str, order: i64, created: i64) -> FeaturedProduct {
        FeaturedProduct {
            id: FeaturedProductId::new(id),
            name: id.to_uppercase(),
            image: format!("https://img.example/{id}.jpg"),
            category: Category::Puertas,
            price: None,
            description: None,
            order,
            created_at: at(created),
        }
    }

    fn ids(products: &[FeaturedProduct]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_newest_first() {
        let mut products = vec![product("a", "x", 10), product("b", "x", 30), product("c", "x", 20)];
        sort_newest_first(&mut products);
        let order: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_featured_sorts_by_order_then_newest() {
        let mut products = vec![
            featured("late", 1, 50),
            featured("old-zero", 0, 10),
            featured("new-zero", 0, 40),
            featured("early", 1, 5),
        ];
        sort_featured(&mut products);
        assert_eq!(ids(&products), vec!["new-zero", "old-zero", "late", "early"]);
    }

    #[test]
    fn test_featured_negative_orders_sort_first() {
        let mut products = vec![featured("a", 2, 0), featured("b", -1, 0)];
        sort_featured(&mut products);
        assert_eq!(ids(&products), vec!["b", "a"]);
    }

    #[test]
    fn test_distinct_subcategories_keeps_first_occurrence() {
        let products = vec![
            product("a", "Simples", 3),
            product("b", "Dobles", 2),
            product("c", "Simples", 1),
            product("d", "Automáticos", 0),
        ];
        assert_eq!(
            distinct_subcategories(&products),
            vec!["Simples", "Dobles", "Automáticos"]
        );
    }

    #[test]
    fn test_group_by_subcategory() {
        let products = vec![
            product("a", "Simples", 3),
            product("b", "Dobles", 2),
            product("c", "Simples", 1),
        ];
        let groups = group_by_subcategory(products);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Simples");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Dobles");
    }

    #[test]
    fn test_plan_move_up_swaps_with_previous() {
        let displayed = vec![featured("a", 0, 0), featured("b", 1, 0), featured("c", 2, 0)];
        let swap = plan_move(&displayed, &FeaturedProductId::new("b"), Direction::Up);
        assert_eq!(
            swap,
            Some(OrderSwap {
                record: FeaturedProductId::new("b"),
                record_order: 0,
                neighbour: FeaturedProductId::new("a"),
                neighbour_order: 1,
            })
        );
    }

    #[test]
    fn test_plan_move_down_swaps_with_next() {
        let displayed = vec![featured("a", 0, 0), featured("b", 5, 0), featured("c", 9, 0)];
        let swap = plan_move(&displayed, &FeaturedProductId::new("b"), Direction::Down);
        let swap = swap.as_ref();
        assert_eq!(swap.map(|s| s.neighbour.as_str()), Some("c"));
        assert_eq!(swap.map(|s| (s.record_order, s.neighbour_order)), Some((9, 5)));
    }

    #[test]
    fn test_plan_move_unranked_uses_position() {
        // Newest first among equal ranks: c, b, a.
        let displayed = vec![featured("c", 0, 2), featured("b", 0, 1), featured("a", 0, 0)];
        let swap = plan_move(&displayed, &FeaturedProductId::new("a"), Direction::Up).unwrap();
        assert_eq!(swap.neighbour.as_str(), "b");
        assert_eq!((swap.record_order, swap.neighbour_order), (1, 2));
    }

    #[test]
    fn test_plan_move_shared_rank_separates_pair() {
        let displayed = vec![featured("z", 0, 1), featured("y", 1, 9), featured("x", 1, 5)];
        let swap = plan_move(&displayed, &FeaturedProductId::new("x"), Direction::Up).unwrap();
        assert_eq!(swap.neighbour.as_str(), "y");
        assert_eq!((swap.record_order, swap.neighbour_order), (1, 2));

        let displayed = vec![featured("p", 4, 9), featured("q", 4, 5)];
        let swap = plan_move(&displayed, &FeaturedProductId::new("p"), Direction::Down).unwrap();
        assert_eq!((swap.record_order, swap.neighbour_order), (5, 4));
    }

    #[test]
    fn test_plan_move_ranked_after_unranked_moves_up() {
        let mut displayed = vec![
            featured("a", 0, 3),
            featured("b", 0, 2),
            featured("c", 0, 1),
            featured("d", 1, 0),
        ];
        let swap = plan_move(&displayed, &FeaturedProductId::new("d"), Direction::Up).unwrap();
        assert_eq!((swap.record_order, swap.neighbour_order), (2, 3));

        for product in &mut displayed {
            if product.id == swap.record {
                product.order = swap.record_order;
            } else if product.id == swap.neighbour {
                product.order = swap.neighbour_order;
            }
        }
        sort_featured(&mut displayed);
        assert_eq!(ids(&displayed), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_plan_move_at_edges_is_none() {
        let displayed = vec![featured("a", 0, 0), featured("b", 1, 0)];
        assert_eq!(
            plan_move(&displayed, &FeaturedProductId::new("a"), Direction::Up),
            None
        );
        assert_eq!(
            plan_move(&displayed, &FeaturedProductId::new("b"), Direction::Down),
            None
        );
    }

    #[test]
    fn test_plan_move_unknown_id_is_none() {
        let displayed = vec![featured("a", 0, 0)];
        assert_eq!(
            plan_move(&displayed, &FeaturedProductId::new("zzz"), Direction::Down),
            None
        );
        assert_eq!(plan_move(&[], &FeaturedProductId::new("a"), Direction::Up), None);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("down".parse::<Direction>(), Ok(Direction::Down));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
