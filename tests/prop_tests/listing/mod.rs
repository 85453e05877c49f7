use bson::doc;
use proptest::prelude::*;
use restaurant_directory::listing::{PageLimits, RawListingParams, fetch_listing, parse_listing};
use restaurant_directory::{CategoryMap, MemoryStore};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap()
}

fn store_of(n: usize) -> MemoryStore {
    MemoryStore::from_documents(
        (0..n)
            .map(|i| doc! {"name": format!("R{:03}", (i * 37) % 101), "restaurant_id": i.to_string()})
            .collect(),
    )
}

fn listing_params(page: usize, limit: usize) -> RawListingParams {
    RawListingParams {
        page: Some(page.to_string()),
        limit: Some(limit.to_string()),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        cases: 48,
        .. proptest::test_runner::Config::default()
    })]

    #[test]
    fn prop_page_size_and_total_pages(n in 0usize..60, page in 1usize..8, limit in 1usize..30) {
        let store = store_of(n);
        let q = parse_listing(&listing_params(page, limit), &CategoryMap::default(), &PageLimits::default()).unwrap();
        let listing = runtime().block_on(fetch_listing(&store, &q)).unwrap();
        let total = n as u64;
        prop_assert!(listing.restaurants.len() <= limit);
        prop_assert_eq!(listing.restaurants.len(), limit.min(n.saturating_sub((page - 1) * limit)));
        prop_assert_eq!(listing.total_restaurants, total);
        prop_assert_eq!(listing.total_pages, total.div_ceil(limit as u64));
        prop_assert_eq!(listing.current_page, page);
    }

    #[test]
    fn prop_pages_partition_the_sorted_listing(n in 0usize..40, limit in 1usize..12) {
        let store = store_of(n);
        let rt = runtime();
        let cats = CategoryMap::default();
        let limits = PageLimits::default();

        let everything = parse_listing(&listing_params(1, 100), &cats, &limits).unwrap();
        let full: Vec<String> = rt
            .block_on(fetch_listing(&store, &everything))
            .unwrap()
            .restaurants
            .into_iter()
            .map(|r| r.name)
            .collect();
        prop_assert!(full.windows(2).all(|w| w[0] <= w[1]));

        let pages = n.div_ceil(limit).max(1);
        let mut stitched = Vec::new();
        for page in 1..=pages {
            let q = parse_listing(&listing_params(page, limit), &cats, &limits).unwrap();
            let listing = rt.block_on(fetch_listing(&store, &q)).unwrap();
            stitched.extend(listing.restaurants.into_iter().map(|r| r.name));
        }
        prop_assert_eq!(stitched, full);
    }
}
