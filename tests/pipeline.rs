//! Offline end-to-end test of the retrieval pipeline: a canned provider
//! payload flows through classification and normalization, gets paged,
//! and a picked article survives a favorites round-trip across "restart".

use newsdeck::api::{Category, NewsClient, Query};
use newsdeck::favorites::FavoritesStore;
use newsdeck::paging::Pager;

use tempfile::tempdir;

fn provider_payload(valid: usize, broken: usize) -> String {
    let mut items: Vec<String> = (0..valid)
        .map(|n| {
            format!(
                r#"{{"source":{{"id":"wire-{n}","name":"Wire {n}"}},"author":"Reporter {n}","title":"Headline {n}","description":"Description {n}","url":"https://news.example/{n}","publishedAt":"2024-03-0{}T0{}:00:00Z","content":"Body {n}"}}"#,
                n % 9 + 1,
                n % 9
            )
        })
        .collect();
    for _ in 0..broken {
        items.push(r#"{"source":{"name":"Broken"},"title":null,"url":null}"#.to_string());
    }
    format!(
        r#"{{"status":"ok","totalResults":{},"articles":[{}]}}"#,
        valid + broken,
        items.join(",")
    )
}

#[test]
fn technology_headlines_page_and_favorite_round_trip() {
    let dir = tempdir().unwrap();
    let favorites_path = dir.path().join("favorites.json");

    // Build the query the orchestrator would issue.
    let mut query = Query::headlines();
    query.category = Some(Category::parse("Technology").unwrap());
    query.page_size = 10;
    assert!(query.build().is_ok());

    // Provider returns 25 usable articles plus 2 the gateway must drop.
    let body = provider_payload(25, 2);
    let result = NewsClient::parse_articles(200, None, &body, &query).unwrap();
    assert_eq!(result.len(), 25);
    assert_eq!(result.dropped, 2);
    assert_eq!(result.total_results, 27);

    // 25 articles at page size 10 make pages of 10, 10 and 5.
    let mut pager = Pager::new(result, 10);
    assert_eq!(pager.page_count(), 3);
    assert_eq!(pager.current_page().articles.len(), 10);
    assert!(pager.next_page());
    assert!(pager.next_page());
    assert_eq!(pager.current_page().articles.len(), 5);
    assert!(!pager.next_page());
    assert!(pager.jump_to(3).is_err());

    // Favorite the second article on the last page.
    let picked = pager.article_at(1).unwrap().clone();
    {
        let mut store = FavoritesStore::load(&favorites_path).unwrap();
        store.add(&picked).unwrap();
        assert!(store.add(&picked).is_err());
        assert_eq!(store.len(), 1);
    }

    // Simulated restart: a fresh load still holds the same url.
    let store = FavoritesStore::load(&favorites_path).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.contains(&picked.url));
    assert_eq!(store.list()[0].title, picked.title);
}

#[test]
fn empty_search_fails_before_any_network_call() {
    // Validation happens in `build`, which the gateway runs before
    // touching the socket.
    let query = Query::search("   ");
    assert!(query.build().is_err());
}
