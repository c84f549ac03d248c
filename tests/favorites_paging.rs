use news_dashboard::article::{Article, ArticleSource, ArticleView};
use news_dashboard::favorites::{Change, FavoritesStore};
use news_dashboard::paginator::Paginator;
use tempfile::TempDir;

fn article(n: usize) -> Article {
    Article {
        source: Some(ArticleSource {
            id: None,
            name: Some("Wire".to_string()),
        }),
        title: Some(format!("Story {n}")),
        url: Some(format!("https://news.example/{n}")),
        published_at: Some("2024-05-01T12:00:00Z".to_string()),
        ..Article::default()
    }
}

#[test]
fn saved_articles_survive_restart_and_page_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("favorites.json");

    {
        let mut store = FavoritesStore::new(&path);
        for n in 0..23 {
            assert_eq!(store.add(&article(n)), Change::Persisted);
        }
        assert_eq!(store.add(&article(4)), Change::Unchanged);
        assert!(store.remove("https://news.example/0").is_persisted());
    }

    let store = FavoritesStore::new(&path);
    assert_eq!(store.count(), 22);
    assert!(store.contains("https://news.example/22"));
    assert!(!store.contains("https://news.example/0"));

    let articles: Vec<Article> = store.list().iter().map(Article::from).collect();
    let mut paginator = Paginator::new(articles, 10);
    assert_eq!(paginator.total_pages(), 3);

    let (page, info) = paginator.last_page();
    assert_eq!(page.len(), 2);
    assert_eq!((info.start_index, info.end_index), (21, 22));

    let view = ArticleView::new(&page[1], info.end_index);
    assert_eq!(view.title, "Story 22");
    assert_eq!(view.source, "Wire");
    assert_eq!(view.published, "2024-05-01 12:00");
}
