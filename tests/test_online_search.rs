use mockito::Matcher;
use recipe_finder::config::ApiConfig;
use recipe_finder::{Dataset, FinderError, OnlineSearch, Recipe, RecipeSearch, SearchMode};

fn client(base_url: &str, retry_attempts: u32) -> OnlineSearch {
    OnlineSearch::new(&ApiConfig {
        base_url: Some(base_url.to_string()),
        retry_attempts,
        retry_delay_ms: 0,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_online_search_sends_cleaned_tokens() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("q".into(), "tomato onion".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"TranslatedRecipeName": "Tomato Onion Chutney", "ingredients": ["tomato", "onion"]},
                {"RecipeName": "Onion Pakoda"},
                {"TranslatedRecipeName": ""}
            ]"#,
        )
        .create_async()
        .await;

    let outcome = RecipeSearch::builder()
        .ingredients("Tomato!!, onion, tomato")
        .mode(SearchMode::Online)
        .online(client(&server.url(), 1))
        .limit(1)
        .run()
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome.mode, SearchMode::Online);
    assert_eq!(outcome.tokens, vec!["tomato", "onion"]);
    assert_eq!(outcome.total_matches, 2);
    assert_eq!(outcome.recipes.len(), 1);
    assert_eq!(outcome.recipes[0].name, "Tomato Onion Chutney");
}

#[tokio::test]
async fn test_online_empty_result_has_its_own_message() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let outcome = RecipeSearch::builder()
        .ingredients("durian")
        .mode(SearchMode::Online)
        .online(client(&server.url(), 1))
        .run()
        .await
        .unwrap();

    assert!(outcome.recipes.is_empty());
    assert_eq!(
        outcome.render().to_text(),
        "No AI recipes found. Try different ingredients!"
    );
}

#[tokio::test]
async fn test_online_search_retries_then_fails() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let result = client(&server.url(), 3)
        .search(&["okra".to_string()])
        .await;

    mock.assert_async().await;
    assert!(matches!(result, Err(FinderError::Api(msg)) if msg.contains("500")));
}

#[tokio::test]
async fn test_online_failure_falls_back_to_offline() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let dataset = Dataset::new(vec![
        Recipe::new("Bhindi Masala").with_ingredients(["okra", "onion"]),
        Recipe::new("Dal").with_ingredients(["lentil"]),
    ]);

    let outcome = RecipeSearch::builder()
        .ingredients("okra")
        .mode(SearchMode::Online)
        .online(client(&server.url(), 1))
        .dataset(&dataset)
        .fallback_to_offline(true)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.mode, SearchMode::Offline);
    assert_eq!(outcome.recipes.len(), 1);
    assert_eq!(outcome.recipes[0].name, "Bhindi Masala");
    assert!(outcome
        .notice
        .as_deref()
        .unwrap()
        .starts_with("API temporarily unavailable"));
}

#[tokio::test]
async fn test_online_failure_without_fallback_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let result = RecipeSearch::builder()
        .ingredients("okra")
        .mode(SearchMode::Online)
        .online(client(&server.url(), 1))
        .run()
        .await;
    assert!(matches!(result, Err(FinderError::Api(_))));
}

#[tokio::test]
async fn test_short_input_is_rejected_without_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = RecipeSearch::builder()
        .ingredients("a")
        .mode(SearchMode::Online)
        .online(client(&server.url(), 1))
        .run()
        .await;

    mock.assert_async().await;
    assert!(
        matches!(result, Err(FinderError::Validation(msg)) if msg == "Please enter at least 2 characters")
    );
}
