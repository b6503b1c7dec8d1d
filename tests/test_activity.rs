use chrono::DateTime;
use recipe_finder::{
    Dataset, FinderError, LikeOutcome, MemoryAuth, MemoryStore, Recipe, RecipeActivity, Session,
};
use std::sync::Arc;

struct Fixture {
    store: Arc<MemoryStore>,
    activity: RecipeActivity,
    session: Session,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    Fixture {
        activity: RecipeActivity::new(store.clone()),
        session: Session::new(Arc::new(MemoryAuth::new())),
        store,
    }
}

fn dataset() -> Dataset {
    Dataset::new(vec![
        Recipe::new("Masala Dosa").with_ingredients(["rice", "urad dal", "potato"]),
        Recipe::new("Poha").with_ingredients(["flattened rice", "onion"]),
        Recipe::new("Dal Tadka").with_ingredients(["toor dal", "ghee"]),
    ])
}

#[tokio::test]
async fn test_toggle_like_flips_state_and_counter() {
    let fx = fixture();

    let first = fx.activity.toggle_like("u1", "poha").await.unwrap();
    assert_eq!(first, LikeOutcome::Liked);
    assert!(fx.activity.is_liked("u1", "poha").await.unwrap());
    assert_eq!(fx.activity.likes("poha").await.unwrap(), 1);

    fx.activity.toggle_like("u2", "poha").await.unwrap();
    assert_eq!(fx.activity.likes("poha").await.unwrap(), 2);

    let second = fx.activity.toggle_like("u1", "poha").await.unwrap();
    assert!(!second.is_liked());
    assert!(!fx.activity.is_liked("u1", "poha").await.unwrap());
    assert_eq!(fx.activity.likes("poha").await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_recipe_has_no_activity() {
    let fx = fixture();
    assert_eq!(fx.activity.likes("nothing").await.unwrap(), 0);
    assert_eq!(fx.activity.views("nothing").await.unwrap(), 0);
    assert!(fx.activity.comments("nothing").await.unwrap().is_empty());
    assert!(!fx.activity.is_liked("u1", "nothing").await.unwrap());
}

#[tokio::test]
async fn test_liked_recipes_follow_like_order() {
    let fx = fixture();
    let dataset = dataset();
    for id in ["dal_tadka", "not_in_dataset", "masala_dosa"] {
        fx.activity.toggle_like("u1", id).await.unwrap();
    }

    let liked = fx.activity.liked_recipes("u1", &dataset).await.unwrap();
    let names: Vec<&str> = liked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Dal Tadka", "Masala Dosa"]);
}

#[tokio::test]
async fn test_saved_recipes_need_sign_in() {
    let fx = fixture();
    let poha = Recipe::new("Poha")
        .with_ingredients(["flattened rice", "onion"])
        .with_description("Light breakfast");

    let result = fx.activity.save_recipe(&fx.session, &poha).await;
    assert!(matches!(result, Err(FinderError::NotSignedIn)));
    assert!(matches!(
        fx.activity.saved_recipes(&fx.session).await,
        Err(FinderError::NotSignedIn)
    ));

    let user = fx
        .activity
        .sign_up(fx.session.auth(), "cook@example.com", "secret1", "Cook")
        .await
        .unwrap();
    let profile = fx.activity.get_user(&user.uid).await.unwrap().unwrap();
    assert_eq!(profile.name.as_deref(), Some("Cook"));
    assert!(profile.created_at.is_some());

    let id = fx.activity.save_recipe(&fx.session, &poha).await.unwrap();
    assert_eq!(id, "poha");
    // Saving again overwrites the same record
    fx.activity.save_recipe(&fx.session, &poha).await.unwrap();

    let saved = fx.activity.saved_recipes(&fx.session).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].recipe, poha);
    assert!(saved[0].saved_at.is_some());

    fx.activity
        .remove_saved_recipe(&fx.session, "poha")
        .await
        .unwrap();
    assert!(fx.activity.saved_recipes(&fx.session).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_track_view_counts_every_view() {
    let fx = fixture();
    fx.activity.track_view("poha", None).await.unwrap();
    fx.activity.track_view("poha", Some("u1")).await.unwrap();
    fx.activity.track_view("poha", Some("u1")).await.unwrap();

    assert_eq!(fx.activity.views("poha").await.unwrap(), 3);
    // recipes/poha plus one recipeViews entry per signed-in view
    assert_eq!(fx.store.len().await, 3);
}

#[tokio::test]
async fn test_comments_newest_first_and_author_only_delete() {
    let fx = fixture();
    fx.store.set_time(1_000).await;
    let older = fx
        .activity
        .add_comment("poha", "u1", "Asha", "Loved it")
        .await
        .unwrap();
    fx.store.set_time(2_000).await;
    fx.activity
        .add_comment("poha", "u2", "Ravi", "  Needs more lemon  ")
        .await
        .unwrap();
    fx.activity
        .add_comment("dal_tadka", "u1", "Asha", "Perfect")
        .await
        .unwrap();

    let comments = fx.activity.comments("poha").await.unwrap();
    let texts: Vec<&str> = comments.iter().map(|c| c.comment.as_str()).collect();
    assert_eq!(texts, vec!["Needs more lemon", "Loved it"]);
    assert_eq!(comments[1].created_at, DateTime::from_timestamp(1_000, 0));

    assert!(matches!(
        fx.activity.add_comment("poha", "u1", "Asha", "   ").await,
        Err(FinderError::Validation(_))
    ));

    assert!(!fx.activity.delete_comment(&older, "u2").await.unwrap());
    assert!(fx.activity.delete_comment(&older, "u1").await.unwrap());
    assert!(!fx.activity.delete_comment(&older, "u1").await.unwrap());
    assert_eq!(fx.activity.comments("poha").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_comments_name_their_recipes() {
    let fx = fixture();
    let dataset = dataset();
    fx.store.set_time(100).await;
    fx.activity
        .add_comment("poha", "u1", "Asha", "Quick and tasty")
        .await
        .unwrap();
    fx.store.set_time(200).await;
    fx.activity
        .add_comment("general_reviews", "u1", "Asha", "Great site")
        .await
        .unwrap();
    fx.activity
        .add_comment("removed_recipe", "u1", "Asha", "Gone")
        .await
        .unwrap();
    fx.activity
        .add_comment("poha", "u2", "Ravi", "Not mine")
        .await
        .unwrap();

    let mine = fx.activity.user_comments("u1", &dataset).await.unwrap();
    let names: Vec<&str> = mine.iter().map(|c| c.recipe_name.as_str()).collect();
    assert_eq!(names, vec!["General Review", "Poha"]);
}

#[tokio::test]
async fn test_reviews_newest_first_with_capped_rating() {
    let fx = fixture();
    fx.store.set_time(10).await;
    fx.activity.save_review("u1", "Nice", Some(4)).await.unwrap();
    fx.store.set_time(20).await;
    fx.activity.save_review("u2", "Superb", Some(9)).await.unwrap();
    fx.activity.save_review("u3", "No stars", None).await.unwrap();

    let reviews = fx.activity.reviews().await.unwrap();
    assert_eq!(reviews.len(), 3);
    assert_eq!(reviews[2].text, "Nice");
    assert_eq!(reviews[2].rating, Some(4));
    let superb = reviews.iter().find(|r| r.user_id == "u2").unwrap();
    assert_eq!(superb.rating, Some(5));
    let unrated = reviews.iter().find(|r| r.user_id == "u3").unwrap();
    assert_eq!(unrated.rating, None);
}
