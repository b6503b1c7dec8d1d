//! Likes, saves, views, comments and reviews on top of a document store.
//!
//! Collections used:
//! - `users/{uid}` with `likedRecipes`, and `users/{uid}/savedRecipes/{id}`
//! - `recipes/{id}` holding the `likes` and `views` counters
//! - `recipeViews`, `recipeComments`, `reviews`

use crate::auth::{AuthProvider, Session, User};
use crate::dataset::Dataset;
use crate::model::Recipe;
use crate::store::{fields, Document, DocumentStore, FieldValue, Fields, SetMode};
use crate::FinderError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

const USERS: &str = "users";
const RECIPES: &str = "recipes";
const RECIPE_VIEWS: &str = "recipeViews";
const RECIPE_COMMENTS: &str = "recipeComments";
const REVIEWS: &str = "reviews";
const SAVED_RECIPES: &str = "savedRecipes";

/// Pseudo recipe id that site-wide reviews are filed under
pub const GENERAL_REVIEWS_ID: &str = "general_reviews";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub liked_recipes: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    fn from_document(doc: &Document) -> Self {
        UserProfile {
            name: doc.str_field("name").map(str::to_string),
            email: doc.str_field("email").map(str::to_string),
            photo_url: doc.str_field("photoURL").map(str::to_string),
            liked_recipes: doc.string_list("likedRecipes"),
            created_at: doc.timestamp("createdAt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecipe {
    pub id: String,
    pub recipe: Recipe,
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub rating: Option<u8>,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    pub user_name: String,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    fn from_document(doc: &Document) -> Self {
        let text = |name: &str| doc.str_field(name).unwrap_or_default().to_string();
        Comment {
            id: doc.id.clone(),
            recipe_id: text("recipeId"),
            user_id: text("userId"),
            user_name: text("userName"),
            comment: text("comment"),
            created_at: doc.timestamp("createdAt"),
        }
    }
}

/// A user's comment with the name of the recipe it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct UserComment {
    pub recipe_name: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

impl LikeOutcome {
    pub fn is_liked(&self) -> bool {
        matches!(self, LikeOutcome::Liked)
    }
}

/// User activity on recipes, persisted in a [`DocumentStore`]
#[derive(Clone)]
pub struct RecipeActivity {
    store: Arc<dyn DocumentStore>,
}

impl RecipeActivity {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        RecipeActivity { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Create an account and record its profile
    pub async fn sign_up(
        &self,
        auth: &dyn AuthProvider,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, FinderError> {
        let user = auth.sign_up(email, password, name).await?;
        self.save_user(&user).await?;
        Ok(user)
    }

    /// Merge the account's public details into `users/{uid}`
    pub async fn save_user(&self, user: &User) -> Result<(), FinderError> {
        let mut profile = fields([("createdAt", FieldValue::ServerTimestamp)]);
        let details = [
            ("name", &user.display_name),
            ("email", &user.email),
            ("photoURL", &user.photo_url),
        ];
        for (name, value) in details {
            if let Some(value) = value {
                profile.insert(name.to_string(), FieldValue::string(value.clone()));
            }
        }
        self.store
            .set(&user_path(&user.uid), profile, SetMode::Merge)
            .await
    }

    pub async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, FinderError> {
        Ok(self
            .store
            .get(&user_path(uid))
            .await?
            .map(|doc| UserProfile::from_document(&doc)))
    }

    /// Save a recipe to the signed-in user's collection
    pub async fn save_recipe(
        &self,
        session: &Session,
        recipe: &Recipe,
    ) -> Result<String, FinderError> {
        let user = session.require_user()?;
        let id = recipe.id();
        let mut record: Fields = match serde_json::to_value(recipe)? {
            Value::Object(map) => map
                .into_iter()
                .map(|(name, value)| (name, FieldValue::Value(value)))
                .collect(),
            _ => Fields::new(),
        };
        record.insert("savedAt".to_string(), FieldValue::ServerTimestamp);

        self.store
            .set(&saved_path(&user.uid, &id), record, SetMode::Replace)
            .await?;
        info!("Saved '{}' for {}", recipe.name, user.uid);
        Ok(id)
    }

    pub async fn saved_recipes(
        &self,
        session: &Session,
    ) -> Result<Vec<SavedRecipe>, FinderError> {
        let user = session.require_user()?;
        let docs = self
            .store
            .list(&format!("{}/{}/{}", USERS, user.uid, SAVED_RECIPES))
            .await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let saved_at = doc.timestamp("savedAt");
                match serde_json::from_value::<Recipe>(Value::Object(doc.fields)) {
                    Ok(recipe) => Some(SavedRecipe {
                        id: doc.id,
                        recipe,
                        saved_at,
                    }),
                    Err(e) => {
                        debug!("Skipping unreadable saved recipe {}: {}", doc.id, e);
                        None
                    }
                }
            })
            .collect())
    }

    pub async fn remove_saved_recipe(
        &self,
        session: &Session,
        recipe_id: &str,
    ) -> Result<(), FinderError> {
        let user = session.require_user()?;
        self.store.delete(&saved_path(&user.uid, recipe_id)).await
    }

    pub async fn save_review(
        &self,
        uid: &str,
        text: &str,
        rating: Option<u8>,
    ) -> Result<String, FinderError> {
        let mut review = fields([
            ("userId", FieldValue::string(uid)),
            ("text", FieldValue::string(text)),
            ("createdAt", FieldValue::ServerTimestamp),
        ]);
        if let Some(rating) = rating {
            review.insert("rating".to_string(), FieldValue::Value(json!(rating.min(5))));
        }
        self.store.add(REVIEWS, review).await
    }

    /// All reviews, newest first
    pub async fn reviews(&self) -> Result<Vec<Review>, FinderError> {
        let mut reviews: Vec<Review> = self
            .store
            .list(REVIEWS)
            .await?
            .into_iter()
            .map(|doc| Review {
                user_id: doc.str_field("userId").unwrap_or_default().to_string(),
                text: doc.str_field("text").unwrap_or_default().to_string(),
                rating: doc
                    .fields
                    .get("rating")
                    .and_then(Value::as_u64)
                    .and_then(|r| u8::try_from(r).ok()),
                created_at: doc.timestamp("createdAt"),
                id: doc.id,
            })
            .collect();
        reviews.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(reviews)
    }

    /// Like the recipe, or take the like back if the user already gave one
    pub async fn toggle_like(
        &self,
        uid: &str,
        recipe_id: &str,
    ) -> Result<LikeOutcome, FinderError> {
        let liked = self.is_liked(uid, recipe_id).await?;
        let (list_change, delta, outcome) = if liked {
            (FieldValue::ArrayRemove(json!(recipe_id)), -1, LikeOutcome::Unliked)
        } else {
            (FieldValue::ArrayUnion(json!(recipe_id)), 1, LikeOutcome::Liked)
        };

        self.store
            .set(
                &user_path(uid),
                fields([("likedRecipes", list_change)]),
                SetMode::Merge,
            )
            .await?;
        self.store
            .set(
                &recipe_path(recipe_id),
                fields([
                    ("likes", FieldValue::Increment(delta)),
                    ("lastUpdated", FieldValue::ServerTimestamp),
                ]),
                SetMode::Merge,
            )
            .await?;

        debug!("{} {:?} {}", uid, outcome, recipe_id);
        Ok(outcome)
    }

    pub async fn likes(&self, recipe_id: &str) -> Result<u64, FinderError> {
        self.counter(recipe_id, "likes").await
    }

    pub async fn is_liked(&self, uid: &str, recipe_id: &str) -> Result<bool, FinderError> {
        Ok(self
            .get_user(uid)
            .await?
            .map(|profile| profile.liked_recipes.iter().any(|id| id == recipe_id))
            .unwrap_or(false))
    }

    /// Count a view; signed-in viewers are also recorded individually
    pub async fn track_view(&self, recipe_id: &str, uid: Option<&str>) -> Result<(), FinderError> {
        self.store
            .set(
                &recipe_path(recipe_id),
                fields([
                    ("views", FieldValue::Increment(1)),
                    ("lastViewed", FieldValue::ServerTimestamp),
                ]),
                SetMode::Merge,
            )
            .await?;

        if let Some(uid) = uid {
            self.store
                .add(
                    RECIPE_VIEWS,
                    fields([
                        ("recipeId", FieldValue::string(recipe_id)),
                        ("userId", FieldValue::string(uid)),
                        ("viewedAt", FieldValue::ServerTimestamp),
                    ]),
                )
                .await?;
        }
        Ok(())
    }

    pub async fn views(&self, recipe_id: &str) -> Result<u64, FinderError> {
        self.counter(recipe_id, "views").await
    }

    pub async fn add_comment(
        &self,
        recipe_id: &str,
        uid: &str,
        user_name: &str,
        comment: &str,
    ) -> Result<String, FinderError> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(FinderError::Validation("Comment cannot be empty".to_string()));
        }
        self.store
            .add(
                RECIPE_COMMENTS,
                fields([
                    ("recipeId", FieldValue::string(recipe_id)),
                    ("userId", FieldValue::string(uid)),
                    ("userName", FieldValue::string(user_name)),
                    ("comment", FieldValue::string(comment)),
                    ("createdAt", FieldValue::ServerTimestamp),
                ]),
            )
            .await
    }

    /// Comments on one recipe, newest first
    pub async fn comments(&self, recipe_id: &str) -> Result<Vec<Comment>, FinderError> {
        let mut comments: Vec<Comment> = self
            .store
            .query(RECIPE_COMMENTS, "recipeId", &json!(recipe_id))
            .await?
            .iter()
            .map(Comment::from_document)
            .collect();
        sort_newest_first(&mut comments);
        Ok(comments)
    }

    /// Delete a comment if `uid` wrote it; returns whether anything was deleted
    pub async fn delete_comment(&self, comment_id: &str, uid: &str) -> Result<bool, FinderError> {
        let path = format!("{}/{}", RECIPE_COMMENTS, comment_id);
        match self.store.get(&path).await? {
            Some(doc) if doc.str_field("userId") == Some(uid) => {
                self.store.delete(&path).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// The user's liked recipes that exist in the dataset, in like order
    pub async fn liked_recipes<'a>(
        &self,
        uid: &str,
        dataset: &'a Dataset,
    ) -> Result<Vec<&'a Recipe>, FinderError> {
        let liked = self
            .get_user(uid)
            .await?
            .map(|profile| profile.liked_recipes)
            .unwrap_or_default();
        Ok(liked
            .iter()
            .filter_map(|id| dataset.find_by_id(id))
            .collect())
    }

    /// Everything the user commented on, across the dataset and the general
    /// reviews thread, newest first
    pub async fn user_comments(
        &self,
        uid: &str,
        dataset: &Dataset,
    ) -> Result<Vec<UserComment>, FinderError> {
        let mut names: HashMap<String, String> = dataset
            .recipes()
            .iter()
            .map(|r| (r.id(), r.name.clone()))
            .collect();
        names.insert(GENERAL_REVIEWS_ID.to_string(), "General Review".to_string());

        let mut found: Vec<UserComment> = self
            .store
            .query(RECIPE_COMMENTS, "userId", &json!(uid))
            .await?
            .iter()
            .map(Comment::from_document)
            .filter_map(|comment| {
                let recipe_name = names.get(&comment.recipe_id)?.clone();
                Some(UserComment {
                    recipe_name,
                    comment,
                })
            })
            .collect();
        found.sort_by_key(|c| std::cmp::Reverse(c.comment.created_at));
        Ok(found)
    }

    async fn counter(&self, recipe_id: &str, name: &str) -> Result<u64, FinderError> {
        Ok(self
            .store
            .get(&recipe_path(recipe_id))
            .await?
            .map(|doc| doc.count(name))
            .unwrap_or(0))
    }
}

fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by_key(|c| std::cmp::Reverse(c.created_at));
}

fn user_path(uid: &str) -> String {
    format!("{}/{}", USERS, uid)
}

fn recipe_path(recipe_id: &str) -> String {
    format!("{}/{}", RECIPES, recipe_id)
}

fn saved_path(uid: &str, recipe_id: &str) -> String {
    format!("{}/{}/{}/{}", USERS, uid, SAVED_RECIPES, recipe_id)
}
