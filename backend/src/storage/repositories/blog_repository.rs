use anyhow::Result;
use shared::{BlogCategory, BlogPost, BlogReaction};
use sqlx::{sqlite::SqliteRow, Row};
use crate::storage::connection::DbConnection;

/// Post columns plus its category, reaction tallies and the viewer's own reaction.
/// The single bind parameter is the viewer.
const POST_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.title, p.content, p.published, p.tags, p.created_at, p.updated_at,
           c.id AS category_id, c.user_id AS category_user_id, c.name AS category_name, c.color AS category_color,
           (SELECT COUNT(*) FROM blog_reactions r WHERE r.post_id = p.id AND r.reaction = 'like') AS likes,
           (SELECT COUNT(*) FROM blog_reactions r WHERE r.post_id = p.id AND r.reaction = 'dislike') AS dislikes,
           (SELECT r.reaction FROM blog_reactions r WHERE r.post_id = p.id AND r.user_id = ?) AS viewer_reaction
    FROM blog_posts p
    LEFT JOIN blog_categories c ON c.id = p.category_id
"#;

/// Repository for blog posts, categories and reactions
#[derive(Clone)]
pub struct BlogRepository {
    db: DbConnection,
}

impl BlogRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new post. Reaction counts on `post` are ignored.
    pub async fn store_post(&self, post: &BlogPost) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_posts (id, user_id, title, content, published, tags, category_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.user_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(serde_json::to_string(&post.tags)?)
        .bind(post.category.as_ref().map(|c| c.id.as_str()))
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    pub async fn update_post(&self, post: &BlogPost) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?, content = ?, published = ?, tags = ?, category_id = ?, updated_at = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(serde_json::to_string(&post.tags)?)
        .bind(post.category.as_ref().map(|c| c.id.as_str()))
        .bind(post.updated_at)
        .bind(&post.user_id)
        .bind(&post.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_post(&self, user_id: &str, post_id: &str) -> Result<Option<BlogPost>> {
        let query = format!("{} WHERE p.user_id = ? AND p.id = ?", POST_SELECT);
        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(user_id)
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// All of the user's posts, newest first
    pub async fn list_posts(&self, user_id: &str) -> Result<Vec<BlogPost>> {
        let query = format!(
            "{} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.ROWID DESC",
            POST_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(post_from_row).collect()
    }

    /// Delete a post together with its reactions
    pub async fn delete_post(&self, user_id: &str, post_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM blog_posts WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            sqlx::query("DELETE FROM blog_reactions WHERE post_id = ?")
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(removed > 0)
    }

    /// Apply `reaction` from `user_id`: repeating the current reaction withdraws it,
    /// anything else replaces it. Returns the reaction now held.
    pub async fn toggle_reaction(
        &self,
        post_id: &str,
        user_id: &str,
        reaction: BlogReaction,
    ) -> Result<Option<BlogReaction>> {
        let mut tx = self.db.pool().begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT reaction FROM blog_reactions WHERE post_id = ? AND user_id = ?")
                .bind(post_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let held = if current.as_deref() == Some(reaction.as_str()) {
            sqlx::query("DELETE FROM blog_reactions WHERE post_id = ? AND user_id = ?")
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            None
        } else {
            sqlx::query(
                r#"
                INSERT INTO blog_reactions (post_id, user_id, reaction)
                VALUES (?, ?, ?)
                ON CONFLICT (post_id, user_id) DO UPDATE SET reaction = excluded.reaction
                "#,
            )
            .bind(post_id)
            .bind(user_id)
            .bind(reaction.as_str())
            .execute(&mut *tx)
            .await?;
            Some(reaction)
        };

        tx.commit().await?;
        Ok(held)
    }

    /// Store a new category; false when the user already has one with that name
    pub async fn store_category(&self, category: &BlogCategory) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO blog_categories (id, user_id, name, color)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, name) DO NOTHING
            "#,
        )
        .bind(&category.id)
        .bind(&category.user_id)
        .bind(&category.name)
        .bind(&category.color)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// False when the row is missing or the new name is taken
    pub async fn update_category(&self, category: &BlogCategory) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE OR IGNORE blog_categories SET name = ?, color = ? WHERE user_id = ? AND id = ?",
        )
        .bind(&category.name)
        .bind(&category.color)
        .bind(&category.user_id)
        .bind(&category.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_category(&self, user_id: &str, category_id: &str) -> Result<Option<BlogCategory>> {
        let row = sqlx::query("SELECT id, user_id, name, color FROM blog_categories WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    /// Alphabetical by name
    pub async fn list_categories(&self, user_id: &str) -> Result<Vec<BlogCategory>> {
        let rows = sqlx::query("SELECT id, user_id, name, color FROM blog_categories WHERE user_id = ? ORDER BY name ASC")
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Delete a category; its posts become uncategorized
    pub async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM blog_categories WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed > 0 {
            sqlx::query("UPDATE blog_posts SET category_id = NULL WHERE category_id = ?")
                .bind(category_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(removed > 0)
    }
}

fn category_from_row(row: &SqliteRow) -> BlogCategory {
    BlogCategory {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        color: row.get("color"),
    }
}

fn post_from_row(row: &SqliteRow) -> Result<BlogPost> {
    let tags: String = row.get("tags");
    let category = row.get::<Option<String>, _>("category_id").map(|id| BlogCategory {
        id,
        user_id: row.get("category_user_id"),
        name: row.get("category_name"),
        color: row.get("category_color"),
    });
    let reaction = row
        .get::<Option<String>, _>("viewer_reaction")
        .and_then(|r| r.parse().ok());

    Ok(BlogPost {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        content: row.get("content"),
        published: row.get("published"),
        tags: serde_json::from_str(&tags)?,
        category,
        likes: tally(row.get("likes")),
        dislikes: tally(row.get("dislikes")),
        reaction,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn tally(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn category(id: &str, user: &str, name: &str) -> BlogCategory {
        BlogCategory {
            id: id.to_string(),
            user_id: user.to_string(),
            name: name.to_string(),
            color: "#3b82f6".to_string(),
        }
    }

    fn post(id: &str, user: &str, category: Option<BlogCategory>, created: NaiveDateTime) -> BlogPost {
        BlogPost {
            id: id.to_string(),
            user_id: user.to_string(),
            title: format!("Post {}", id),
            content: "Body".to_string(),
            published: true,
            tags: vec!["rust".to_string()],
            category,
            likes: 0,
            dislikes: 0,
            reaction: None,
            created_at: created,
            updated_at: created,
        }
    }

    async fn setup() -> BlogRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        BlogRepository::new(db)
    }

    #[tokio::test]
    async fn test_posts_load_with_category_and_newest_first() {
        let repo = setup().await;
        let notes = category("c1", "u1", "Notes");
        assert!(repo.store_category(&notes).await.unwrap());
        repo.store_post(&post("p1", "u1", Some(notes.clone()), at(1))).await.unwrap();
        repo.store_post(&post("p2", "u1", None, at(3))).await.unwrap();
        repo.store_post(&post("p3", "u2", None, at(2))).await.unwrap();

        let posts = repo.list_posts("u1").await.unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert_eq!(posts[1].category, Some(notes));
        assert_eq!(posts[1].tags, vec!["rust".to_string()]);

        assert!(repo.get_post("u2", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reactions_toggle_and_replace() {
        let repo = setup().await;
        repo.store_post(&post("p1", "u1", None, at(1))).await.unwrap();

        assert_eq!(
            repo.toggle_reaction("p1", "u1", BlogReaction::Like).await.unwrap(),
            Some(BlogReaction::Like)
        );
        let loaded = repo.get_post("u1", "p1").await.unwrap().unwrap();
        assert_eq!((loaded.likes, loaded.dislikes), (1, 0));
        assert_eq!(loaded.reaction, Some(BlogReaction::Like));

        // Disliking replaces the like
        assert_eq!(
            repo.toggle_reaction("p1", "u1", BlogReaction::Dislike).await.unwrap(),
            Some(BlogReaction::Dislike)
        );
        let loaded = repo.get_post("u1", "p1").await.unwrap().unwrap();
        assert_eq!((loaded.likes, loaded.dislikes), (0, 1));

        // Repeating withdraws it
        assert_eq!(repo.toggle_reaction("p1", "u1", BlogReaction::Dislike).await.unwrap(), None);
        let loaded = repo.get_post("u1", "p1").await.unwrap().unwrap();
        assert_eq!((loaded.likes, loaded.dislikes), (0, 0));
        assert_eq!(loaded.reaction, None);
    }

    #[tokio::test]
    async fn test_category_names_are_unique_per_user() {
        let repo = setup().await;
        assert!(repo.store_category(&category("c1", "u1", "Travel")).await.unwrap());
        assert!(!repo.store_category(&category("c2", "u1", "Travel")).await.unwrap());
        assert!(repo.store_category(&category("c3", "u2", "Travel")).await.unwrap());
        assert!(repo.store_category(&category("c4", "u1", "Books")).await.unwrap());

        // Renaming onto a taken name is ignored
        assert!(!repo.update_category(&category("c4", "u1", "Travel")).await.unwrap());

        let names: Vec<String> = repo
            .list_categories("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Books".to_string(), "Travel".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_posts() {
        let repo = setup().await;
        let travel = category("c1", "u1", "Travel");
        repo.store_category(&travel).await.unwrap();
        repo.store_post(&post("p1", "u1", Some(travel), at(1))).await.unwrap();

        assert!(!repo.delete_category("u2", "c1").await.unwrap());
        assert!(repo.delete_category("u1", "c1").await.unwrap());

        let loaded = repo.get_post("u1", "p1").await.unwrap().unwrap();
        assert!(loaded.category.is_none());
    }

    #[tokio::test]
    async fn test_delete_post_is_owner_scoped() {
        let repo = setup().await;
        repo.store_post(&post("p1", "u1", None, at(1))).await.unwrap();
        repo.toggle_reaction("p1", "u1", BlogReaction::Like).await.unwrap();

        assert!(!repo.delete_post("u2", "p1").await.unwrap());
        assert!(repo.delete_post("u1", "p1").await.unwrap());
        assert!(repo.list_posts("u1").await.unwrap().is_empty());
    }
}
