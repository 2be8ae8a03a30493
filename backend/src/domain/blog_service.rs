//! Blog posts, their categories and reader reactions.
use chrono::Local;
use shared::{
    BlogCategory, BlogPost, BlogReaction, BlogReactionResponse, CreateBlogCategoryRequest, CreateBlogPostRequest,
    UpdateBlogCategoryRequest, UpdateBlogPostRequest,
};
use tracing::info;
use uuid::Uuid;

use super::models::{RecordValidationError, ServiceError};
use super::validation::{clean_tags, required_body, required_text};
use crate::storage::BlogRepository;

const DEFAULT_CATEGORY_COLOR: &str = "#3b82f6";

/// Category id a client sends to mean "no category"
const NO_CATEGORY: &str = "none";

#[derive(Clone)]
pub struct BlogService {
    blog_repository: BlogRepository,
}

impl BlogService {
    pub fn new(blog_repository: BlogRepository) -> Self {
        Self { blog_repository }
    }

    /// Newest first
    pub async fn list_posts(&self, owner: &str) -> Result<Vec<BlogPost>, ServiceError> {
        Ok(self.blog_repository.list_posts(owner).await?)
    }

    pub async fn get_post(&self, owner: &str, post_id: &str) -> Result<BlogPost, ServiceError> {
        self.blog_repository
            .get_post(owner, post_id)
            .await?
            .ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn create_post(&self, owner: &str, request: CreateBlogPostRequest) -> Result<BlogPost, ServiceError> {
        let now = Local::now().naive_local();
        let post = BlogPost {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            title: required_text(&request.title, "Title")?,
            content: required_body(&request.content, "Content")?,
            published: request.published.unwrap_or(false),
            tags: clean_tags(request.tags.unwrap_or_default()),
            category: self.resolve_category(owner, request.category_id.as_deref()).await?,
            likes: 0,
            dislikes: 0,
            reaction: None,
            created_at: now,
            updated_at: now,
        };

        self.blog_repository.store_post(&post).await?;
        info!("Created post {} for {}", post.id, owner);
        Ok(post)
    }

    pub async fn update_post(
        &self,
        owner: &str,
        post_id: &str,
        request: UpdateBlogPostRequest,
    ) -> Result<BlogPost, ServiceError> {
        let mut post = self.get_post(owner, post_id).await?;

        if let Some(title) = request.title {
            post.title = required_text(&title, "Title")?;
        }
        if let Some(content) = request.content {
            post.content = required_body(&content, "Content")?;
        }
        if let Some(published) = request.published {
            post.published = published;
        }
        if let Some(tags) = request.tags {
            post.tags = clean_tags(tags);
        }
        if let Some(category_id) = request.category_id {
            post.category = self.resolve_category(owner, Some(&category_id)).await?;
        }
        post.updated_at = Local::now().naive_local();

        if !self.blog_repository.update_post(&post).await? {
            return Err(ServiceError::NotFound("Post"));
        }
        info!("Updated post {} (published={})", post.id, post.published);
        Ok(post)
    }

    pub async fn delete_post(&self, owner: &str, post_id: &str) -> Result<(), ServiceError> {
        if !self.blog_repository.delete_post(owner, post_id).await? {
            return Err(ServiceError::NotFound("Post"));
        }
        info!("Deleted post {} for {}", post_id, owner);
        Ok(())
    }

    /// Like or dislike a post. Repeating a reaction withdraws it; the opposite one replaces it.
    pub async fn react(
        &self,
        owner: &str,
        post_id: &str,
        reaction: BlogReaction,
    ) -> Result<BlogReactionResponse, ServiceError> {
        self.get_post(owner, post_id).await?;

        let held = self.blog_repository.toggle_reaction(post_id, owner, reaction).await?;
        info!("Post {} {} by {}: now {:?}", post_id, reaction.as_str(), owner, held);
        Ok(BlogReactionResponse::from(held))
    }

    /// Alphabetical
    pub async fn list_categories(&self, owner: &str) -> Result<Vec<BlogCategory>, ServiceError> {
        Ok(self.blog_repository.list_categories(owner).await?)
    }

    pub async fn create_category(
        &self,
        owner: &str,
        request: CreateBlogCategoryRequest,
    ) -> Result<BlogCategory, ServiceError> {
        let category = BlogCategory {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            name: required_text(&request.name, "Name")?,
            color: color_or_default(request.color),
        };

        if !self.blog_repository.store_category(&category).await? {
            return Err(RecordValidationError::Duplicate("Category").into());
        }
        info!("Created blog category {} ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        owner: &str,
        category_id: &str,
        request: UpdateBlogCategoryRequest,
    ) -> Result<BlogCategory, ServiceError> {
        let mut category = self
            .blog_repository
            .get_category(owner, category_id)
            .await?
            .ok_or(ServiceError::NotFound("Category"))?;

        if let Some(name) = request.name {
            category.name = required_text(&name, "Name")?;
        }
        if let Some(color) = request.color.filter(|c| !c.trim().is_empty()) {
            category.color = color.trim().to_string();
        }

        // The row exists, so a skipped update means the name is taken
        if !self.blog_repository.update_category(&category).await? {
            return Err(RecordValidationError::Duplicate("Category").into());
        }
        info!("Updated blog category {}", category.id);
        Ok(category)
    }

    pub async fn delete_category(&self, owner: &str, category_id: &str) -> Result<(), ServiceError> {
        if !self.blog_repository.delete_category(owner, category_id).await? {
            return Err(ServiceError::NotFound("Category"));
        }
        info!("Deleted blog category {} for {}", category_id, owner);
        Ok(())
    }

    async fn resolve_category(&self, owner: &str, category_id: Option<&str>) -> Result<Option<BlogCategory>, ServiceError> {
        match category_id.map(str::trim) {
            None | Some("") | Some(NO_CATEGORY) => Ok(None),
            Some(id) => self
                .blog_repository
                .get_category(owner, id)
                .await?
                .map(Some)
                .ok_or(ServiceError::NotFound("Category")),
        }
    }
}

fn color_or_default(color: Option<String>) -> String {
    color
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup() -> BlogService {
        let db = DbConnection::init_test().await.expect("test database");
        BlogService::new(BlogRepository::new(db))
    }

    fn post_request(title: &str, category_id: Option<&str>) -> CreateBlogPostRequest {
        CreateBlogPostRequest {
            title: title.to_string(),
            content: "Some thoughts on the week.".to_string(),
            published: None,
            tags: Some(vec!["weekly".to_string(), "  ".to_string()]),
            category_id: category_id.map(str::to_string),
        }
    }

    fn category_request(name: &str) -> CreateBlogCategoryRequest {
        CreateBlogCategoryRequest {
            name: name.to_string(),
            color: None,
        }
    }

    #[tokio::test]
    async fn test_create_post_defaults() {
        let service = setup().await;

        let post = service.create_post("u1", post_request("Week 12", Some("none"))).await.unwrap();

        assert!(!post.published);
        assert!(post.category.is_none());
        assert_eq!(post.tags, vec!["weekly".to_string()]);
        assert_eq!((post.likes, post.dislikes), (0, 0));
        assert_eq!(service.get_post("u1", &post.id).await.unwrap(), post);
    }

    #[tokio::test]
    async fn test_create_post_validation() {
        let service = setup().await;

        let missing = service
            .create_post(
                "u1",
                CreateBlogPostRequest {
                    content: " ".to_string(),
                    ..post_request("Empty", None)
                },
            )
            .await;
        assert!(matches!(
            missing,
            Err(ServiceError::Validation(RecordValidationError::MissingField("Content")))
        ));

        let foreign = service.create_category("u2", category_request("Theirs")).await.unwrap();
        let result = service.create_post("u1", post_request("Mine", Some(&foreign.id))).await;
        assert!(matches!(result, Err(ServiceError::NotFound("Category"))));
    }

    #[tokio::test]
    async fn test_update_post_sets_and_clears_category() {
        let service = setup().await;
        let journal = service.create_category("u1", category_request("Journal")).await.unwrap();
        let post = service.create_post("u1", post_request("Draft", Some(&journal.id))).await.unwrap();
        assert_eq!(post.category.as_ref().map(|c| c.name.as_str()), Some("Journal"));

        let published = service
            .update_post(
                "u1",
                &post.id,
                UpdateBlogPostRequest {
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(published.published);
        assert_eq!(published.category, Some(journal));

        let cleared = service
            .update_post(
                "u1",
                &post.id,
                UpdateBlogPostRequest {
                    category_id: Some("none".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.category.is_none());
        assert!(service.get_post("u1", &post.id).await.unwrap().category.is_none());
    }

    #[tokio::test]
    async fn test_like_and_dislike_are_exclusive() {
        let service = setup().await;
        let post = service.create_post("u1", post_request("Hot take", None)).await.unwrap();

        let liked = service.react("u1", &post.id, BlogReaction::Like).await.unwrap();
        assert_eq!(liked, BlogReactionResponse { liked: true, disliked: false });

        let disliked = service.react("u1", &post.id, BlogReaction::Dislike).await.unwrap();
        assert_eq!(disliked, BlogReactionResponse { liked: false, disliked: true });

        let loaded = service.get_post("u1", &post.id).await.unwrap();
        assert_eq!((loaded.likes, loaded.dislikes), (0, 1));

        let withdrawn = service.react("u1", &post.id, BlogReaction::Dislike).await.unwrap();
        assert_eq!(withdrawn, BlogReactionResponse { liked: false, disliked: false });

        let missing = service.react("u1", "no-such-post", BlogReaction::Like).await;
        assert!(matches!(missing, Err(ServiceError::NotFound("Post"))));
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let service = setup().await;
        let travel = service.create_category("u1", category_request("Travel")).await.unwrap();
        assert_eq!(travel.color, "#3b82f6");

        let duplicate = service.create_category("u1", category_request(" Travel ")).await;
        assert!(matches!(
            duplicate,
            Err(ServiceError::Validation(RecordValidationError::Duplicate("Category")))
        ));

        let books = service.create_category("u1", category_request("Books")).await.unwrap();
        let renamed = service
            .update_category(
                "u1",
                &books.id,
                UpdateBlogCategoryRequest {
                    name: Some("Travel".to_string()),
                    color: None,
                },
            )
            .await;
        assert!(matches!(renamed, Err(ServiceError::Validation(RecordValidationError::Duplicate(_)))));

        let recolored = service
            .update_category(
                "u1",
                &books.id,
                UpdateBlogCategoryRequest {
                    name: None,
                    color: Some("#f59e0b".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(recolored.color, "#f59e0b");

        service.delete_category("u1", &travel.id).await.unwrap();
        let names: Vec<String> = service
            .list_categories("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Books".to_string()]);
        assert!(matches!(
            service.delete_category("u1", &travel.id).await,
            Err(ServiceError::NotFound("Category"))
        ));
    }
}
