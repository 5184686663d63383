//! Blog post handlers - CRUD, search, and multipart image upload.

use actix_multipart::form::MultipartForm;
use actix_multipart::form::bytes::Bytes as UploadedFile;
use actix_multipart::form::text::Text;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use scribe_core::domain::{Page, Post};
use scribe_core::service::{ImageUpload, NewPost, PostChanges};
use scribe_shared::dto::{CreatePostRequest, PageResponse, PostResponse, UpdatePostRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart body of the create/update endpoints: an optional JSON `post`
/// part plus any number of `images` file parts.
#[derive(Debug, MultipartForm)]
pub struct PostForm {
    pub post: Option<Text<String>>,
    pub images: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author_id: Option<Uuid>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    pub author_id: Uuid,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

fn parse_post_part<T: serde::de::DeserializeOwned>(part: &Text<String>) -> AppResult<T> {
    serde_json::from_str(&part.0)
        .map_err(|e| AppError::BadRequest(format!("Malformed 'post' JSON: {}", e)))
}

fn uploads_from(files: Vec<UploadedFile>) -> Vec<ImageUpload> {
    files
        .into_iter()
        .map(|file| ImageUpload {
            file_name: file.file_name.unwrap_or_else(|| "upload".to_string()),
            bytes: file.data.to_vec(),
        })
        .collect()
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        images: post.images,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn page_response(page: Page<Post>) -> PageResponse<PostResponse> {
    let page = page.map(to_response);
    PageResponse {
        items: page.items,
        page: page.page,
        size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}

/// POST /api/posts - create a post from a multipart request.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let part = form
        .post
        .ok_or_else(|| AppError::BadRequest("Missing 'post' part".to_string()))?;
    let req: CreatePostRequest = parse_post_part(&part)?;

    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Content must not be empty".to_string(),
        ));
    }

    let new_post = NewPost {
        title: req.title,
        content: req.content,
        images: uploads_from(form.images),
    };

    let post = state.posts.create(new_post, identity.user_id).await?;
    Ok(HttpResponse::Created().json(to_response(post)))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PUT /api/posts/{id} - partial update plus image reconciliation.
///
/// The `post` part may be left out entirely to only append uploaded images.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let req: UpdatePostRequest = match form.post {
        Some(part) => parse_post_part(&part)?,
        None => UpdatePostRequest::default(),
    };

    if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }
    if req.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "Content must not be empty".to_string(),
        ));
    }

    let changes = PostChanges {
        title: req.title,
        content: req.content,
        kept_images: req.existing_images,
        new_images: uploads_from(form.images),
    };

    let post = state
        .posts
        .update(path.into_inner(), changes, identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// DELETE /api/posts/{id} - any authenticated user may delete any post.
pub async fn remove(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts - one page of all posts, newest first.
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.pagination.clamp(query.page, query.size);
    let posts = state.posts.list(page).await?;
    Ok(HttpResponse::Ok().json(page_response(posts)))
}

/// GET /api/posts/search - combined title/author search.
///
/// Both criteria are optional; with neither supplied this is a plain listing.
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let page = state.pagination.clamp(query.page, query.size);
    let posts = state
        .posts
        .search(query.title.as_deref(), query.author_id, page)
        .await?;
    Ok(HttpResponse::Ok().json(page_response(posts)))
}

/// GET /api/posts/filter/title?title=...
pub async fn filter_by_title(
    state: web::Data<AppState>,
    query: web::Query<TitleQuery>,
) -> AppResult<HttpResponse> {
    let page = state.pagination.clamp(query.page, query.size);
    let posts = state.posts.search_by_title(&query.title, page).await?;
    Ok(HttpResponse::Ok().json(page_response(posts)))
}

/// GET /api/posts/filter/author?author_id=...
pub async fn filter_by_author(
    state: web::Data<AppState>,
    query: web::Query<AuthorQuery>,
) -> AppResult<HttpResponse> {
    let page = state.pagination.clamp(query.page, query.size);
    let posts = state.posts.search_by_author(query.author_id, page).await?;
    Ok(HttpResponse::Ok().json(page_response(posts)))
}
