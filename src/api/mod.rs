mod client;
mod error;
mod types;

pub use client::{FeedClient, page_path};
pub use error::ApiError;
pub use types::{
    Command, Comment, Entry, FeedRef, FeedSnapshot, Like, PAGE_SIZE, Paging, RealizedComment,
    Thumbnail, Via,
};
