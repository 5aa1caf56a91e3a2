//! Domain entities - the core business objects.

mod author;
mod post;
mod visit;

pub use author::{AuthenticatedUser, AuthorProfile, mask_contact};
pub use post::{Feed, HomePage, NewPost, Page, Post, PostDetail, TagCount};
pub use visit::{ClientPlatform, VisitHit, VisitOutcome, VisitRecord, VisitorContext};
