//! Mapped entities for the board: members, their contact addresses, the
//! posts they pin, and the shared keyword vocabulary. `post_keywords` is the
//! association entity backing the many-to-many between posts and keywords.

pub mod address;
pub mod keyword;
pub mod post;
pub mod post_keywords;
pub mod user;

pub use address::Entity as Address;
pub use keyword::Entity as Keyword;
pub use post::Entity as Post;
pub use post_keywords::Entity as PostKeywords;
pub use user::Entity as User;
