//! Media module for resolution and embedded media discovery.

pub mod item;
pub mod resolver;
pub mod scrape;

pub use item::{filename_from_uri, ResolvedMedia};
pub use resolver::{is_image_link, resolve_post_media, upgrade_image_uri};
pub use scrape::{EmbeddedMediaScraper, HtmlScraper};
