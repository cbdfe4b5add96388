mod catalog;
mod contact;
mod estimate;
mod estimate_request;
mod form;
mod gallery_item;
mod news_article;

pub use catalog::{AddOn, AddOnId, Catalog, CatalogError, MAX_PRICE, Product, ProductId};
pub use contact::ContactInfo;
pub use estimate::{Estimate, EstimateDisplay};
pub use estimate_request::EstimateRequest;
pub use form::{BudgetForm, FormField};
pub use gallery_item::GalleryItem;
pub use news_article::NewsArticle;
