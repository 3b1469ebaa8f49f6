pub mod catalog_client;
pub mod lens_client;

pub use catalog_client::CatalogClient;
pub use lens_client::LensClient;
