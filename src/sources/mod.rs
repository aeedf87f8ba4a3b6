pub mod cms_api;

pub use cms_api::CmsApiSource;
