pub mod backend_api;
pub mod proxy_error;
pub mod search_proxy;
pub mod summary_proxy;
