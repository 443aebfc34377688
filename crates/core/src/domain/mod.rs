pub mod forecast;
pub mod request;
