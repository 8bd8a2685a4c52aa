pub mod admin;
pub mod app;
pub mod htmx;
pub mod metrics;
pub mod request_form;
