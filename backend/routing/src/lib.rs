pub mod route_label;

pub use route_label::RouteLabel;
