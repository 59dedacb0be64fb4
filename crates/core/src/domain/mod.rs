pub mod forecast;
pub mod insight;
