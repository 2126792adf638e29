pub mod api;
pub mod errors;
pub mod html;

#[cfg(test)]
mod tests;

pub use api::{ApiPage, extract_page};
pub use errors::ExtractionError;
pub use html::{RuleSet, extract_channel_page, extract_list};
