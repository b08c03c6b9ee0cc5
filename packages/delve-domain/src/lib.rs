pub mod evaluation;
pub mod fact;
pub mod summary;
pub mod validate;

pub use evaluation::Evaluation;
pub use fact::Fact;
pub use summary::Summary;
pub use validate::{Validated, extract_errors, has_required_keys, no_duplicates, valid_json};
