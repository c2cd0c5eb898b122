pub mod resolver;
pub mod short_code;
pub mod shortener;
pub mod validation;

pub use resolver::Resolver;
pub use short_code::{CodeGenerator, RandomCodeGenerator};
pub use shortener::{RetryPolicy, ShortenerService};
