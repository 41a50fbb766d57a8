pub mod analyze;
pub mod compare;
pub mod extract;
pub mod llm;
pub mod prompt;
pub mod validate;

pub use analyze::*;
pub use compare::*;
pub use extract::*;
pub use llm::*;
pub use prompt::*;
pub use validate::*;
