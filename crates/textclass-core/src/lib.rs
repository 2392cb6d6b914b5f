pub mod category;
pub mod verdict;

pub use category::Category;
pub use verdict::{CoreError, Target, Verdict, VerdictRule};
