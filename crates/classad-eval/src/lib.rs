//! ClassAd evaluation
//!
//! Values, the [`ClassAd`] record, the expression evaluator with its
//! built-in functions, and matchmaking between pairs of ads.
//!
//! ```
//! use classad_eval::{ClassAd, Value, matches};
//!
//! let machine = ClassAd::parse("[ Memory = 2048; Requirements = TARGET.Owner == \"alice\" ]").unwrap();
//! let job = ClassAd::parse("[ Owner = \"alice\"; Requirements = TARGET.Memory >= 1024 ]").unwrap();
//!
//! assert!(matches(&machine, &job));
//! assert_eq!(job.evaluate_attr_against("Requirements", &machine), Value::Boolean(true));
//! ```

pub mod classad;
pub mod evaluator;
pub mod functions;
pub mod json;
pub mod matchmaking;
pub mod operators;
pub mod options;
pub mod value;

pub use classad::ClassAd;
pub use classad_ast::ClassAdError;
pub use evaluator::Evaluator;
pub use functions::{builtin_names, is_builtin};
pub use matchmaking::{matches, matches_with, rank, rank_with, requirements_met, requirements_met_with};
pub use options::EvalOptions;
pub use value::Value;
