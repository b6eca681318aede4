//! HTCondor ClassAds
//!
//! Parsing, evaluation and matchmaking for the ClassAd language, gathered
//! from the workspace crates:
//!
//! - [`ast`]: expression tree, canonical printing and the shared error type
//! - [`lexer`]: tokens
//! - [`parser`]: expressions and ads, new-style and old-style
//! - [`eval`]: values, ads, the evaluator, built-in functions and matchmaking
//!
//! ```
//! use classad::{ClassAd, Value};
//!
//! let ad: ClassAd = "[ Cpus = 4; Memory = Cpus * 1024 ]".parse().unwrap();
//! assert_eq!(ad.evaluate_attr("Memory"), Value::Integer(4096));
//! ```

pub use classad_ast as ast;
pub use classad_eval as eval;
pub use classad_lexer as lexer;
pub use classad_parser as parser;

pub use classad_ast::{ClassAdError, Expr};
pub use classad_eval::{
    ClassAd, EvalOptions, Evaluator, Value, matches, rank, requirements_met,
};
pub use classad_parser::{parse, parse_classad};
