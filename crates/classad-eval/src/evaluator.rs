//! Tree-walking evaluator
//!
//! Attribute references are resolved lazily: an attribute's expression is
//! evaluated in the ad that defines it, with MY and TARGET swapped when the
//! reference crosses over to the other ad.

use std::rc::Rc;

use classad_ast::{BinaryOp, Expr, Literal, Scope};
use tracing::{trace, warn};

use crate::classad::ClassAd;
use crate::functions;
use crate::operators::{self, Truth, truth};
use crate::options::EvalOptions;
use crate::value::Value;

/// Where names are looked up while evaluating an expression
///
/// Frames form a chain from the innermost nested record out to the ad that
/// was asked to evaluate; MY and TARGET ride along unchanged.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'s> {
    ad: Option<&'s ClassAd>,
    parent: Option<&'s Frame<'s>>,
    my: Option<&'s ClassAd>,
    target: Option<&'s ClassAd>,
}

impl<'s> Frame<'s> {
    /// Top frame for evaluating inside `ad`, which is also MY
    pub(crate) const fn root(ad: &'s ClassAd, target: Option<&'s ClassAd>) -> Self {
        Self {
            ad: Some(ad),
            parent: None,
            my: Some(ad),
            target,
        }
    }

    const fn detached(my: Option<&'s ClassAd>, target: Option<&'s ClassAd>) -> Self {
        Self {
            ad: my,
            parent: None,
            my,
            target,
        }
    }

    /// Frame for a record value reached from this frame
    fn nested<'a>(&'a self, ad: &'a ClassAd) -> Frame<'a> {
        Frame {
            ad: Some(ad),
            parent: Some(self),
            my: self.my,
            target: self.target,
        }
    }

    fn outermost(&self) -> Self {
        let mut frame = *self;
        while let Some(parent) = frame.parent {
            frame = *parent;
        }
        frame
    }

    /// The frame a scope keyword refers to, if that ad exists
    pub(crate) fn scoped(&self, scope: Scope) -> Option<Self> {
        match scope {
            Scope::My => self.my.map(|my| Self::root(my, self.target)),
            Scope::Target => self.target.map(|target| Self::root(target, self.my)),
            Scope::Parent => self.parent.filter(|parent| parent.ad.is_some()).copied(),
            Scope::Root => {
                let outermost = self.outermost();
                if outermost.ad.is_some() {
                    Some(outermost)
                } else {
                    self.scoped(Scope::My)
                }
            }
        }
    }

    /// Find the frame whose ad defines `name`, following unscoped lookup order
    fn resolve(&self, name: &str) -> Option<(Self, &'s ClassAd)> {
        let mut current = Some(*self);
        while let Some(frame) = current {
            if let Some(ad) = frame.ad.filter(|ad| ad.contains(name)) {
                return Some((frame, ad));
            }
            current = frame.parent.copied();
        }
        [Scope::My, Scope::Target]
            .into_iter()
            .filter_map(|scope| self.scoped(scope))
            .find_map(|frame| {
                frame
                    .ad
                    .filter(|ad| ad.contains(name))
                    .map(|ad| (frame, ad))
            })
    }

    /// The unevaluated expression an attribute reference points at
    pub(crate) fn lookup(&self, reference: &Expr) -> Option<&'s Expr> {
        match reference {
            Expr::Attribute(name) => self.resolve(name).and_then(|(_, ad)| ad.get(name)),
            Expr::Select { base, name } => match base.as_ref() {
                Expr::Scope(scope) => self.scoped(*scope)?.ad?.get(name),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Evaluates expressions against a MY and an optional TARGET ad
pub struct Evaluator<'o> {
    options: &'o EvalOptions,
    in_progress: Vec<(*const ClassAd, String)>,
    nesting: usize,
}

impl<'o> Evaluator<'o> {
    #[must_use]
    pub const fn new(options: &'o EvalOptions) -> Self {
        Self {
            options,
            in_progress: Vec::new(),
            nesting: 0,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &'o EvalOptions {
        self.options
    }

    /// Evaluate a free-standing expression
    ///
    /// Unscoped names are looked up in `my`, then in `target`.
    pub fn evaluate(&mut self, expr: &Expr, my: Option<&ClassAd>, target: Option<&ClassAd>) -> Value {
        let frame = Frame::detached(my, target);
        self.eval(expr, &frame)
    }

    /// Evaluate the attribute `name` of `ad`, with `ad` as MY
    pub fn evaluate_attribute(&mut self, ad: &ClassAd, name: &str, target: Option<&ClassAd>) -> Value {
        let frame = Frame::root(ad, target);
        self.evaluate_in(&frame, ad, name)
    }

    /// Evaluate one expression node, giving up with `ERROR` once `max_nesting` levels are open
    pub(crate) fn eval(&mut self, expr: &Expr, frame: &Frame<'_>) -> Value {
        if self.nesting >= self.options.max_nesting {
            warn!(
                max_nesting = self.options.max_nesting,
                "expression nesting limit reached"
            );
            return Value::Error;
        }

        self.nesting += 1;
        let value = self.eval_node(expr, frame);
        self.nesting -= 1;
        value
    }

    fn eval_node(&mut self, expr: &Expr, frame: &Frame<'_>) -> Value {
        match expr {
            Expr::Literal(literal) => literal_value(literal),
            Expr::Attribute(name) => match frame.resolve(name) {
                Some((found, ad)) => self.evaluate_in(&found, ad, name),
                None => {
                    trace!(attribute = %name, "unresolved reference");
                    Value::Undefined
                }
            },
            Expr::Scope(scope) => frame
                .scoped(*scope)
                .and_then(|scoped| scoped.ad)
                .map_or(Value::Undefined, |ad| Value::ClassAd(Rc::new(ad.clone()))),
            Expr::Select { base, name } => self.eval_select(base, name, frame),
            Expr::Subscript { base, index } => self.eval_subscript(base, index, frame),
            Expr::List(items) => Value::List(items.iter().map(|item| self.eval(item, frame)).collect()),
            Expr::Record(definitions) => Value::from(ClassAd::from_definitions(definitions)),
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand, frame);
                operators::unary(*op, &operand)
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, frame),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let condition_value = self.eval(condition, frame);
                match then {
                    Some(then) => match truth(&condition_value) {
                        Truth::True => self.eval(then, frame),
                        Truth::False => self.eval(otherwise, frame),
                        Truth::Undefined => Value::Undefined,
                        Truth::Error => Value::Error,
                    },
                    None if condition_value.is_undefined() => self.eval(otherwise, frame),
                    None => condition_value,
                }
            }
            Expr::Call { name, args } => functions::call(self, name, args, frame),
        }
    }

    /// Evaluate `name` as defined in `ad`, guarding against cycles and runaway depth
    fn evaluate_in(&mut self, frame: &Frame<'_>, ad: &ClassAd, name: &str) -> Value {
        let Some(expr) = ad.get(name) else {
            return Value::Undefined;
        };

        let key = (std::ptr::from_ref(ad), name.to_ascii_lowercase());
        if self.in_progress.contains(&key) {
            warn!(attribute = %name, "circular attribute reference");
            return Value::Error;
        }
        if self.in_progress.len() >= self.options.max_depth {
            warn!(
                attribute = %name,
                max_depth = self.options.max_depth,
                "evaluation depth limit reached"
            );
            return Value::Error;
        }

        self.in_progress.push(key);
        let value = self.eval(expr, frame);
        self.in_progress.pop();

        trace!(attribute = %name, %value, "evaluated attribute");
        value
    }

    fn eval_select(&mut self, base: &Expr, name: &str, frame: &Frame<'_>) -> Value {
        if let Expr::Scope(scope) = base {
            return match frame.scoped(*scope) {
                Some(scoped) => match scoped.ad {
                    Some(ad) => self.evaluate_in(&scoped, ad, name),
                    None => Value::Undefined,
                },
                None => Value::Undefined,
            };
        }

        match self.eval(base, frame) {
            Value::ClassAd(ad) => {
                let nested = frame.nested(&ad);
                self.evaluate_in(&nested, &ad, name)
            }
            Value::Undefined => Value::Undefined,
            _ => Value::Error,
        }
    }

    fn eval_subscript(&mut self, base: &Expr, index: &Expr, frame: &Frame<'_>) -> Value {
        let base = self.eval(base, frame);
        let index = self.eval(index, frame);

        match (base, index) {
            (Value::Error, _) | (_, Value::Error) => Value::Error,
            (Value::Undefined, _) | (_, Value::Undefined) => Value::Undefined,
            (Value::List(items), Value::Integer(position)) => usize::try_from(position)
                .ok()
                .and_then(|position| items.get(position))
                .cloned()
                .unwrap_or(Value::Error),
            (Value::ClassAd(ad), Value::String(name)) => {
                let nested = frame.nested(&ad);
                self.evaluate_in(&nested, &ad, &name)
            }
            _ => Value::Error,
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, frame: &Frame<'_>) -> Value {
        match op {
            BinaryOp::And => {
                let left = truth(&self.eval(left, frame));
                operators::and(left, || truth(&self.eval(right, frame)))
            }
            BinaryOp::Or => {
                let left = truth(&self.eval(left, frame));
                operators::or(left, || truth(&self.eval(right, frame)))
            }
            _ => {
                let left = self.eval(left, frame);
                let right = self.eval(right, frame);
                operators::binary(op, &left, &right)
            }
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Undefined => Value::Undefined,
        Literal::Error => Value::Error,
        Literal::Boolean(value) => Value::Boolean(*value),
        Literal::Integer(value) => Value::Integer(*value),
        Literal::Real(value) => Value::Real(*value),
        Literal::String(value) => Value::String(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(text: &str) -> ClassAd {
        ClassAd::parse(text).unwrap()
    }

    fn eval(expr: &str, my: Option<&ClassAd>, target: Option<&ClassAd>) -> Value {
        let expr = classad_parser::parse(expr).unwrap();
        Evaluator::new(&EvalOptions::default()).evaluate(&expr, my, target)
    }

    #[test]
    fn test_scoped_reference_to_my() {
        let my = ad("a = 4");
        assert_eq!(eval("my.a + 2", Some(&my), None), Value::Integer(6));
        assert_eq!(eval("a + 2", Some(&my), None), Value::Integer(6));
    }

    #[test]
    fn test_target_reference_swaps_scopes() {
        let my = ad("rank = TARGET.Memory + TARGET.Mips");
        let target = ad("Memory = 8\nMips = 10");
        assert_eq!(my.evaluate_attr_against("rank", &target), Value::Integer(18));

        // Inside TARGET, MY is the target ad itself
        let job = ad("x = TARGET.y\nz = 1");
        let machine = ad("y = MY.w + TARGET.z\nw = 10");
        assert_eq!(job.evaluate_attr_against("x", &machine), Value::Integer(11));
    }

    #[test]
    fn test_unscoped_falls_back_to_target() {
        let my = ad("a = 1");
        let target = ad("b = 2");
        assert_eq!(eval("a + b", Some(&my), Some(&target)), Value::Integer(3));
        assert_eq!(eval("c", Some(&my), Some(&target)), Value::Undefined);
    }

    #[test]
    fn test_my_shadows_target() {
        let my = ad("a = 1");
        let target = ad("a = 100");
        assert_eq!(eval("a", Some(&my), Some(&target)), Value::Integer(1));
        assert_eq!(eval("target.a", Some(&my), Some(&target)), Value::Integer(100));
    }

    #[test]
    fn test_missing_scopes_are_undefined() {
        assert_eq!(eval("TARGET.x", None, None), Value::Undefined);
        assert_eq!(eval("MY.x", None, None), Value::Undefined);
        assert_eq!(eval("x", None, None), Value::Undefined);
    }

    #[test]
    fn test_nested_records() {
        let my = ad("[ inner = [ x = 1; y = x + outer ]; outer = 10; z = inner.y ]");
        assert_eq!(my.evaluate_attr("z"), Value::Integer(11));
        assert_eq!(eval(r#"inner["X"]"#, Some(&my), None), Value::Integer(1));
        assert_eq!(eval("[a = 1; b = parent.c].b", Some(&ad("c = 5")), None), Value::Integer(5));
        assert_eq!(eval("inner.missing", Some(&my), None), Value::Undefined);
        assert_eq!(eval("outer.x", Some(&my), None), Value::Error);
    }

    #[test]
    fn test_root_scope() {
        let my = ad("[ n = 3; inner = [ n = 1; m = .n ] ]");
        assert_eq!(eval("inner.m", Some(&my), None), Value::Integer(3));
    }

    #[test]
    fn test_cycles_are_errors() {
        let my = ad("a = b\nb = a\nc = c + 1");
        assert_eq!(my.evaluate_attr("a"), Value::Error);
        assert_eq!(my.evaluate_attr("c"), Value::Error);
    }

    #[test]
    fn test_repeated_reference_is_not_a_cycle() {
        let my = ad("a = 2\nb = a * a + a");
        assert_eq!(my.evaluate_attr("b"), Value::Integer(6));
    }

    #[test]
    fn test_depth_limit() {
        let chain: String = (0..10).map(|i| format!("a{i} = a{} + 1\n", i + 1)).collect();
        let my = ad(&format!("{chain}a10 = 0"));
        assert_eq!(my.evaluate_attr("a0"), Value::Integer(10));

        let shallow = EvalOptions {
            max_depth: 5,
            ..EvalOptions::default()
        };
        assert_eq!(my.evaluate_with(&shallow, "a0", None), Value::Error);
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let deep = ad(&format!("a = {}1\nb = -(-(-1))", "-".repeat(2000)));
        assert_eq!(deep.evaluate_attr("a"), Value::Error);
        assert_eq!(deep.evaluate_attr("b"), Value::Integer(-1));

        let sum = ad("a = 1 + 1 + 1 + 1 + 1 + 1 + 1 + 1");
        assert_eq!(sum.evaluate_attr("a"), Value::Integer(8));

        let narrow = EvalOptions {
            max_nesting: 4,
            ..EvalOptions::default()
        };
        assert_eq!(sum.evaluate_with(&narrow, "a", None), Value::Error);
    }

    #[test]
    fn test_lists_and_subscripts() {
        assert_eq!(
            eval("{1, 1 + 1, \"x\"}", None, None),
            Value::List(vec![Value::Integer(1), Value::Integer(2), Value::from("x")])
        );
        assert_eq!(eval("{10, 20, 30}[1]", None, None), Value::Integer(20));
        assert_eq!(eval("{10, 20}[2]", None, None), Value::Error);
        assert_eq!(eval("{10, 20}[-1]", None, None), Value::Error);
        assert_eq!(eval("{10, 20}[undefined]", None, None), Value::Undefined);
        assert_eq!(eval("\"abc\"[0]", None, None), Value::Error);
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(eval("true ? 1 : 2", None, None), Value::Integer(1));
        assert_eq!(eval("0 ? 1 : 2", None, None), Value::Integer(2));
        assert_eq!(eval("undefined ? 1 : 2", None, None), Value::Undefined);
        assert_eq!(eval("\"s\" ? 1 : 2", None, None), Value::Error);
        assert_eq!(eval("false ? 1/0 : 2", None, None), Value::Integer(2));
        assert_eq!(eval("missing ?: 7", None, None), Value::Integer(7));
        assert_eq!(eval("3 ?: 7", None, None), Value::Integer(3));
    }

    #[test]
    fn test_logical_short_circuit_through_attributes() {
        let my = ad("a = false\nb = a && (1 / 0)\nc = !a || error");
        assert_eq!(my.evaluate_attr("b"), Value::Boolean(false));
        assert_eq!(my.evaluate_attr("c"), Value::Boolean(true));
    }

    #[test]
    fn test_scope_keyword_as_value() {
        let my = ad("a = 1");
        let value = eval("my", Some(&my), None);
        assert!(value.as_classad().is_some_and(|inner| inner.contains("a")));
        assert_eq!(eval("target", Some(&my), None), Value::Undefined);
    }

    #[test]
    fn test_attribute_lookup_ignores_case() {
        let my = ad("Memory = 64");
        assert_eq!(eval("MEMORY * 2", Some(&my), None), Value::Integer(128));
        assert_eq!(eval("My.memory", Some(&my), None), Value::Integer(64));
    }

    #[test]
    fn test_frame_lookup_returns_unevaluated_expression() {
        let my = ad("a = x + 3");
        let frame = Frame::root(&my, None);
        assert_eq!(
            frame.lookup(&Expr::attribute("A")).map(ToString::to_string),
            Some("x + 3".to_string())
        );
        assert_eq!(frame.lookup(&Expr::attribute("b")), None);
        assert_eq!(frame.lookup(&Expr::integer(1)), None);
    }
}
