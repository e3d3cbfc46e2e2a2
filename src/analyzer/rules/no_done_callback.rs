//! no-done-callback: tests and hooks should return a promise instead of
//! taking a completion callback.
//!
//! Per call site: classify the call, pick the callback argument, check its
//! shape, then report. Synchronous callbacks with a plain-name callback
//! parameter get a suggestion that wraps the body in `new Promise`.

use super::{LintRule, RuleContext};
use crate::detector::TestCallKind;
use crate::fixer::{wrap_in_promise, RewriteError};
use crate::parser::{
    callee_path, node_span, node_to_location, CallSite, FunctionLiteral, Param, Syntax,
};
use crate::{Diagnostic, MessageKind, Rule, Severity, Suggestion, SuggestionData};

/// Callee suffix of parameterized tests (`it.each`, `test.concurrent.each`, ...)
const EACH_SUFFIX: &str = ".each";

/// What kind of registration a call is, and where its callback sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    None,
    Hook,
    Test,
    ParameterizedTest,
}

impl Classification {
    /// Argument slot that carries the callback
    pub fn callback_argument(self) -> Option<usize> {
        match self {
            Classification::None => None,
            Classification::Hook => Some(0),
            Classification::Test | Classification::ParameterizedTest => Some(1),
        }
    }

    /// Leading callback parameters that hold case values rather than the
    /// completion callback
    pub fn parameter_offset(self) -> usize {
        match self {
            Classification::ParameterizedTest => 1,
            _ => 0,
        }
    }
}

/// Outcome of inspecting the callback argument
#[derive(Debug, Clone)]
pub enum CallbackShape<'t> {
    /// Not a function, or not the expected number of parameters
    NotApplicable,
    /// The callback parameter is a pattern; no name to reuse
    Unnameable(Param<'t>),
    /// Async function that also takes a callback
    Async(Param<'t>),
    /// Plain-name callback, but the body cannot be wrapped: generators
    /// (`yield` is invalid inside the executor) and functions containing
    /// parse errors
    Unwrappable(Param<'t>),
    /// Synchronous function with a plain-name callback parameter
    Rewritable {
        function: FunctionLiteral<'t>,
        param: Param<'t>,
        name: String,
    },
}

pub struct NoDoneCallbackRule;

impl NoDoneCallbackRule {
    pub fn new() -> Self {
        Self
    }

    /// Classify a call site. The direct `name.each(table)(...)` form is
    /// skipped: its callback slot cannot be located without following the
    /// call chain.
    pub fn classify(ctx: &RuleContext<'_>, call: &CallSite<'_>) -> Classification {
        let Some(path) = callee_path(call.callee, ctx.source) else {
            return Classification::None;
        };

        if path.ends_with(EACH_SUFFIX) {
            return if call.tagged_callee {
                Classification::ParameterizedTest
            } else {
                Classification::None
            };
        }

        match ctx.detector.classify(&path) {
            TestCallKind::Hook if !call.arguments.is_empty() => Classification::Hook,
            TestCallKind::Test if call.arguments.len() >= 2 => Classification::Test,
            _ => Classification::None,
        }
    }

    /// Inspect the argument in the callback slot.
    pub fn callback_shape<'t>(
        ctx: &RuleContext<'_>,
        call: &CallSite<'t>,
        classification: Classification,
    ) -> CallbackShape<'t> {
        let Some(argument) = classification
            .callback_argument()
            .and_then(|i| call.argument(i))
        else {
            return CallbackShape::NotApplicable;
        };
        let Syntax::Function(function) = Syntax::of(argument, ctx.source) else {
            return CallbackShape::NotApplicable;
        };

        let offset = classification.parameter_offset();
        if function.params.len() != 1 + offset {
            return CallbackShape::NotApplicable;
        }
        let param = function.params[offset].clone();

        match param.name().map(str::to_string) {
            None => CallbackShape::Unnameable(param),
            Some(_) if function.is_async => CallbackShape::Async(param),
            Some(_) if function.is_generator || has_parse_error(call, &function) => {
                CallbackShape::Unwrappable(param)
            }
            Some(name) => CallbackShape::Rewritable {
                function,
                param,
                name,
            },
        }
    }
}

/// Edits computed over ERROR or MISSING nodes can produce garbage, so
/// half-typed editor buffers get a diagnostic without a suggestion.
fn has_parse_error(call: &CallSite<'_>, function: &FunctionLiteral<'_>) -> bool {
    function.node.has_error() || call.node.has_error()
}

impl Default for NoDoneCallbackRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRule for NoDoneCallbackRule {
    fn rule(&self) -> Rule {
        Rule::NoDoneCallback
    }

    fn check_call(
        &self,
        ctx: &RuleContext<'_>,
        call: &CallSite<'_>,
    ) -> Result<Option<Diagnostic>, RewriteError> {
        let classification = Self::classify(ctx, call);
        if classification == Classification::None {
            return Ok(None);
        }

        let (kind, param, suggestion) = match Self::callback_shape(ctx, call, classification) {
            CallbackShape::NotApplicable => return Ok(None),
            CallbackShape::Unnameable(param) | CallbackShape::Unwrappable(param) => {
                (MessageKind::PlainCallbackDiscouraged, param, None)
            }
            CallbackShape::Async(param) => (MessageKind::UseAwaitInsteadOfCallback, param, None),
            CallbackShape::Rewritable {
                function,
                param,
                name,
            } => {
                let edits =
                    wrap_in_promise(&function, classification.parameter_offset(), &name)?;
                let data = SuggestionData { callback: name };
                let suggestion = Suggestion {
                    kind: MessageKind::SuggestWrapInPromise,
                    message: MessageKind::SuggestWrapInPromise.render(Some(&data)),
                    data,
                    edits,
                };
                (MessageKind::PlainCallbackDiscouraged, param, Some(suggestion))
            }
        };

        let anchor = param.node();
        Ok(Some(Diagnostic {
            rule: self.rule(),
            kind,
            severity: Severity::Error,
            message: kind.render(None),
            location: node_to_location(anchor),
            span: node_span(anchor),
            suggestions: suggestion.into_iter().collect(),
        }))
    }
}
