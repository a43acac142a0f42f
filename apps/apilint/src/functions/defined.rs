use super::{no_options, subject, FunctionResult, LintFunction, Options};
use crate::target::LintTarget;

pub struct Defined {
    errors: Vec<String>,
}

impl Defined {
    pub fn new(options: &Options) -> Self {
        Self {
            errors: no_options("Defined", options),
        }
    }
}

impl LintFunction for Defined {
    fn name(&self) -> &'static str {
        "defined"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        if target.value().is_null() {
            FunctionResult::fail(format!("{} must be defined", subject(target)))
        } else {
            FunctionResult::pass()
        }
    }
}

pub struct Undefined {
    errors: Vec<String>,
}

impl Undefined {
    pub fn new(options: &Options) -> Self {
        Self {
            errors: no_options("Undefined", options),
        }
    }
}

impl LintFunction for Undefined {
    fn name(&self) -> &'static str {
        "undefined"
    }

    fn validate_options(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn run(&self, target: &LintTarget<'_>) -> FunctionResult {
        if target.value().is_null() {
            FunctionResult::pass()
        } else {
            FunctionResult::fail(format!("{} must be undefined", subject(target)))
        }
    }
}
