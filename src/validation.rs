//! Validation cycle: validators followed by after-validation hooks.

use crate::constants::ERROR_BLANK;
use crate::errors::Errors;
use crate::model::TimestampModel;

type Validator<'a, M> = Box<dyn Fn(&M, &mut Errors) + 'a>;
type Hook<'a, M> = Box<dyn Fn(&mut M) + 'a>;

/// Validators and after-validation hooks registered for one model type.
///
/// A run starts from an empty [`Errors`] collection, so messages recorded
/// before the run are discarded unless a hook puts them back.
pub struct Validations<'a, M> {
    validators: Vec<Validator<'a, M>>,
    after: Vec<Hook<'a, M>>,
}

impl<M> Default for Validations<'_, M> {
    fn default() -> Self {
        Self {
            validators: Vec::new(),
            after: Vec::new(),
        }
    }
}

impl<'a, M: TimestampModel> Validations<'a, M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_with(&mut self, validator: impl Fn(&M, &mut Errors) + 'a) -> &mut Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Require the timestamp `field` to be set.
    pub fn validates_presence_of(&mut self, field: impl Into<String>) -> &mut Self {
        let field = field.into();
        self.validate_with(move |model, errors| {
            if model.timestamp(&field).is_none() {
                errors.add(field.as_str(), ERROR_BLANK);
            }
        })
    }

    /// Run `hook` once after every validation pass.
    pub fn after_validation(&mut self, hook: impl Fn(&mut M) + 'a) -> &mut Self {
        self.after.push(Box::new(hook));
        self
    }

    /// Validate `model`, returning whether it ended up without errors.
    pub fn run(&self, model: &mut M) -> bool {
        let mut errors = Errors::new();
        for validator in &self.validators {
            validator(model, &mut errors);
        }
        *model.errors_mut() = errors;

        for hook in &self.after {
            hook(model);
        }

        model.errors().is_empty()
    }
}
