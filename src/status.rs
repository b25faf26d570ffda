//! Operation status
//!
//! Every soft delete operation returns a `SoftDeleteStatus`: either valid, with a result and
//! a message for the user, or carrying one or more business errors.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftDeleteStatus<T> {
    errors: Vec<String>,
    message: String,
    result: T,
}

impl<T: Default> Default for SoftDeleteStatus<T> {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            message: "Success".to_string(),
            result: T::default(),
        }
    }
}

impl<T: Default> SoftDeleteStatus<T> {
    pub fn success(result: T, message: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            message: message.into(),
            result,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        let mut status = Self::default();
        status.add_error(error);
        status
    }
}

impl<T> SoftDeleteStatus<T> {
    /// Record a business error; the result is left as it is
    pub fn add_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_result(&mut self, result: T) {
        self.result = result;
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All errors, one per line
    pub fn all_errors(&self) -> String {
        self.errors.join("\n")
    }

    /// The success message, or an error summary when the status is not valid
    pub fn message(&self) -> String {
        match self.errors.len() {
            0 => self.message.clone(),
            1 => "Failed with 1 error".to_string(),
            n => format!("Failed with {} errors", n),
        }
    }

    pub fn result(&self) -> &T {
        &self.result
    }

    pub fn into_result(self) -> T {
        self.result
    }
}

impl<T> fmt::Display for SoftDeleteStatus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}", self.all_errors())
        }
    }
}
