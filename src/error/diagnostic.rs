use codespan::FileId;
use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use derive_more::From;

use super::{Error, Warning};
use crate::analyze::SemanticError;
use crate::location::{Locatable, Location};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, From)]
pub enum DiagnosticKind {
    Error(Error),
    Warning(Warning),
}

/// One structured record handed to whoever renders diagnostics.
///
/// `labels` holds secondary spans, for example the two operands of a
/// binary expression whose types were rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: Location,
    pub labels: Vec<Locatable<String>>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::Error(_) => Severity::Error,
            DiagnosticKind::Warning(_) => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn to_codespan(&self) -> Report<FileId> {
        let (report, message) = match &self.kind {
            DiagnosticKind::Error(err) => (Report::error(), err.to_string()),
            DiagnosticKind::Warning(warn) => (Report::warning(), warn.to_string()),
        };

        let mut labels = Vec::new();
        if let Some(file) = self.location.file() {
            labels.push(Label::primary(file, self.location.span));
        }
        for label in &self.labels {
            if let Some(file) = label.location.file() {
                labels.push(
                    Label::secondary(file, label.location.span).with_message(label.data.clone()),
                );
            }
        }

        report.with_message(message).with_labels(labels)
    }
}

impl From<Locatable<Error>> for Diagnostic {
    fn from(err: Locatable<Error>) -> Self {
        let labels = match &err.data {
            Error::Semantic(SemanticError::BinaryOperandsWrongTypes { lhs, rhs, .. }) => vec![
                lhs.location.with(format!("has type '{}'", lhs.data)),
                rhs.location.with(format!("has type '{}'", rhs.data)),
            ],
            Error::Semantic(SemanticError::UnaryOperandWrongType { operand, .. }) => {
                vec![operand
                    .location
                    .with(format!("has type '{}'", operand.data))]
            }
            _ => Vec::new(),
        };
        Diagnostic {
            kind: err.data.into(),
            location: err.location,
            labels,
        }
    }
}

impl From<Locatable<Warning>> for Diagnostic {
    fn from(warning: Locatable<Warning>) -> Self {
        Diagnostic {
            kind: warning.data.into(),
            location: warning.location,
            labels: Vec::new(),
        }
    }
}
