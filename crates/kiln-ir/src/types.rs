use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural description of what a synthesized value can be.
///
/// Closed set of kinds. Descriptors carry no identity: two descriptors built
/// independently from the same parts compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueType {
    /// Untyped. Always accepted where a parameter is untyped.
    Anything,
    Undefined,
    Integer,
    Float,
    Boolean,
    String,
    /// A callable. `None` means the signature is unknown ("any function").
    Function {
        #[serde(default)]
        signature: Option<Box<Signature>>,
    },
}

/// Parameter list and return type of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<ValueType>,
    pub returns: ValueType,
}

impl Signature {
    pub fn new(params: Vec<ValueType>, returns: ValueType) -> Self {
        Self { params, returns }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether a call site passing values of `args` types satisfies this
    /// signature: same arity, and every argument compatible with its parameter.
    pub fn accepts(&self, args: &[ValueType]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| arg.is_compatible_with(param))
    }

    fn is_compatible_with(&self, required: &Signature) -> bool {
        self.params.len() == required.params.len()
            && self
                .params
                .iter()
                .zip(&required.params)
                .all(|(own, req)| own.is_lenient_match(req))
            && self.returns.is_compatible_with(&required.returns)
    }
}

impl ValueType {
    /// A callable with a known signature.
    pub fn function(params: Vec<ValueType>, returns: ValueType) -> Self {
        ValueType::Function {
            signature: Some(Box::new(Signature::new(params, returns))),
        }
    }

    /// A callable whose signature is unknown.
    pub fn any_function() -> Self {
        ValueType::Function { signature: None }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, ValueType::Function { .. })
    }

    pub fn signature(&self) -> Option<&Signature> {
        match self {
            ValueType::Function { signature } => signature.as_deref(),
            _ => None,
        }
    }

    /// Whether a value of this type may be used where `required` is expected.
    ///
    /// `Anything` as a requirement accepts every value. A function with an
    /// unknown signature as a requirement accepts every function.
    pub fn is_compatible_with(&self, required: &ValueType) -> bool {
        match (self, required) {
            (_, ValueType::Anything) => true,
            (ValueType::Function { .. }, ValueType::Function { signature: None }) => true,
            (
                ValueType::Function {
                    signature: Some(own),
                },
                ValueType::Function {
                    signature: Some(req),
                },
            ) => own.is_compatible_with(req),
            (own, req) => own == req,
        }
    }

    /// Parameter-position match inside signatures: `Anything` on either side
    /// matches.
    fn is_lenient_match(&self, other: &ValueType) -> bool {
        matches!(self, ValueType::Anything)
            || matches!(other, ValueType::Anything)
            || self.is_compatible_with(other)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Anything => write!(f, ".anything"),
            ValueType::Undefined => write!(f, ".undefined"),
            ValueType::Integer => write!(f, ".integer"),
            ValueType::Float => write!(f, ".float"),
            ValueType::Boolean => write!(f, ".boolean"),
            ValueType::String => write!(f, ".string"),
            ValueType::Function { signature: None } => write!(f, ".function()"),
            ValueType::Function {
                signature: Some(sig),
            } => {
                write!(f, ".function([")?;
                for (i, param) in sig.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "] => {})", sig.returns)
            }
        }
    }
}
