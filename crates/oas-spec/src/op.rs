//! Setter calls and construction sequences.

use crate::{
    error::SpecResult,
    instance::Instance,
    value::{Bundle, Input},
};
use std::fmt;

/// Nested construction sequence run against a freshly created child.
pub type Block<'a> = Box<dyn FnOnce(&mut Instance) -> SpecResult<()> + 'a>;

/// One setter invocation: positional arguments, named arguments and an
/// optional nested block.
#[derive(Default)]
pub struct Call<'a> {
    pub args: Vec<Input>,
    pub named: Bundle,
    pub block: Option<Block<'a>>,
}

impl<'a> Call<'a> {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            named: Bundle::new(),
            block: None,
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Input>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append several positional arguments
    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Input>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Add a named argument
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Input>) -> Self {
        self.named.insert(name, value);
        self
    }

    /// Add every entry of a bundle as a named argument
    pub fn named(mut self, bundle: Bundle) -> Self {
        for (name, value) in bundle {
            self.named.insert(name, value);
        }
        self
    }

    /// Attach a nested construction closure
    pub fn block<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Instance) -> SpecResult<()> + 'a,
    {
        self.block = Some(Box::new(f));
        self
    }

    /// Attach a nested construction sequence given as data
    pub fn ops(self, ops: Vec<Op>) -> Self {
        self.block(move |instance| instance.apply_all(ops))
    }

    /// A call with nothing to set reads the attribute instead
    pub fn is_getter(&self) -> bool {
        self.args.is_empty() && self.named.is_empty() && self.block.is_none()
    }
}

impl fmt::Debug for Call<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("args", &self.args)
            .field("named", &self.named)
            .field("block", &self.block.is_some())
            .finish()
    }
}

/// A construction operation expressed as data.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `name(value)`
    Set { name: String, value: Input },
    /// `name(value...)`, accumulating across calls
    Append { name: String, values: Vec<Input> },
    /// `name(bundle) { block }`
    Object {
        name: String,
        named: Bundle,
        block: Vec<Op>,
    },
    /// `entry(args..., bundle) { block }` on an array attribute
    Add {
        entry: String,
        args: Vec<Input>,
        named: Bundle,
        block: Vec<Op>,
    },
    /// `entry(key, args..., bundle) { block }` on a map attribute
    Insert {
        entry: String,
        key: Input,
        args: Vec<Input>,
        named: Bundle,
        block: Vec<Op>,
    },
    /// Any call by name, shortcuts included
    Invoke {
        name: String,
        args: Vec<Input>,
        named: Bundle,
        block: Option<Vec<Op>>,
    },
}

impl Op {
    pub fn set(name: impl Into<String>, value: impl Into<Input>) -> Self {
        Op::Set {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn append<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Input>,
    {
        Op::Append {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn object(name: impl Into<String>, named: Bundle, block: Vec<Op>) -> Self {
        Op::Object {
            name: name.into(),
            named,
            block,
        }
    }

    pub fn add(entry: impl Into<String>, named: Bundle, block: Vec<Op>) -> Self {
        Op::Add {
            entry: entry.into(),
            args: Vec::new(),
            named,
            block,
        }
    }

    pub fn insert(
        entry: impl Into<String>,
        key: impl Into<Input>,
        named: Bundle,
        block: Vec<Op>,
    ) -> Self {
        Op::Insert {
            entry: entry.into(),
            key: key.into(),
            args: Vec::new(),
            named,
            block,
        }
    }

    pub fn invoke(name: impl Into<String>, args: Vec<Input>, named: Bundle) -> Self {
        Op::Invoke {
            name: name.into(),
            args,
            named,
            block: None,
        }
    }

    /// Lower the operation into the name and call the dispatcher receives
    pub fn into_call(self) -> (String, Call<'static>) {
        match self {
            Op::Set { name, value } => (name, Call::new().arg(value)),
            Op::Append { name, values } => (name, Call::new().args(values)),
            Op::Object { name, named, block } => (name, Call::new().named(named).ops(block)),
            Op::Add {
                entry,
                args,
                named,
                block,
            } => (entry, Call::new().args(args).named(named).ops(block)),
            Op::Insert {
                entry,
                key,
                args,
                named,
                block,
            } => (
                entry,
                Call::new().arg(key).args(args).named(named).ops(block),
            ),
            Op::Invoke {
                name,
                args,
                named,
                block,
            } => {
                let call = Call::new().args(args).named(named);
                let call = match block {
                    Some(ops) => call.ops(ops),
                    None => call,
                };
                (name, call)
            }
        }
    }
}
