/// The capability every reversible unit of work provides.
use std::fmt;

/// A self-contained, invertible unit of work against a target resource.
///
/// `apply` performs the forward mutation and `invert` undoes it. Both take
/// `&mut self` so an operation can capture whatever it needs during `apply`
/// (for example the content of a file it deletes) to rebuild the prior state
/// in `invert`.
///
/// Implementations must guarantee that `invert` after a successful `apply`
/// restores the portion of the target the operation touched. The
/// `HistoryManager` guarantees the call order: `apply` and `invert` alternate,
/// starting with `apply`.
pub trait Operation {
    /// The resource this operation mutates.
    type Target: ?Sized;
    /// The failure reported when the resource rejects a mutation.
    type Error: fmt::Debug + fmt::Display;

    /// Performs the forward mutation.
    fn apply(&mut self, target: &mut Self::Target) -> Result<(), Self::Error>;

    /// Performs the inverse mutation.
    fn invert(&mut self, target: &mut Self::Target) -> Result<(), Self::Error>;

    /// Short human-readable label for diagnostics.
    fn describe(&self) -> String {
        let name = std::any::type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name).to_string()
    }
}

impl<O: Operation + ?Sized> Operation for Box<O> {
    type Target = O::Target;
    type Error = O::Error;

    fn apply(&mut self, target: &mut Self::Target) -> Result<(), Self::Error> {
        (**self).apply(target)
    }

    fn invert(&mut self, target: &mut Self::Target) -> Result<(), Self::Error> {
        (**self).invert(target)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
