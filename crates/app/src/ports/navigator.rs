//! Navigation port — leaving the editing context.

/// Invoked when the operator is done with the editor, either after a
/// successful save or an explicit cancel.
pub trait Navigator {
    fn leave(&self);
}

/// Navigator for contexts with nowhere to go back to.
impl Navigator for () {
    fn leave(&self) {}
}
