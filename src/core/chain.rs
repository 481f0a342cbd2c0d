//! Chain traversal
//!
//! A chain starts at any error and follows `source()` links. Traversal ends
//! at the first node without an error cause; a cause that is a plain value
//! ends it the same way. Cycles are not detected.

use std::error::Error as StdError;
use std::fmt;
use std::mem;
use std::ptr;

use crate::error::{ChainError, SEPARATOR};

/// Iterator over an error and its causes, outermost first
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    pub fn new(err: &'a (dyn StdError + 'static)) -> Self {
        Self {
            next: Some(resolve(err)),
        }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl std::iter::FusedIterator for Chain<'_> {}

/// Adopted errors are visited as the foreign value they hold
fn resolve<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match err.downcast_ref::<ChainError>() {
        Some(chain) => chain.as_node(),
        None => err,
    }
}

/// The last error reachable from `err`, which is `err` itself when it has
/// no error cause.
pub fn deepest_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    Chain::new(err).last().unwrap_or(err)
}

/// True when `target` is `err` itself or one of its causes.
///
/// Errors are compared by identity: two distinct errors with the same
/// message are never the same error.
pub fn is_in_chain(err: &(dyn StdError + 'static), target: &(dyn StdError + 'static)) -> bool {
    let target = Link::of(target);
    let mut link = Some(Link::of(err));
    while let Some(current) = link {
        if current.is(target) {
            return true;
        }
        link = current.next();
    }
    false
}

/// First error of type `T` in the chain, starting with `err` itself
pub fn find_in_chain<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    Chain::new(err).find_map(|node| node.downcast_ref::<T>())
}

/// First error in the chain built with the given name
pub fn find_named<'a>(err: &'a (dyn StdError + 'static), name: &str) -> Option<&'a ChainError> {
    Chain::new(err)
        .filter_map(|node| node.downcast_ref::<ChainError>())
        .find(|chain| chain.name() == name)
}

/// A chain node as seen by identity checks. Handles keep the `Arc` that
/// identifies them; the node a handle adopted is only reachable through it.
#[derive(Clone, Copy)]
enum Link<'a> {
    Handle(&'a ChainError),
    Plain(&'a (dyn StdError + 'static)),
}

impl<'a> Link<'a> {
    fn of(err: &'a (dyn StdError + 'static)) -> Self {
        match err.downcast_ref::<ChainError>() {
            Some(handle) => Link::Handle(handle),
            None => Link::Plain(err),
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Link::Handle(handle) => match handle.foreign() {
                Some(foreign) => foreign.source().map(Link::of),
                None => handle.cause().map(Link::Handle),
            },
            Link::Plain(err) => err.source().map(Link::of),
        }
    }

    fn node(self) -> &'a (dyn StdError + 'static) {
        match self {
            Link::Handle(handle) => handle.as_node(),
            Link::Plain(err) => err,
        }
    }

    fn is(self, other: Link<'_>) -> bool {
        match (self, other) {
            (Link::Handle(a), Link::Handle(b)) => a.ptr_eq(b),
            _ => same_value(self.node(), other.node()),
        }
    }
}

/// Same address and same size. Adopted errors own their allocation, so
/// distinct zero-sized errors never share an address.
fn same_value(a: &(dyn StdError + 'static), b: &(dyn StdError + 'static)) -> bool {
    ptr::addr_eq(a as *const dyn StdError, b as *const dyn StdError)
        && mem::size_of_val(a) == mem::size_of_val(b)
}

/// Write the messages of every node in the chain, joined by the separator.
///
/// A foreign node contributes its `Display` output and traversal continues
/// with its `source()`. A foreign error whose `Display` already includes its
/// source therefore shows that source twice.
pub(crate) fn render(err: &(dyn StdError + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, node) in Chain::new(err).enumerate() {
        if index > 0 {
            f.write_str(SEPARATOR)?;
        }
        match node.downcast_ref::<ChainError>().and_then(ChainError::native_message) {
            Some(message) => f.write_str(message)?,
            None => write!(f, "{}", node)?,
        }
    }
    Ok(())
}
