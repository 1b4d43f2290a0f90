//! Contains the syntax tree nodes that represent the structure of the source code.

use getset::Getters;

use crate::base::source_file::{SourceElement, Span};

pub mod declaration;
pub mod expression;
pub mod module;
pub mod statement;

/// Represents a syntax tree node with a pattern of syntax tree nodes separated by a separator.
///
/// This struct is useful for representing syntax tree nodes that are separated by a separator.
/// For example, the statements of a procedure body are separated by semicolons.
///
/// Syntax Synopsis:
///
/// ``` ebnf
/// ConnectedList:
///     Element (Separator Element)*
///     ;
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters)]
pub struct ConnectedList<Element, Separator> {
    /// The first element of the list.
    #[get = "pub"]
    first: Element,

    /// The rest of the elements of the list, each preceded by its separator.
    #[get = "pub"]
    rest: Vec<(Separator, Element)>,
}

impl<Element, Separator> ConnectedList<Element, Separator> {
    /// Creates a list holding a single element.
    pub fn new(first: Element) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    /// Appends an element together with the separator in front of it.
    pub(crate) fn push(&mut self, separator: Separator, element: Element) {
        self.rest.push((separator, element));
    }

    /// Returns an iterator over the elements of the list.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, element)| element))
    }

    /// Returns an iterator over the elements of the list.
    pub fn into_elements(self) -> impl Iterator<Item = Element> {
        std::iter::once(self.first).chain(self.rest.into_iter().map(|(_, element)| element))
    }

    /// Gets the number of elements in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always `false`, a connected list holds at least one element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Dissolves the list into the first element and the rest.
    #[must_use]
    pub fn dissolve(self) -> (Element, Vec<(Separator, Element)>) {
        (self.first, self.rest)
    }
}

impl<Element: SourceElement, Separator> SourceElement for ConnectedList<Element, Separator> {
    fn span(&self) -> Span {
        let first = self.first.span();
        self.rest.last().map_or_else(
            || first.clone(),
            |(_, last)| first.join(&last.span()).unwrap_or_else(|| first.clone()),
        )
    }
}
